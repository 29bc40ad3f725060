/*
 *  pacer.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed cadence deadlines for the tick loop
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use std::time::{Duration, Instant};

pub struct Pacer {
    next_deadline: Instant,
    period: Duration,
}

// one frame a second is plenty for a clock face,
// shorter periods are only for demos
impl Pacer {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self { next_deadline: Instant::now() + period, period }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    #[inline]
    pub fn period(&self) -> Duration { self.period }

    /// Time left until the next tick is due; schedules the one after it.
    ///
    /// A late caller gets zero and the schedule restarts from now, so a stall
    /// never turns into a burst of catch-up frames.
    pub fn next_delay(&mut self) -> Duration {
        self.next_delay_at(Instant::now())
    }

    fn next_delay_at(&mut self, now: Instant) -> Duration {
        if now >= self.next_deadline {
            self.next_deadline = now + self.period;
            Duration::ZERO
        } else {
            let wait = self.next_deadline - now;
            self.next_deadline += self.period;
            wait
        }
    }
}

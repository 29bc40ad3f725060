/*
 *  display/drivers/mock.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock sink for testing without hardware
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

use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::error::DisplayError;
use crate::display::traits::{check_grid, DisplaySink};
use crate::downsample::{Grid, GRID_SIZE};

/// Mock sink
///
/// Records every frame it is handed so tests and dry runs can inspect what
/// would have reached the matrix. State is shared so a clone kept by the test
/// sees frames pushed through the boxed sink the renderer owns.
#[derive(Debug, Clone)]
pub struct MockSink {
    size: usize,
    state: Arc<Mutex<MockSinkState>>,
}

/// Internal state for the mock sink (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockSinkState {
    /// Every grid received, oldest first
    pub frames: Vec<Grid>,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Simulate failures (for error testing)
    pub simulate_write_failure: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::with_size(GRID_SIZE)
    }

    pub fn with_size(size: usize) -> Self {
        Self { size, state: Arc::new(Mutex::new(MockSinkState::default())) }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockSinkState>> {
        Arc::clone(&self.state)
    }

    pub fn frame_count(&self) -> usize {
        self.lock().map(|s| s.frames.len()).unwrap_or(0)
    }

    pub fn last_frame(&self) -> Option<Grid> {
        self.lock().ok().and_then(|s| s.frames.last().cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockSinkState>, DisplayError> {
        self.state
            .lock()
            .map_err(|_| DisplayError::Other("mock sink state poisoned".to_string()))
    }
}

impl Default for MockSink {
    fn default() -> Self { Self::new() }
}

impl DisplaySink for MockSink {
    fn name(&self) -> &str { "mock" }

    fn grid_size(&self) -> usize { self.size }

    fn set_grid(&mut self, grid: Grid) -> Result<(), DisplayError> {
        check_grid(&grid, self.size)?;
        let mut state = self.lock()?;
        if state.simulate_write_failure {
            return Err(DisplayError::Other("Simulated write failure".to_string()));
        }
        state.frames.push(grid);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lock()?.clear_count += 1;
        self.set_grid(Grid::new(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_mock_sink_records_frames() {
        let mut sink = MockSink::new();
        let mut g = Grid::new(8);
        g.set(2, 5, Rgb888::RED);
        sink.set_grid(g.clone()).unwrap();

        assert_eq!(sink.frame_count(), 1);
        assert_eq!(sink.last_frame(), Some(g));
    }

    #[test]
    fn test_mock_sink_shared_state() {
        let sink = MockSink::new();
        let mut boxed: Box<dyn DisplaySink> = Box::new(sink.clone());
        boxed.set_grid(Grid::new(8)).unwrap();
        boxed.clear().unwrap();

        assert_eq!(sink.frame_count(), 2);
        assert_eq!(sink.state().lock().unwrap().clear_count, 1);
    }

    #[test]
    fn test_mock_sink_rejects_wrong_size() {
        let mut sink = MockSink::new();
        assert!(matches!(
            sink.set_grid(Grid::new(4)),
            Err(DisplayError::GridSizeMismatch { expected: 8, actual: 4 })
        ));
        assert_eq!(sink.frame_count(), 0);
    }

    #[test]
    fn test_mock_sink_simulated_failure() {
        let mut sink = MockSink::new();
        sink.state().lock().unwrap().simulate_write_failure = true;
        assert!(sink.set_grid(Grid::new(8)).is_err());

        sink.state().lock().unwrap().simulate_write_failure = false;
        assert!(sink.set_grid(Grid::new(8)).is_ok());
    }
}

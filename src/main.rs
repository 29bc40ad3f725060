/*
 *  main.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Driver loop: one frame a second until signalled
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

use anyhow::{Context, Result};
use env_logger::Env;
use log::{debug, error, info, warn};

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

use mclock::config::{self, OutputConfig, SinkKind};
use mclock::display::{DisplaySink, FramebufferSink, NullSink, TerminalSink};
use mclock::pacer::Pacer;
use mclock::{ClockError, ClockRenderer, FixedClock, LocalClock, TimeSource, CREDITS};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
#[cfg(unix)]
async fn signal_handler() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

fn open_sink(output: &OutputConfig) -> Result<Box<dyn DisplaySink>> {
    let sink: Box<dyn DisplaySink> = match output.sink {
        SinkKind::Terminal => Box::new(TerminalSink::stdout()),
        SinkKind::Null => Box::new(NullSink::new()),
        SinkKind::Framebuffer => match output.fb_device.as_ref() {
            Some(dev) => Box::new(
                FramebufferSink::open(dev, output.rotation)
                    .with_context(|| format!("opening framebuffer {}", dev.display()))?,
            ),
            None => Box::new(
                FramebufferSink::discover(output.rotation)
                    .context("looking for the Sense HAT framebuffer")?,
            ),
        },
    };
    Ok(sink)
}

/// Runs until `ticks` frames have been shown, or forever.
async fn clock_loop(
    renderer: &mut ClockRenderer,
    clock: &mut dyn TimeSource,
    sink: &mut dyn DisplaySink,
    mut pacer: Pacer,
    ticks: Option<u64>,
) -> Result<()> {
    let mut shown = 0u64;
    loop {
        match renderer.tick(clock, sink) {
            Ok(t) => debug!("frame {} at {}", shown, t),
            // a flaky sink should not stop the clock
            Err(ClockError::Display(e)) => warn!("{} sink: {}", sink.name(), e),
            Err(e) => return Err(e).context("render cycle failed"),
        }
        shown += 1;
        if ticks.is_some_and(|n| shown >= n) {
            info!("{} frames shown, stopping", shown);
            return Ok(());
        }
        tokio::time::sleep(pacer.next_delay()).await;
    }
}

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> Result<()> {
    let (settings, cli) = config::load().context("loading configuration")?;

    // Initialize the logger with the appropriate level based on debug flag
    env_logger::Builder::from_env(Env::default().default_filter_or(if cli.debug {"debug"} else {"info"}))
        .format_timestamp_secs()
        .init();

    if cli.credits {
        println!("{}", CREDITS);
        return Ok(());
    }
    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        print!("{}", serde_yaml::to_string(&settings).context("serialising config")?);
        return Ok(());
    }

    info!("{}", CREDITS);
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);
    if let Some(p) = settings.source.as_ref() {
        info!("using config {}", p.display());
    }
    info!(
        "{} segments, seconds {}, radius {}, {}",
        settings.clock.segments,
        if settings.clock.show_seconds { "on" } else { "off" },
        settings.clock.radius,
        settings.clock.downsample
    );

    let mut renderer = ClockRenderer::new(settings.clock.clone()).context("building renderer")?;
    let mut sink = open_sink(&settings.output)?;
    info!("output to {} sink", sink.name());

    let mut clock: Box<dyn TimeSource> = match cli.at {
        Some(t) => {
            info!("fixed time from {}", t);
            Box::new(FixedClock::ticking(t))
        }
        None => Box::new(LocalClock),
    };
    let pacer = Pacer::from_millis(settings.output.interval_ms);

    // Main application loop
    let outcome = tokio::select! {
        // Handle Unix signals for graceful shutdown
        r = signal_handler() => r,
        r = clock_loop(&mut renderer, clock.as_mut(), sink.as_mut(), pacer, cli.ticks) => r,
    };

    if let Err(e) = sink.clear() {
        warn!("could not blank the {} sink: {}", sink.name(), e);
    }
    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}

/*
 *  config.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
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

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::angles::TimeOfDay;
use crate::compositor::ChannelSet;
use crate::display::traits::check_rotation;
use crate::downsample::{DownsamplePolicy, GRID_SIZE};
use crate::hands::HandStyle;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("segment count must be at least 2, got {0}")]
    InvalidSegmentCount(usize),
}

/// Everything the renderer needs, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Segments per pigment wheel
    pub segments: usize,
    pub show_seconds: bool,
    /// Dial radius in canvas pixels; the canvas is twice this square
    pub radius: u32,
    pub grid_size: usize,
    pub active_channels: ChannelSet,
    pub hands: HandStyle,
    pub downsample: DownsamplePolicy,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            segments: 9,
            show_seconds: true,
            radius: 32,
            grid_size: GRID_SIZE,
            active_channels: ChannelSet::ALL,
            hands: HandStyle::default(),
            downsample: DownsamplePolicy::default(),
        }
    }
}

impl ClockConfig {
    /// Brightening factor of the weighted filter, if that filter is in use.
    pub fn dim(&self) -> Option<f32> {
        match self.downsample {
            DownsamplePolicy::CentralityWeighted { dim } => Some(dim),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments < 2 {
            return Err(ConfigError::InvalidSegmentCount(self.segments));
        }
        if let Some(dim) = self.dim() {
            if !(dim > 0.0 && dim <= 1.0) {
                return Err(ConfigError::Validation(format!("dim must be in (0, 1], got {dim}")));
            }
        }
        if self.grid_size < 2 || self.grid_size % 2 != 0 {
            return Err(ConfigError::Validation(format!(
                "grid size must be even and at least 2, got {}",
                self.grid_size
            )));
        }
        if (self.radius as usize) < self.grid_size / 2 {
            return Err(ConfigError::Validation(format!(
                "radius {} too small for a {}x{} grid",
                self.radius, self.grid_size, self.grid_size
            )));
        }
        let h = &self.hands;
        if !(h.hour_scale > 0.0 && h.minute_scale > 0.0) {
            return Err(ConfigError::Validation("hand scales must be > 0".into()));
        }
        if h.width == 0 {
            return Err(ConfigError::Validation("hand width must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// ANSI truecolor blocks on stdout
    Terminal,
    /// Sense HAT LED matrix via /dev/fb*
    Framebuffer,
    /// Render only
    Null,
}

/// Where frames go and how often.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub sink: SinkKind,
    /// Explicit framebuffer device; discovered through sysfs when unset
    pub fb_device: Option<PathBuf>,
    pub rotation: u16,
    pub interval_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { sink: SinkKind::Terminal, fb_device: None, rotation: 0, interval_ms: 1000 }
    }
}

/// Fully merged settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub clock: ClockConfig,
    pub output: OutputConfig,
    /// YAML file the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;
        // every sink drives an 8x8 matrix
        if self.clock.grid_size != GRID_SIZE {
            return Err(ConfigError::Validation(format!(
                "grid size must be {GRID_SIZE} for the display sinks, got {}",
                self.clock.grid_size
            )));
        }
        check_rotation(self.output.rotation)
            .map_err(|_| ConfigError::Validation("rotation must be 0|90|180|270".into()))?;
        if self.output.interval_ms == 0 {
            return Err(ConfigError::Validation("interval_ms must be > 0".into()));
        }
        Ok(())
    }
}

/// On-disk shape: every key optional so a file only names what it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub segments: Option<usize>,
    pub show_seconds: Option<bool>,
    pub radius: Option<u32>,
    pub grid_size: Option<usize>,
    pub active_channels: Option<ChannelSet>,
    pub hands: Option<HandStyle>,
    pub downsample: Option<DownsamplePolicy>,
    pub output: Option<FileOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOutput {
    pub sink: Option<SinkKind>,
    pub fb_device: Option<PathBuf>,
    pub rotation: Option<u16>,
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    Weighted,
    Flat,
    Random,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(
    name = "mclock",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("MCLOCK_BUILD_DATE"), ")"),
    about = "M Clock - pigment wheel analog clock for an 8x8 RGB matrix",
    disable_help_flag = false
)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(short = 'v', long = "debug", alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Segments per pigment wheel (>= 2)
    #[arg(short = 'n', long)]
    pub segments: Option<usize>,
    /// Freeze the second wheel at 12
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_seconds: bool,
    /// Weighted filter brightening factor, 0 < dim <= 1
    #[arg(long)]
    pub dim: Option<f32>,
    #[arg(long)]
    pub radius: Option<u32>,
    /// Active pigment channels, e.g. 0,2
    #[arg(long)]
    pub channels: Option<ChannelSet>,
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,
    /// Seed for the random policy
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub hand_width: Option<u32>,
    #[arg(long)]
    pub hour_scale: Option<f32>,
    #[arg(long)]
    pub minute_scale: Option<f32>,
    #[arg(short = 's', long, value_enum)]
    pub sink: Option<SinkKind>,
    /// Framebuffer device, e.g. /dev/fb1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub fb_device: Option<PathBuf>,
    /// Matrix rotation: 0, 90, 180 or 270
    #[arg(short = 'r', long)]
    pub rotation: Option<u16>,
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Show a fixed time (HH:MM[:SS]) ticking forward from there
    #[arg(long)]
    pub at: Option<TimeOfDay>,
    /// Stop after this many frames
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Print the credits and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub credits: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Settings, Cli), ConfigError> {
    let cli = Cli::parse();
    let settings = load_with(&cli)?;
    Ok((settings, cli))
}

/// Same layering for an already parsed command line.
pub fn load_with(cli: &Cli) -> Result<Settings, ConfigError> {
    // 1) YAML file (explicit path or search)
    let source = match cli.config.as_ref() {
        Some(p) if p.exists() => Some(p.clone()),
        Some(p) => {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
        None => find_config_file(),
    };
    let file = match source.as_deref() {
        Some(p) => read_yaml(p)?,
        None => FileConfig::default(),
    };

    // 2) over the defaults
    let mut settings = Settings { source, ..Settings::default() };
    merge(&mut settings, file);

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut settings, cli)?;

    // 4) Validate
    settings.validate()?;
    Ok(settings)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/mclock/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/mclock/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/mclock.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["mclock.yaml", "config/mclock.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<FileConfig, ConfigError> {
    let cfg: FileConfig = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Settings, src: FileConfig) {
    let c = &mut dst.clock;
    if let Some(v) = src.segments        { c.segments = v; }
    if let Some(v) = src.show_seconds    { c.show_seconds = v; }
    if let Some(v) = src.radius          { c.radius = v; }
    if let Some(v) = src.grid_size       { c.grid_size = v; }
    if let Some(v) = src.active_channels { c.active_channels = v; }
    if let Some(v) = src.hands           { c.hands = v; }
    if let Some(v) = src.downsample      { c.downsample = v; }
    if let Some(out) = src.output {
        merge_output(&mut dst.output, out);
    }
}

fn merge_output(dst: &mut OutputConfig, src: FileOutput) {
    if let Some(v) = src.sink        { dst.sink = v; }
    if src.fb_device.is_some()       { dst.fb_device = src.fb_device; }
    if let Some(v) = src.rotation    { dst.rotation = v; }
    if let Some(v) = src.interval_ms { dst.interval_ms = v; }
}

fn apply_cli_overrides(cfg: &mut Settings, cli: &Cli) -> Result<(), ConfigError> {
    let c = &mut cfg.clock;
    if let Some(v) = cli.segments     { c.segments = v; }
    if cli.no_seconds                 { c.show_seconds = false; }
    if let Some(v) = cli.radius       { c.radius = v; }
    if let Some(v) = cli.channels     { c.active_channels = v; }
    if let Some(v) = cli.hand_width   { c.hands.width = v; }
    if let Some(v) = cli.hour_scale   { c.hands.hour_scale = v; }
    if let Some(v) = cli.minute_scale { c.hands.minute_scale = v; }

    // policy first, then its parameters
    let current_dim = c.dim().unwrap_or(0.6);
    match cli.policy {
        Some(PolicyKind::Weighted) => c.downsample = DownsamplePolicy::CentralityWeighted { dim: current_dim },
        Some(PolicyKind::Flat) => c.downsample = DownsamplePolicy::FlatAverage,
        Some(PolicyKind::Random) => c.downsample = DownsamplePolicy::RandomPick { seed: None },
        None => {}
    }
    match &mut c.downsample {
        DownsamplePolicy::CentralityWeighted { dim } => {
            if let Some(v) = cli.dim { *dim = v; }
        }
        DownsamplePolicy::RandomPick { seed } => {
            if cli.seed.is_some() { *seed = cli.seed; }
        }
        DownsamplePolicy::FlatAverage => {}
    }
    let policy = c.downsample;
    if cli.dim.is_some() && !matches!(policy, DownsamplePolicy::CentralityWeighted { .. }) {
        return Err(ConfigError::Validation(format!("--dim has no effect with the {policy} policy")));
    }
    if cli.seed.is_some() && !matches!(policy, DownsamplePolicy::RandomPick { .. }) {
        return Err(ConfigError::Validation(format!("--seed has no effect with the {policy} policy")));
    }

    let o = &mut cfg.output;
    if let Some(v) = cli.sink        { o.sink = v; }
    if cli.fb_device.is_some()       { o.fb_device = cli.fb_device.clone(); }
    if let Some(v) = cli.rotation    { o.rotation = v; }
    if let Some(v) = cli.interval_ms { o.interval_ms = v; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mclock"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn layered(yaml: &str, args: &[&str]) -> Result<Settings, ConfigError> {
        let mut s = Settings::default();
        merge(&mut s, parse_yaml(yaml)?);
        apply_cli_overrides(&mut s, &cli(args))?;
        s.validate()?;
        Ok(s)
    }

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        s.validate().unwrap();
        assert_eq!(s.clock.segments, 9);
        assert_eq!(s.clock.radius, 32);
        assert_eq!(s.clock.dim(), Some(0.6));
        assert!(s.clock.show_seconds);
        assert_eq!(s.output.sink, SinkKind::Terminal);
    }

    #[test]
    fn yaml_then_cli() {
        let yaml = "segments: 12\nradius: 40\noutput:\n  sink: \"null\"\n  rotation: 90\n";
        let s = layered(yaml, &["--segments", "6", "--no-seconds"]).unwrap();
        assert_eq!(s.clock.segments, 6);
        assert_eq!(s.clock.radius, 40);
        assert!(!s.clock.show_seconds);
        assert_eq!(s.output.sink, SinkKind::Null);
        assert_eq!(s.output.rotation, 90);
    }

    #[test]
    fn rejects_too_few_segments() {
        assert!(matches!(
            layered("", &["--segments", "1"]),
            Err(ConfigError::InvalidSegmentCount(1))
        ));
    }

    #[test]
    fn rejects_dim_out_of_range() {
        assert!(matches!(layered("", &["--dim", "0"]), Err(ConfigError::Validation(_))));
        assert!(matches!(layered("", &["--dim", "1.5"]), Err(ConfigError::Validation(_))));
        assert!(layered("", &["--dim", "1"]).is_ok());
    }

    #[test]
    fn rejects_bad_rotation() {
        assert!(matches!(layered("", &["--rotation", "45"]), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn policy_and_parameters() {
        let s = layered("", &["--policy", "random", "--seed", "7"]).unwrap();
        assert_eq!(s.clock.downsample, DownsamplePolicy::RandomPick { seed: Some(7) });

        let s = layered("", &["--policy", "flat"]).unwrap();
        assert_eq!(s.clock.downsample, DownsamplePolicy::FlatAverage);

        let s = layered("downsample:\n  kind: centrality_weighted\n  dim: 0.5\n", &[]).unwrap();
        assert_eq!(s.clock.dim(), Some(0.5));
    }

    #[test]
    fn channels_from_cli() {
        let s = layered("", &["--channels", "0,2"]).unwrap();
        assert!(s.clock.active_channels.contains(0));
        assert!(!s.clock.active_channels.contains(1));
        assert!(Cli::try_parse_from(["mclock", "--channels", "3"]).is_err());
    }

    #[test]
    fn fixed_time_parses() {
        let c = cli(&["--at", "06:30", "--ticks", "3"]);
        assert_eq!(c.at.map(|t| t.to_string()), Some("06:30:00".to_string()));
        assert_eq!(c.ticks, Some(3));
        assert!(Cli::try_parse_from(["mclock", "--at", "25:00"]).is_err());
    }

    #[test]
    fn parameters_must_match_the_policy() {
        assert!(matches!(
            layered("", &["--policy", "flat", "--dim", "0.3"]),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(layered("", &["--seed", "7"]), Err(ConfigError::Validation(_))));
        assert!(matches!(
            layered("", &["--policy", "random", "--dim", "0.5"]),
            Err(ConfigError::Validation(_))
        ));
        // a seed from the file's policy is fine
        let s = layered("downsample:\n  kind: random_pick\n", &["--seed", "3"]).unwrap();
        assert_eq!(s.clock.downsample, DownsamplePolicy::RandomPick { seed: Some(3) });
    }

    #[test]
    fn grid_must_match_the_sinks() {
        assert!(matches!(layered("grid_size: 4\n", &[]), Err(ConfigError::Validation(_))));
        assert!(matches!(layered("grid_size: 16\nradius: 64\n", &[]), Err(ConfigError::Validation(_))));
        assert!(layered("grid_size: 8\n", &[]).is_ok());
    }

    #[test]
    fn records_the_file_it_read() {
        let path = std::env::temp_dir().join(format!("mclock-cfg-{}.yaml", std::process::id()));
        fs::write(&path, "segments: 5\n").unwrap();
        let s = load_with(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(s.clock.segments, 5);
        assert_eq!(s.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn radius_must_fit_the_grid() {
        assert!(layered("radius: 3\n", &[]).is_err());
        assert!(layered("grid_size: 7\n", &[]).is_err());
    }

    #[test]
    fn dump_round_trips() {
        let s = Settings::default();
        let text = serde_yaml::to_string(&s).unwrap();
        let back: Settings = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let c = cli(&["--config", "/definitely/not/here.yaml"]);
        assert!(matches!(load_with(&c), Err(ConfigError::Validation(_))));
    }
}

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::DEFAULT_HEIGHT;
use crate::DEFAULT_WIDTH;
use crate::menu::DEFAULT_VIEWPORT;
use crate::rule_set::RuleSet;

/// Time between two generations on the panel, 10 frames per second.
pub const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(100);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Menu viewport must show at least one row")]
    NoViewport,

    #[error("Frame time must be non-zero")]
    NoFrameTime,

    #[error("Headless runs need a pattern to start from")]
    HeadlessWithoutPattern,
}

/// Everything needed to set up a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub rule: RuleSet,

    /// Rows shown by the pattern menu
    pub viewport: usize,

    /// Delay between frames. Only the binary sleeps; the library never does.
    pub frame_time: Duration,

    /// Seed for the random patterns. `None` means pick one from the clock at startup.
    pub seed: Option<u64>,

    /// Pattern to start with, skipping the menu
    pub pattern: Option<String>,

    /// Extra patterns in RLE format
    pub rle: Vec<PathBuf>,

    /// Run without a terminal UI, logging stats every generation
    pub headless: bool,

    /// Stop after this many generations. Runs forever when `None`.
    pub generations: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rule: RuleSet::default(),
            viewport: DEFAULT_VIEWPORT,
            frame_time: DEFAULT_FRAME_TIME,
            seed: None,
            pattern: None,
            rle: Vec::new(),
            headless: false,
            generations: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        if self.viewport == 0 {
            return Err(ConfigError::NoViewport);
        }

        if self.frame_time.is_zero() {
            return Err(ConfigError::NoFrameTime);
        }

        if self.headless && self.pattern.is_none() {
            return Err(ConfigError::HeadlessWithoutPattern);
        }

        Ok(())
    }
}

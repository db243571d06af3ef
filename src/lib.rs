pub mod app;
pub mod braille;
pub mod config;
pub mod display;
pub mod engine;
pub mod events;
pub mod grid;
pub mod io;
pub mod menu;
pub mod pattern;
pub mod rle;
pub mod rule_set;
pub mod simulation;

mod parse_util;

/// Signed displacement of a cell from a pattern anchor, `(dx, dy)`.
pub type CellOffset = (i32, i32);

/// Generation counter. Wide enough that a free-running simulation never wraps.
pub type Generation = u64;

/// Default grid width, the width of a 128x64 OLED panel.
pub const DEFAULT_WIDTH: usize = 128;

/// Default grid height.
pub const DEFAULT_HEIGHT: usize = 64;

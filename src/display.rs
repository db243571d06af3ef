use std::io;

use crate::grid::Grid;

/// Anything that can show a generation, one pixel per cell.
///
/// A frame is a run of [`DisplaySink::set_pixel`] calls followed by exactly one
/// [`DisplaySink::present`]. Sinks start every frame blank, so with [`RenderMode::LiveCells`] only
/// the live cells need to be set.
pub trait DisplaySink {
    fn set_pixel(&mut self, x: usize, y: usize, on: bool);

    /// Show the frame built so far and start a new, blank one.
    fn present(&mut self) -> io::Result<()>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        (**self).set_pixel(x, y, on)
    }

    fn present(&mut self) -> io::Result<()> {
        (**self).present()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `set_pixel` once per live cell
    #[default]
    LiveCells,

    /// `set_pixel` once per cell, dead ones included
    FullFrame,
}

/// Draw `grid` into `sink` and present it.
pub fn render<S>(grid: &Grid, sink: &mut S, mode: RenderMode) -> io::Result<()>
where
    S: DisplaySink + ?Sized,
{
    match mode {
        RenderMode::LiveCells => {
            for (x, y) in grid.iter_live() {
                sink.set_pixel(x, y, true);
            }
        }
        RenderMode::FullFrame => {
            for (x, y, alive) in grid.iter_cells() {
                sink.set_pixel(x, y, alive);
            }
        }
    }

    sink.present()
}

/// An in-memory display, for running without any hardware attached.
///
/// Pixels outside of the buffer are ignored, the way a panel ignores writes past its edge.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// The frame being drawn
    back: Vec<bool>,

    /// The last presented frame
    front: Vec<bool>,

    w: usize,
    h: usize,

    frames: u64,
}

impl PixelBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            back: vec![false; w * h],
            front: vec![false; w * h],
            w,
            h,
            frames: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether pixel `(x, y)` is lit in the last presented frame
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.front[y * self.w + x]
    }

    /// Number of lit pixels in the last presented frame
    pub fn lit(&self) -> usize {
        self.front.iter().filter(|&&p| p).count()
    }
}

impl DisplaySink for PixelBuffer {
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x < self.w && y < self.h {
            self.back[y * self.w + x] = on;
        }
    }

    fn present(&mut self) -> io::Result<()> {
        std::mem::swap(&mut self.front, &mut self.back);
        self.back.fill(false);
        self.frames += 1;

        Ok(())
    }
}

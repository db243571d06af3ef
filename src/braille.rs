use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style;

use crate::display::DisplaySink;

/// Blank braille pattern, U+2800. A glyph is this plus the bits of its raised dots.
const BLANK: u32 = 0x2800;

/// Dot bit for each position of the 2x4 block, indexed `[row][col]`
const DOTS: [[u32; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// A terminal display packing 2x4 pixels into every braille character, so a 128x64 grid takes
/// 64x16 terminal cells.
pub struct BrailleSink<W: Write> {
    /// Pixels set since the last present, row-major
    pixels: Vec<bool>,

    /// One codepoint per braille character
    glyphs: Vec<u32>,

    /// Last presented frame
    frame: String,

    /// Pixels per row
    w: usize,

    /// Pixel rows
    h: usize,

    out: W,
}

impl<W: Write> BrailleSink<W> {
    pub fn new(w: usize, h: usize, out: W) -> Self {
        let (cols, rows) = (w.div_ceil(2), h.div_ceil(4));

        Self {
            pixels: vec![false; w * h],
            glyphs: vec![BLANK; cols * rows],
            // 3 UTF-8 bytes per glyph plus a newline per row
            frame: String::with_capacity(3 * cols * rows + rows),
            w,
            h,
            out,
        }
    }

    /// The last presented frame, one line per row of braille characters
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&mut self) {
        let cols = self.w.div_ceil(2);

        self.glyphs.fill(BLANK);

        let lit = self.pixels.iter().enumerate().filter(|&(_, &on)| on);
        for (n, _) in lit {
            let (x, y) = (n % self.w, n / self.w);
            self.glyphs[(y / 4) * cols + x / 2] |= DOTS[y % 4][x % 2];
        }

        self.frame.clear();

        for (row, line) in self.glyphs.chunks(cols.max(1)).enumerate() {
            if row > 0 {
                self.frame.push('\n');
            }

            // BLANK | u8 is always a braille codepoint
            self.frame.extend(
                line.iter()
                    .map(|&c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER)),
            );
        }
    }
}

impl<W: Write> DisplaySink for BrailleSink<W> {
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x < self.w && y < self.h {
            self.pixels[y * self.w + x] = on;
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.compose();
        self.pixels.fill(false);

        for line in self.frame.lines() {
            queue!(self.out, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        self.out.flush()
    }
}

use crate::error::Error;
use crate::segment::{Point, Segment};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use log::trace;
use std::io::{self, Stdout, Write};

/// Braille cell is 2x4 dots
pub const DOTS_WIDE: usize = 2;
pub const DOTS_HIGH: usize = 4;

// (x,y) -> dot bit:
// (0,0)=1, (0,1)=2, (0,2)=4, (0,3)=64
// (1,0)=8, (1,1)=16,(1,2)=32,(1,3)=128
const DOT_BITS: [[u8; DOTS_HIGH]; DOTS_WIDE] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Logical size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

/// Axis-aligned rectangle in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Color and width used to stroke a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Drawing surface consumed by the animation loop
pub trait Renderer {
    /// Logical width and height of the surface
    fn measure_surface(&self) -> Surface;
    /// Erases everything inside `region`
    fn clear_region(&mut self, region: Region) -> Result<(), Error>;
    /// Strokes a single segment
    fn draw_line(&mut self, segment: &Segment, stroke: Stroke) -> Result<(), Error>;
    /// Writes a line of text whose baseline starts at `at`
    fn draw_label(&mut self, at: Point, text: &str, color: Color) -> Result<(), Error>;
    /// Makes everything drawn since the last call visible
    fn present(&mut self) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Cell {
    bits: u8,
    color: Option<Color>,
    text: Option<char>,
}

impl Cell {
    fn glyph(&self) -> char {
        match self.text {
            Some(ch) => ch,
            None if self.bits == 0 => ' ',
            None => char::from_u32(0x2800 + u32::from(self.bits)).unwrap_or(' '),
        }
    }
}

/// Grid of terminal cells addressed as Braille dots
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    /// What the terminal currently shows, `None` when unknown
    shown: Vec<Option<Cell>>,
}

impl BrailleCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        BrailleCanvas {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
            shown: vec![None; cols * rows],
        }
    }

    pub fn dot_width(&self) -> usize {
        self.cols * DOTS_WIDE
    }

    pub fn dot_height(&self) -> usize {
        self.rows * DOTS_HIGH
    }

    /// Sets a single dot; out-of-bounds dots are ignored
    pub fn plot(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.dot_width() || y as usize >= self.dot_height() {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let cell = &mut self.cells[(y / DOTS_HIGH) * self.cols + x / DOTS_WIDE];
        cell.bits |= DOT_BITS[x % DOTS_WIDE][y % DOTS_HIGH];
        cell.color = Some(color);
    }

    /// Draws a line between two dot positions using Bresenham's algorithm.
    /// `brush` widens every plotted dot into a square of side `2 * brush + 1`.
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, brush: isize, color: Color) {
        let (mut x0, mut y0, x1, y1) = (
            x0.round() as isize,
            y0.round() as isize,
            x1.round() as isize,
            y1.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            for ox in -brush..=brush {
                for oy in -brush..=brush {
                    self.plot(x0 + ox, y0 + oy, color);
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Clears the dots in `[x0, x1) x [y0, y1)`, and any text fully inside it
    pub fn clear_dots(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let x1 = x1.min(self.dot_width());
        let y1 = y1.min(self.dot_height());
        for y in y0..y1 {
            for x in x0..x1 {
                let cell = &mut self.cells[(y / DOTS_HIGH) * self.cols + x / DOTS_WIDE];
                cell.bits &= !DOT_BITS[x % DOTS_WIDE][y % DOTS_HIGH];
            }
        }

        for row in 0..self.rows {
            let top = row * DOTS_HIGH;
            if top < y0 || top + DOTS_HIGH > y1 {
                continue;
            }
            for col in 0..self.cols {
                let left = col * DOTS_WIDE;
                if left >= x0 && left + DOTS_WIDE <= x1 {
                    self.cells[row * self.cols + col].text = None;
                }
            }
        }

        for cell in self.cells.iter_mut() {
            if cell.bits == 0 && cell.text.is_none() {
                cell.color = None;
            }
        }
    }

    /// Writes text into consecutive cells, clipped at the right edge
    pub fn put_text(&mut self, col: usize, row: usize, text: &str, color: Color) {
        if row >= self.rows {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let col = col + offset;
            if col >= self.cols {
                break;
            }
            let cell = &mut self.cells[row * self.cols + col];
            cell.text = Some(ch);
            cell.color = Some(color);
        }
    }

    /// Queues the cells that differ from what the terminal shows
    fn flush_changes<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        let mut changed = 0;
        for (index, cell) in self.cells.iter().enumerate() {
            if self.shown[index] == Some(*cell) {
                continue;
            }
            self.shown[index] = Some(*cell);
            changed += 1;

            let (col, row) = ((index % self.cols) as u16, (index / self.cols) as u16);
            queue!(out, cursor::MoveTo(col, row))?;
            match cell.color {
                Some(color) => queue!(out, SetForegroundColor(color))?,
                None => queue!(out, ResetColor)?,
            }
            queue!(out, Print(cell.glyph()))?;
        }
        Ok(changed)
    }
}

/// Renderer drawing onto a terminal through a Braille canvas
pub struct TerminalRenderer<W: Write> {
    out: W,
    canvas: BrailleCanvas,
    /// Logical pixels per dot
    scale: f64,
    surface: Surface,
}

impl TerminalRenderer<Stdout> {
    /// Measures the terminal and renders to stdout
    pub fn stdout(logical_height: u32) -> Result<Self, Error> {
        let size = termsize::get().ok_or(Error::TerminalSize)?;
        if size.cols == 0 || size.rows == 0 {
            return Err(Error::TerminalSize);
        }
        Ok(TerminalRenderer::new(
            io::stdout(),
            usize::from(size.cols),
            usize::from(size.rows),
            logical_height,
        ))
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Fits `logical_height` into the rows of the terminal; the width follows its aspect
    pub fn new(out: W, cols: usize, rows: usize, logical_height: u32) -> Self {
        let canvas = BrailleCanvas::new(cols, rows);
        let scale = f64::from(logical_height) / canvas.dot_height() as f64;
        let surface = Surface {
            width: (canvas.dot_width() as f64 * scale).floor() as u32,
            height: logical_height,
        };
        TerminalRenderer {
            out,
            canvas,
            scale,
            surface,
        }
    }

    fn to_dots(&self, point: Point) -> (f64, f64) {
        (point.x / self.scale, point.y / self.scale)
    }

    /// Index of the first dot whose center lies at or past `logical`
    fn dot_index(&self, logical: f64) -> usize {
        (logical / self.scale - 0.5).ceil().max(0.0) as usize
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn measure_surface(&self) -> Surface {
        self.surface
    }

    fn clear_region(&mut self, region: Region) -> Result<(), Error> {
        let x0 = self.dot_index(region.x);
        let y0 = self.dot_index(region.y);
        let x1 = self.dot_index(region.x + region.width);
        let y1 = self.dot_index(region.y + region.height);
        self.canvas.clear_dots(x0, y0, x1, y1);
        Ok(())
    }

    fn draw_line(&mut self, segment: &Segment, stroke: Stroke) -> Result<(), Error> {
        let (x0, y0) = self.to_dots(segment.start());
        let (x1, y1) = self.to_dots(segment.end());
        let thickness = (stroke.width / self.scale).round().max(1.0) as isize;
        self.canvas.line(x0, y0, x1, y1, (thickness - 1) / 2, stroke.color);
        Ok(())
    }

    fn draw_label(&mut self, at: Point, text: &str, color: Color) -> Result<(), Error> {
        let (x, y) = self.to_dots(at);
        let col = (x.max(0.0) as usize) / DOTS_WIDE;
        let row = (y.max(0.0) as usize) / DOTS_HIGH;
        self.canvas.put_text(col, row, text, color);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Error> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        let changed = self.canvas.flush_changes(&mut self.out)?;
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;
        trace!("presented {changed} changed cells");
        Ok(())
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Character-cell rendering for Rol adapters.

use std::{fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use rol_core::{Canvas, CellCoord, Facing, Figure, Sprite};

const EMPTY_CELL: char = '.';
const BLANK_CELL: char = ' ';

/// Canvas that draws every sprite as one character per grid cell.
#[derive(Clone, Debug)]
pub struct TextCanvas {
    columns: u32,
    rows: u32,
    cells: Vec<Option<char>>,
    grid_visible: bool,
}

impl TextCanvas {
    /// Creates a blank canvas covering `columns` by `rows` cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
            grid_visible: false,
        }
    }

    /// Character drawn at the cell, if a sprite covers it.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<char> {
        self.index(cell).and_then(|index| self.cells[index])
    }

    /// Captures the canvas as a frame of text rows.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let filler = if self.grid_visible {
            EMPTY_CELL
        } else {
            BLANK_CELL
        };
        let width = self.columns as usize;
        let lines = if width == 0 {
            Vec::new()
        } else {
            self.cells
                .chunks(width)
                .map(|row| row.iter().map(|cell| cell.unwrap_or(filler)).collect())
                .collect()
        };
        Frame { lines }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        usize::try_from(u64::from(row) * u64::from(self.columns) + u64::from(column)).ok()
    }
}

impl Canvas for TextCanvas {
    fn clear(&mut self) {
        self.cells.fill(None);
        self.grid_visible = false;
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        if let Some(index) = self.index(sprite.origin()) {
            self.cells[index] = Some(glyph(sprite));
        }
    }

    fn draw_grid(&mut self, _columns: u32, _rows: u32) {
        self.grid_visible = true;
    }
}

/// Character used for a sprite.
///
/// Pacman figures point along their facing. Rectangles with a warm fill are
/// drawn as `X` so enemies stand apart from cool-filled walls drawn as `#`.
#[must_use]
pub fn glyph(sprite: &Sprite) -> char {
    match sprite.figure() {
        Figure::Pacman => match sprite.facing() {
            Facing::Up => '^',
            Facing::Down => 'v',
            Facing::Left => '<',
            Facing::Right => '>',
            Facing::None => 'C',
        },
        Figure::Rectangle if sprite.fill().red() > sprite.fill().blue() => 'X',
        Figure::Rectangle => '#',
        Figure::Circle => '*',
    }
}

/// Rendered frame made of one text line per grid row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// Text rows from top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Rendering backend capable of presenting Rol frames.
pub trait RenderingBackend {
    /// Presents a single frame together with a caption line.
    fn present(&mut self, caption: &str, frame: &Frame) -> AnyResult<()>;
}

/// Backend writing frames to any byte sink, such as standard output.
#[derive(Debug)]
pub struct WriterBackend<W> {
    writer: W,
}

impl<W: Write> WriterBackend<W> {
    /// Wraps the provided writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Releases the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for WriterBackend<W> {
    fn present(&mut self, caption: &str, frame: &Frame) -> AnyResult<()> {
        writeln!(self.writer, "{caption}").context("failed to write frame caption")?;
        write!(self.writer, "{frame}").context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")?;
        Ok(())
    }
}

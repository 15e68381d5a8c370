//! Drawing contract between the world and rendering adapters.

use crate::{CellCoord, Facing};

/// RGB color applied to a sprite's outline or body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Shape a sprite is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Figure {
    /// Open-mouthed disc that turns with the sprite's facing.
    Pacman,
    /// Cell-filling square.
    Rectangle,
    /// Small disc centred in the cell.
    Circle,
}

/// Renderable attached to a game object.
///
/// The world only ever pushes the object's cell and facing into the sprite
/// and asks it to draw itself; it never reads geometry back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    figure: Figure,
    stroke: Color,
    fill: Color,
    origin: CellCoord,
    facing: Facing,
}

impl Sprite {
    /// Creates a sprite drawn with the provided figure and colors.
    #[must_use]
    pub const fn new(figure: Figure, stroke: Color, fill: Color) -> Self {
        Self {
            figure,
            stroke,
            fill,
            origin: CellCoord::new(0, 0),
            facing: Facing::None,
        }
    }

    /// Moves the sprite to the provided cell.
    pub fn set_origin(&mut self, cell: CellCoord) {
        self.origin = cell;
    }

    /// Turns the sprite toward the provided direction.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Shape of the sprite.
    #[must_use]
    pub const fn figure(&self) -> Figure {
        self.figure
    }

    /// Outline color.
    #[must_use]
    pub const fn stroke(&self) -> Color {
        self.stroke
    }

    /// Body color.
    #[must_use]
    pub const fn fill(&self) -> Color {
        self.fill
    }

    /// Cell the sprite is drawn at.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Direction the sprite faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Draws the sprite onto the canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(self);
    }
}

/// Drawing surface supplied by a rendering adapter.
pub trait Canvas {
    /// Clears the whole surface before a frame is drawn.
    fn clear(&mut self);

    /// Draws a single sprite at its origin cell.
    fn draw_sprite(&mut self, sprite: &Sprite);

    /// Draws the cell grid covering `columns` by `rows` cells.
    fn draw_grid(&mut self, columns: u32, rows: u32);
}

//! Render target abstraction.
//!
//! Views draw through the [`Framebuffer`] trait so they stay independent of
//! the actual output device. [`Pixmap`] is the offscreen implementation: it
//! records the emitted draw commands in order, which is what the shell
//! composes from and what the tests inspect.

use crate::color::Color;
use crate::geom::{Point, Rectangle};

pub trait Framebuffer {
    fn draw_rectangle(&mut self, rect: &Rectangle, color: Color);
    fn draw_text(&mut self, origin: Point, text: &str, color: Color);
    fn dims(&self) -> (u32, u32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Rectangle { rect: Rectangle, color: Color },
    Text { origin: Point, text: String, color: Color },
}

/// Offscreen frame that records draw commands in submission order.
pub struct Pixmap {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32) -> Pixmap {
        Pixmap {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Framebuffer for Pixmap {
    fn draw_rectangle(&mut self, rect: &Rectangle, color: Color) {
        self.commands.push(DrawCommand::Rectangle { rect: *rect, color });
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            color,
        });
    }

    fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

//! Custom cursor state: follows the pointer, grows over interactive elements

use crate::consts::*;

/// Where and how large to draw the cursor dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTransform {
    pub left: f32,
    pub top: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
    pub hovering: bool,
}

impl CursorState {
    pub fn on_move(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Pointer entered an element; `interactive` is whether it matches the
    /// hover selector. Non-interactive targets leave the state unchanged.
    pub fn on_over(&mut self, interactive: bool) {
        if interactive {
            self.hovering = true;
        }
    }

    pub fn on_out(&mut self) {
        self.hovering = false;
    }

    /// Dot centered on the pointer
    pub fn transform(&self) -> CursorTransform {
        CursorTransform {
            left: self.x - CURSOR_HALF_SIZE,
            top: self.y - CURSOR_HALF_SIZE,
            scale: if self.hovering { CURSOR_HOVER_SCALE } else { 1.0 },
        }
    }
}

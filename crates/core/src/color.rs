//! Grayscale palette shared by the views.

pub type Color = u8;

pub const BLACK: Color = 0x00;
pub const WHITE: Color = 0xFF;

pub const GRAY04: Color = 0x44;
pub const GRAY08: Color = 0x88;
pub const GRAY12: Color = 0xCC;

/// Text schemes: `[background, foreground]`.
pub const TEXT_NORMAL: [Color; 2] = [WHITE, BLACK];
pub const TEXT_INVERTED_HARD: [Color; 2] = [BLACK, WHITE];

pub const SEPARATOR_NORMAL: Color = GRAY08;

//! Pointer gestures delivered to the view tree.

use crate::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Tap(Point),
}

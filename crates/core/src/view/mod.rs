//! View tree plumbing.
//!
//! Views are owned trait objects arranged in a tree. Events enter the tree
//! through [`deliver_event`], which offers the event to children in reverse
//! insertion order (topmost first) before the view itself. A view signals
//! consumption by returning `true` from [`View::handle_event`].
//!
//! Two channels leave a view:
//! - the [`Bus`] carries events upward to the parent that is currently
//!   dispatching (choices bubble: a crumb tap becomes [`Event::Select`]);
//! - the [`Hub`] is the application event channel, cloneable into worker
//!   threads, whose events re-enter the tree on the next loop turn.
//!
//! Rendering is retained: views enqueue [`RenderData`] on the
//! [`RenderQueue`] when their appearance changed, and the shell redraws the
//! affected regions with [`render_tree`].

pub mod breadcrumbs;
pub mod filler;
pub mod label;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use downcast_rs::{impl_downcast, Downcast};
use lazy_static::lazy_static;

use crate::api::Location;
use crate::context::Context;
use crate::framebuffer::Framebuffer;
use crate::geom::Rectangle;
use crate::gesture::GestureEvent;
use crate::input::KeyCode;

pub const SMALL_BAR_HEIGHT: i32 = 48;

/// Fixed per-glyph advance used for text placement.
pub const GLYPH_ADVANCE: i32 = 8;

pub type Id = u64;

#[derive(Debug, Default)]
pub struct IdFeeder {
    next: AtomicU64,
}

impl IdFeeder {
    pub fn next(&self) -> Id {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

lazy_static! {
    pub static ref ID_FEEDER: IdFeeder = IdFeeder::default();
}

pub type Hub = Sender<Event>;
pub type Bus = VecDeque<Event>;

#[derive(Debug, Clone)]
pub enum Event {
    Gesture(GestureEvent),
    Key(KeyCode),
    /// The user chose a location to navigate to.
    Select(Location),
    /// A breadcrumb ancestor lookup resolved.
    TrailFetched {
        id: Id,
        generation: u64,
        path: Vec<Location>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left(i32),
    Center,
    Right(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Gui,
    Partial,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderData {
    pub id: Id,
    pub rect: Rectangle,
    pub mode: UpdateMode,
}

impl RenderData {
    pub fn new(id: Id, rect: Rectangle, mode: UpdateMode) -> RenderData {
        RenderData { id, rect, mode }
    }
}

#[derive(Debug, Default)]
pub struct RenderQueue {
    entries: Vec<RenderData>,
}

impl RenderQueue {
    pub fn new() -> RenderQueue {
        RenderQueue::default()
    }

    pub fn add(&mut self, data: RenderData) {
        self.entries.push(data);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RenderData> + '_ {
        self.entries.drain(..)
    }
}

pub trait View: Downcast {
    fn handle_event(
        &mut self,
        evt: &Event,
        hub: &Hub,
        bus: &mut Bus,
        rq: &mut RenderQueue,
        context: &mut Context,
    ) -> bool;

    fn render(&self, fb: &mut dyn Framebuffer, rect: Rectangle);

    fn rect(&self) -> &Rectangle;

    fn rect_mut(&mut self) -> &mut Rectangle;

    fn children(&self) -> &Vec<Box<dyn View>>;

    fn children_mut(&mut self) -> &mut Vec<Box<dyn View>>;

    fn id(&self) -> Id;
}

impl_downcast!(View);

/// Offers `evt` to the subtree rooted at `view`.
///
/// Children get the event before their parent, in reverse insertion order.
/// Returns true as soon as any view consumed it.
pub fn deliver_event(
    view: &mut dyn View,
    evt: &Event,
    hub: &Hub,
    bus: &mut Bus,
    rq: &mut RenderQueue,
    context: &mut Context,
) -> bool {
    for index in (0..view.children_mut().len()).rev() {
        let child = view.children_mut()[index].as_mut();
        if deliver_event(child, evt, hub, bus, rq, context) {
            return true;
        }
    }

    view.handle_event(evt, hub, bus, rq, context)
}

/// Draws the subtree rooted at `view`, parents before children.
pub fn render_tree(view: &dyn View, fb: &mut dyn Framebuffer) {
    view.render(fb, *view.rect());
    for child in view.children() {
        render_tree(child.as_ref(), fb);
    }
}

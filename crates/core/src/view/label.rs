use crate::color::{Color, TEXT_NORMAL};
use crate::context::Context;
use crate::framebuffer::Framebuffer;
use crate::geom::{halves, Point, Rectangle};
use crate::gesture::GestureEvent;
use crate::view::{Align, Bus, Event, Hub, Id, RenderData, RenderQueue, UpdateMode, View};
use crate::view::{GLYPH_ADVANCE, ID_FEEDER};

/// Text leaf view.
///
/// A label owns its color scheme and, optionally, an event that it pushes
/// onto the bus when tapped. Parents restyle a label in place through
/// [`Label::set_scheme`] instead of rebuilding it.
pub struct Label {
    id: Id,
    rect: Rectangle,
    children: Vec<Box<dyn View>>,
    text: String,
    align: Align,
    scheme: [Color; 2],
    event: Option<Event>,
}

impl Label {
    pub fn new(rect: Rectangle, text: String, align: Align) -> Label {
        Label {
            id: ID_FEEDER.next(),
            rect,
            children: Vec::new(),
            text,
            align,
            scheme: TEXT_NORMAL,
            event: None,
        }
    }

    pub fn scheme(mut self, scheme: [Color; 2]) -> Label {
        self.scheme = scheme;
        self
    }

    pub fn event(mut self, event: Option<Event>) -> Label {
        self.event = event;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn get_scheme(&self) -> [Color; 2] {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: [Color; 2], rq: &mut RenderQueue) {
        self.scheme = scheme;
        rq.add(RenderData::new(self.id, self.rect, UpdateMode::Gui));
    }

    pub fn set_text(&mut self, text: String, rq: &mut RenderQueue) {
        self.text = text;
        rq.add(RenderData::new(self.id, self.rect, UpdateMode::Gui));
    }

    fn text_origin(&self) -> Point {
        let width = self.rect.width() as i32;
        let advance = self.text.chars().count() as i32 * GLYPH_ADVANCE;
        let dx = match self.align {
            Align::Left(padding) => padding,
            Align::Center => halves((width - advance).max(0)).0,
            Align::Right(padding) => (width - advance - padding).max(0),
        };
        let baseline = self.rect.max.y - (self.rect.height() as i32) / 3;

        pt!(self.rect.min.x + dx, baseline)
    }
}

impl View for Label {
    fn handle_event(
        &mut self,
        evt: &Event,
        _hub: &Hub,
        bus: &mut Bus,
        _rq: &mut RenderQueue,
        _context: &mut Context,
    ) -> bool {
        match *evt {
            Event::Gesture(GestureEvent::Tap(center)) if self.rect.includes(center) => {
                if let Some(event) = self.event.clone() {
                    bus.push_back(event);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn render(&self, fb: &mut dyn Framebuffer, _rect: Rectangle) {
        fb.draw_rectangle(&self.rect, self.scheme[0]);
        fb.draw_text(self.text_origin(), &self.text, self.scheme[1]);
    }

    fn rect(&self) -> &Rectangle {
        &self.rect
    }

    fn rect_mut(&mut self) -> &mut Rectangle {
        &mut self.rect
    }

    fn children(&self) -> &Vec<Box<dyn View>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn View>> {
        &mut self.children
    }

    fn id(&self) -> Id {
        self.id
    }
}

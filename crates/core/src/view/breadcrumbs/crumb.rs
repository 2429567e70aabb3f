use crate::api::Location;
use crate::color::{SEPARATOR_NORMAL, TEXT_INVERTED_HARD, TEXT_NORMAL};
use crate::context::Context;
use crate::framebuffer::Framebuffer;
use crate::geom::Rectangle;
use crate::view::label::Label;
use crate::view::{Align, Bus, Event, Hub, Id, RenderQueue, View, GLYPH_ADVANCE, ID_FEEDER};

/// Width reserved at the right edge of a browsable crumb for the separator.
const SEPARATOR_SLOT: i32 = 2 * GLYPH_ADVANCE;

/// One entry of a [`BreadcrumbTrail`](super::BreadcrumbTrail).
///
/// Every crumb except the last is browsable: tapping it bubbles
/// [`Event::Select`] with its location. The last crumb is the location on
/// display, drawn emphasized and inert.
pub struct Crumb {
    id: Id,
    rect: Rectangle,
    children: Vec<Box<dyn View>>,
    location: Location,
    is_last: bool,
}

impl Crumb {
    pub fn new(rect: Rectangle, location: Location, is_last: bool) -> Crumb {
        let label_rect = if is_last {
            rect
        } else {
            rect![rect.min.x, rect.min.y, rect.max.x - SEPARATOR_SLOT, rect.max.y]
        };

        let scheme = if is_last { TEXT_INVERTED_HARD } else { TEXT_NORMAL };
        let event = (!is_last).then(|| Event::Select(location.clone()));

        let label = Label::new(label_rect, location.name.clone(), Align::Left(GLYPH_ADVANCE))
            .scheme(scheme)
            .event(event);

        Crumb {
            id: ID_FEEDER.next(),
            rect,
            children: vec![Box::new(label) as Box<dyn View>],
            location,
            is_last,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn can_browse(&self) -> bool {
        !self.is_last
    }
}

impl View for Crumb {
    fn handle_event(
        &mut self,
        _evt: &Event,
        _hub: &Hub,
        _bus: &mut Bus,
        _rq: &mut RenderQueue,
        _context: &mut Context,
    ) -> bool {
        false
    }

    fn render(&self, fb: &mut dyn Framebuffer, _rect: Rectangle) {
        if !self.is_last {
            let baseline = self.rect.max.y - (self.rect.height() as i32) / 3;
            fb.draw_text(
                pt!(self.rect.max.x - SEPARATOR_SLOT + GLYPH_ADVANCE / 2, baseline),
                "›",
                SEPARATOR_NORMAL,
            );
        }
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

//! Breadcrumb trail for the measures explorer.
//!
//! [`BreadcrumbTrail`] owns the ordered path of locations between the
//! explorer root and the location currently on display, and lets the user
//! jump backward with the left-arrow key. The path comes from the shared
//! [`AncestorLookup`](crate::api::AncestorLookup) backend and is replaced
//! wholesale on every reload; it is never patched incrementally.
//!
//! ## Event flow
//!
//! ```text
//!   set_target / new
//!        │
//!        ├── target is the root ──► path = [target]   (no lookup)
//!        │
//!        └── otherwise ──► worker thread ──► hub ──► Event::TrailFetched
//!                                                        │
//!                              generation matches? ──────┘
//!                              yes: replace path, rebuild crumbs
//!                              no:  drop silently
//! ```
//!
//! Every trigger bumps a generation counter that the worker captures, so a
//! response that arrives after teardown or after a newer trigger is inert.
//! Lookup failures are swallowed: a trail that cannot refresh keeps showing
//! its previous state.

mod crumb;

pub use crumb::Crumb;

use std::thread;

use crate::api::{same_scope, BranchScope, Location};
use crate::context::Context;
use crate::framebuffer::Framebuffer;
use crate::geom::Rectangle;
use crate::input::{KeyCode, KeySubscription};
use crate::view::{Bus, Event, Hub, Id, RenderData, RenderQueue, UpdateMode, View, ID_FEEDER};

pub struct BreadcrumbTrail {
    id: Id,
    rect: Rectangle,
    children: Vec<Box<dyn View>>,
    root: Location,
    target: Location,
    branch: Option<BranchScope>,
    /// Whether the back key jumps to the root instead of one level up.
    back_to_first: bool,
    path: Vec<Location>,
    /// Bumped on every reload trigger; stale lookup responses carry an
    /// older value and are discarded.
    generation: u64,
    back_key: KeySubscription,
}

impl BreadcrumbTrail {
    /// Creates the trail and starts resolving the path to `target`.
    ///
    /// The left-arrow key is claimed for the lifetime of the trail; the
    /// claim is released when the trail is dropped, on every exit path.
    pub fn new(
        rect: Rectangle,
        root: Location,
        target: Location,
        branch: Option<BranchScope>,
        back_to_first: bool,
        hub: &Hub,
        rq: &mut RenderQueue,
        context: &mut Context,
    ) -> BreadcrumbTrail {
        let back_key = context.keyboard.subscribe(KeyCode::ArrowLeft);

        let mut trail = BreadcrumbTrail {
            id: ID_FEEDER.next(),
            rect,
            children: Vec::new(),
            root,
            target,
            branch,
            back_to_first,
            path: Vec::new(),
            generation: 0,
            back_key,
        };

        trail.refresh(hub, rq, context);
        trail
    }

    /// Root-to-current path, empty until the first successful resolution.
    pub fn path(&self) -> &[Location] {
        &self.path
    }

    /// Points the trail at a new location.
    ///
    /// A reload only happens when the location key actually changed or the
    /// branch scope is not equivalent to the previous one; pointing at the
    /// same place is free.
    pub fn set_target(
        &mut self,
        target: Location,
        branch: Option<BranchScope>,
        hub: &Hub,
        rq: &mut RenderQueue,
        context: &mut Context,
    ) {
        let unchanged = target.key == self.target.key
            && same_scope(self.branch.as_ref(), branch.as_ref());

        self.target = target;
        self.branch = branch;

        if unchanged {
            return;
        }

        self.refresh(hub, rq, context);
    }

    fn refresh(&mut self, hub: &Hub, rq: &mut RenderQueue, context: &mut Context) {
        // Invalidates every in-flight lookup, including those for the
        // previous target.
        self.generation += 1;

        if self.target.key == self.root.key {
            // Trivial case: the root is its own path, no round trip needed.
            self.path = vec![self.target.clone()];
            self.rebuild(rq);
            return;
        }

        let lookup = context.lookup.clone();
        let hub = hub.clone();
        let id = self.id;
        let generation = self.generation;
        let key = self.target.key.clone();
        let branch = self.branch.clone();

        thread::spawn(move || match lookup.fetch_ancestors(&key, branch.as_ref()) {
            Ok(path) => {
                hub.send(Event::TrailFetched {
                    id,
                    generation,
                    path,
                })
                .ok();
            }
            Err(e) => {
                // Best effort: a trail that fails to load keeps its
                // previous state instead of disturbing the page.
                tracing::debug!(component = %key, error = %e, "Ancestor lookup failed");
            }
        });
    }

    fn apply_fetched(&mut self, generation: u64, path: Vec<Location>, rq: &mut RenderQueue) {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale ancestor chain"
            );
            return;
        }

        if path.last().map_or(true, |last| last.key != self.target.key) {
            tracing::debug!(
                component = %self.target.key,
                "Ancestor chain does not end at the requested location"
            );
            return;
        }

        self.path = path;
        self.rebuild(rq);
    }

    /// Rebuilds the crumb row from the current path.
    ///
    /// Crumbs share the trail width in equal slots; the last slot absorbs
    /// the division remainder. An empty path leaves the trail without
    /// children, which renders as nothing.
    fn rebuild(&mut self, rq: &mut RenderQueue) {
        self.children.clear();

        let count = self.path.len();
        if count > 0 {
            let slot_width = self.rect.width() as i32 / count as i32;

            for (index, location) in self.path.iter().enumerate() {
                let is_last = index == count - 1;
                let x_min = self.rect.min.x + index as i32 * slot_width;
                let x_max = if is_last {
                    self.rect.max.x
                } else {
                    x_min + slot_width
                };

                let crumb_rect = rect![x_min, self.rect.min.y, x_max, self.rect.max.y];
                self.children
                    .push(Box::new(Crumb::new(crumb_rect, location.clone(), is_last)));
            }
        }

        rq.add(RenderData::new(self.id, self.rect, UpdateMode::Gui));
    }

    fn select_back(&self, bus: &mut Bus) {
        if self.path.len() < 2 {
            return;
        }

        let index = if self.back_to_first {
            0
        } else {
            self.path.len() - 2
        };

        bus.push_back(Event::Select(self.path[index].clone()));
    }
}

impl View for BreadcrumbTrail {
    fn handle_event(
        &mut self,
        evt: &Event,
        _hub: &Hub,
        bus: &mut Bus,
        rq: &mut RenderQueue,
        _context: &mut Context,
    ) -> bool {
        match evt {
            Event::TrailFetched {
                id,
                generation,
                path,
            } if *id == self.id => {
                self.apply_fetched(*generation, path.clone(), rq);
                true
            }
            Event::Key(key) if *key == self.back_key.key() => {
                // Consumed even when there is nothing to go back to.
                self.select_back(bus);
                true
            }
            _ => false,
        }
    }

    fn render(&self, _fb: &mut dyn Framebuffer, _rect: Rectangle) {}

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BranchScope;
    use crate::context::test_helpers::{create_test_context_with, FakeLookup};
    use crate::gesture::GestureEvent;
    use crate::view::filler::Filler;
    use crate::view::{deliver_event, SMALL_BAR_HEIGHT};
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Arc;
    use std::time::Duration;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);
    const SILENCE_TIMEOUT: Duration = Duration::from_millis(200);

    fn location(key: &str) -> Location {
        let name = key.rsplit(&[':', '/'][..]).next().unwrap_or(key);
        Location::new(key, name)
    }

    fn file_chain() -> Vec<Location> {
        vec![
            location("prj"),
            location("prj:src"),
            location("prj:src/parser"),
            location("prj:src/parser/lexer.rs"),
        ]
    }

    struct Fixture {
        trail: BreadcrumbTrail,
        rx: Receiver<Event>,
        hub: Hub,
        lookup: Arc<FakeLookup>,
        context: Context,
        rq: RenderQueue,
    }

    fn fixture(target: &str, branch: Option<BranchScope>, back_to_first: bool) -> Fixture {
        let lookup = Arc::new(FakeLookup::new());
        lookup.insert_chain("prj:src/parser/lexer.rs", file_chain());

        let mut context = create_test_context_with(lookup.clone());
        let (hub, rx) = channel();
        let mut rq = RenderQueue::new();

        let trail = BreadcrumbTrail::new(
            rect![0, 0, 600, SMALL_BAR_HEIGHT],
            location("prj"),
            location(target),
            branch,
            back_to_first,
            &hub,
            &mut rq,
            &mut context,
        );

        Fixture {
            trail,
            rx,
            hub,
            lookup,
            context,
            rq,
        }
    }

    fn pump(fixture: &mut Fixture) {
        let evt = fixture.rx.recv_timeout(RECV_TIMEOUT).unwrap();
        let mut bus = Bus::new();
        fixture.trail.handle_event(
            &evt,
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );
    }

    #[test]
    fn root_target_loads_synchronously_without_lookup() {
        let fixture = fixture("prj", None, false);

        assert_eq!(fixture.lookup.call_count(), 0);
        assert_eq!(fixture.trail.path(), &[location("prj")]);
        assert_eq!(fixture.trail.children().len(), 1);

        let crumb = fixture.trail.children()[0].downcast_ref::<Crumb>().unwrap();
        assert!(crumb.is_last());
        assert!(!crumb.can_browse());
    }

    #[test]
    fn non_root_target_issues_exactly_one_lookup() {
        let branch = BranchScope::Branch("feature/x".to_string());
        let mut fixture = fixture("prj:src/parser/lexer.rs", Some(branch.clone()), false);
        pump(&mut fixture);

        assert_eq!(
            fixture.lookup.calls(),
            vec![("prj:src/parser/lexer.rs".to_string(), Some(branch))]
        );
        assert_eq!(fixture.trail.path().len(), 4);
    }

    #[test]
    fn crumb_row_partitions_the_trail_rect() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);

        let crumbs: Vec<&Crumb> = fixture
            .trail
            .children()
            .iter()
            .map(|child| child.downcast_ref::<Crumb>().unwrap())
            .collect();

        assert_eq!(crumbs.len(), 4);
        assert_eq!(crumbs[0].rect().min.x, 0);
        assert_eq!(crumbs[3].rect().max.x, 600);
        for pair in crumbs.windows(2) {
            assert_eq!(pair[0].rect().max.x, pair[1].rect().min.x);
        }

        for crumb in &crumbs[..3] {
            assert!(crumb.can_browse());
            assert!(!crumb.is_last());
        }
        assert!(crumbs[3].is_last());
    }

    #[test]
    fn lookup_failure_leaves_state_unchanged() {
        // No chain registered for this key, so the lookup fails.
        let fixture = fixture("prj:missing", None, false);

        assert!(fixture.rx.recv_timeout(SILENCE_TIMEOUT).is_err());
        assert!(fixture.trail.path().is_empty());
        assert!(fixture.trail.children().is_empty());
    }

    #[test]
    fn arrow_left_selects_the_root_when_back_to_first() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, true);
        pump(&mut fixture);

        let mut bus = Bus::new();
        let handled = fixture.trail.handle_event(
            &Event::Key(KeyCode::ArrowLeft),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(handled);
        assert!(matches!(
            bus.pop_front(),
            Some(Event::Select(location)) if location.key == "prj"
        ));
    }

    #[test]
    fn arrow_left_selects_the_second_to_last_otherwise() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);

        let mut bus = Bus::new();
        fixture.trail.handle_event(
            &Event::Key(KeyCode::ArrowLeft),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(matches!(
            bus.pop_front(),
            Some(Event::Select(location)) if location.key == "prj:src/parser"
        ));
    }

    #[test]
    fn arrow_left_on_a_short_path_is_consumed_without_selection() {
        let mut fixture = fixture("prj", None, false);

        let mut bus = Bus::new();
        let handled = fixture.trail.handle_event(
            &Event::Key(KeyCode::ArrowLeft),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(handled);
        assert!(bus.is_empty());
    }

    #[test]
    fn other_keys_fall_through() {
        let mut fixture = fixture("prj", None, false);

        let mut bus = Bus::new();
        let handled = fixture.trail.handle_event(
            &Event::Key(KeyCode::ArrowRight),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(!handled);
        assert!(bus.is_empty());
    }

    #[test]
    fn target_change_refetches_and_discards_the_stale_chain() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        fixture.lookup.insert_chain(
            "prj:src/report.rs",
            vec![location("prj"), location("prj:src"), location("prj:src/report.rs")],
        );

        let stale = fixture.rx.recv_timeout(RECV_TIMEOUT).unwrap();
        let hub = fixture.hub.clone();

        fixture.trail.set_target(
            location("prj:src/report.rs"),
            None,
            &hub,
            &mut fixture.rq,
            &mut fixture.context,
        );

        let fresh = fixture.rx.recv_timeout(RECV_TIMEOUT).unwrap();
        let mut bus = Bus::new();
        fixture
            .trail
            .handle_event(&fresh, &hub, &mut bus, &mut fixture.rq, &mut fixture.context);
        assert_eq!(fixture.trail.path().last().unwrap().key, "prj:src/report.rs");

        // The response for the previous target resolves late and must not
        // clobber the newer path.
        fixture
            .trail
            .handle_event(&stale, &hub, &mut bus, &mut fixture.rq, &mut fixture.context);
        assert_eq!(fixture.trail.path().last().unwrap().key, "prj:src/report.rs");

        assert_eq!(fixture.lookup.call_count(), 2);
    }

    #[test]
    fn equivalent_branch_change_does_not_refetch() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);
        assert_eq!(fixture.lookup.call_count(), 1);

        let hub = fixture.hub.clone();
        fixture.trail.set_target(
            location("prj:src/parser/lexer.rs"),
            Some(BranchScope::Main),
            &hub,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert_eq!(fixture.lookup.call_count(), 1);
        assert!(fixture.rx.recv_timeout(SILENCE_TIMEOUT).is_err());
    }

    #[test]
    fn branch_change_refetches() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);

        let hub = fixture.hub.clone();
        fixture.trail.set_target(
            location("prj:src/parser/lexer.rs"),
            Some(BranchScope::PullRequest("42".to_string())),
            &hub,
            &mut fixture.rq,
            &mut fixture.context,
        );

        fixture.rx.recv_timeout(RECV_TIMEOUT).unwrap();
        assert_eq!(fixture.lookup.call_count(), 2);
    }

    #[test]
    fn teardown_discards_the_pending_resolution_and_releases_the_key() {
        let fixture = fixture("prj:src/parser/lexer.rs", None, false);
        assert!(fixture.context.keyboard.is_claimed(KeyCode::ArrowLeft));

        let Fixture {
            trail,
            rx,
            hub,
            mut context,
            mut rq,
            ..
        } = fixture;
        drop(trail);

        assert!(!context.keyboard.is_claimed(KeyCode::ArrowLeft));

        // The lookup still resolves, but the trail is gone: delivering the
        // event to what remains of the tree must change nothing.
        let evt = rx.recv_timeout(RECV_TIMEOUT).unwrap();
        let mut remaining = Filler::new(rect![0, 0, 600, SMALL_BAR_HEIGHT], crate::color::WHITE);
        let mut bus = Bus::new();
        let handled = deliver_event(&mut remaining, &evt, &hub, &mut bus, &mut rq, &mut context);

        assert!(!handled);
        assert!(bus.is_empty());
    }

    #[test]
    fn chain_not_ending_at_the_target_is_discarded() {
        let lookup = Arc::new(FakeLookup::new());
        lookup.insert_chain(
            "prj:src",
            vec![location("prj"), location("prj:other")],
        );

        let mut context = create_test_context_with(lookup);
        let (hub, rx) = channel();
        let mut rq = RenderQueue::new();

        let mut trail = BreadcrumbTrail::new(
            rect![0, 0, 600, SMALL_BAR_HEIGHT],
            location("prj"),
            location("prj:src"),
            None,
            false,
            &hub,
            &mut rq,
            &mut context,
        );

        let evt = rx.recv_timeout(RECV_TIMEOUT).unwrap();
        let mut bus = Bus::new();
        trail.handle_event(&evt, &hub, &mut bus, &mut rq, &mut context);

        assert!(trail.path().is_empty());
        assert!(trail.children().is_empty());
    }

    #[test]
    fn tap_on_a_browsable_crumb_selects_it() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);

        let first_rect = *fixture.trail.children()[0].rect();
        let center = pt!(
            (first_rect.min.x + first_rect.max.x) / 2,
            (first_rect.min.y + first_rect.max.y) / 2
        );

        let mut bus = Bus::new();
        let handled = deliver_event(
            &mut fixture.trail,
            &Event::Gesture(GestureEvent::Tap(center)),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(handled);
        assert!(matches!(
            bus.pop_front(),
            Some(Event::Select(location)) if location.key == "prj"
        ));
    }

    #[test]
    fn tap_on_the_last_crumb_is_inert() {
        let mut fixture = fixture("prj:src/parser/lexer.rs", None, false);
        pump(&mut fixture);

        let last_rect = *fixture.trail.children()[3].rect();
        let center = pt!(
            (last_rect.min.x + last_rect.max.x) / 2,
            (last_rect.min.y + last_rect.max.y) / 2
        );

        let mut bus = Bus::new();
        let handled = deliver_event(
            &mut fixture.trail,
            &Event::Gesture(GestureEvent::Tap(center)),
            &fixture.hub,
            &mut bus,
            &mut fixture.rq,
            &mut fixture.context,
        );

        assert!(!handled);
        assert!(bus.is_empty());
    }
}

//! Shared application state threaded through the view tree.

use std::sync::Arc;

use crate::api::AncestorLookup;
use crate::input::KeyboardSource;
use crate::settings::Settings;

pub struct Context {
    pub settings: Settings,
    pub keyboard: KeyboardSource,
    /// Ancestor resolution backend, shared with lookup worker threads.
    pub lookup: Arc<dyn AncestorLookup>,
}

impl Context {
    pub fn new(settings: Settings, lookup: Arc<dyn AncestorLookup>) -> Context {
        Context {
            settings,
            keyboard: KeyboardSource::new(),
            lookup,
        }
    }
}

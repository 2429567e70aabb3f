//! Keyboard input: logical key identities and the shared key claim registry.
//!
//! The key-press stream is a process-wide resource. A view that wants a key
//! routed to it takes out a claim with [`KeyboardSource::subscribe`]; the
//! returned [`KeySubscription`] releases the claim when dropped, so a view
//! that goes away on any path (normal teardown, panic unwinding its owner)
//! cannot leak its registration. The shell consults
//! [`KeyboardSource::is_claimed`] to decide whether a raw key press is
//! forwarded into the view tree as [`Event::Key`](crate::view::Event::Key)
//! and its default action suppressed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

#[derive(Debug)]
struct Claim {
    token: u64,
    key: KeyCode,
}

/// Process-wide registry of key claims. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSource {
    claims: Arc<Mutex<Vec<Claim>>>,
}

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl KeyboardSource {
    pub fn new() -> KeyboardSource {
        KeyboardSource::default()
    }

    /// Claims `key` for the caller's lifetime.
    ///
    /// Claims stack: several views may hold the same key at once, and the key
    /// stays claimed until the last subscription is dropped.
    pub fn subscribe(&self, key: KeyCode) -> KeySubscription {
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        lock_claims(&self.claims).push(Claim { token, key });

        KeySubscription {
            key,
            token,
            claims: Arc::clone(&self.claims),
        }
    }

    /// Returns true if at least one live subscription holds `key`.
    pub fn is_claimed(&self, key: KeyCode) -> bool {
        lock_claims(&self.claims).iter().any(|claim| claim.key == key)
    }
}

/// Live claim on a key. Dropping it releases the claim.
#[must_use = "dropping the subscription releases the key claim"]
#[derive(Debug)]
pub struct KeySubscription {
    key: KeyCode,
    token: u64,
    claims: Arc<Mutex<Vec<Claim>>>,
}

impl KeySubscription {
    pub fn key(&self) -> KeyCode {
        self.key
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        lock_claims(&self.claims).retain(|claim| claim.token != self.token);
    }
}

fn lock_claims(claims: &Mutex<Vec<Claim>>) -> MutexGuard<'_, Vec<Claim>> {
    // A claim list is valid even if a holder panicked mid-update elsewhere.
    claims.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

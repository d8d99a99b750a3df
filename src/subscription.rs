// subscription.rs - Scoped host registrations
//
// Each registration hands back its own release. Releases run in reverse
// registration order, exactly once, on `release` or drop. A registration
// that fails is logged and skipped; the ones before it stay held and the
// ones after it are still attempted.

use std::fmt::Debug;

use log::{debug, warn};

type Release = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Subscriptions {
    held: Vec<(&'static str, Release)>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `register`. On success keep the release it returns; on failure
    /// log and carry on. Returns whether the registration is held.
    pub fn try_add<R, E>(&mut self, name: &'static str, register: impl FnOnce() -> Result<R, E>) -> bool
    where
        R: FnOnce() + 'static,
        E: Debug,
    {
        match register() {
            Ok(release) => {
                debug!("subscribed: {name}");
                self.held.push((name, Box::new(release)));
                true
            }
            Err(e) => {
                warn!("{name} unavailable, continuing without it: {e:?}");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.held.iter().map(|(name, _)| *name)
    }

    /// Release everything held, newest first. Safe to repeat.
    pub fn release(&mut self) {
        while let Some((name, release)) = self.held.pop() {
            release();
            debug!("released: {name}");
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

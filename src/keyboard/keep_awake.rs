//! Keep the host awake by tapping a harmless key periodically

use super::actions::{ConsumerKey, Key};
use super::deferred::{Deferred, DeferredToken};
use crate::host::Host;

/// Default period between key taps
pub const KEEP_AWAKE_INTERVAL_MS: u32 = 60_000;

/// Key tapped on each firing
pub const KEEP_AWAKE_KEY: Key = Key::Consumer(ConsumerKey::BrightnessUp);

/// Keep-awake state, active while a deferred task is scheduled
pub struct KeepAwake {
    token: Option<DeferredToken>,
    interval: u32,
}

impl KeepAwake {
    pub const fn new(interval: u32) -> Self {
        Self { token: None, interval }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Start or stop periodic taps, `task` is scheduled on `deferred` when starting
    ///
    /// Returns the new state.
    pub fn toggle<T, const N: usize>(&mut self, now: u32, deferred: &mut Deferred<T, N>, task: T) -> bool {
        match self.token.take() {
            Some(token) => {
                info!("Ending keep_awake");
                deferred.cancel(token);
            },
            None => match deferred.defer(now, self.interval, task) {
                Ok(token) => {
                    info!("Starting keep_awake");
                    self.token = Some(token);
                },
                Err(e) => warn!("Could not start keep_awake: {:?}", e),
            },
        }
        self.is_active()
    }

    /// Deferred task body: tap the key and return delay until the next run
    pub fn fire(&mut self, host: &mut impl Host) -> u32 {
        if !self.is_active() {
            return 0;
        }
        debug!("keep_awake: Sending keycode");
        host.tap(KEEP_AWAKE_KEY);
        self.interval
    }
}

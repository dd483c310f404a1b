//! Key lock: keep the next pressed key held until it is pressed again
//!
//! Pressing the lock key starts watching. The next basic key pressed is locked:
//! its press goes through but its release is swallowed. Pressing a locked key
//! again unlocks it, the press is swallowed and the release goes through.

use heapless::Vec;

use super::actions::{Action, FirmwareAction, Key, KeyCode};
use crate::host::Host;

/// Maximum number of keys locked at the same time
pub const MAX_LOCKED: usize = 8;

pub const LOCK_KEY: Key = Key::Custom(Action::Firmware(FirmwareAction::KeyLock));

#[derive(Default)]
pub struct KeyLock {
    watching: bool,
    locked: Vec<KeyCode, MAX_LOCKED>,
}

impl KeyLock {
    pub const fn new() -> Self {
        Self { watching: false, locked: Vec::new() }
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn is_locked(&self, kc: KeyCode) -> bool {
        self.locked.contains(&kc)
    }

    pub fn locked(&self) -> &[KeyCode] {
        &self.locked
    }

    /// Handle key event, returns false if the event must not be processed further
    pub fn process(&mut self, key: Key, pressed: bool) -> bool {
        if key == LOCK_KEY {
            if pressed {
                self.watching = !self.watching;
                debug!("Key lock watching: {}", self.watching);
            }
            return false;
        }

        let kc = match key {
            Key::KeyCode(kc) => kc,
            _ => return true,
        };

        if pressed {
            if let Some(i) = self.locked.iter().position(|k| *k == kc) {
                // already held by the host, release will unlock it
                self.locked.swap_remove(i);
                debug!("Key lock: unlocked {}", kc as u8);
                return false;
            }
            if self.watching {
                self.watching = false;
                match self.locked.push(kc) {
                    Ok(()) => debug!("Key lock: locked {}", kc as u8),
                    Err(_) => warn!("Key lock: too many locked keys"),
                }
            }
            true
        } else {
            !self.is_locked(kc)
        }
    }

    /// Stop watching and release all locked keys
    pub fn unlock_all(&mut self, host: &mut impl Host) {
        if self.watching || !self.locked.is_empty() {
            info!("Unlocking {} keys", self.locked.len());
        }
        self.watching = false;
        for kc in self.locked.iter() {
            host.process_key(Key::KeyCode(*kc), false);
        }
        self.locked.clear();
    }
}

//! Deferred execution of tasks
//!
//! Small fixed-capacity timer queue. Each task is called once its trigger time has
//! passed and re-arms itself by returning the delay until the next call.

use core::num::NonZeroU8;

use heapless::Vec;

/// Handle to a scheduled task, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeferredToken(NonZeroU8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeferError {
    /// Tasks cannot be scheduled to run immediately
    InvalidDelay,
    /// All slots are taken
    NoFreeSlot,
}

struct Entry<T> {
    token: DeferredToken,
    trigger: u32,
    task: T,
}

/// Deferred task executor with up to `N` pending tasks
///
/// Time is given in milliseconds as a free-running `u32` counter, so comparisons
/// are done on the wrapping difference.
pub struct Deferred<T, const N: usize = 8> {
    entries: Vec<Entry<T>, N>,
    last_token: u8,
}

impl<T, const N: usize> Deferred<T, N> {
    pub const fn new() -> Self {
        Self { entries: Vec::new(), last_token: 0 }
    }

    /// Schedule `task` to run `delay` ms after `now`
    pub fn defer(&mut self, now: u32, delay: u32, task: T) -> Result<DeferredToken, DeferError> {
        if delay == 0 {
            return Err(DeferError::InvalidDelay);
        }
        if self.entries.is_full() {
            return Err(DeferError::NoFreeSlot);
        }
        let token = self.next_token();
        let entry = Entry { token, trigger: now.wrapping_add(delay), task };
        self.entries.push(entry).map_err(|_| DeferError::NoFreeSlot)?;
        Ok(token)
    }

    /// Remove a scheduled task, returns false if there was no such task
    pub fn cancel(&mut self, token: DeferredToken) -> bool {
        match self.entries.iter().position(|e| e.token == token) {
            Some(i) => {
                self.entries.swap_remove(i);
                true
            },
            None => false,
        }
    }

    pub fn is_scheduled(&self, token: DeferredToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run all tasks with trigger time at or before `now`
    ///
    /// The callback gets the task and its scheduled trigger time and returns the delay
    /// until the next call, counted from the trigger time. Returning 0 removes the task.
    /// Each task runs at most once per poll, even if it is late by more than its period.
    pub fn poll(&mut self, now: u32, mut f: impl FnMut(&T, u32) -> u32) {
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &mut self.entries[i];
            if !Self::expired(now, entry.trigger) {
                i += 1;
                continue;
            }
            match f(&entry.task, entry.trigger) {
                0 => {
                    // swapped entry lands at i, check it in the next iteration
                    self.entries.swap_remove(i);
                },
                delay => {
                    entry.trigger = entry.trigger.wrapping_add(delay);
                    i += 1;
                },
            }
        }
    }

    fn expired(now: u32, trigger: u32) -> bool {
        (now.wrapping_sub(trigger) as i32) >= 0
    }

    fn next_token(&mut self) -> DeferredToken {
        loop {
            self.last_token = self.last_token.wrapping_add(1);
            if let Some(id) = NonZeroU8::new(self.last_token) {
                let token = DeferredToken(id);
                // N is small, at most N ids can be taken
                if !self.is_scheduled(token) {
                    return token;
                }
            }
        }
    }
}

impl<T, const N: usize> Default for Deferred<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec as StdVec;

    #[test]
    fn fires_after_delay() {
        let mut deferred: Deferred<u8> = Deferred::new();
        deferred.defer(100, 50, 7).unwrap();
        let mut calls = StdVec::new();
        deferred.poll(149, |task, t| { calls.push((*task, t)); 0 });
        assert!(calls.is_empty());
        deferred.poll(150, |task, t| { calls.push((*task, t)); 0 });
        assert_eq!(calls, [(7, 150)]);
        assert!(deferred.is_empty());
    }

    #[test]
    fn rearms_from_trigger_time() {
        let mut deferred: Deferred<()> = Deferred::new();
        deferred.defer(0, 1000, ()).unwrap();
        let mut calls = StdVec::new();
        for now in (0..=3500).step_by(100) {
            // polled late, next trigger must not drift
            deferred.poll(now + 30, |_, t| { calls.push(t); 1000 });
        }
        assert_eq!(calls, [1000, 2000, 3000]);
        assert_eq!(deferred.len(), 1);
    }

    #[test]
    fn fires_once_per_poll_when_late() {
        let mut deferred: Deferred<()> = Deferred::new();
        deferred.defer(0, 10, ()).unwrap();
        let mut calls = 0;
        deferred.poll(100, |_, _| { calls += 1; 10 });
        assert_eq!(calls, 1);
        deferred.poll(100, |_, _| { calls += 1; 10 });
        assert_eq!(calls, 2);
    }

    #[test]
    fn cancel_removes_task() {
        let mut deferred: Deferred<u8> = Deferred::new();
        let a = deferred.defer(0, 10, 1).unwrap();
        let b = deferred.defer(0, 10, 2).unwrap();
        assert_ne!(a, b);
        assert!(deferred.cancel(a));
        assert!(!deferred.cancel(a));
        assert!(!deferred.is_scheduled(a));
        assert!(deferred.is_scheduled(b));
        let mut calls = StdVec::new();
        deferred.poll(10, |task, _| { calls.push(*task); 0 });
        assert_eq!(calls, [2]);
    }

    #[test]
    fn removal_during_poll_keeps_others() {
        let mut deferred: Deferred<u8> = Deferred::new();
        for task in 0..4 {
            deferred.defer(0, 10, task).unwrap();
        }
        let mut calls = StdVec::new();
        deferred.poll(10, |task, _| { calls.push(*task); if task % 2 == 0 { 0 } else { 10 } });
        calls.sort();
        assert_eq!(calls, [0, 1, 2, 3]);
        assert_eq!(deferred.len(), 2);
    }

    #[test]
    fn errors() {
        let mut deferred: Deferred<(), 2> = Deferred::new();
        assert_eq!(deferred.defer(0, 0, ()), Err(DeferError::InvalidDelay));
        deferred.defer(0, 1, ()).unwrap();
        deferred.defer(0, 1, ()).unwrap();
        assert_eq!(deferred.defer(0, 1, ()), Err(DeferError::NoFreeSlot));
    }

    #[test]
    fn time_wraps_around() {
        let mut deferred: Deferred<()> = Deferred::new();
        deferred.defer(u32::MAX - 5, 10, ()).unwrap();
        let mut calls = StdVec::new();
        deferred.poll(u32::MAX, |_, t| { calls.push(t); 0 });
        assert!(calls.is_empty());
        deferred.poll(4, |_, t| { calls.push(t); 0 });
        assert_eq!(calls, [4]);
    }

    #[test]
    fn tokens_skip_live_ones() {
        let mut deferred: Deferred<(), 2> = Deferred::new();
        let first = deferred.defer(0, 1, ()).unwrap();
        // cycle the token counter around u8 while the first entry stays alive
        for _ in 0..300 {
            let token = deferred.defer(0, 1, ()).unwrap();
            assert_ne!(token, first);
            deferred.cancel(token);
        }
    }
}

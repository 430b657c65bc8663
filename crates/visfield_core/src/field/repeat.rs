//! Held-key repeat timers, polled cooperatively by the host.

use super::input::{Key, Modifiers};
use crate::config::FieldConfig;
use crate::constants::MAX_REPEAT_CATCH_UP;
use std::time::{Duration, Instant};

/// Payload replayed when the navigation repeat fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyRepeat {
    pub(crate) key: Key,
    pub(crate) modifiers: Modifiers,
}

/// Payload replayed when the typed-character repeat fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TypedRepeat {
    pub(crate) key: Key,
    pub(crate) character: char,
    pub(crate) modifiers: Modifiers,
}

/// Identity a running timer is compared by when rescheduled.
pub(crate) trait RepeatIdentity {
    fn same_repeat(&self, other: &Self) -> bool;
}

impl RepeatIdentity for KeyRepeat {
    fn same_repeat(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl RepeatIdentity for TypedRepeat {
    fn same_repeat(&self, other: &Self) -> bool {
        self.character == other.character
    }
}

/// One due firing returned by [`KeyRepeatScheduler::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RepeatFire {
    Key(KeyRepeat),
    Typed(TypedRepeat),
}

/// A single cancellable timer with an initial delay and a fixed interval.
#[derive(Clone, Debug)]
pub(crate) struct RepeatTimer<P> {
    payload: Option<P>,
    next_fire: Option<Instant>,
}

impl<P> Default for RepeatTimer<P> {
    fn default() -> Self {
        Self {
            payload: None,
            next_fire: None,
        }
    }
}

impl<P: Copy + RepeatIdentity> RepeatTimer<P> {
    pub(crate) fn is_scheduled(&self) -> bool {
        self.next_fire.is_some()
    }

    pub(crate) fn payload(&self) -> Option<P> {
        self.payload
    }

    /// Start the timer unless it is already running for the same key or
    /// character; a running timer keeps its original payload.
    ///
    /// # Returns
    /// `true` when the timer was (re)started.
    pub(crate) fn schedule(&mut self, payload: P, now: Instant, initial_delay: Duration) -> bool {
        let running = match self.payload {
            Some(current) => current.same_repeat(&payload),
            None => false,
        };
        if self.is_scheduled() && running {
            return false;
        }
        self.payload = Some(payload);
        self.next_fire = Some(now + initial_delay);
        true
    }

    pub(crate) fn cancel(&mut self) {
        self.next_fire = None;
    }

    /// Count firings due at `now`, advancing the timer past them.
    pub(crate) fn poll(&mut self, now: Instant, interval: Duration) -> usize {
        let Some(mut next_fire) = self.next_fire else {
            return 0;
        };
        let mut fired = 0;
        while next_fire <= now && fired < MAX_REPEAT_CATCH_UP {
            fired += 1;
            next_fire += interval;
        }
        if next_fire <= now {
            next_fire = now + interval;
        }
        self.next_fire = Some(next_fire);
        fired
    }
}

/// Navigation and typed-character repeat timers for one field.
#[derive(Clone, Debug)]
pub(crate) struct KeyRepeatScheduler {
    key: RepeatTimer<KeyRepeat>,
    typed: RepeatTimer<TypedRepeat>,
    initial_delay: Duration,
    interval: Duration,
}

impl KeyRepeatScheduler {
    pub(crate) fn new(config: &FieldConfig) -> Self {
        Self {
            key: RepeatTimer::default(),
            typed: RepeatTimer::default(),
            initial_delay: config.key_repeat_initial_delay(),
            interval: config.key_repeat_interval(),
        }
    }

    pub(crate) fn schedule_key(&mut self, key: Key, modifiers: Modifiers, now: Instant) -> bool {
        let repeat = KeyRepeat { key, modifiers };
        self.key.schedule(repeat, now, self.initial_delay)
    }

    pub(crate) fn schedule_typed(
        &mut self,
        key: Key,
        character: char,
        modifiers: Modifiers,
        now: Instant,
    ) -> bool {
        self.typed.schedule(
            TypedRepeat {
                key,
                character,
                modifiers,
            },
            now,
            self.initial_delay,
        )
    }

    /// Key-up: stops navigation repeat, and typed repeat if it belongs to `key`.
    pub(crate) fn on_key_up(&mut self, key: Key) {
        self.key.cancel();
        if self.typed.payload().is_some_and(|typed| typed.key == key) {
            self.typed.cancel();
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        self.key.cancel();
        self.typed.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_key_scheduled(&self) -> bool {
        self.key.is_scheduled()
    }

    #[cfg(test)]
    pub(crate) fn is_typed_scheduled(&self) -> bool {
        self.typed.is_scheduled()
    }

    /// Firings due at `now`, navigation repeats first.
    pub(crate) fn poll(&mut self, now: Instant) -> Vec<RepeatFire> {
        let mut fires = Vec::new();
        if let Some(payload) = self.key.payload() {
            let count = self.key.poll(now, self.interval);
            fires.extend(std::iter::repeat(RepeatFire::Key(payload)).take(count));
        }
        if let Some(payload) = self.typed.payload() {
            let count = self.typed.poll(now, self.interval);
            fires.extend(std::iter::repeat(RepeatFire::Typed(payload)).take(count));
        }
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn scheduler() -> KeyRepeatScheduler {
        KeyRepeatScheduler::new(&FieldConfig::default())
    }

    #[test]
    fn first_fire_waits_for_initial_delay_then_repeats() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        repeat.schedule_key(Key::Left, Modifiers::default(), t0);
        assert!(repeat.poll(t0 + ms(399)).is_empty());
        assert_eq!(repeat.poll(t0 + ms(400)).len(), 1);
        assert_eq!(repeat.poll(t0 + ms(449)).len(), 0);
        assert_eq!(repeat.poll(t0 + ms(500)).len(), 2);
    }

    #[test]
    fn same_key_does_not_restart_running_timer() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        let later = t0 + ms(300);
        assert!(repeat.schedule_key(Key::Right, Modifiers::NONE, t0));
        assert!(!repeat.schedule_key(Key::Right, Modifiers::NONE, later));
        assert_eq!(repeat.poll(t0 + ms(400)).len(), 1);
    }

    #[test]
    fn modifier_change_keeps_running_repeat() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        let key = Key::Char('a');
        let later = t0 + ms(300);
        assert!(repeat.schedule_typed(key, 'a', Modifiers::NONE, t0));
        assert!(!repeat.schedule_typed(key, 'a', Modifiers::SHIFT, later));
        assert_eq!(
            repeat.poll(t0 + ms(400)),
            vec![RepeatFire::Typed(TypedRepeat {
                key,
                character: 'a',
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn different_key_restarts_timer() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        let later = t0 + ms(300);
        repeat.schedule_key(Key::Right, Modifiers::NONE, t0);
        assert!(repeat.schedule_key(Key::Left, Modifiers::NONE, later));
        assert!(repeat.poll(t0 + ms(400)).is_empty());
        let fires = repeat.poll(t0 + ms(700));
        assert_eq!(
            fires,
            vec![RepeatFire::Key(KeyRepeat {
                key: Key::Left,
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn key_up_cancels_navigation_and_matching_typed_repeat() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        repeat.schedule_key(Key::Left, Modifiers::default(), t0);
        repeat.schedule_typed(Key::Char('a'), 'a', Modifiers::default(), t0);
        repeat.on_key_up(Key::Char('b'));
        assert!(!repeat.is_key_scheduled());
        assert!(repeat.is_typed_scheduled());
        repeat.on_key_up(Key::Char('a'));
        assert!(!repeat.is_typed_scheduled());
        assert!(repeat.poll(t0 + ms(1_000)).is_empty());
    }

    #[test]
    fn cancel_all_stops_both_timers() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        repeat.schedule_key(Key::Left, Modifiers::default(), t0);
        repeat.schedule_typed(Key::Backspace, '\u{8}', Modifiers::default(), t0);
        repeat.cancel_all();
        assert!(repeat.poll(t0 + ms(5_000)).is_empty());
    }

    #[test]
    fn stalled_poll_is_capped_and_resynchronized() {
        let t0 = Instant::now();
        let mut repeat = scheduler();
        repeat.schedule_key(Key::Left, Modifiers::default(), t0);
        assert_eq!(repeat.poll(t0 + ms(60_000)).len(), MAX_REPEAT_CATCH_UP);
        assert!(repeat.poll(t0 + ms(60_010)).is_empty());
        assert_eq!(repeat.poll(t0 + ms(60_050)).len(), 1);
    }
}

//! Two-phase change protocol guarding every text mutation.

use super::buffer::TextBuffer;
use tracing::{debug, trace};

/// A listener's answer to a proposed change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeVerdict {
    Accept,
    Reject,
}

/// Result of offering a candidate text to the change protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Candidate equals the current text; nothing was proposed.
    Unchanged,
    /// Candidate is now the field text.
    Accepted,
    /// Listener vetoed; the field text is untouched.
    Rejected,
}

impl ChangeOutcome {
    /// True when the text now differs from before the operation.
    pub fn changed(self) -> bool {
        self == Self::Accepted
    }

    /// True when a listener vetoed the candidate.
    pub fn is_rejected(self) -> bool {
        self == Self::Rejected
    }
}

/// Observer that may veto text changes.
pub trait ChangeListener {
    /// Called with the committed text and the candidate replacing it.
    fn on_change_proposed(&mut self, old: &str, new: &str) -> ChangeVerdict;
}

impl<F> ChangeListener for F
where
    F: FnMut(&str, &str) -> ChangeVerdict,
{
    fn on_change_proposed(&mut self, old: &str, new: &str) -> ChangeVerdict {
        self(old, new)
    }
}

/// Holds the optional change listener and runs commits through it.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    listener: Option<Box<dyn ChangeListener>>,
    proposals: u64,
}

impl ChangeNotifier {
    pub(crate) fn set_listener(&mut self, listener: Option<Box<dyn ChangeListener>>) {
        self.listener = listener;
    }

    /// Number of candidates offered to a listener so far.
    pub(crate) fn proposals(&self) -> u64 {
        self.proposals
    }

    /// Offer `candidate` to the listener and write it into `buffer` on acceptance.
    ///
    /// # Returns
    /// [`ChangeOutcome::Unchanged`] without consulting the listener when the
    /// candidate equals the current text.
    pub(crate) fn commit(&mut self, buffer: &mut TextBuffer, candidate: String) -> ChangeOutcome {
        if candidate == buffer.as_str() {
            return ChangeOutcome::Unchanged;
        }
        let verdict = match self.listener.as_mut() {
            Some(listener) => {
                self.proposals = self.proposals.wrapping_add(1);
                listener.on_change_proposed(buffer.as_str(), &candidate)
            }
            None => ChangeVerdict::Accept,
        };
        match verdict {
            ChangeVerdict::Accept => {
                buffer.replace(candidate);
                trace!(revision = buffer.revision(), "text change committed");
                ChangeOutcome::Accepted
            }
            ChangeVerdict::Reject => {
                debug!(
                    old_chars = buffer.len_chars(),
                    new_chars = candidate.chars().count(),
                    "text change vetoed by listener"
                );
                ChangeOutcome::Rejected
            }
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("has_listener", &self.listener.is_some())
            .field("proposals", &self.proposals)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn identical_candidate_skips_listener() {
        let calls = Rc::new(RefCell::new(0));
        let seen = calls.clone();
        let mut notifier = ChangeNotifier::default();
        notifier.set_listener(Some(Box::new(move |_: &str, _: &str| {
            *seen.borrow_mut() += 1;
            ChangeVerdict::Accept
        })));
        let mut buffer = TextBuffer::default();
        assert_eq!(
            notifier.commit(&mut buffer, String::new()),
            ChangeOutcome::Unchanged
        );
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(notifier.proposals(), 0);
    }

    #[test]
    fn listener_sees_old_and_new_text() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut notifier = ChangeNotifier::default();
        notifier.set_listener(Some(Box::new(move |old: &str, new: &str| {
            log.borrow_mut().push((old.to_string(), new.to_string()));
            ChangeVerdict::Accept
        })));
        let mut buffer = TextBuffer::default();
        buffer.replace("y".to_string());
        let outcome = notifier.commit(&mut buffer, "x".to_string());
        assert_eq!(outcome, ChangeOutcome::Accepted);
        assert_eq!(buffer.as_str(), "x");
        assert_eq!(*seen.borrow(), vec![("y".to_string(), "x".to_string())]);
    }

    #[test]
    fn veto_leaves_buffer_untouched() {
        let mut notifier = ChangeNotifier::default();
        notifier.set_listener(Some(Box::new(|_: &str, _: &str| ChangeVerdict::Reject)));
        let mut buffer = TextBuffer::default();
        buffer.replace("y".to_string());
        let revision = buffer.revision();
        let outcome = notifier.commit(&mut buffer, "x".to_string());
        assert!(outcome.is_rejected());
        assert!(!outcome.changed());
        assert_eq!(buffer.as_str(), "y");
        assert_eq!(buffer.revision(), revision);
    }
}

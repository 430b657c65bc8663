//! Clipboard adapters.

use crate::error::FieldError;
use std::cell::RefCell;
use std::rc::Rc;

/// System clipboard access as seen by a text field.
pub trait Clipboard {
    /// Current clipboard text, `Ok(None)` when empty.
    fn contents(&mut self) -> Result<Option<String>, FieldError>;

    /// Replace the clipboard text.
    fn set_contents(&mut self, text: &str) -> Result<(), FieldError>;
}

/// Process-local clipboard; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard already holding `text`.
    pub fn with_contents(text: &str) -> Self {
        let clipboard = Self::default();
        *clipboard.slot.borrow_mut() = Some(text.to_string());
        clipboard
    }

    /// Read the slot without going through the trait.
    pub fn peek(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn contents(&mut self) -> Result<Option<String>, FieldError> {
        Ok(self.peek())
    }

    fn set_contents(&mut self, text: &str) -> Result<(), FieldError> {
        *self.slot.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// OS clipboard backed by `arboard`.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Open the OS clipboard.
    ///
    /// # Errors
    /// Returns [`FieldError::Clipboard`] when no clipboard is available.
    pub fn new() -> Result<Self, FieldError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|err| FieldError::Clipboard(err.to_string()))
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn contents(&mut self) -> Result<Option<String>, FieldError> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => Err(FieldError::Clipboard(err.to_string())),
        }
    }

    fn set_contents(&mut self, text: &str) -> Result<(), FieldError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|err| FieldError::Clipboard(err.to_string()))
    }
}

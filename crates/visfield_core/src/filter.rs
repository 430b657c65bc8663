//! Per-character filters consulted for typed and pasted input.

/// Decides whether a character may enter the field.
///
/// The filter sees the current text (before the character is inserted) and the
/// candidate character.
pub enum CharFilter {
    /// Accepts only characters for which [`char::is_numeric`] holds.
    DigitsOnly,
    /// Accepts only `0-9`, `a-z` and `A-Z`.
    Alphanumeric,
    /// Caller-supplied predicate over the current text and the candidate.
    Custom(Box<dyn Fn(&str, char) -> bool>),
}

impl CharFilter {
    /// Returns `true` if `c` may be inserted into `current`.
    pub fn accept_char(&self, current: &str, c: char) -> bool {
        match self {
            CharFilter::DigitsOnly => c.is_numeric(),
            CharFilter::Alphanumeric => c.is_ascii_alphanumeric(),
            CharFilter::Custom(accept) => accept(current, c),
        }
    }

    /// Wrap a closure as a filter.
    pub fn custom(filter_fn: impl Fn(&str, char) -> bool + 'static) -> Self {
        Self::Custom(Box::new(filter_fn))
    }
}

impl std::fmt::Debug for CharFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharFilter::DigitsOnly => f.write_str("DigitsOnly"),
            CharFilter::Alphanumeric => f.write_str("Alphanumeric"),
            CharFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CharFilter;

    #[test]
    fn digits_only_rejects_letters() {
        let filter = CharFilter::DigitsOnly;
        assert!(filter.accept_char("", '7'));
        assert!(!filter.accept_char("12", 'x'));
    }

    #[test]
    fn custom_filter_sees_current_text() {
        let filter = CharFilter::custom(|current, c| !(current.contains('.') && c == '.'));
        assert!(filter.accept_char("1", '.'));
        assert!(!filter.accept_char("1.5", '.'));
    }
}

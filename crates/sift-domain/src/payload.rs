//! Payload module - the text actually submitted for one unit

/// Text derived from a work unit, ready to be sent
///
/// Owned by the dispatcher for the duration of one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Text to submit
    pub text: String,

    /// Whether the limiter shortened the text
    pub truncated: bool,
}

impl Payload {
    /// Payload that went through the limiter untouched
    pub fn intact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }

    /// Payload that was shortened by the limiter
    pub fn truncated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: true,
        }
    }

    /// Size of the payload in UTF-8 encoded bytes
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Size of the payload in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_and_char_len_differ_for_multibyte() {
        let payload = Payload::intact("héllo");
        assert_eq!(payload.char_len(), 5);
        assert_eq!(payload.byte_len(), 6);
        assert!(!payload.truncated);
    }

    #[test]
    fn test_truncated_flag() {
        assert!(Payload::truncated("ab").truncated);
    }
}

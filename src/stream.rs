//! Transport stream classification for registered formats
//!
//! Every format is carried over one of two transports: text or binary.
//! The classifier remembers which, and hands out an appropriately typed
//! empty buffer on request so callers can stage content before invoking
//! a handler.

use indexmap::IndexSet;

/// The two I/O transport kinds a format can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamKind {
    /// Text-oriented formats (delimited text and friends)
    Text,
    /// Binary-oriented formats (spreadsheet containers and friends)
    Binary,
}

impl StreamKind {
    /// Label of the buffer content this kind carries
    pub fn label(&self) -> &'static str {
        match self {
            StreamKind::Text => "string",
            StreamKind::Binary => "bytes",
        }
    }
}

/// An empty transport buffer matching a format's stream kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoBuffer {
    /// Buffer for text-oriented formats
    Text(String),
    /// Buffer for binary-oriented formats
    Binary(Vec<u8>),
}

impl IoBuffer {
    /// The stream kind this buffer belongs to
    pub fn kind(&self) -> StreamKind {
        match self {
            IoBuffer::Text(_) => StreamKind::Text,
            IoBuffer::Binary(_) => StreamKind::Binary,
        }
    }

    /// Check whether the buffer holds no content
    pub fn is_empty(&self) -> bool {
        match self {
            IoBuffer::Text(s) => s.is_empty(),
            IoBuffer::Binary(b) => b.is_empty(),
        }
    }
}

/// Maps format identifiers to their declared stream kind.
///
/// Membership is kept in sets, so repeated registration of the same
/// (format, kind) pair is idempotent.
#[derive(Debug, Default)]
pub struct StreamClassifier {
    text_formats: IndexSet<String>,
    binary_formats: IndexSet<String>,
}

impl StreamClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a format's stream kind
    pub fn record(&mut self, format: &str, kind: StreamKind) {
        let format = format.to_ascii_lowercase();
        match kind {
            StreamKind::Text => {
                self.text_formats.insert(format);
            }
            StreamKind::Binary => {
                self.binary_formats.insert(format);
            }
        }
    }

    /// Look up a format's stream kind; `None` means unclassified
    pub fn classify(&self, format: &str) -> Option<StreamKind> {
        let format = format.to_ascii_lowercase();
        if self.text_formats.contains(&format) {
            Some(StreamKind::Text)
        } else if self.binary_formats.contains(&format) {
            Some(StreamKind::Binary)
        } else {
            None
        }
    }

    /// Allocate a fresh empty buffer matching the format's stream kind
    pub fn buffer_for(&self, format: &str) -> Option<IoBuffer> {
        match self.classify(format)? {
            StreamKind::Text => Some(IoBuffer::Text(String::new())),
            StreamKind::Binary => Some(IoBuffer::Binary(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_and_binary() {
        let mut classifier = StreamClassifier::new();
        classifier.record("csv", StreamKind::Text);
        classifier.record("xlsx", StreamKind::Binary);

        assert_eq!(classifier.classify("csv"), Some(StreamKind::Text));
        assert_eq!(classifier.classify("CSV"), Some(StreamKind::Text));
        assert_eq!(classifier.classify("xlsx"), Some(StreamKind::Binary));
        assert_eq!(classifier.classify("ods"), None);
    }

    #[test]
    fn test_buffer_allocation() {
        let mut classifier = StreamClassifier::new();
        classifier.record("csv", StreamKind::Text);
        classifier.record("xlsx", StreamKind::Binary);

        let buffer = classifier.buffer_for("csv").unwrap();
        assert_eq!(buffer, IoBuffer::Text(String::new()));
        assert_eq!(buffer.kind().label(), "string");

        let buffer = classifier.buffer_for("xlsx").unwrap();
        assert_eq!(buffer, IoBuffer::Binary(Vec::new()));
        assert_eq!(buffer.kind().label(), "bytes");

        assert!(classifier.buffer_for("ods").is_none());
    }

    #[test]
    fn test_repeated_registration_is_idempotent() {
        let mut classifier = StreamClassifier::new();
        classifier.record("csv", StreamKind::Text);
        classifier.record("csv", StreamKind::Text);

        assert_eq!(classifier.text_formats.len(), 1);
    }
}

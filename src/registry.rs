//! Format registry: handler tables, format metadata and deferred entries
//!
//! The registry is plain state; it performs no loading itself. The
//! dispatcher owns one, resolves deferred module references through its
//! loader and selects handlers out of the tables here.

use crate::plugin::{PluginDescriptor, ReaderFactory, WriterFactory};
use crate::stream::{IoBuffer, StreamClassifier, StreamKind};
use indexmap::IndexMap;

pub(crate) fn canonical(format: &str) -> String {
    format.to_ascii_lowercase()
}

/// Holds, per format identifier, the known reader/writer constructors
/// keyed by backend-library name, plus stream-kind and content-type
/// metadata and the list of deferred backend modules.
#[derive(Default)]
pub struct FormatRegistry {
    /// Descriptive sequence of registered formats; duplicates allowed
    formats: Vec<String>,
    content_types: IndexMap<String, String>,
    classifier: StreamClassifier,
    readers: IndexMap<String, IndexMap<String, ReaderFactory>>,
    writers: IndexMap<String, IndexMap<String, WriterFactory>>,
    deferred: IndexMap<String, Vec<String>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a format's metadata: stream kind and optional content type
    pub fn register_format(
        &mut self,
        format: &str,
        stream_kind: Option<StreamKind>,
        content_type: Option<&str>,
    ) {
        let format = canonical(format);
        if let Some(content_type) = content_type {
            self.content_types
                .insert(format.clone(), content_type.to_string());
        }
        if let Some(kind) = stream_kind {
            self.classifier.record(&format, kind);
        }
        self.formats.push(format);
    }

    /// Register a reader constructor under (format, library).
    ///
    /// A later registration for the same pair silently overwrites.
    pub fn register_reader(&mut self, format: &str, library: &str, factory: ReaderFactory) {
        self.readers
            .entry(canonical(format))
            .or_default()
            .insert(library.to_string(), factory);
    }

    /// Register a writer constructor under (format, library)
    pub fn register_writer(&mut self, format: &str, library: &str, factory: WriterFactory) {
        self.writers
            .entry(canonical(format))
            .or_default()
            .insert(library.to_string(), factory);
    }

    /// Register a backend's whole descriptor bundle.
    ///
    /// Descriptors without a library name register format metadata only;
    /// their factories, if any, are ignored for lack of a key.
    pub fn register_plugin_bundle(&mut self, descriptors: Vec<PluginDescriptor>) {
        for descriptor in descriptors {
            self.register_format(
                &descriptor.format,
                descriptor.stream_kind,
                descriptor.content_type.as_deref(),
            );
            let Some(library) = descriptor.library else {
                continue;
            };
            if let Some(reader) = descriptor.reader {
                self.register_reader(&descriptor.format, &library, reader);
            }
            if let Some(writer) = descriptor.writer {
                self.register_writer(&descriptor.format, &library, writer);
            }
        }
    }

    /// Record a backend module for deferred loading.
    ///
    /// The stream kind is recorded immediately so classification works
    /// before the module is ever loaded.
    pub fn defer_plugin(&mut self, format: &str, stream_kind: StreamKind, module: &str) {
        let format = canonical(format);
        self.classifier.record(&format, stream_kind);
        self.deferred
            .entry(format)
            .or_default()
            .push(module.to_string());
    }

    /// Formats registered so far, in registration order
    pub fn known_formats(&self) -> &[String] {
        &self.formats
    }

    /// Content type recorded for a format, if any
    pub fn content_type(&self, format: &str) -> Option<&str> {
        self.content_types.get(&canonical(format)).map(String::as_str)
    }

    /// Backend libraries providing a reader for this format
    pub fn reader_libraries(&self, format: &str) -> Vec<&str> {
        self.readers
            .get(&canonical(format))
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Backend libraries providing a writer for this format
    pub fn writer_libraries(&self, format: &str) -> Vec<&str> {
        self.writers
            .get(&canonical(format))
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Look up a format's stream kind
    pub fn classify(&self, format: &str) -> Option<StreamKind> {
        self.classifier.classify(format)
    }

    /// Allocate an empty transport buffer for a format
    pub fn buffer_for(&self, format: &str) -> Option<IoBuffer> {
        self.classifier.buffer_for(format)
    }

    pub(crate) fn reader_table(&self, format: &str) -> Option<&IndexMap<String, ReaderFactory>> {
        self.readers.get(format)
    }

    pub(crate) fn writer_table(&self, format: &str) -> Option<&IndexMap<String, WriterFactory>> {
        self.writers.get(format)
    }

    pub(crate) fn deferred_modules(&self, format: &str) -> Option<Vec<String>> {
        self.deferred.get(format).cloned()
    }

    pub(crate) fn clear_deferred(&mut self, format: &str) {
        self.deferred.shift_remove(format);
    }
}

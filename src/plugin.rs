//! Plugin descriptors and backend module loading
//!
//! A backend ships a bundle of [`PluginDescriptor`]s: one per format it
//! supports, each naming the format's stream kind, content type and the
//! reader/writer constructors under a backend library name. Bundles are
//! either registered immediately or recorded as a deferred module
//! reference and loaded through a [`ModuleLoader`] on first dispatch.

use crate::book::{BookReader, BookWriter};
use crate::error::{Result, TabError};
use crate::stream::StreamKind;
use indexmap::IndexMap;
use std::sync::Arc;

/// Constructor for a reader handler
pub type ReaderFactory = Arc<dyn Fn() -> Box<dyn BookReader> + Send + Sync>;

/// Constructor for a writer handler
pub type WriterFactory = Arc<dyn Fn() -> Box<dyn BookWriter> + Send + Sync>;

/// One format's registration record inside a backend's bundle.
///
/// `format` is required. A descriptor carrying a reader or writer factory
/// must also carry a `library` name; a descriptor with neither factory is
/// accepted and registers format metadata only.
#[derive(Clone)]
pub struct PluginDescriptor {
    pub format: String,
    pub stream_kind: Option<StreamKind>,
    pub content_type: Option<String>,
    pub library: Option<String>,
    pub reader: Option<ReaderFactory>,
    pub writer: Option<WriterFactory>,
}

impl PluginDescriptor {
    pub fn new(format: impl Into<String>) -> Self {
        PluginDescriptor {
            format: format.into(),
            stream_kind: None,
            content_type: None,
            library: None,
            reader: None,
            writer: None,
        }
    }

    pub fn stream_kind(mut self, kind: StreamKind) -> Self {
        self.stream_kind = Some(kind);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn reader<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn BookReader> + Send + Sync + 'static,
    {
        self.reader = Some(Arc::new(factory));
        self
    }

    pub fn writer<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn BookWriter> + Send + Sync + 'static,
    {
        self.writer = Some(Arc::new(factory));
        self
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("format", &self.format)
            .field("stream_kind", &self.stream_kind)
            .field("content_type", &self.content_type)
            .field("library", &self.library)
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .finish()
    }
}

/// Loads a backend module reference into its descriptor bundle.
///
/// The loading mechanism is a substitutable capability so dispatch can be
/// tested without real module resolution; failures surface as
/// [`TabError::Load`] and leave the deferred registration in place.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, module: &str) -> Result<Vec<PluginDescriptor>>;
}

/// Descriptor-producing function a module registers with [`StaticLoader`]
pub type DescriptorFn = fn() -> Vec<PluginDescriptor>;

/// Stock loader backed by a static table of known modules.
///
/// Rust has no dynamic import, so "loading" a module reference means
/// calling the descriptor function registered under that name.
#[derive(Default)]
pub struct StaticLoader {
    modules: IndexMap<String, DescriptorFn>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module reference with its descriptor function
    pub fn register(&mut self, module: impl Into<String>, descriptors: DescriptorFn) {
        self.modules.insert(module.into(), descriptors);
    }

    /// Loader pre-populated with the crate's built-in backends
    pub fn with_builtins() -> Self {
        let mut loader = Self::new();
        loader.register(crate::backends::csv::MODULE, crate::backends::csv::descriptors);
        loader
    }
}

impl ModuleLoader for StaticLoader {
    fn load(&self, module: &str) -> Result<Vec<PluginDescriptor>> {
        match self.modules.get(module) {
            Some(descriptors) => Ok(descriptors()),
            None => Err(TabError::Load {
                module: module.to_string(),
                reason: "module is not known to the loader".to_string(),
            }),
        }
    }
}

//! Handler resolution: deferred loading, selection and instantiation
//!
//! The dispatcher owns the registry and the module loader. Resolution
//! canonicalizes the requested format, consumes any deferred
//! registrations for it (at most once per format; the registry is held
//! under a mutex for the whole step, so concurrent resolutions of the
//! same format load its backend a single time), selects a constructor
//! and returns a handler instance tagged with the resolved format.

use crate::book::{BookReader, BookWriter};
use crate::error::{Result, TabError};
use crate::plugin::ModuleLoader;
use crate::registry::{canonical, FormatRegistry};
use crate::stream::{IoBuffer, StreamKind};
use indexmap::IndexMap;
use parking_lot::Mutex;

/// Resolves formats to concrete reader/writer instances
pub struct Dispatcher {
    registry: Mutex<FormatRegistry>,
    loader: Box<dyn ModuleLoader>,
}

impl Dispatcher {
    /// Dispatcher over a caller-populated registry and module loader
    pub fn new(registry: FormatRegistry, loader: impl ModuleLoader + 'static) -> Self {
        Dispatcher {
            registry: Mutex::new(registry),
            loader: Box::new(loader),
        }
    }

    /// Dispatcher with the crate's built-in backends registered for
    /// deferred loading
    pub fn with_builtins() -> Self {
        let mut registry = FormatRegistry::new();
        for format in ["csv", "tsv"] {
            registry.defer_plugin(format, StreamKind::Text, crate::backends::csv::MODULE);
        }
        Self::new(registry, crate::plugin::StaticLoader::with_builtins())
    }

    /// Resolve a reader handler for a format, optionally pinned to one
    /// backend library
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstream::{BookReader, Dispatcher};
    ///
    /// let dispatcher = Dispatcher::with_builtins();
    /// let reader = dispatcher.create_reader("csv", None).unwrap();
    /// assert_eq!(reader.format(), "csv");
    /// ```
    pub fn create_reader(&self, format: &str, library: Option<&str>) -> Result<Box<dyn BookReader>> {
        let format = canonical(format);
        let factory = {
            let mut registry = self.registry.lock();
            self.resolve_deferred(&mut registry, &format)?;
            select_handler(registry.reader_table(&format), &format, library)?
        };
        let mut handler = factory();
        handler.set_format(&format);
        Ok(handler)
    }

    /// Resolve a writer handler for a format, optionally pinned to one
    /// backend library
    pub fn create_writer(&self, format: &str, library: Option<&str>) -> Result<Box<dyn BookWriter>> {
        let format = canonical(format);
        let factory = {
            let mut registry = self.registry.lock();
            self.resolve_deferred(&mut registry, &format)?;
            select_handler(registry.writer_table(&format), &format, library)?
        };
        let mut handler = factory();
        handler.set_format(&format);
        Ok(handler)
    }

    /// Allocate an empty transport buffer matching the format's stream kind
    pub fn io_buffer_for(&self, format: &str) -> Option<IoBuffer> {
        self.registry.lock().buffer_for(format)
    }

    /// Kind label of the format's transport: `"string"`, `"bytes"` or none
    pub fn io_kind_for(&self, format: &str) -> Option<&'static str> {
        self.registry.lock().classify(format).map(|kind| kind.label())
    }

    /// Run a closure against the registry, e.g. to register plugins after
    /// construction
    pub fn with_registry<T>(&self, f: impl FnOnce(&mut FormatRegistry) -> T) -> T {
        f(&mut self.registry.lock())
    }

    /// Load and register every deferred module recorded for `format`.
    ///
    /// The deferred entry is removed only after all of its modules
    /// loaded; a failure leaves it in place so a later resolution
    /// retries.
    fn resolve_deferred(&self, registry: &mut FormatRegistry, format: &str) -> Result<()> {
        let Some(modules) = registry.deferred_modules(format) else {
            return Ok(());
        };
        for module in &modules {
            #[cfg(feature = "tracing")]
            tracing::debug!(format = %format, module = %module, "loading deferred backend module");
            let bundle = self.loader.load(module).map_err(|err| {
                #[cfg(feature = "tracing")]
                tracing::warn!(format = %format, module = %module, error = %err, "deferred backend failed to load");
                err
            })?;
            registry.register_plugin_bundle(bundle);
        }
        registry.clear_deferred(format);
        Ok(())
    }
}

fn select_handler<F: Clone>(
    table: Option<&IndexMap<String, F>>,
    format: &str,
    library: Option<&str>,
) -> Result<F> {
    fn no_handler(format: &str) -> TabError {
        TabError::NoHandler {
            format: format.to_string(),
        }
    }

    let table = table.ok_or_else(|| no_handler(format))?;
    match library {
        Some(library) => table
            .get(library)
            .cloned()
            .ok_or_else(|| TabError::LibraryUnavailable {
                library: library.to_string(),
                format: format.to_string(),
            }),
        // No preference given: take the first registered entry. Insertion
        // order makes this stable within a process run.
        None => table.values().next().cloned().ok_or_else(|| no_handler(format)),
    }
}

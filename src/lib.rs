//! # tabstream
//!
//! A Rust library for reading and writing row/column data across
//! heterogeneous tabular formats through one uniform interface.
//!
//! ## Features
//!
//! - **Pluggable Backends**: Per-format reader/writer handlers registered at runtime
//! - **Lazy Loading**: Deferred ("soft") registration imports backend modules on first use
//! - **Stream Classification**: Text vs binary transports with matching empty buffers
//! - **Windowed Streaming**: Lazy row production under start/limit bounds and skip predicates
//! - **Built-in Delimited Backend**: CSV and TSV with typed cell auto-detection
//! - **Type Safety**: Strong typing with Rust's type system
//!
//! ## Quick Start
//!
//! ### Reading
//!
//! ```rust
//! use tabstream::{BookReader, Dispatcher, IoBuffer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::with_builtins();
//!
//! let mut reader = dispatcher.create_reader("csv", None)?;
//! reader.open_buffer(IoBuffer::Text("a,1\nb,2\n".to_string()))?;
//!
//! for sheet in reader.read_all()? {
//!     println!("{}: {} rows", sheet.name, sheet.payload.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Writing
//!
//! ```rust,no_run
//! use tabstream::{BookWriter, CellValue, Dispatcher, SheetWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::with_builtins();
//!
//! let mut writer = dispatcher.create_writer("csv", None)?;
//! writer.open_path("output.csv".as_ref())?;
//! {
//!     let mut sheet = writer.create_sheet(None)?;
//!     sheet.write_row(&[CellValue::from("total"), CellValue::Int(3)])?;
//!     sheet.close()?;
//! }
//! writer.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Windowed streaming
//!
//! ```rust
//! use tabstream::{CellValue, SheetReaderBuilder};
//!
//! let grid = vec![
//!     vec![CellValue::Int(1), CellValue::Int(2)],
//!     vec![CellValue::Int(3), CellValue::Int(4)],
//! ];
//!
//! let rows: Vec<_> = SheetReaderBuilder::new()
//!     .start_row(1)
//!     .build_from_grid(grid)
//!     .rows()
//!     .collect();
//!
//! assert_eq!(rows, vec![vec![CellValue::Int(3), CellValue::Int(4)]]);
//! ```

pub mod backends;
pub mod book;
pub mod dispatcher;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod sheet;
pub mod stream;
pub mod types;

pub use book::{BookReader, BookWriter};
pub use dispatcher::Dispatcher;
pub use error::{Result, TabError};
pub use plugin::{ModuleLoader, PluginDescriptor, ReaderFactory, StaticLoader, WriterFactory};
pub use registry::FormatRegistry;
pub use sheet::{
    GridRows, NamedContent, Rows, SheetReader, SheetReaderBuilder, SheetSource, SheetWriter,
    SkipAction, DEFAULT_SHEET_NAME,
};
pub use stream::{IoBuffer, StreamKind};
pub use types::CellValue;

//! Handler contracts for multi-sheet sources and sinks
//!
//! A book is one container (file or buffer) holding one or more named
//! sheets. Format backends plug in by implementing [`BookReader`] and/or
//! [`BookWriter`]; the dispatcher instantiates them and tags each instance
//! with its resolved format identifier.

use crate::error::Result;
use crate::sheet::{NamedContent, SheetWriter};
use crate::stream::IoBuffer;
use crate::types::CellValue;
use std::path::Path;

/// Reader side of the handler contract.
///
/// A reader opens a source, enumerates its named sheets and produces each
/// sheet's rows. Everything beyond that (cell decoding, windowing) is the
/// backend's and the sheet layer's business.
pub trait BookReader {
    /// Bind the resolved format identifier onto this instance.
    ///
    /// Called by the dispatcher after construction; backends normally
    /// just store the value.
    fn set_format(&mut self, format: &str);

    /// The format identifier this instance was resolved for
    fn format(&self) -> &str;

    /// Open a source file for reading
    fn open_path(&mut self, path: &Path) -> Result<()>;

    /// Open in-memory content previously staged in a transport buffer.
    ///
    /// A handler rejects a buffer of the wrong stream kind with
    /// [`TabError::UnsupportedSource`](crate::TabError::UnsupportedSource).
    fn open_buffer(&mut self, buffer: IoBuffer) -> Result<()>;

    /// Names of the sheets the opened source contains, in source order
    fn sheet_names(&self) -> Vec<String>;

    /// Read one named sheet into rows
    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>>;

    /// Read every sheet in source order
    fn read_all(&mut self) -> Result<Vec<NamedContent<Vec<Vec<CellValue>>>>> {
        let mut book = Vec::new();
        for name in self.sheet_names() {
            let rows = self.read_sheet(&name)?;
            book.push(NamedContent::new(name, rows));
        }
        Ok(book)
    }

    /// Release the source
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn BookReader + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("dyn BookReader")
            .field("format", &self.format())
            .finish()
    }
}

/// Writer side of the handler contract.
///
/// A writer opens a sink and hands out one [`SheetWriter`] per sheet;
/// `close` finalizes the container.
pub trait BookWriter {
    /// Bind the resolved format identifier onto this instance
    fn set_format(&mut self, format: &str);

    /// The format identifier this instance was resolved for
    fn format(&self) -> &str;

    /// Open a sink file for writing
    fn open_path(&mut self, path: &Path) -> Result<()>;

    /// Start a new sheet; `None` picks the default sheet name
    fn create_sheet<'a>(&'a mut self, name: Option<&str>) -> Result<Box<dyn SheetWriter + 'a>>;

    /// Write a whole book: one sheet per named payload, in input order
    fn write_book(&mut self, sheets: &[NamedContent<Vec<Vec<CellValue>>>]) -> Result<()> {
        for sheet in sheets {
            let mut writer = self.create_sheet(Some(&sheet.name))?;
            writer.write_array(&sheet.payload)?;
            writer.close()?;
        }
        Ok(())
    }

    /// Finalize the container
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReader {
        format: String,
        sheets: Vec<NamedContent<Vec<Vec<CellValue>>>>,
    }

    impl BookReader for FixedReader {
        fn set_format(&mut self, format: &str) {
            self.format = format.to_string();
        }

        fn format(&self) -> &str {
            &self.format
        }

        fn open_path(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn open_buffer(&mut self, _buffer: IoBuffer) -> Result<()> {
            Ok(())
        }

        fn sheet_names(&self) -> Vec<String> {
            self.sheets.iter().map(|s| s.name.clone()).collect()
        }

        fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>> {
            self.sheets
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.payload.clone())
                .ok_or_else(|| crate::TabError::SheetNotFound {
                    sheet: name.to_string(),
                    available: self.sheet_names().join(", "),
                })
        }
    }

    #[test]
    fn test_read_all_preserves_sheet_order() {
        let mut reader = FixedReader {
            format: String::new(),
            sheets: vec![
                NamedContent::new("first", vec![vec![CellValue::Int(1)]]),
                NamedContent::new("second", vec![vec![CellValue::Int(2)]]),
            ],
        };

        let book = reader.read_all().unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book[0].name, "first");
        assert_eq!(book[1].name, "second");
        assert_eq!(book[1].payload, vec![vec![CellValue::Int(2)]]);
    }
}

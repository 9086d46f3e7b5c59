//! Integration tests for tabstream

use tabstream::{
    BookReader, BookWriter, CellValue, Dispatcher, IoBuffer, PluginDescriptor, SheetReaderBuilder,
    SheetWriter, StreamKind, TabError,
};
use tempfile::NamedTempFile;

#[test]
fn test_write_and_read_roundtrip() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_path_buf();

    let dispatcher = Dispatcher::with_builtins();

    // Write data
    {
        let mut writer = dispatcher.create_writer("csv", None).unwrap();
        writer.open_path(&path).unwrap();
        let mut sheet = writer.create_sheet(None).unwrap();
        sheet
            .write_array(&[
                vec![
                    CellValue::Text("Name".to_string()),
                    CellValue::Text("Age".to_string()),
                    CellValue::Text("City".to_string()),
                ],
                vec![
                    CellValue::Text("Alice".to_string()),
                    CellValue::Int(30),
                    CellValue::Text("NYC".to_string()),
                ],
                vec![
                    CellValue::Text("Bob".to_string()),
                    CellValue::Int(25),
                    CellValue::Text("SF".to_string()),
                ],
            ])
            .unwrap();
        sheet.close().unwrap();
    }

    // Read data back
    {
        let mut reader = dispatcher.create_reader("csv", None).unwrap();
        reader.open_path(&path).unwrap();
        let book = reader.read_all().unwrap();

        assert_eq!(book.len(), 1);
        let rows = &book[0].payload;
        assert_eq!(rows.len(), 3); // Header + 2 data rows
        assert_eq!(
            rows[1],
            vec![
                CellValue::Text("Alice".to_string()),
                CellValue::Int(30),
                CellValue::Text("NYC".to_string()),
            ]
        );
    }
}

#[test]
fn test_typed_values_roundtrip() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path().to_path_buf();

    let dispatcher = Dispatcher::with_builtins();

    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    {
        let mut writer = dispatcher.create_writer("csv", None).unwrap();
        writer.open_path(&path).unwrap();
        let mut sheet = writer.create_sheet(None).unwrap();
        sheet
            .write_row(&[
                CellValue::Int(42),
                CellValue::Float(1234.56),
                CellValue::Date(date),
                CellValue::Text("014325".to_string()),
            ])
            .unwrap();
        sheet.close().unwrap();
    }

    let mut reader = dispatcher.create_reader("csv", None).unwrap();
    reader.open_path(&path).unwrap();
    let names = reader.sheet_names();
    let rows = reader.read_sheet(&names[0]).unwrap();

    assert_eq!(
        rows[0],
        vec![
            CellValue::Int(42),
            CellValue::Float(1234.56),
            CellValue::Date(date),
            // Zero-padded identifiers come back as text, not numbers.
            CellValue::Text("014325".to_string()),
        ]
    );
}

#[test]
fn test_tsv_is_its_own_format() {
    let dispatcher = Dispatcher::with_builtins();

    let mut reader = dispatcher.create_reader("TSV", None).unwrap();
    assert_eq!(reader.format(), "tsv");

    reader
        .open_buffer(IoBuffer::Text("a\t1\nb\t2\n".to_string()))
        .unwrap();
    let book = reader.read_all().unwrap();
    assert_eq!(book[0].payload.len(), 2);
    assert_eq!(book[0].payload[0][1], CellValue::Int(1));
}

#[test]
fn test_classifier_available_before_first_dispatch() {
    let dispatcher = Dispatcher::with_builtins();

    // Stream kinds were recorded at defer time; no backend has loaded yet.
    assert_eq!(dispatcher.io_kind_for("csv"), Some("string"));
    assert_eq!(dispatcher.io_kind_for("tsv"), Some("string"));
    assert_eq!(
        dispatcher.io_buffer_for("csv"),
        Some(IoBuffer::Text(String::new()))
    );
    assert_eq!(dispatcher.io_kind_for("xlsx"), None);
    assert!(dispatcher.io_buffer_for("xlsx").is_none());
}

#[test]
fn test_resolution_errors() {
    let dispatcher = Dispatcher::with_builtins();

    // Explicit library that exists
    let reader = dispatcher.create_reader("csv", Some("built-in")).unwrap();
    assert_eq!(reader.format(), "csv");

    // Explicit library that does not
    let err = dispatcher.create_reader("csv", Some("calamine")).unwrap_err();
    assert!(matches!(
        err,
        TabError::LibraryUnavailable { library, .. } if library == "calamine"
    ));

    // Format nobody registered
    let err = dispatcher.create_reader("xlsx", None).unwrap_err();
    assert!(matches!(err, TabError::NoHandler { format } if format == "xlsx"));
}

#[test]
fn test_windowed_consumption_of_dispatched_rows() {
    let dispatcher = Dispatcher::with_builtins();

    let mut reader = dispatcher.create_reader("csv", None).unwrap();
    reader
        .open_buffer(IoBuffer::Text(
            "h1,h2,h3\n1,2,3\n4,5,6\n7,8,9\n".to_string(),
        ))
        .unwrap();
    let names = reader.sheet_names();
    let grid = reader.read_sheet(&names[0]).unwrap();

    // Skip the header row and the first column.
    let rows: Vec<_> = SheetReaderBuilder::new()
        .start_row(1)
        .start_column(1)
        .build_from_grid(grid)
        .rows()
        .collect();

    assert_eq!(
        rows,
        vec![
            vec![CellValue::Int(2), CellValue::Int(3)],
            vec![CellValue::Int(5), CellValue::Int(6)],
            vec![CellValue::Int(8), CellValue::Int(9)],
        ]
    );
}

#[derive(Default)]
struct MemoryReader {
    format: String,
}

impl BookReader for MemoryReader {
    fn set_format(&mut self, format: &str) {
        self.format = format.to_string();
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn open_path(&mut self, _path: &std::path::Path) -> tabstream::Result<()> {
        Ok(())
    }

    fn open_buffer(&mut self, _buffer: IoBuffer) -> tabstream::Result<()> {
        Ok(())
    }

    fn sheet_names(&self) -> Vec<String> {
        vec!["fixture".to_string()]
    }

    fn read_sheet(&mut self, _name: &str) -> tabstream::Result<Vec<Vec<CellValue>>> {
        Ok(vec![vec![CellValue::Int(7)]])
    }
}

#[test]
fn test_external_plugin_registration() {
    let dispatcher = Dispatcher::with_builtins();

    dispatcher.with_registry(|registry| {
        registry.register_plugin_bundle(vec![PluginDescriptor::new("mem")
            .stream_kind(StreamKind::Text)
            .library("fixture-lib")
            .reader(|| Box::new(MemoryReader::default()))]);
    });

    let mut reader = dispatcher.create_reader("mem", Some("fixture-lib")).unwrap();
    assert_eq!(reader.format(), "mem");
    assert_eq!(reader.read_sheet("fixture").unwrap(), vec![vec![CellValue::Int(7)]]);
}

#[test]
fn test_named_sheet_writes_to_sibling_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let dispatcher = Dispatcher::with_builtins();
    let mut writer = dispatcher.create_writer("csv", None).unwrap();
    writer.open_path(&path).unwrap();
    {
        let mut sheet = writer.create_sheet(Some("summary")).unwrap();
        sheet.write_row(&[CellValue::Int(1)]).unwrap();
        sheet.close().unwrap();
    }
    writer.close().unwrap();

    assert!(dir.path().join("report__summary__0.csv").exists());
}

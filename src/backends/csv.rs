//! Built-in delimited-text backend (CSV and TSV)
//!
//! One delimited source maps to one named sheet. On read, non-empty
//! fields are promoted to typed cell values (int, float, date/datetime)
//! unless the corresponding detector is switched off; zero-padded
//! numbers such as `014325` stay text so identifiers survive round
//! trips.

use crate::book::{BookReader, BookWriter};
use crate::error::{Result, TabError};
use crate::plugin::PluginDescriptor;
use crate::sheet::{NamedContent, SheetReader, SheetWriter, DEFAULT_SHEET_NAME};
use crate::stream::{IoBuffer, StreamKind};
use crate::types::CellValue;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Module reference under which this backend's descriptor bundle is
/// registered with the stock loader
pub const MODULE: &str = "tabstream::backends::csv";

/// Options shared by the delimited reader and writer
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    /// Promote integer-looking fields to `CellValue::Int`
    pub detect_int: bool,
    /// Promote float-looking fields to `CellValue::Float`
    pub detect_float: bool,
    /// Promote date-looking fields to `CellValue::Date` / `DateTime`
    pub detect_datetime: bool,
    /// Keep fields that parse to ±infinity as text
    pub ignore_infinity: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            detect_int: true,
            detect_float: true,
            detect_datetime: true,
            ignore_infinity: true,
        }
    }
}

impl CsvOptions {
    /// Options preset for tab-separated values
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

fn detect_int(text: &str) -> Option<i64> {
    // Zero-padded identifiers such as 014325 stay text.
    if text.starts_with('0') && text.len() > 1 {
        return None;
    }
    text.parse().ok()
}

fn detect_float(text: &str, ignore_infinity: bool) -> Option<f64> {
    if text.starts_with('0') && !text.starts_with("0.") {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    if value.is_infinite() && ignore_infinity {
        return None;
    }
    Some(value)
}

fn detect_datetime(text: &str) -> Option<CellValue> {
    match text.len() {
        10 => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(CellValue::Date),
        19 => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(CellValue::DateTime),
        len if len > 19 => {
            let text = text.get(..26).unwrap_or(text);
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(CellValue::DateTime)
        }
        _ => None,
    }
}

fn parse_cell(text: &str, options: &CsvOptions) -> CellValue {
    if text.is_empty() {
        return CellValue::Empty;
    }
    if options.detect_int {
        if let Some(value) = detect_int(text) {
            return CellValue::Int(value);
        }
    }
    if options.detect_float {
        if let Some(value) = detect_float(text, options.ignore_infinity) {
            return CellValue::Float(value);
        }
    }
    if options.detect_datetime {
        if let Some(value) = detect_datetime(text) {
            return value;
        }
    }
    CellValue::Text(text.to_string())
}

fn serialize_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Int(i) => itoa::Buffer::new().format(*i).to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Bool(b) => (if *b { "true" } else { "false" }).to_string(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::DateTime(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Reader handler for delimited-text sources
pub struct CsvBookReader {
    format: String,
    options: CsvOptions,
    sheets: Vec<NamedContent<String>>,
}

impl Default for CsvBookReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvBookReader {
    pub fn new() -> Self {
        Self::with_options(CsvOptions::default())
    }

    pub fn tsv() -> Self {
        Self::with_options(CsvOptions::tsv())
    }

    pub fn with_options(options: CsvOptions) -> Self {
        CsvBookReader {
            format: String::new(),
            options,
            sheets: Vec::new(),
        }
    }

    fn default_sheet_name(&self, path: Option<&Path>) -> String {
        path.and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| {
                if self.format.is_empty() {
                    "csv".to_string()
                } else {
                    self.format.clone()
                }
            })
    }
}

impl BookReader for CsvBookReader {
    fn set_format(&mut self, format: &str) {
        self.format = format.to_string();
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn open_path(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let name = self.default_sheet_name(Some(path));
        self.sheets = vec![NamedContent::new(name, content)];
        Ok(())
    }

    fn open_buffer(&mut self, buffer: IoBuffer) -> Result<()> {
        match buffer {
            IoBuffer::Text(content) => {
                let name = self.default_sheet_name(None);
                self.sheets = vec![NamedContent::new(name, content)];
                Ok(())
            }
            IoBuffer::Binary(_) => Err(TabError::UnsupportedSource(
                "delimited text cannot be read from a binary buffer".to_string(),
            )),
        }
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>> {
        let sheet = self
            .sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| TabError::SheetNotFound {
                sheet: name.to_string(),
                available: self.sheet_names().join(", "),
            })?;

        let mut records = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(sheet.payload.as_bytes());

        let mut rows = Vec::new();
        for record in records.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| parse_cell(field, &self.options))
                    .collect::<Vec<_>>(),
            );
        }

        // Default windowing: trailing blanks trimmed, empty rows dropped.
        Ok(SheetReader::new(rows.into_iter()).rows().collect())
    }
}

/// Sheet writer over one delimited file
pub struct CsvSheetWriter<W: std::io::Write> {
    writer: csv::Writer<W>,
}

impl<W: std::io::Write> CsvSheetWriter<W> {
    pub fn from_writer(options: &CsvOptions, sink: W) -> Self {
        CsvSheetWriter {
            writer: csv::WriterBuilder::new()
                .delimiter(options.delimiter)
                .flexible(true)
                .from_writer(sink),
        }
    }
}

impl<W: std::io::Write> SheetWriter for CsvSheetWriter<W> {
    fn write_row(&mut self, row: &[CellValue]) -> Result<()> {
        self.writer.write_record(row.iter().map(serialize_field))?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writer handler for delimited-text sinks.
///
/// The first default-named sheet writes to the opened path itself; any
/// further sheet lands in a `stem__name__index.ext` sibling file, so a
/// multi-sheet book degrades into one delimited file per sheet.
pub struct CsvBookWriter {
    format: String,
    options: CsvOptions,
    path: Option<PathBuf>,
    sheet_index: usize,
}

impl Default for CsvBookWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvBookWriter {
    pub fn new() -> Self {
        Self::with_options(CsvOptions::default())
    }

    pub fn tsv() -> Self {
        Self::with_options(CsvOptions::tsv())
    }

    pub fn with_options(options: CsvOptions) -> Self {
        CsvBookWriter {
            format: String::new(),
            options,
            path: None,
            sheet_index: 0,
        }
    }

    fn sheet_path(&self, base: &Path, sheet_name: &str) -> PathBuf {
        if sheet_name == DEFAULT_SHEET_NAME {
            return base.to_path_buf();
        }
        let stem = base
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = base
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.format.clone());
        base.with_file_name(format!(
            "{stem}__{sheet_name}__{index}.{extension}",
            index = self.sheet_index
        ))
    }
}

impl BookWriter for CsvBookWriter {
    fn set_format(&mut self, format: &str) {
        self.format = format.to_string();
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn open_path(&mut self, path: &Path) -> Result<()> {
        self.path = Some(path.to_path_buf());
        self.sheet_index = 0;
        Ok(())
    }

    fn create_sheet<'a>(&'a mut self, name: Option<&str>) -> Result<Box<dyn SheetWriter + 'a>> {
        let base = self.path.clone().ok_or_else(|| {
            TabError::UnsupportedSource("no sink opened; call open_path first".to_string())
        })?;
        let sheet_name = name.unwrap_or(DEFAULT_SHEET_NAME);
        let target = self.sheet_path(&base, sheet_name);
        self.sheet_index += 1;

        let file = File::create(target)?;
        let mut writer = CsvSheetWriter::from_writer(&self.options, file);
        writer.set_sheet_name(sheet_name);
        Ok(Box::new(writer))
    }
}

/// Descriptor bundle this backend exports
pub fn descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::new("csv")
            .stream_kind(StreamKind::Text)
            .content_type("text/csv")
            .library("built-in")
            .reader(|| Box::new(CsvBookReader::new()))
            .writer(|| Box::new(CsvBookWriter::new())),
        PluginDescriptor::new("tsv")
            .stream_kind(StreamKind::Text)
            .content_type("text/tab-separated-values")
            .library("built-in")
            .reader(|| Box::new(CsvBookReader::tsv()))
            .writer(|| Box::new(CsvBookWriter::tsv())),
    ]
}

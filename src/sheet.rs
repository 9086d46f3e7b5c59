//! Generic sheet streaming: windowed lazy row production and row writing
//!
//! [`SheetReader`] turns any 2-D data source into a lazy, finite,
//! forward-only sequence of rows under caller-specified bounds and skip
//! predicates. It wraps either a native row iterator directly or, through
//! [`GridRows`], any random-access [`SheetSource`]. The sequence is not
//! rewindable; restart by constructing a new reader over the same source.
//!
//! [`SheetWriter`] is the uniform contract for appending rows to a
//! format-specific sink.

use crate::error::Result;
use crate::types::CellValue;

/// Sheet name used when the caller does not supply one
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// A (name, payload) pair identifying one sheet inside a multi-sheet
/// source or sink
#[derive(Debug, Clone, PartialEq)]
pub struct NamedContent<T> {
    pub name: String,
    pub payload: T,
}

impl<T> NamedContent<T> {
    pub fn new(name: impl Into<String>, payload: T) -> Self {
        NamedContent {
            name: name.into(),
            payload,
        }
    }
}

/// Decision a skip predicate makes for one row or column index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipAction {
    /// Produce this index
    Keep,
    /// Omit this index and continue
    Skip,
    /// End the sequence; no further indices are visited
    Stop,
}

/// Skip predicate over (index, window start, window limit).
///
/// `None` for the limit means unbounded. A custom predicate fully
/// replaces [`window_filter`]; the bounds become advisory inputs to it.
pub type SkipPredicate = Box<dyn Fn(usize, usize, Option<usize>) -> SkipAction>;

/// Default bound-based predicate: skip below `start`, stop once
/// `start + limit` is reached, keep everything in between.
pub fn window_filter(index: usize, start: usize, limit: Option<usize>) -> SkipAction {
    if index < start {
        SkipAction::Skip
    } else if limit.is_some_and(|limit| index >= start + limit) {
        SkipAction::Stop
    } else {
        SkipAction::Keep
    }
}

/// Random cell access over a native sheet
pub trait SheetSource {
    /// Number of rows the native sheet exposes
    fn row_count(&self) -> usize;

    /// Number of columns the native sheet exposes
    fn column_count(&self) -> usize;

    /// Fetch one raw cell value
    fn cell(&self, row: usize, column: usize) -> CellValue;
}

impl SheetSource for Vec<Vec<CellValue>> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        self.get(row)
            .and_then(|cells| cells.get(column))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }
}

/// Adapts a random-access [`SheetSource`] into sequential row iteration
pub struct GridRows<S> {
    source: S,
    next_row: usize,
}

impl<S: SheetSource> GridRows<S> {
    pub fn new(source: S) -> Self {
        GridRows {
            source,
            next_row: 0,
        }
    }
}

impl<S: SheetSource> Iterator for GridRows<S> {
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.source.row_count() {
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;
        let columns = self.source.column_count();
        Some((0..columns).map(|col| self.source.cell(row, col)).collect())
    }
}

/// Configures and builds a [`SheetReader`].
///
/// All windowing state is fixed at build time; the reader itself is
/// immutable configuration plus the wrapped native row producer.
///
/// # Examples
///
/// ```
/// use tabstream::{CellValue, SheetReaderBuilder};
///
/// let grid = vec![
///     vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)],
///     vec![CellValue::Int(4), CellValue::Int(5), CellValue::Int(6)],
/// ];
///
/// let rows: Vec<_> = SheetReaderBuilder::new()
///     .start_column(1)
///     .build_from_grid(grid)
///     .rows()
///     .collect();
///
/// assert_eq!(rows[0], vec![CellValue::Int(2), CellValue::Int(3)]);
/// ```
pub struct SheetReaderBuilder {
    start_row: usize,
    row_limit: Option<usize>,
    start_column: usize,
    column_limit: Option<usize>,
    skip_row: Option<SkipPredicate>,
    skip_column: Option<SkipPredicate>,
    skip_empty_rows: bool,
    row_transform: Option<Box<dyn Fn(Vec<CellValue>) -> Vec<CellValue>>>,
}

impl Default for SheetReaderBuilder {
    fn default() -> Self {
        SheetReaderBuilder {
            start_row: 0,
            row_limit: None,
            start_column: 0,
            column_limit: None,
            skip_row: None,
            skip_column: None,
            skip_empty_rows: true,
            row_transform: None,
        }
    }
}

impl SheetReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// First native row index to produce
    pub fn start_row(mut self, start: usize) -> Self {
        self.start_row = start;
        self
    }

    /// Maximum number of native row indices past `start_row` to visit
    pub fn row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// First native column index to produce
    pub fn start_column(mut self, start: usize) -> Self {
        self.start_column = start;
        self
    }

    /// Maximum number of native column indices past `start_column` to visit
    pub fn column_limit(mut self, limit: usize) -> Self {
        self.column_limit = Some(limit);
        self
    }

    /// Replace the default row predicate entirely
    pub fn skip_rows<F>(mut self, predicate: F) -> Self
    where
        F: Fn(usize, usize, Option<usize>) -> SkipAction + 'static,
    {
        self.skip_row = Some(Box::new(predicate));
        self
    }

    /// Replace the default column predicate entirely
    pub fn skip_columns<F>(mut self, predicate: F) -> Self
    where
        F: Fn(usize, usize, Option<usize>) -> SkipAction + 'static,
    {
        self.skip_column = Some(Box::new(predicate));
        self
    }

    /// Yield rows whose window contains no cells instead of dropping them
    pub fn keep_empty_rows(mut self) -> Self {
        self.skip_empty_rows = false;
        self
    }

    /// Map each assembled row before it is yielded
    pub fn row_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<CellValue>) -> Vec<CellValue> + 'static,
    {
        self.row_transform = Some(Box::new(transform));
        self
    }

    /// Build a reader over a native row iterator
    pub fn build<I>(self, rows: I) -> SheetReader<I>
    where
        I: Iterator<Item = Vec<CellValue>>,
    {
        SheetReader {
            native_rows: rows,
            start_row: self.start_row,
            row_limit: self.row_limit,
            start_column: self.start_column,
            column_limit: self.column_limit,
            skip_row: self.skip_row.unwrap_or_else(|| Box::new(window_filter)),
            skip_column: self.skip_column.unwrap_or_else(|| Box::new(window_filter)),
            skip_empty_rows: self.skip_empty_rows,
            row_transform: self.row_transform,
        }
    }

    /// Build a reader over a random-access source
    pub fn build_from_grid<S>(self, source: S) -> SheetReader<GridRows<S>>
    where
        S: SheetSource,
    {
        self.build(GridRows::new(source))
    }
}

/// Windowed, filtered, lazily-produced row sequence over a native sheet
pub struct SheetReader<I> {
    native_rows: I,
    start_row: usize,
    row_limit: Option<usize>,
    start_column: usize,
    column_limit: Option<usize>,
    skip_row: SkipPredicate,
    skip_column: SkipPredicate,
    skip_empty_rows: bool,
    row_transform: Option<Box<dyn Fn(Vec<CellValue>) -> Vec<CellValue>>>,
}

impl<I> SheetReader<I>
where
    I: Iterator<Item = Vec<CellValue>>,
{
    /// Reader with default windowing over a native row iterator
    pub fn new(rows: I) -> Self {
        SheetReaderBuilder::new().build(rows)
    }

    /// Consume the reader into its lazy row sequence
    pub fn rows(self) -> Rows<I> {
        Rows {
            reader: self,
            index: 0,
            stopped: false,
        }
    }
}

impl<S: SheetSource> SheetReader<GridRows<S>> {
    /// Reader with default windowing over a random-access source
    pub fn from_grid(source: S) -> Self {
        SheetReaderBuilder::new().build_from_grid(source)
    }
}

/// Lazy row iterator produced by [`SheetReader::rows`]
pub struct Rows<I> {
    reader: SheetReader<I>,
    index: usize,
    stopped: bool,
}

impl<I> Iterator for Rows<I>
where
    I: Iterator<Item = Vec<CellValue>>,
{
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        loop {
            let native_row = self.reader.native_rows.next()?;
            let row_index = self.index;
            self.index += 1;

            match (self.reader.skip_row)(row_index, self.reader.start_row, self.reader.row_limit) {
                SkipAction::Skip => continue,
                SkipAction::Stop => {
                    self.stopped = true;
                    return None;
                }
                SkipAction::Keep => {}
            }

            let mut assembled = Vec::new();
            // Cells kept since the last non-blank one; flushed into the
            // output only when another non-blank value arrives, so a
            // purely trailing run of blanks never makes it out.
            let mut pending = Vec::new();

            for (column_index, cell) in native_row.into_iter().enumerate() {
                match (self.reader.skip_column)(
                    column_index,
                    self.reader.start_column,
                    self.reader.column_limit,
                ) {
                    SkipAction::Skip => continue,
                    SkipAction::Stop => break,
                    SkipAction::Keep => {}
                }

                let blank = cell.is_blank();
                pending.push(cell);
                if !blank {
                    assembled.append(&mut pending);
                }
            }

            if assembled.is_empty() && self.reader.skip_empty_rows {
                continue;
            }

            let assembled = match &self.reader.row_transform {
                Some(transform) => transform(assembled),
                None => assembled,
            };
            return Some(assembled);
        }
    }
}

/// Uniform contract for appending rows to a format-specific sink
pub trait SheetWriter {
    /// Assign the target sheet's name; concrete writers may ignore it
    fn set_sheet_name(&mut self, _name: &str) {}

    /// Append one row of values to the native sink
    fn write_row(&mut self, row: &[CellValue]) -> Result<()>;

    /// Append rows in order
    fn write_array(&mut self, rows: &[Vec<CellValue>]) -> Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Finalize the sheet; callers invoke this exactly once when done
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

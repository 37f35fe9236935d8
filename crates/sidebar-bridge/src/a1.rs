//! A1-notation ranges.
//!
//! Sheet collaborators address cells the way the hosted spreadsheet does:
//! column letters followed by a one-based row number (`B7`), and ranges as
//! two corners joined by a colon (`A1:B12`). Writes always target a closed
//! [`A1Range`]; clears also accept the open-ended forms of [`A1Span`], such as
//! `A2:B` or `A:B`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Longest column letter sequence accepted.
const MAX_COLUMN_LETTERS: usize = 3;

/// Last addressable column (`XFD`).
const MAX_COLUMN: u32 = 16_384;

/// A single cell reference with one-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    column: u32,
    row: u64,
}

impl CellRef {
    /// Creates a reference, returning `None` for a zero coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u64) -> Option<Self> {
        if column == 0 || row == 0 {
            return None;
        }
        Some(Self { column, row })
    }

    /// One-based column number (`A` is 1).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// One-based row number.
    #[must_use]
    pub const fn row(&self) -> u64 {
        self.row
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = A1ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        cell_in(input, input)
    }
}

/// One side of a range: column letters and a row number, either of which may
/// be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    column: Option<u32>,
    row: Option<u64>,
}

impl Corner {
    /// Parses `text`, reporting errors against the whole `input`.
    fn parse(input: &str, text: &str) -> Result<Self, A1ParseError> {
        let trimmed = text.trim();
        let letters_end = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (letters, digits) = trimmed.split_at(letters_end);
        if letters.is_empty() && digits.is_empty() {
            return Err(A1ParseError::new(input, "empty cell reference"));
        }

        let column = if letters.is_empty() {
            None
        } else {
            Some(parse_column(input, letters)?)
        };
        let row = if digits.is_empty() {
            None
        } else {
            Some(parse_row(input, digits)?)
        };
        Ok(Self { column, row })
    }
}

fn parse_column(input: &str, letters: &str) -> Result<u32, A1ParseError> {
    if letters.len() > MAX_COLUMN_LETTERS {
        return Err(A1ParseError::new(input, "column out of range"));
    }
    let column = letters.chars().fold(0_u32, |acc, c| {
        let digit = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        acc * 26 + digit
    });
    if column > MAX_COLUMN {
        return Err(A1ParseError::new(input, "column out of range"));
    }
    Ok(column)
}

fn parse_row(input: &str, digits: &str) -> Result<u64, A1ParseError> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(A1ParseError::new(input, "invalid row number"));
    }
    let row = digits
        .parse::<u64>()
        .map_err(|_| A1ParseError::new(input, "invalid row number"))?;
    if row == 0 {
        return Err(A1ParseError::new(input, "row numbers start at 1"));
    }
    Ok(row)
}

/// Parses `text` as a complete cell, reporting errors against `input`.
fn cell_in(input: &str, text: &str) -> Result<CellRef, A1ParseError> {
    let corner = Corner::parse(input, text)?;
    let column = corner
        .column
        .ok_or_else(|| A1ParseError::new(input, "missing column letters"))?;
    let row = corner
        .row
        .ok_or_else(|| A1ParseError::new(input, "missing row number"))?;
    CellRef::new(column, row).ok_or_else(|| A1ParseError::new(input, "row numbers start at 1"))
}

/// A rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct A1Range {
    start: CellRef,
    end: CellRef,
}

impl A1Range {
    /// Creates a range from its top-left and bottom-right corners.
    ///
    /// # Errors
    ///
    /// Returns [`A1ParseError`] if `end` lies above or to the left of `start`.
    pub fn new(start: CellRef, end: CellRef) -> Result<Self, A1ParseError> {
        if end.column < start.column || end.row < start.row {
            return Err(A1ParseError::new(
                format!("{start}:{end}"),
                "range corners are reversed",
            ));
        }
        Ok(Self { start, end })
    }

    /// Range covering `count` rows of columns `first_column..=last_column`,
    /// starting at `first_row`.
    ///
    /// Returns `None` when `count`, `first_row` or `first_column` is zero, or
    /// when the columns are reversed.
    #[must_use]
    pub fn row_span(first_column: u32, last_column: u32, first_row: u64, count: u64) -> Option<Self> {
        let last_row = first_row.checked_add(count.checked_sub(1)?)?;
        Self::new(
            CellRef::new(first_column, first_row)?,
            CellRef::new(last_column, last_row)?,
        )
        .ok()
    }

    /// Range covering `count` rows of columns `A:B`, starting at `first_row`.
    #[must_use]
    pub fn two_column_rows(first_row: u64, count: u64) -> Option<Self> {
        Self::row_span(1, 2, first_row, count)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn start(&self) -> CellRef {
        self.start
    }

    /// Bottom-right corner.
    #[must_use]
    pub const fn end(&self) -> CellRef {
        self.end
    }

    /// Number of rows spanned.
    #[must_use]
    pub const fn height(&self) -> u64 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns spanned.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.end.column - self.start.column + 1
    }

    /// Returns `true` when `cell` lies inside the range.
    #[must_use]
    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.column..=self.end.column).contains(&cell.column)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for A1Range {
    type Err = A1ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (start, end) = input.split_once(':').unwrap_or((input, input));
        let start = cell_in(input, start)?;
        let end = cell_in(input, end)?;
        Self::new(start, end).map_err(|error| A1ParseError::new(input, error.reason))
    }
}

/// A block of cells whose edges may be left open.
///
/// Besides closed ranges this covers the forms the host accepts for clears:
/// `A2:B` runs from row 2 to the bottom of the sheet, `A:B` spans whole
/// columns and `2:5` spans whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct A1Span {
    first_column: Option<u32>,
    last_column: Option<u32>,
    first_row: Option<u64>,
    last_row: Option<u64>,
}

impl A1Span {
    /// Returns `true` when `cell` lies inside the span.
    #[must_use]
    pub fn contains(&self, cell: CellRef) -> bool {
        let columns = self.first_column.unwrap_or(1)..=self.last_column.unwrap_or(u32::MAX);
        let rows = self.first_row.unwrap_or(1)..=self.last_row.unwrap_or(u64::MAX);
        columns.contains(&cell.column) && rows.contains(&cell.row)
    }

    /// Returns the closed range this span describes, if it has no open edge.
    #[must_use]
    pub fn to_range(&self) -> Option<A1Range> {
        let start = CellRef::new(self.first_column?, self.first_row?)?;
        let end = CellRef::new(self.last_column?, self.last_row?)?;
        A1Range::new(start, end).ok()
    }
}

impl From<A1Range> for A1Span {
    fn from(range: A1Range) -> Self {
        Self {
            first_column: Some(range.start.column),
            last_column: Some(range.end.column),
            first_row: Some(range.start.row),
            last_row: Some(range.end.row),
        }
    }
}

impl fmt::Display for A1Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(range) = self.to_range() {
            return write!(f, "{range}");
        }
        write_corner(f, self.first_column, self.first_row)?;
        f.write_str(":")?;
        write_corner(f, self.last_column, self.last_row)
    }
}

fn write_corner(f: &mut fmt::Formatter<'_>, column: Option<u32>, row: Option<u64>) -> fmt::Result {
    if let Some(column) = column {
        f.write_str(&column_letters(column))?;
    }
    if let Some(row) = row {
        write!(f, "{row}")?;
    }
    Ok(())
}

impl FromStr for A1Span {
    type Err = A1ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((start, end)) = input.split_once(':') else {
            let cell = cell_in(input, input)?;
            return Ok(A1Range {
                start: cell,
                end: cell,
            }
            .into());
        };
        let start = Corner::parse(input, start)?;
        let end = Corner::parse(input, end)?;

        match (start.column, end.column) {
            (Some(_), Some(_)) => {
                if start.row.is_none() && end.row.is_some() {
                    return Err(A1ParseError::new(input, "missing start row"));
                }
            }
            (None, None) => {
                if start.row.is_none() || end.row.is_none() {
                    return Err(A1ParseError::new(input, "missing row number"));
                }
            }
            _ => return Err(A1ParseError::new(input, "mixed column and row references")),
        }

        if is_reversed(start.column, end.column) || is_reversed(start.row, end.row) {
            return Err(A1ParseError::new(input, "range corners are reversed"));
        }

        Ok(Self {
            first_column: start.column,
            last_column: end.column,
            first_row: start.row,
            last_row: end.row,
        })
    }
}

fn is_reversed<T: PartialOrd>(first: Option<T>, last: Option<T>) -> bool {
    matches!((first, last), (Some(first), Some(last)) if last < first)
}

/// Error raised for text that is not a supported A1 reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid A1 range '{input}': {reason}")]
pub struct A1ParseError {
    input: String,
    reason: &'static str,
}

impl A1ParseError {
    fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

fn column_letters(column: u32) -> String {
    let mut letters = Vec::new();
    let mut remaining = column;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

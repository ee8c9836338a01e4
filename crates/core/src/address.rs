//! A1-style cell addressing.
//!
//! Columns use bijective base-26: there is no zero digit, so `A` is 0,
//! `Z` is 25 and `AA` is 26. Rows in addresses are 1-based; grid
//! coordinates handed around by the UI are 0-based.

use std::fmt;
use std::str::FromStr;

/// Error produced when an address, column or range string cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input does not match `^[A-Z]+[0-9]+$` with a positive row.
    Malformed(String),
    /// Column letters are empty, not uppercase A-Z, or too long to index.
    InvalidColumn(String),
    /// Range is not `ADDR` or `ADDR:ADDR`.
    MalformedRange(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed cell address: '{s}'"),
            Self::InvalidColumn(s) => write!(f, "invalid column letters: '{s}'"),
            Self::MalformedRange(s) => write!(f, "malformed range: '{s}'"),
        }
    }
}

impl std::error::Error for AddressError {}

/// Convert 0-indexed column to letters (0 = A, 25 = Z, 26 = AA, etc.)
///
/// `column_index` inverts this for every index below `usize::MAX`; the
/// letters for `usize::MAX` itself overflow on the way back.
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut n = index;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Convert column letters back to a 0-indexed column.
pub fn column_index(letters: &str) -> Result<usize, AddressError> {
    if letters.is_empty() {
        return Err(AddressError::InvalidColumn(letters.to_string()));
    }
    let mut col: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(AddressError::InvalidColumn(letters.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add((b - b'A') as usize + 1))
            .ok_or_else(|| AddressError::InvalidColumn(letters.to_string()))?;
    }
    Ok(col - 1)
}

/// Build an address string from column letters and a 1-based row.
pub fn build_address(column: &str, row: u32) -> String {
    format!("{column}{row}")
}

/// Parse an address like "B3" or "AA100".
///
/// Strict: uppercase letters only, no `$` anchors, no whitespace, row > 0.
pub fn parse_address(addr: &str) -> Result<CellAddress, AddressError> {
    let malformed = || AddressError::Malformed(addr.to_string());

    let split = addr
        .bytes()
        .position(|b| !b.is_ascii_uppercase())
        .ok_or_else(malformed)?;
    let (letters, digits) = addr.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let row: u32 = digits.parse().map_err(|_| malformed())?;
    if row == 0 {
        return Err(malformed());
    }
    let col = column_index(letters).map_err(|_| malformed())?;

    Ok(CellAddress {
        column: letters.to_string(),
        col,
        row,
    })
}

/// A validated cell address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellAddress {
    column: String,
    col: usize,
    row: u32,
}

impl CellAddress {
    /// Build from 0-indexed grid coordinates.
    ///
    /// Rows are stored 1-based as `u32`; any `row >= u32::MAX - 1` lands on
    /// row `u32::MAX`.
    pub fn from_coords(col: usize, row: usize) -> Self {
        Self {
            column: column_letter(col),
            col,
            row: row.saturating_add(1).min(u32::MAX as usize) as u32,
        }
    }

    /// Column letters, e.g. "AB".
    pub fn column(&self) -> &str {
        &self.column
    }

    /// 1-based row number.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 0-indexed column.
    pub fn column_index(&self) -> usize {
        self.col
    }

    /// 0-indexed row.
    pub fn row_index(&self) -> usize {
        self.row as usize - 1
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl PartialOrd for CellAddress {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major ordering (A1, B1, ..., A2).
impl Ord for CellAddress {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

/// Inclusive rectangle of cells, normalised so `start` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        let (min_col, max_col) = (a.col.min(b.col), a.col.max(b.col));
        let (min_row, max_row) = (a.row.min(b.row), a.row.max(b.row));
        Self {
            start: CellAddress {
                column: column_letter(min_col),
                col: min_col,
                row: min_row,
            },
            end: CellAddress {
                column: column_letter(max_col),
                col: max_col,
                row: max_row,
            },
        }
    }

    /// Build from 0-indexed corners, in any order.
    pub fn from_coords(start: (usize, usize), end: (usize, usize)) -> Self {
        Self::new(
            CellAddress::from_coords(start.0, start.1),
            CellAddress::from_coords(end.0, end.1),
        )
    }

    /// Parse "A1" or "A1:B5".
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let bad = || AddressError::MalformedRange(s.to_string());
        match s.split_once(':') {
            Some((a, b)) => {
                let a = parse_address(a).map_err(|_| bad())?;
                let b = parse_address(b).map_err(|_| bad())?;
                Ok(Self::new(a, b))
            }
            None => {
                let a = parse_address(s).map_err(|_| bad())?;
                Ok(Self::new(a.clone(), a))
            }
        }
    }

    pub fn start(&self) -> &CellAddress {
        &self.start
    }

    pub fn end(&self) -> &CellAddress {
        &self.end
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    pub fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    pub fn height(&self) -> usize {
        (self.end.row - self.start.row) as usize + 1
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, addr: &CellAddress) -> bool {
        (self.start.col..=self.end.col).contains(&addr.col)
            && (self.start.row..=self.end.row).contains(&addr.row)
    }

    /// All addresses in the range, row-major.
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellAddress {
                column: column_letter(col),
                col,
                row,
            })
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn column_indices() {
        assert_eq!(column_index("A"), Ok(0));
        assert_eq!(column_index("Z"), Ok(25));
        assert_eq!(column_index("AA"), Ok(26));
        assert_eq!(column_index("ZZ"), Ok(701));
        assert_eq!(column_index("AAA"), Ok(702));
    }

    #[test]
    fn column_index_rejects_bad_input() {
        assert!(column_index("").is_err());
        assert!(column_index("a").is_err());
        assert!(column_index("A1").is_err());
        // Overflows usize
        assert!(column_index(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn column_round_trip_at_top_of_range() {
        let last = usize::MAX - 1;
        assert_eq!(column_index(&column_letter(last)), Ok(last));
        assert!(column_index(&column_letter(usize::MAX)).is_err());
    }

    #[test]
    fn from_coords_clamps_rows_to_u32() {
        let max = u32::MAX as usize;
        assert_eq!(CellAddress::from_coords(0, max - 2).row(), u32::MAX - 1);
        assert_eq!(CellAddress::from_coords(0, max - 1).row(), u32::MAX);
        assert_eq!(CellAddress::from_coords(0, usize::MAX).row(), u32::MAX);
    }

    #[test]
    fn parse_valid_addresses() {
        let a = parse_address("AB12").unwrap();
        assert_eq!(a.column(), "AB");
        assert_eq!(a.row(), 12);
        assert_eq!(a.column_index(), 27);
        assert_eq!(a.row_index(), 11);
        assert_eq!(a.to_string(), "AB12");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "A", "12", "a1", "A-1", "$A$1", " A1", "A1 ", "1A", "A0", "A1B2"] {
            assert_eq!(
                parse_address(bad),
                Err(AddressError::Malformed(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn build_and_parse_are_inverse() {
        let s = build_address("XFD", 1048576);
        assert_eq!(s, "XFD1048576");
        let a: CellAddress = s.parse().unwrap();
        assert_eq!(build_address(a.column(), a.row()), s);
    }

    #[test]
    fn from_coords_is_zero_based() {
        assert_eq!(CellAddress::from_coords(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::from_coords(1, 2).to_string(), "B3");
    }

    #[test]
    fn range_normalises_corners() {
        let r = CellRange::parse("C5:A1").unwrap();
        assert_eq!(r.to_string(), "A1:C5");
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 5);
        assert_eq!(r.cell_count(), 15);
    }

    #[test]
    fn range_single_cell_display() {
        let r = CellRange::parse("B2").unwrap();
        assert!(r.is_single_cell());
        assert_eq!(r.to_string(), "B2");
        let r = CellRange::parse("B2:B2").unwrap();
        assert_eq!(r.to_string(), "B2");
    }

    #[test]
    fn range_iterates_row_major() {
        let r = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<String> = r.addresses().map(|a| a.to_string()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn range_contains() {
        let r = CellRange::parse("B2:C3").unwrap();
        assert!(r.contains(&parse_address("C3").unwrap()));
        assert!(!r.contains(&parse_address("A1").unwrap()));
        assert!(!r.contains(&parse_address("D2").unwrap()));
    }

    #[test]
    fn range_rejects_garbage() {
        assert!(CellRange::parse("A1:").is_err());
        assert!(CellRange::parse("A1:B2:C3").is_err());
        assert!(CellRange::parse("B:C").is_err());
    }
}

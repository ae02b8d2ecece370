//! Virtual character LCD for testing and development.
//!
//! [`VirtualLcd`] behaves like an HD44780-class character display: a grid of
//! cells, a cursor, `print` writing at the cursor and advancing it. Writes
//! past the last column are dropped, as on the real module in its default
//! (non-scrolling) mode.
//!
//! # Character Encoding - ASCII Only
//!
//! The display only accepts printable ASCII (0x20-0x7E). Anything else is
//! rejected with [`HardwareError::InvalidData`] so that integrations fail in
//! tests the same way they would garble the physical display.
//!
//! # Examples
//!
//! ```
//! use doorlock_hardware::mock::VirtualLcd;
//! use doorlock_hardware::traits::DisplayDevice;
//!
//! #[tokio::main]
//! async fn main() -> doorlock_hardware::Result<()> {
//!     let mut lcd = VirtualLcd::new(16, 2);
//!
//!     lcd.set_cursor(4, 0).await?;
//!     lcd.print("Sala CPD").await?;
//!
//!     assert_eq!(lcd.row(0).unwrap(), "    Sala CPD    ");
//!     assert_eq!(lcd.row_trimmed(0).unwrap(), "Sala CPD");
//!     Ok(())
//! }
//! ```

use crate::{HardwareError, Result, traits::DisplayDevice, types::DeviceInfo};

/// Standard character LCD width.
const DEFAULT_COLUMNS: usize = 16;

/// Standard character LCD height.
const DEFAULT_ROWS: usize = 2;

/// Virtual character LCD.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. In async contexts, protect
/// access using `tokio::sync::Mutex` or similar synchronization primitive.
#[derive(Debug, Clone)]
pub struct VirtualLcd {
    /// Number of columns per row.
    columns: usize,

    /// Cell contents, one ASCII byte per cell.
    cells: Vec<Vec<u8>>,

    /// Cursor position as (column, row).
    cursor: (usize, usize),

    /// Incremented on every command, lets renderers skip unchanged frames.
    revision: u64,
}

impl VirtualLcd {
    /// Create a blank display of `columns` x `rows` cells.
    ///
    /// A display with a zero dimension has no cells. Every cursor move
    /// fails and nothing printed is kept.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            cells: vec![vec![b' '; columns]; rows],
            cursor: (0, 0),
            revision: 0,
        }
    }

    /// Create a builder for constructing a display with custom dimensions.
    pub fn builder() -> VirtualLcdBuilder {
        VirtualLcdBuilder::default()
    }

    /// Number of columns per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Current cursor position as (column, row).
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Number of commands applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the full contents of a row, padded to the display width.
    ///
    /// Returns `None` if the row does not exist.
    pub fn row(&self, row: usize) -> Option<String> {
        self.cells
            .get(row)
            .map(|cells| cells.iter().map(|&b| b as char).collect())
    }

    /// Get the contents of a row without trailing or leading blanks.
    pub fn row_trimmed(&self, row: usize) -> Option<String> {
        self.row(row).map(|text| text.trim().to_string())
    }

    /// Get the character at a cell.
    pub fn char_at(&self, column: usize, row: usize) -> Option<char> {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|&b| b as char)
    }

    /// Render the display inside an ASCII frame.
    ///
    /// ```
    /// use doorlock_hardware::mock::VirtualLcd;
    ///
    /// let lcd = VirtualLcd::new(4, 1);
    /// assert_eq!(lcd.render(), "+----+\n|    |\n+----+");
    /// ```
    pub fn render(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut lines = Vec::with_capacity(self.rows() + 2);
        lines.push(border.clone());
        for row in 0..self.rows() {
            lines.push(format!("|{}|", self.row(row).unwrap_or_default()));
        }
        lines.push(border);
        lines.join("\n")
    }
}

impl Default for VirtualLcd {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl DisplayDevice for VirtualLcd {
    async fn clear(&mut self) -> Result<()> {
        for row in &mut self.cells {
            row.fill(b' ');
        }
        self.cursor = (0, 0);
        self.revision += 1;
        Ok(())
    }

    async fn set_cursor(&mut self, column: usize, row: usize) -> Result<()> {
        if row >= self.rows() {
            return Err(HardwareError::out_of_range(
                "row",
                row as u64,
                self.rows().saturating_sub(1) as u64,
            ));
        }
        if column >= self.columns {
            return Err(HardwareError::out_of_range(
                "column",
                column as u64,
                self.columns.saturating_sub(1) as u64,
            ));
        }
        self.cursor = (column, row);
        self.revision += 1;
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        if let Some(bad) = text.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(HardwareError::invalid_data(format!(
                "Display accepts printable ASCII only, got {bad:?}"
            )));
        }

        let (mut column, row) = self.cursor;
        let rows = self.rows();
        let Some(cells) = self.cells.get_mut(row) else {
            return Err(HardwareError::out_of_range(
                "row",
                row as u64,
                rows.saturating_sub(1) as u64,
            ));
        };
        for byte in text.bytes() {
            let Some(cell) = cells.get_mut(column) else {
                break;
            };
            *cell = byte;
            column += 1;
        }
        self.cursor = (column.min(self.columns), row);
        self.revision += 1;
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(
            "Virtual LCD",
            format!("{}x{} character display", self.columns, self.rows()),
        ))
    }
}

/// Builder for constructing `VirtualLcd` instances with custom dimensions.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::VirtualLcd;
///
/// let lcd = VirtualLcd::builder().with_size(20, 4).build();
/// assert_eq!(lcd.columns(), 20);
/// assert_eq!(lcd.rows(), 4);
/// ```
#[derive(Debug)]
pub struct VirtualLcdBuilder {
    columns: usize,
    rows: usize,
}

impl VirtualLcdBuilder {
    /// Set the display size (columns and rows).
    pub fn with_size(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Build the virtual display with configured parameters.
    pub fn build(self) -> VirtualLcd {
        VirtualLcd::new(self.columns, self.rows)
    }
}

impl Default for VirtualLcdBuilder {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_display_is_blank() {
        let lcd = VirtualLcd::default();

        assert_eq!(lcd.columns(), 16);
        assert_eq!(lcd.rows(), 2);
        assert_eq!(lcd.row(0).unwrap(), " ".repeat(16));
        assert_eq!(lcd.row(2), None);
        assert_eq!(lcd.revision(), 0);
    }

    #[tokio::test]
    async fn test_print_advances_cursor() {
        let mut lcd = VirtualLcd::default();

        lcd.set_cursor(0, 1).await.unwrap();
        lcd.print("Senha: ").await.unwrap();
        lcd.print("1").await.unwrap();

        assert_eq!(lcd.cursor(), (8, 1));
        assert_eq!(lcd.row_trimmed(1).unwrap(), "Senha: 1");
        assert_eq!(lcd.char_at(7, 1), Some('1'));
    }

    #[tokio::test]
    async fn test_print_overwrites_cells() {
        let mut lcd = VirtualLcd::default();

        lcd.set_cursor(7, 1).await.unwrap();
        lcd.print("1").await.unwrap();
        lcd.set_cursor(7, 1).await.unwrap();
        lcd.print("*").await.unwrap();

        assert_eq!(lcd.char_at(7, 1), Some('*'));
    }

    #[tokio::test]
    async fn test_print_clips_at_right_edge() {
        let mut lcd = VirtualLcd::default();

        lcd.set_cursor(12, 0).await.unwrap();
        lcd.print("ABCDEFGH").await.unwrap();

        assert_eq!(lcd.row(0).unwrap(), "            ABCD");
        assert_eq!(lcd.cursor(), (16, 0));
        assert_eq!(lcd.row(1).unwrap(), " ".repeat(16));
    }

    #[tokio::test]
    async fn test_clear_resets_cells_and_cursor() {
        let mut lcd = VirtualLcd::default();

        lcd.set_cursor(3, 1).await.unwrap();
        lcd.print("XYZ").await.unwrap();
        lcd.clear().await.unwrap();

        assert_eq!(lcd.row_trimmed(1).unwrap(), "");
        assert_eq!(lcd.cursor(), (0, 0));
    }

    #[tokio::test]
    async fn test_set_cursor_out_of_bounds() {
        let mut lcd = VirtualLcd::default();

        assert!(matches!(
            lcd.set_cursor(16, 0).await,
            Err(HardwareError::OutOfRange { .. })
        ));
        assert!(matches!(
            lcd.set_cursor(0, 2).await,
            Err(HardwareError::OutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_sized_display_rejects_commands() {
        let mut lcd = VirtualLcd::new(0, 0);

        assert!(matches!(
            lcd.set_cursor(0, 0).await,
            Err(HardwareError::OutOfRange { max: 0, .. })
        ));
        assert!(matches!(
            lcd.print("x").await,
            Err(HardwareError::OutOfRange { .. })
        ));
        assert_eq!(lcd.render(), "++\n++");

        let mut lcd = VirtualLcd::new(0, 2);
        assert!(lcd.set_cursor(0, 1).await.is_err());
        lcd.print("x").await.unwrap();
        assert_eq!(lcd.row(0).unwrap(), "");
    }

    #[tokio::test]
    async fn test_print_rejects_non_ascii() {
        let mut lcd = VirtualLcd::default();

        let result = lcd.print("Liberação").await;
        assert!(matches!(result, Err(HardwareError::InvalidData { .. })));
        assert_eq!(lcd.row_trimmed(0).unwrap(), "");

        assert!(lcd.print("tab\there").await.is_err());
    }

    #[tokio::test]
    async fn test_revision_counts_commands() {
        let mut lcd = VirtualLcd::default();

        lcd.clear().await.unwrap();
        lcd.set_cursor(0, 0).await.unwrap();
        lcd.print("x").await.unwrap();

        assert_eq!(lcd.revision(), 3);
    }

    #[tokio::test]
    async fn test_get_info_reports_geometry() {
        let lcd = VirtualLcd::builder().with_size(20, 4).build();
        let info = lcd.get_info().await.unwrap();
        assert_eq!(info.model, "20x4 character display");
    }
}

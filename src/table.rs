use thiserror::Error;
use tracing::{debug, error};

use crate::pager::{PageStore, StorageError};
use crate::row::{Row, RowError};
use crate::{ROWS_PER_PAGE, TABLE_MAX_PAGES};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table full")]
    TableFull,
    #[error(transparent)]
    Field(#[from] RowError),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for TableError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TableFull { .. } => TableError::TableFull,
            other => TableError::Storage(other),
        }
    }
}

/// A single append-only table of rows, stored in fixed-size pages.
pub struct Table {
    pager: PageStore,
    num_rows: usize,
}

impl Table {
    pub fn new(max_pages: usize) -> Self {
        Self {
            pager: PageStore::new(max_pages),
            num_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn max_rows(&self) -> usize {
        self.pager.max_pages().saturating_mul(ROWS_PER_PAGE)
    }

    pub fn num_pages(&self) -> usize {
        self.pager.num_pages()
    }

    /// Appends `row` after the last stored row.
    ///
    /// Either the whole record is written and the row count grows by one, or
    /// an error is returned and the table is unchanged.
    pub fn insert(&mut self, row: &Row) -> Result<(), TableError> {
        if self.num_rows >= self.max_rows() {
            debug!(rows = self.num_rows, "insert rejected, table full");
            return Err(TableError::TableFull);
        }

        let block = row.encode()?;
        let (page, slot) = PageStore::locate(self.num_rows);
        self.pager.write_slot(page, slot, &block)?;
        self.num_rows += 1;
        Ok(())
    }

    /// Iterates every stored row in insertion order.
    ///
    /// Each call starts again from the first row.
    pub fn scan(&self) -> Scan<'_> {
        Scan {
            pager: &self.pager,
            next_row: 0,
            end: self.num_rows,
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TABLE_MAX_PAGES)
    }
}

pub struct Scan<'a> {
    pager: &'a PageStore,
    next_row: usize,
    end: usize,
}

impl Iterator for Scan<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next_row >= self.end {
            return None;
        }

        let (page, slot) = PageStore::locate(self.next_row);
        let block = match self.pager.read_slot(page, slot) {
            Ok(block) => block,
            Err(err) => {
                error!(%err, row = self.next_row, "scan stopped early");
                self.next_row = self.end;
                return None;
            }
        };
        self.next_row += 1;
        Some(Row::decode(block))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scan<'_> {}

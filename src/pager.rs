//! Page arena backing the table.
//!
//! Pages are fixed arrays of [`ROWS_PER_PAGE`] record slots, kept in a `Vec`
//! indexed by page number. The arena only grows: a page is allocated the first
//! time a write addresses it and lives until the store is dropped. Mapping a
//! logical row index to its `(page, slot)` is pure arithmetic, see
//! [`PageStore::locate`].

use thiserror::Error;
use tracing::{debug, trace};

use crate::ROWS_PER_PAGE;
use crate::row::RecordBlock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Table full")]
    TableFull { page: usize, max_pages: usize },
    #[error("page {0} has not been allocated")]
    PageNotAllocated(usize),
    #[error("slot {slot} is out of range, a page holds {rows_per_page} rows")]
    SlotOutOfRange { slot: usize, rows_per_page: usize },
}

/// One fixed-capacity block of serialized rows.
pub struct Page {
    slots: Box<[RecordBlock; ROWS_PER_PAGE]>,
}

impl Page {
    fn new() -> Self {
        Self {
            slots: Box::new([[0; crate::ROW_SIZE]; ROWS_PER_PAGE]),
        }
    }

    pub fn slot(&self, slot_index: usize) -> Option<&RecordBlock> {
        self.slots.get(slot_index)
    }

    pub fn slot_mut(&mut self, slot_index: usize) -> Option<&mut RecordBlock> {
        self.slots.get_mut(slot_index)
    }
}

pub struct PageStore {
    pages: Vec<Page>,
    max_pages: usize,
}

impl PageStore {
    pub fn new(max_pages: usize) -> Self {
        Self {
            pages: Vec::new(),
            max_pages,
        }
    }

    /// Page and slot holding the row at logical index `row`.
    pub const fn locate(row: usize) -> (usize, usize) {
        (row / ROWS_PER_PAGE, row % ROWS_PER_PAGE)
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of pages allocated so far.
    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, page_index: usize) -> Option<&Page> {
        self.pages.get(page_index)
    }

    /// Returns the page at `page_index`, allocating it (and any page before
    /// it) if it does not exist yet.
    ///
    /// The limit is checked before anything is allocated, so a failed call
    /// leaves the store untouched.
    pub fn get_or_allocate_page(&mut self, page_index: usize) -> Result<&mut Page, StorageError> {
        if page_index >= self.max_pages {
            return Err(StorageError::TableFull {
                page: page_index,
                max_pages: self.max_pages,
            });
        }

        while self.pages.len() <= page_index {
            debug!(page = self.pages.len(), "allocating page");
            self.pages.push(Page::new());
        }

        Ok(&mut self.pages[page_index])
    }

    pub fn read_slot(
        &self,
        page_index: usize,
        slot_index: usize,
    ) -> Result<&RecordBlock, StorageError> {
        let page = self
            .pages
            .get(page_index)
            .ok_or(StorageError::PageNotAllocated(page_index))?;

        page.slot(slot_index).ok_or(StorageError::SlotOutOfRange {
            slot: slot_index,
            rows_per_page: ROWS_PER_PAGE,
        })
    }

    pub fn write_slot(
        &mut self,
        page_index: usize,
        slot_index: usize,
        block: &RecordBlock,
    ) -> Result<(), StorageError> {
        let out_of_range = StorageError::SlotOutOfRange {
            slot: slot_index,
            rows_per_page: ROWS_PER_PAGE,
        };
        // don't allocate a page for a write that cannot land in it
        if slot_index >= ROWS_PER_PAGE {
            return Err(out_of_range);
        }

        let slot = self
            .get_or_allocate_page(page_index)?
            .slot_mut(slot_index)
            .ok_or(out_of_range)?;
        *slot = *block;

        trace!(page = page_index, slot = slot_index, "wrote slot");
        Ok(())
    }
}

use hashbrown::HashMap;

use crate::error::IndexError;

/// Cells covered by the half-open range `[min, max)`: `min` rounded down to a
/// multiple of `block`, then every `block` pixels while below `max`.
pub fn cell_span(min: i32, max: i32, block: i32) -> impl Iterator<Item = i32> {
    let block = block.max(1);
    let start = min.div_euclid(block) * block;
    (start..max).step_by(block as usize)
}

/// Entities of each materialized column, keyed by cell x. A cell's list is
/// inserted and removed as a whole.
#[derive(Debug)]
pub struct CellIndex<T> {
    cells: HashMap<i32, Vec<T>>,
}

impl<T> Default for CellIndex<T> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }
}

impl<T> CellIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, cell: i32, items: Vec<T>) -> Result<(), IndexError> {
        if self.cells.contains_key(&cell) {
            return Err(IndexError::AlreadyPresent(cell));
        }
        self.cells.insert(cell, items);
        Ok(())
    }

    pub fn remove(&mut self, cell: i32) -> Result<Vec<T>, IndexError> {
        self.cells.remove(&cell).ok_or(IndexError::NotFound(cell))
    }

    #[inline]
    pub fn contains(&self, cell: i32) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn get(&self, cell: i32) -> Option<&[T]> {
        self.cells.get(&cell).map(|v| v.as_slice())
    }

    /// Live cells in ascending order.
    pub fn cells(&self) -> Vec<i32> {
        let mut keys: Vec<i32> = self.cells.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total entities across all cells.
    pub fn entity_count(&self) -> usize {
        self.cells.values().map(|v| v.len()).sum()
    }
}

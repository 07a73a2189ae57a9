use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::PropertyBag;

/// Heap-backed property bag, for hosts that hand over already-parsed
/// device-tree properties
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    cells: HashMap<String, Vec<u32>>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single-cell property
    pub fn insert_u32(&mut self, name: &str, value: u32) -> &mut Self {
        self.cells.insert(name.to_string(), alloc::vec![value]);
        self
    }

    /// Sets a multi-cell property
    pub fn insert_u32_array(&mut self, name: &str, values: &[u32]) -> &mut Self {
        self.cells.insert(name.to_string(), values.to_vec());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u32>> {
        self.cells.remove(name)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl PropertyBag for PropertyMap {
    fn read_u32(&self, name: &str) -> Option<u32> {
        self.cells.get(name).and_then(|cells| cells.first().copied())
    }

    fn count_u32(&self, name: &str) -> Option<usize> {
        self.cells.get(name).map(Vec::len)
    }

    fn read_u32_index(&self, name: &str, index: usize) -> Option<u32> {
        self.cells.get(name).and_then(|cells| cells.get(index).copied())
    }
}

//! Sorted, duplicate-free set of stored image ids.
//!
//! The controller addresses images by position ("the third picture") while the
//! photo store addresses them by id. [`ImageIndex`] keeps the ids in ascending
//! order so both views stay consistent, and so the next id to allocate is always
//! one past the last element.

/// Ascending set of image ids with positional access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    ids: Vec<u32>,
}

impl ImageIndex {
    /// Builds an index from ids in any order; duplicates are collapsed.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<u32> {
        self.ids.get(position).copied()
    }

    /// Largest stored id.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.ids.last().copied()
    }

    /// Position of `id`, if stored.
    #[must_use]
    pub fn position(&self, id: u32) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.position(id).is_some()
    }

    /// Id the next capture should use: one past the largest id, or 0.
    ///
    /// Returns `None` once `u32::MAX` is taken.
    #[must_use]
    pub fn next_id(&self) -> Option<u32> {
        self.last().map_or(Some(0), |id| id.checked_add(1))
    }

    /// Inserts `id` keeping the order; returns its position.
    ///
    /// Inserting an id that is already present leaves the index unchanged.
    pub fn insert(&mut self, id: u32) -> usize {
        match self.ids.binary_search(&id) {
            Ok(position) => position,
            Err(position) => {
                self.ids.insert(position, id);
                position
            }
        }
    }

    /// Removes `id`; returns the position it occupied.
    pub fn remove(&mut self, id: u32) -> Option<usize> {
        let position = self.position(id)?;
        self.ids.remove(position);
        Some(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_dedups() {
        let index = ImageIndex::new([3, 1, 3, 0]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_next_id_skips_gaps() {
        assert_eq!(ImageIndex::new([0, 1, 3]).next_id(), Some(4));
        assert_eq!(ImageIndex::default().next_id(), Some(0));
    }

    #[test]
    fn test_next_id_exhausted() {
        assert_eq!(ImageIndex::new([u32::MAX - 1]).next_id(), Some(u32::MAX));
        assert_eq!(ImageIndex::new([3, u32::MAX]).next_id(), None);
    }

    #[test]
    fn test_insert_and_remove_positions() {
        let mut index = ImageIndex::new([2, 8]);
        assert_eq!(index.insert(5), 1);
        assert_eq!(index.insert(5), 1);
        assert_eq!(index.len(), 3);
        assert_eq!(index.remove(2), Some(0));
        assert_eq!(index.remove(2), None);
        assert_eq!(index.get(0), Some(5));
    }
}

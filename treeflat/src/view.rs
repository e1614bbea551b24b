//! The list contract a virtualized control binds to.

use crate::error::FlattenError;
use crate::flattener::TreeFlattener;
use crate::node::ListNode;

/// Read/write list interface expected by list controls.
///
/// Read-only implementors answer every write with
/// [`FlattenError::Unsupported`] and report [`is_read_only`](Self::is_read_only).
pub trait ListView<T> {
    /// Number of items.
    fn len(&self) -> usize;

    /// Check if the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`.
    fn get(&self, index: usize) -> Result<T, FlattenError>;

    /// Index of `item`, if present.
    fn index_of(&self, item: &T) -> Option<usize>;

    /// Check if `item` is present.
    fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Copy every item into `buf`, starting at `offset`.
    fn copy_to(&self, buf: &mut [T], offset: usize) -> Result<(), FlattenError>;

    /// Whether the write methods are rejected.
    fn is_read_only(&self) -> bool;

    // =========================================================================
    // Writes
    // =========================================================================

    /// Replace the item at `index`.
    fn set(&mut self, index: usize, item: T) -> Result<(), FlattenError>;

    /// Insert `item` at `index`.
    fn insert(&mut self, index: usize, item: T) -> Result<(), FlattenError>;

    /// Remove the item at `index`.
    fn remove_at(&mut self, index: usize) -> Result<(), FlattenError>;

    /// Append `item`.
    fn push(&mut self, item: T) -> Result<(), FlattenError>;

    /// Remove every item.
    fn clear(&mut self) -> Result<(), FlattenError>;

    /// Remove the first occurrence of `item`. Returns whether it was found.
    fn remove(&mut self, item: &T) -> Result<bool, FlattenError>;
}

impl<N: ListNode> ListView<N> for TreeFlattener<N> {
    fn len(&self) -> usize {
        TreeFlattener::len(self)
    }

    fn get(&self, index: usize) -> Result<N, FlattenError> {
        TreeFlattener::get(self, index)
    }

    fn index_of(&self, item: &N) -> Option<usize> {
        TreeFlattener::index_of(self, item)
    }

    fn copy_to(&self, buf: &mut [N], offset: usize) -> Result<(), FlattenError> {
        TreeFlattener::copy_to(self, buf, offset)
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn set(&mut self, _index: usize, _item: N) -> Result<(), FlattenError> {
        Err(FlattenError::Unsupported("set"))
    }

    fn insert(&mut self, _index: usize, _item: N) -> Result<(), FlattenError> {
        Err(FlattenError::Unsupported("insert"))
    }

    fn remove_at(&mut self, _index: usize) -> Result<(), FlattenError> {
        Err(FlattenError::Unsupported("remove_at"))
    }

    fn push(&mut self, _item: N) -> Result<(), FlattenError> {
        Err(FlattenError::Unsupported("push"))
    }

    fn clear(&mut self) -> Result<(), FlattenError> {
        Err(FlattenError::Unsupported("clear"))
    }

    fn remove(&mut self, _item: &N) -> Result<bool, FlattenError> {
        Err(FlattenError::Unsupported("remove"))
    }
}

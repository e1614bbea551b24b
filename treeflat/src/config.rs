//! Flattener configuration.

/// Per-instance configuration for a [`TreeFlattener`](crate::TreeFlattener).
///
/// Fixed at construction; a flattener never changes its root mode.
#[derive(Debug, Clone)]
pub struct FlattenerConfig {
    /// Display name used in log output.
    pub name: &'static str,

    /// Whether the root node occupies flat position 0.
    /// When false the root is hidden and every position shifts down by one.
    pub include_root: bool,
}

impl Default for FlattenerConfig {
    fn default() -> Self {
        Self {
            name: "flattener",
            include_root: false,
        }
    }
}

impl FlattenerConfig {
    /// Create a new config with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Set whether the root is part of the flat view.
    pub fn include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    /// Show the root at flat position 0.
    pub fn show_root(self) -> Self {
        self.include_root(true)
    }

    /// Hide the root.
    pub fn hide_root(self) -> Self {
        self.include_root(false)
    }

    /// Offset between tree-relative and flat-relative positions.
    pub(crate) fn root_offset(&self) -> usize {
        if self.include_root { 0 } else { 1 }
    }
}

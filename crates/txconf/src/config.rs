//! Parser limits

/// Configuration for the token stream and parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_size: 1024 * 1024, // 1 MiB, subsystem documents are small
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    pub(crate) fn depth_exceeded(&self, depth: usize) -> bool {
        self.max_depth != 0 && depth > usize::from(self.max_depth)
    }

    pub(crate) const fn size_exceeded(&self, size: usize) -> bool {
        self.max_size != 0 && size > self.max_size
    }
}

//! Runtime configuration
//!
//! Tunables for container sizing and for the limits the value codec enforces on
//! untrusted input.

/// Configuration for container construction and value decoding
///
/// # Examples
///
/// ```rust
/// use asval::{HashTable, RuntimeConfig};
///
/// let config = RuntimeConfig::default();
/// let table = HashTable::with_config(&config)?;
/// assert_eq!(table.bucket_count(), config.default_capacity);
/// # Ok::<(), asval::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bucket count used by [`crate::HashTable::with_config`] (default: 32)
    pub default_capacity: usize,

    /// Maximum container nesting depth accepted by the codec (default: 64)
    pub max_nesting_depth: usize,

    /// Upper bound on elements reserved up front for a decoded container (default: 4096).
    /// Lengths claimed by the input beyond this grow incrementally instead
    pub max_preallocation: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_capacity: 32,
            max_nesting_depth: 64,
            max_preallocation: 4096,
        }
    }
}

impl RuntimeConfig {
    /// Creates a configuration for decoding input from untrusted peers
    ///
    /// Keeps nesting shallow and up-front reservations small.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            default_capacity: 32,
            max_nesting_depth: 16,
            max_preallocation: 256,
        }
    }

    /// Creates a configuration that trusts the input shape
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            default_capacity: 128,
            max_nesting_depth: 512,
            max_preallocation: 1 << 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_presets() {
        let default = RuntimeConfig::default();
        assert_eq!(default.default_capacity, 32);
        assert_eq!(default.max_nesting_depth, 64);
        assert_eq!(default.max_preallocation, 4096);

        let strict = RuntimeConfig::strict();
        assert!(strict.max_nesting_depth < default.max_nesting_depth);
        assert!(strict.max_preallocation < default.max_preallocation);

        let permissive = RuntimeConfig::permissive();
        assert!(permissive.max_nesting_depth > default.max_nesting_depth);
        assert!(permissive.default_capacity > default.default_capacity);
    }
}

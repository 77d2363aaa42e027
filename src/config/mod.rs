//! Configuration for pipeline behavior.
//!
//! - [`PipeConfig`] - Read block size and optional read limit of a [`Processor`](crate::Processor)
//!
//! # Example
//!
//! ```
//! use segpipe::PipeConfig;
//!
//! // Custom block size
//! let config = PipeConfig::new(4096)?;
//!
//! // Stop after the first megabyte
//! let config = PipeConfig::default().with_read_limit(1024 * 1024);
//!
//! # Ok::<(), segpipe::PipeError>(())
//! ```

use crate::error::PipeError;

/// Default number of units pulled from a source per iteration (8 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 8 * 1024;

/// Default capacity of each working buffer inside a codec reader.
pub const DEFAULT_CODER_CAPACITY: usize = 64;

/// Smallest codec buffer that can hold one UTF-8 encoded scalar value.
pub const MIN_CODER_CAPACITY: usize = 4;

/// Configuration of the read side of a [`Processor`](crate::Processor).
///
/// - `block_size` - Units requested from the source per iteration (non-zero)
/// - `read_limit` - Total units to read before forcing end-of-stream
///
/// # Example
///
/// ```
/// use segpipe::PipeConfig;
///
/// let config = PipeConfig::default()
///     .with_block_size(512)
///     .with_read_limit(10_000);
///
/// assert_eq!(config.block_size(), 512);
/// assert_eq!(config.read_limit(), Some(10_000));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipeConfig {
    /// Units requested per read.
    block_size: usize,

    /// Units to read in total, unbounded if `None`.
    read_limit: Option<u64>,
}

impl PipeConfig {
    /// Creates a new configuration with the given read block size.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] if `block_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use segpipe::PipeConfig;
    ///
    /// let config = PipeConfig::new(2)?;
    /// assert_eq!(config.block_size(), 2);
    /// assert!(PipeConfig::new(0).is_err());
    /// # Ok::<(), segpipe::PipeError>(())
    /// ```
    pub fn new(block_size: usize) -> Result<Self, PipeError> {
        if block_size == 0 {
            return Err(PipeError::InvalidConfig {
                message: "block size must be non-zero",
            });
        }

        Ok(Self {
            block_size,
            read_limit: None,
        })
    }

    /// Sets the read block size.
    ///
    /// Note: This does not validate the configuration. Use [`PipeConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Caps the number of units read from the source.
    pub fn with_read_limit(mut self, limit: u64) -> Self {
        self.read_limit = Some(limit);
        self
    }

    /// Removes any read limit.
    pub fn unbounded(mut self) -> Self {
        self.read_limit = None;
        self
    }

    /// Returns the read block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the read limit, if any.
    pub fn read_limit(&self) -> Option<u64> {
        self.read_limit
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use segpipe::PipeConfig;
    ///
    /// let config = PipeConfig::default().with_block_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PipeError> {
        Self::new(self.block_size).map(|_| ())
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            read_limit: None,
        }
    }
}

/// Checks a codec buffer capacity.
pub(crate) fn validate_coder_capacity(capacity: usize) -> Result<(), PipeError> {
    if capacity < MIN_CODER_CAPACITY {
        return Err(PipeError::InvalidConfig {
            message: "codec buffer capacity must be at least 4 units",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipeConfig::default();
        assert_eq!(config.block_size(), DEFAULT_BLOCK_SIZE);
        assert_eq!(config.read_limit(), None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipeConfig::default()
            .with_block_size(16)
            .with_read_limit(100);

        assert_eq!(config.block_size(), 16);
        assert_eq!(config.read_limit(), Some(100));
        assert_eq!(config.unbounded().read_limit(), None);
    }

    #[test]
    fn test_invalid_config_zero_block() {
        assert!(PipeConfig::new(0).is_err());
        assert!(PipeConfig::default().with_block_size(0).validate().is_err());
    }

    #[test]
    fn test_zero_read_limit_is_valid() {
        let config = PipeConfig::default().with_read_limit(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_coder_capacity() {
        assert!(validate_coder_capacity(3).is_err());
        assert!(validate_coder_capacity(MIN_CODER_CAPACITY).is_ok());
        assert!(validate_coder_capacity(DEFAULT_CODER_CAPACITY).is_ok());
    }
}

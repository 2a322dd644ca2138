/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Framer configuration.

/// Begin-string prefix used to recognize plausible message starts.
///
/// A bare `8=` would also match inside garbage (`8=!@#$%`); anchoring on the
/// protocol family literal keeps resynchronization from latching onto false
/// starts.
pub const DEFAULT_BEGIN_STRING_PREFIX: &str = "8=FIX";

/// Default maximum framed message size in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Configuration for a [`Framer`](crate::Framer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramerConfig {
    /// Maximum total message span in bytes; declared lengths that would
    /// frame more are treated as corrupt.
    pub max_message_size: usize,
    /// Whether to validate the checksum value arithmetically in addition to
    /// the structural trailer check.
    pub validate_checksum: bool,
    /// Literal the resynchronizer searches for as a plausible message start.
    pub begin_string_prefix: String,
}

impl FramerConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            validate_checksum: false,
            begin_string_prefix: DEFAULT_BEGIN_STRING_PREFIX.to_string(),
        }
    }

    /// Sets the maximum message size.
    #[must_use]
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Sets whether to validate checksum values arithmetically.
    #[must_use]
    pub fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Sets the begin-string prefix used for candidate matching.
    ///
    /// # Arguments
    /// * `prefix` - Literal bytes a message start must carry (e.g. `8=FIXT`)
    #[must_use]
    pub fn with_begin_string_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.begin_string_prefix = prefix.into();
        self
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FramerConfig::new();
        assert_eq!(config.max_message_size, DEFAULT_MAX_MESSAGE_SIZE);
        assert!(!config.validate_checksum);
        assert_eq!(config.begin_string_prefix, "8=FIX");
    }

    #[test]
    fn test_builder() {
        let config = FramerConfig::new()
            .with_max_message_size(4096)
            .with_checksum_validation(true)
            .with_begin_string_prefix("8=FIXT");
        assert_eq!(config.max_message_size, 4096);
        assert!(config.validate_checksum);
        assert_eq!(config.begin_string_prefix, "8=FIXT");
    }
}

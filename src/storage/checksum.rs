//! Block integrity checksums.
//!
//! Every persisted block carries a CRC32 checksum computed over its
//! serialized payload, checked on read so truncated or corrupted block
//! files surface as `SpindexError::Corruption` rather than bad query
//! results.

use crc32fast::Hasher;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumType {
    Crc32,
    /// No verification. Used when `IndexConfig::checksum` is disabled.
    None,
}

impl Default for ChecksumType {
    fn default() -> Self {
        Self::Crc32
    }
}

pub struct Checksum;

impl Checksum {
    pub fn compute(checksum_type: ChecksumType, data: &[u8]) -> u32 {
        match checksum_type {
            ChecksumType::Crc32 => {
                let mut hasher = Hasher::new();
                hasher.update(data);
                hasher.finalize()
            }
            ChecksumType::None => 0,
        }
    }

    pub fn verify(
        checksum_type: ChecksumType,
        data: &[u8],
        expected: u32,
    ) -> Result<(), ChecksumError> {
        if checksum_type == ChecksumType::None {
            return Ok(());
        }

        let actual = Self::compute(checksum_type, data);
        if actual != expected {
            return Err(ChecksumError::Mismatch {
                expected,
                actual,
                data_len: data.len(),
            });
        }

        Ok(())
    }

    pub fn builder(checksum_type: ChecksumType) -> ChecksumBuilder {
        ChecksumBuilder::new(checksum_type)
    }
}

/// Incremental checksum builder for streaming writes.
pub struct ChecksumBuilder {
    hasher: Option<Hasher>,
}

impl ChecksumBuilder {
    pub fn new(checksum_type: ChecksumType) -> Self {
        let hasher = match checksum_type {
            ChecksumType::Crc32 => Some(Hasher::new()),
            ChecksumType::None => None,
        };
        Self { hasher }
    }

    pub fn update(&mut self, data: &[u8]) {
        if let Some(hasher) = &mut self.hasher {
            hasher.update(data);
        }
    }

    pub fn finalize(self) -> u32 {
        match self.hasher {
            Some(hasher) => hasher.finalize(),
            None => 0,
        }
    }
}

impl Write for ChecksumBuilder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x} (data_len={data_len})")]
    Mismatch {
        expected: u32,
        actual: u32,
        data_len: usize,
    },

    #[error("invalid checksum format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_roundtrip() {
        let data = b"spindex block payload";
        let checksum = Checksum::compute(ChecksumType::Crc32, data);
        assert!(Checksum::verify(ChecksumType::Crc32, data, checksum).is_ok());
        assert!(Checksum::verify(ChecksumType::Crc32, data, checksum + 1).is_err());
    }

    #[test]
    fn none_always_verifies() {
        let data = b"unchecked";
        assert_eq!(Checksum::compute(ChecksumType::None, data), 0);
        assert!(Checksum::verify(ChecksumType::None, data, 12345).is_ok());
    }

    #[test]
    fn builder_matches_one_shot() {
        let mut builder = Checksum::builder(ChecksumType::Crc32);
        builder.update(b"hello, ");
        builder.update(b"spindex");
        let incremental = builder.finalize();
        let one_shot = Checksum::compute(ChecksumType::Crc32, b"hello, spindex");
        assert_eq!(incremental, one_shot);
    }
}

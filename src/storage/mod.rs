//! Low-level storage helpers shared by the block layer.

pub mod checksum;

pub use checksum::{Checksum, ChecksumError, ChecksumType};

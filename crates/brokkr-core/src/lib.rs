//! Core library for Brokkr - TYPO3 upgrade path planning
//!
//! Provides:
//! - The shared data model (releases, system facts, hops, steps)
//! - `PlatformVersion` ordering for TYPO3 `major.minor[.patch]` versions
//! - The error taxonomy shared by all Brokkr crates

pub mod error;
pub mod types;
pub mod version;

pub use error::{Error, Result};
pub use version::PlatformVersion;

//! Release catalog for Brokkr
//!
//! Provides:
//! - The bundled baseline release table (embedded at build time)
//! - An in-memory catalog with atomic wholesale replacement
//! - Upstream refresh with silent fallback to the current table
//! - Extension key to Composer package resolution with memoization

pub mod baseline;
pub mod catalog;
pub mod packages;
pub mod refresh;

pub use baseline::baseline_releases;
pub use catalog::{dedup_releases, is_known_lts_line, ReleaseCatalog, KNOWN_LTS_MINORS};
pub use packages::{PackageLookup, PackageResolver};
pub use refresh::{CatalogRefresher, DEFAULT_CATALOG_URL};

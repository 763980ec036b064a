//! Project introspection for Brokkr
//!
//! Recovers a normalized `SystemFacts` record from an uploaded project
//! archive, a local directory, or a structured key/value export:
//! platform and PHP versions, installation mode, extension inventory,
//! and database facts. Everything here is read-only over its input;
//! missing optional facts degrade silently instead of failing.

pub mod classify;
pub mod compat;
pub mod database;
pub mod document;
pub mod extract;
pub mod manifest;
pub mod scan;
pub mod source;

pub use classify::{classify, ClassifyContext, CORE_EXTENSION_KEYS};
pub use compat::{apply_probe, CompatibilityProbe, ConstraintProbe, UnknownCompatibility};
pub use database::{EstimateProvider, HeuristicEstimates};
pub use extract::Extractor;
pub use source::{DirProject, InMemoryProject, ProjectSource, TarGzProject};

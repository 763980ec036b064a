//! Type definitions for the Brokkr data model

mod facts_types;
mod plan_types;
mod release_types;

pub use facts_types::*;
pub use plan_types::*;
pub use release_types::*;

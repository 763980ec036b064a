//! Command implementations

pub mod inspect;
pub mod plan;
pub mod releases;

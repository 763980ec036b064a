//! Upgrade path planning for Brokkr
//!
//! Three collaborating pieces: the [`Planner`] turns a (from, to) pair
//! into an ordered hop chain routed through LTS lines, the
//! [`StepGenerator`] attaches mode-specific remediation steps to each
//! hop, and the [`CommandComposer`] renders the literal
//! `composer require` command a hop needs.

pub mod compose;
pub mod plan;
pub mod steps;

pub use compose::CommandComposer;
pub use plan::Planner;
pub use steps::StepGenerator;

//! Application-level configuration.
//!
//! - [`CouncilPolicy`]: call budgets, backup pools, title model, language

pub mod council_policy;

pub use council_policy::CouncilPolicy;

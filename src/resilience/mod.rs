//! # Resilience Primitives
//!
//! Health-tracking scaffolding for the inventory plugin. The stop policy is
//! constructed with the plugin and tracks consecutive errors against a
//! threshold; the collection flow does not yet consult it.

pub mod stop_policy;

pub use stop_policy::StopPolicy;

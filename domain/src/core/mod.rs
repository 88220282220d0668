//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: opaque identifier of a competitor or chairman model
//! - [`question::Question`]: a validated question to pose to the council
//! - [`error::DomainError`]: domain-level validation errors

pub mod error;
pub mod model;
pub mod question;

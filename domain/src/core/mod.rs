//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`]: a validated debate topic
//! - [`error::DomainError`]: input validation errors
//! - [`string`]: UTF-8 safe text helpers

pub mod error;
pub mod string;
pub mod topic;

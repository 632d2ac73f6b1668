//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - setup-time errors
//! - [`string::truncate`] - UTF-8 safe truncation for previews and log lines

pub mod error;
pub mod string;

//! Command-line runner for Wycheproof RSA signature vector files.

pub mod config;
pub mod error;
pub mod run;

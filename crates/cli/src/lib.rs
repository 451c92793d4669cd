//! # CLI
//!
//! Command line front-end and call-data helpers built on [`protocol`].

pub mod calldata;
pub mod commands;

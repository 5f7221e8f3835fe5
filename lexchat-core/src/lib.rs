//! Core types for lexchat
//!
//! This crate provides the conversation data model, the session catalog,
//! configuration loading and logging setup shared by the other lexchat
//! crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};

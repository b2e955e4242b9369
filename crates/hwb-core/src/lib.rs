//! Core domain + application logic for the homework status bot.
//!
//! This crate is framework-agnostic. The review API client and the Telegram
//! bot live behind ports (traits) implemented in adapter crates.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod poll;
pub mod ports;

pub use errors::{Error, Result};

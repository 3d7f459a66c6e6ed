//! # beewatch
//!
//! Batch program behind the monthly hive charts: picks the newest sensor
//! export, splits its records into three day windows and renders the six
//! fixed-name charts. Meant to be started by an external scheduler.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod error;
pub mod pipeline;

pub use cli::{load_config, Args};
pub use error::*;
pub use pipeline::{resolve_month, run, run_with_renderer, MonthSource, RunReport};

//! # beewatch common
//!
//! Shared types, sensor export ingest, input selection and logging setup
//! used by every crate in the beewatch workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod selector;
pub mod sensor;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{BeeError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use selector::{find_latest_input, month_from_file_name, select_latest, InputPattern};
pub use sensor::{load_sensor_csv, read_sensor_csv, RowError, SensorExport, SensorRecord};
pub use types::YearMonth;

pub mod controller;
pub mod error;
pub mod state;
pub mod traits;
pub mod types;

pub use controller::{ThresholdController, WriteOutcome};
pub use error::{ConfigError, DeviceError, ExecutionError, ThresholdError};
pub use state::{CachedThreshold, Reading, ThresholdState};
pub use traits::{ElevatedWriter, ThresholdReader};
pub use types::*;

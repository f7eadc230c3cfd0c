pub mod catalog;
pub mod telemetry;

pub use catalog::CropRegistry;
pub use telemetry::TelemetryStore;

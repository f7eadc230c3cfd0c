pub mod carbon;
pub mod crop_profile;
pub mod evaluation;
pub mod recommendation;
pub mod report;
pub mod telemetry;

pub use carbon::*;
pub use crop_profile::*;
pub use evaluation::*;
pub use recommendation::*;
pub use report::*;
pub use telemetry::*;

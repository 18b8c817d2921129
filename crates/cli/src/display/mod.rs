pub mod command_breakdown;
pub mod formatter;

pub use command_breakdown::{breakdown, print_command_breakdown};
pub use formatter::{TargetSummary, print_target};

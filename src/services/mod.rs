//! Service implementations for VWS operations.

mod query;
mod targets;

pub use query::QueryService;
pub use targets::{PollPolicy, TargetsService};

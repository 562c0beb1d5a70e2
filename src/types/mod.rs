//! Request and response types for VWS operations.

mod common;
mod requests;
mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;

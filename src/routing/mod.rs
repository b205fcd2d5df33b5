//! Routing module
//!
//! Resolves method + path to a hero endpoint:
//! - Segment-wise pattern matching with a single `{param}` capture
//! - 405 detection when the path exists under another method

mod matcher;
mod table;

pub use table::{resolve, Endpoint, RouteOutcome};

//! API request handlers.

mod query;
mod status;
mod tables;
mod upload;

pub use query::*;
pub use status::*;
pub use tables::*;
pub use upload::*;

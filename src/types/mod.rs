//! Shared request and response types.

mod response;
pub mod trim;

pub use response::{Created, MessageResponse};

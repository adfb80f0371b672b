pub mod args;
pub mod client;
pub mod error;

pub use client::{run, RESPONSE_LIMIT};
pub use error::SendError;

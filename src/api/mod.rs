//! Registration backend client.

pub mod client;
pub mod types;

pub use client::{HttpRegistrationApi, RegistrationApi};
pub use types::ApiMessage;

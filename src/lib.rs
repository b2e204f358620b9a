//! Guest Registration — multi-step sign-up flow with OTP verification.

pub mod api;
pub mod cli;
pub mod config;
pub mod countries;
pub mod error;
pub mod navigation;
pub mod notify;
pub mod otp;
pub mod phone;
pub mod registration;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

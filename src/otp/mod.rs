//! One-time code steps: choosing a delivery method, then entering and
//! verifying the code.

pub mod code;
pub mod confirm;
pub mod method;
pub mod send;

pub use code::{OTP_LENGTH, OtpCode, OtpDigitInput, is_complete};
pub use confirm::{ConfirmActivity, ConfirmOutcome, OtpConfirmController};
pub use method::OtpMethod;
pub use send::{OtpSendController, SendOutcome, SendState};

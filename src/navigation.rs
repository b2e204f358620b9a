//! Steps of the flow and the navigator that moves between them.

use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// The pages of the registration flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Personal info and contact details.
    Register,
    /// Choose how to receive the code.
    OtpMethod,
    /// Enter the code.
    OtpConfirm,
}

impl Step {
    /// Route path of the step.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::OtpMethod => "/register/otp-method",
            Self::OtpConfirm => "/register/otp-confirm",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::OtpMethod => "otp_method",
            Self::OtpConfirm => "otp_confirm",
        };
        write!(f, "{s}")
    }
}

/// Moves the user to another step.
pub trait Navigator: Send + Sync {
    fn navigate(&self, step: Step) -> Result<(), NavigationError>;
}

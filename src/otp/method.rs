//! OTP delivery method.

use serde::{Deserialize, Serialize};

/// Channel a one-time code is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpMethod {
    Email,
    Phone,
}

impl Default for OtpMethod {
    fn default() -> Self {
        Self::Email
    }
}

impl OtpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Parse the stored/wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl std::fmt::Display for OtpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

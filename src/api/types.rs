//! Request and response bodies for the registration backend.

use serde::{Deserialize, Serialize};

use crate::otp::OtpMethod;

#[derive(Debug, Clone, Serialize)]
pub struct SendEmailCodeRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendPhoneCodeRequest<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendCodeRequest {
    pub method: OtpMethod,
}

/// Verify-and-register body: the code and method, with the stored
/// registration fields spread alongside.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    pub code: &'a str,
    pub method: OtpMethod,
    #[serde(flatten)]
    pub registration: &'a serde_json::Map<String, serde_json::Value>,
}

/// Common success body. Only `msg` is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub msg: Option<String>,
}

impl ApiMessage {
    /// The server message, or `fallback` when absent or blank.
    pub fn message_or(&self, fallback: impl Into<String>) -> String {
        match self.msg.as_deref().map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => fallback.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_spreads_registration_fields() {
        let registration = serde_json::json!({
            "firstName": "Omar",
            "email": "omar@example.com",
            "acceptTerms": true
        });
        let body = VerifyRequest {
            code: "1234",
            method: OtpMethod::Phone,
            registration: registration.as_object().unwrap(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "1234");
        assert_eq!(json["method"], "phone");
        assert_eq!(json["firstName"], "Omar");
        assert_eq!(json["acceptTerms"], true);
    }

    #[test]
    fn message_fallback() {
        let with_msg: ApiMessage = serde_json::from_str(r#"{"msg": "Code sent"}"#).unwrap();
        assert_eq!(with_msg.message_or("fallback"), "Code sent");

        let without: ApiMessage = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert_eq!(without.message_or("fallback"), "fallback");

        let blank: ApiMessage = serde_json::from_str(r#"{"msg": "  "}"#).unwrap();
        assert_eq!(blank.message_or("fallback"), "fallback");
    }
}

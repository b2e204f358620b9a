//! `RegistrationApi` trait and its reqwest-backed implementation.

use async_trait::async_trait;
use serde::Serialize;

use super::types::{
    ApiMessage, ResendCodeRequest, SendEmailCodeRequest, SendPhoneCodeRequest, VerifyRequest,
};
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::otp::OtpMethod;

pub const SEND_EMAIL_CODE_PATH: &str = "/send-otp-email";
pub const SEND_PHONE_CODE_PATH: &str = "/send-otp-phone";
pub const REGISTER_PATH: &str = "/register";
pub const RESEND_CODE_PATH: &str = "/resend-otp";

/// Backend calls made by the OTP steps.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Send a code to an email address.
    async fn send_email_code(&self, email: &str) -> Result<ApiMessage, ApiError>;

    /// Send a code to a phone number.
    async fn send_phone_code(&self, phone: &str) -> Result<ApiMessage, ApiError>;

    /// Verify the code and complete registration with the stored fields.
    async fn verify(
        &self,
        code: &str,
        method: OtpMethod,
        registration: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ApiMessage, ApiError>;

    /// Ask for a fresh code over the same method.
    async fn resend_code(&self, method: OtpMethod) -> Result<ApiMessage, ApiError>;
}

/// HTTP client for the registration backend. JSON in, JSON out.
pub struct HttpRegistrationApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRegistrationApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from config, applying the request timeout if set.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiMessage, ApiError> {
        tracing::debug!(path, "POST");
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Backend returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await.map_err(|e| ApiError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    async fn send_email_code(&self, email: &str) -> Result<ApiMessage, ApiError> {
        self.post(SEND_EMAIL_CODE_PATH, &SendEmailCodeRequest { email })
            .await
    }

    async fn send_phone_code(&self, phone: &str) -> Result<ApiMessage, ApiError> {
        self.post(SEND_PHONE_CODE_PATH, &SendPhoneCodeRequest { phone })
            .await
    }

    async fn verify(
        &self,
        code: &str,
        method: OtpMethod,
        registration: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ApiMessage, ApiError> {
        let body = VerifyRequest {
            code,
            method,
            registration,
        };
        self.post(REGISTER_PATH, &body).await
    }

    async fn resend_code(&self, method: OtpMethod) -> Result<ApiMessage, ApiError> {
        self.post(RESEND_CODE_PATH, &ResendCodeRequest { method })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpRegistrationApi::new("http://localhost:3001/");
        assert_eq!(api.url(REGISTER_PATH), "http://localhost:3001/register");
    }

    #[test]
    fn from_config_uses_api_url() {
        let config = ClientConfig {
            api_url: "https://reg.example.com".into(),
            request_timeout: Some(std::time::Duration::from_secs(5)),
            ..ClientConfig::default()
        };
        let api = HttpRegistrationApi::from_config(&config).unwrap();
        assert_eq!(api.url(RESEND_CODE_PATH), "https://reg.example.com/resend-otp");
    }
}

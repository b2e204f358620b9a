//! Recording collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiMessage, RegistrationApi};
use crate::error::{ApiError, NavigationError};
use crate::navigation::{Navigator, Step};
use crate::notify::{Notification, Notifier};
use crate::otp::OtpMethod;

/// Records every navigation; optionally refuses them all.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<Step>>,
    pub fail: bool,
}

impl RecordingNavigator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn visited(&self) -> Vec<Step> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, step: Step) -> Result<(), NavigationError> {
        if self.fail {
            return Err(NavigationError::Failed {
                step: step.to_string(),
                reason: "router unavailable".into(),
            });
        }
        self.visited.lock().unwrap().push(step);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    SendEmail(String),
    SendPhone(String),
    Verify {
        code: String,
        method: OtpMethod,
        registration: serde_json::Value,
    },
    Resend(OtpMethod),
}

/// Backend stub answering from a script of queued results. An empty script
/// answers with `{}`.
#[derive(Default)]
pub struct ScriptedApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub script: Mutex<VecDeque<Result<ApiMessage, ApiError>>>,
}

impl ScriptedApi {
    pub fn with(results: Vec<Result<ApiMessage, ApiError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(results.into()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: ApiCall) -> Result<ApiMessage, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiMessage::default()))
    }
}

pub fn ok(msg: &str) -> Result<ApiMessage, ApiError> {
    Ok(ApiMessage {
        msg: Some(msg.to_string()),
    })
}

pub fn status(code: u16) -> Result<ApiMessage, ApiError> {
    Err(ApiError::Status { status: code })
}

#[async_trait]
impl RegistrationApi for ScriptedApi {
    async fn send_email_code(&self, email: &str) -> Result<ApiMessage, ApiError> {
        self.answer(ApiCall::SendEmail(email.to_string()))
    }

    async fn send_phone_code(&self, phone: &str) -> Result<ApiMessage, ApiError> {
        self.answer(ApiCall::SendPhone(phone.to_string()))
    }

    async fn verify(
        &self,
        code: &str,
        method: OtpMethod,
        registration: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ApiMessage, ApiError> {
        self.answer(ApiCall::Verify {
            code: code.to_string(),
            method,
            registration: serde_json::Value::Object(registration.clone()),
        })
    }

    async fn resend_code(&self, method: OtpMethod) -> Result<ApiMessage, ApiError> {
        self.answer(ApiCall::Resend(method))
    }
}

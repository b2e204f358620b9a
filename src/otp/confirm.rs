//! OtpConfirmController — code entry, resend, and final verification.
//!
//! Resend and verify are mutually exclusive: while one is in flight the
//! other is refused without touching the network.

use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use crate::api::RegistrationApi;
use crate::notify::{Notification, Notifier};
use crate::registration::model::load_registration;
use crate::store::{KeyValueStore, keys};

use super::code::{OtpCode, OtpDigitInput};
use super::method::OtpMethod;

pub const RESEND_FAILED_MESSAGE: &str = "Failed to resend OTP. Please try again.";
pub const VERIFY_FAILED_MESSAGE: &str = "Invalid OTP. Please try again.";
const REGISTERED_MESSAGE: &str = "Registration completed successfully";

/// What the confirm step is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmActivity {
    #[default]
    Idle,
    Resending,
    Verifying,
}

/// Result of a resend or submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The code is not fully entered; nothing happened.
    Incomplete,
    /// Another action is in flight; nothing happened.
    Busy,
    /// The action succeeded with this message.
    Done(String),
    /// The action failed; an error notification was surfaced.
    Failed,
}

/// Resets the activity to idle when dropped.
struct ActivityGuard<'a> {
    activity: &'a Mutex<ConfirmActivity>,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut activity) = self.activity.lock() {
            *activity = ConfirmActivity::Idle;
        }
    }
}

/// Drives the confirmation step.
pub struct OtpConfirmController {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn RegistrationApi>,
    notifier: Arc<dyn Notifier>,
    method: OtpMethod,
    input: RwLock<OtpDigitInput>,
    activity: Mutex<ConfirmActivity>,
}

impl OtpConfirmController {
    /// Mount the step: read the method chosen on the previous step.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn RegistrationApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let method = load_method(store.as_ref()).await;
        Self {
            store,
            api,
            notifier,
            method,
            input: RwLock::new(OtpDigitInput::default()),
            activity: Mutex::new(ConfirmActivity::Idle),
        }
    }

    pub fn method(&self) -> OtpMethod {
        self.method
    }

    pub fn activity(&self) -> ConfirmActivity {
        self.activity
            .lock()
            .map(|a| *a)
            .unwrap_or(ConfirmActivity::Idle)
    }

    /// Current digit cells.
    pub async fn code(&self) -> OtpCode {
        self.input.read().await.value().clone()
    }

    /// Submit is enabled only for a complete code with nothing in flight.
    pub async fn can_submit(&self) -> bool {
        self.activity() == ConfirmActivity::Idle && self.input.read().await.is_complete()
    }

    /// Type into one cell.
    pub async fn input(&self, index: usize, value: &str) {
        self.input.write().await.input(index, value);
    }

    pub async fn backspace(&self, index: usize) {
        self.input.write().await.backspace(index);
    }

    /// Paste into one cell (honored on the first cell only).
    pub async fn paste(&self, index: usize, clipboard: &str) {
        self.input.write().await.paste(index, clipboard);
    }

    pub async fn focus(&self) -> Option<usize> {
        self.input.read().await.focus()
    }

    /// Request a fresh code. On failure the digits entered so far are kept.
    pub async fn resend(&self) -> ConfirmOutcome {
        let Some(_guard) = self.begin(ConfirmActivity::Resending) else {
            return ConfirmOutcome::Busy;
        };

        match self.api.resend_code(self.method).await {
            Ok(response) => {
                let message = response
                    .message_or(format!("OTP resent successfully to your {}", self.method));
                self.input.write().await.clear();
                tracing::info!(method = %self.method, "OTP resent");
                self.notifier.notify(Notification::Success(message.clone()));
                ConfirmOutcome::Done(message)
            }
            Err(e) => {
                tracing::error!(method = %self.method, error = %e, "Error resending OTP");
                self.notifier
                    .notify(Notification::Error(RESEND_FAILED_MESSAGE.to_string()));
                ConfirmOutcome::Failed
            }
        }
    }

    /// Verify the entered code and complete registration.
    pub async fn submit(&self) -> ConfirmOutcome {
        let code = {
            let input = self.input.read().await;
            if !input.is_complete() {
                return ConfirmOutcome::Incomplete;
            }
            input.code()
        };
        let Some(_guard) = self.begin(ConfirmActivity::Verifying) else {
            return ConfirmOutcome::Busy;
        };

        let mut registration = load_registration(self.store.as_ref())
            .await
            .and_then(|v| match v {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();
        // The verify body's own code and method take precedence.
        registration.remove("code");
        registration.remove("method");

        let outcome = match self.api.verify(&code, self.method, &registration).await {
            Ok(response) => {
                let message = response.message_or(REGISTERED_MESSAGE);
                tracing::info!(method = %self.method, "Registration verified");
                self.notifier.notify(Notification::Success(message.clone()));
                for key in [keys::OTP_METHOD, keys::REGISTRATION_DATA] {
                    if let Err(e) = self.store.delete(key).await {
                        tracing::warn!(key, error = %e, "Failed to clear persisted state");
                    }
                }
                ConfirmOutcome::Done(message)
            }
            Err(e) => {
                tracing::error!(method = %self.method, error = %e, "Error verifying OTP");
                self.notifier
                    .notify(Notification::Error(VERIFY_FAILED_MESSAGE.to_string()));
                ConfirmOutcome::Failed
            }
        };
        self.input.write().await.clear();
        outcome
    }

    /// Claim the activity slot, or `None` if something else holds it.
    fn begin(&self, next: ConfirmActivity) -> Option<ActivityGuard<'_>> {
        let mut activity = self.activity.lock().ok()?;
        if *activity != ConfirmActivity::Idle {
            tracing::debug!(current = ?*activity, requested = ?next, "Confirm action refused");
            return None;
        }
        *activity = next;
        Some(ActivityGuard {
            activity: &self.activity,
        })
    }
}

/// Read the persisted method. Absent values default to email; unrecognized
/// values are rejected and also default to email.
async fn load_method(store: &dyn KeyValueStore) -> OtpMethod {
    let raw = match store.get(keys::OTP_METHOD).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return OtpMethod::default(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read stored OTP method");
            return OtpMethod::default();
        }
    };
    // Accept both a JSON string and a bare value.
    let value = serde_json::from_str::<String>(&raw).unwrap_or(raw);
    OtpMethod::parse(&value).unwrap_or_else(|| {
        tracing::warn!(stored = %value, "Unrecognized OTP method in storage; using email");
        OtpMethod::default()
    })
}

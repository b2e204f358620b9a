//! OtpSendController — method selection and code delivery.

use std::sync::Arc;

use crate::api::RegistrationApi;
use crate::navigation::{Navigator, Step};
use crate::notify::{Notification, Notifier};
use crate::registration::model::{StoredContact, load_contact};
use crate::store::{KeyValueStore, keys};

use super::method::OtpMethod;

pub const SELECT_METHOD_MESSAGE: &str = "Please select a verification method";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send OTP. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

/// Result of pressing "next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// No method chosen; nothing was sent.
    MethodRequired,
    /// Code sent, method persisted, confirmation step reached.
    Sent { method: OtpMethod, message: String },
    /// Delivery failed; the local retry message is set.
    Failed,
}

/// Drives the delivery-method step.
pub struct OtpSendController {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn RegistrationApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    contact: StoredContact,
    method: Option<OtpMethod>,
    message: Option<String>,
    state: SendState,
}

impl OtpSendController {
    /// Mount the step: read contact details persisted by the previous step.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn RegistrationApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let contact = load_contact(store.as_ref()).await;
        Self {
            store,
            api,
            navigator,
            notifier,
            contact,
            method: None,
            message: None,
            state: SendState::Idle,
        }
    }

    pub fn contact(&self) -> &StoredContact {
        &self.contact
    }

    pub fn method(&self) -> Option<OtpMethod> {
        self.method
    }

    /// Local message shown under the options, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    /// Change the selection. Any local message is cleared.
    pub fn select_method(&mut self, method: Option<OtpMethod>) {
        self.method = method;
        self.message = None;
    }

    pub async fn next(&mut self) -> SendOutcome {
        let Some(method) = self.method else {
            self.message = Some(SELECT_METHOD_MESSAGE.to_string());
            return SendOutcome::MethodRequired;
        };

        self.state = SendState::Sending;
        let outcome = self.send(method).await;
        self.state = SendState::Idle;
        outcome
    }

    async fn send(&mut self, method: OtpMethod) -> SendOutcome {
        let result = match method {
            OtpMethod::Email => self.api.send_email_code(&self.contact.email).await,
            OtpMethod::Phone => self.api.send_phone_code(&self.contact.phone).await,
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%method, error = %e, "Error sending OTP");
                self.message = Some(SEND_FAILED_MESSAGE.to_string());
                return SendOutcome::Failed;
            }
        };

        let stored = match serde_json::to_string(&method) {
            Ok(json) => self.store.set(keys::OTP_METHOD, &json).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = stored {
            tracing::error!(%method, %reason, "Failed to persist OTP method");
            self.message = Some(SEND_FAILED_MESSAGE.to_string());
            return SendOutcome::Failed;
        }

        let message = response.message_or(format!("OTP sent successfully to your {method}"));
        tracing::info!(%method, "OTP sent");
        self.notifier.notify(Notification::Success(message.clone()));

        if let Err(e) = self.navigator.navigate(Step::OtpConfirm) {
            tracing::error!(error = %e, "Failed to open confirmation step");
            self.message = Some(SEND_FAILED_MESSAGE.to_string());
            return SendOutcome::Failed;
        }

        SendOutcome::Sent { method, message }
    }
}

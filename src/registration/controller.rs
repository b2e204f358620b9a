//! RegistrationController — first step of the flow: collect, validate,
//! persist, and move on to method selection.

use std::sync::Arc;

use tokio::sync::watch;

use crate::countries::Country;
use crate::navigation::{Navigator, Step};
use crate::phone::{FilteredCountries, PhoneInputEvent, PhoneNumberInput};
use crate::store::{KeyValueStore, keys};

use super::model::{RegistrationForm, RegistrationRecord};
use super::validation::{self, Field, FieldErrors};

/// Whether the step is accepting edits or saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationState {
    #[default]
    Editing,
    Submitting,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the errors are also kept on the controller.
    Invalid(FieldErrors),
    /// Record persisted and navigation to method selection succeeded.
    Saved(RegistrationRecord),
    /// Saving or navigating failed; the user stays on this step.
    Failed(String),
}

/// Owns the registration draft and the phone input bound to it.
pub struct RegistrationController {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    form: RegistrationForm,
    phone: PhoneNumberInput,
    errors: FieldErrors,
    state: watch::Sender<RegistrationState>,
}

impl RegistrationController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        default_country: &'static Country,
    ) -> Self {
        Self {
            store,
            navigator,
            form: RegistrationForm::default(),
            phone: PhoneNumberInput::new(default_country),
            errors: FieldErrors::default(),
            state: watch::Sender::new(RegistrationState::Editing),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Direct access for fields without special wiring (names, gender,
    /// email, terms).
    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    pub fn phone(&self) -> &PhoneNumberInput {
        &self.phone
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.borrow()
    }

    /// Observe the state from outside, e.g. to disable the submit button
    /// while a submit is awaiting the store.
    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.state.subscribe()
    }

    /// Keystroke in the phone field. Returns the formatted value.
    pub fn input_phone(&mut self, raw: &str) -> String {
        self.phone.input(raw);
        self.apply_phone_events();
        self.form.phone.clone()
    }

    /// Country picked in the phone input's selector. Clears the phone value.
    pub fn change_country(&mut self, country: &'static Country) {
        self.phone.change_country(country);
        self.apply_phone_events();
    }

    /// Filter the phone input's country list.
    pub fn search_countries(&mut self, term: &str) -> FilteredCountries {
        self.phone.search(term);
        self.phone.selector().filtered()
    }

    /// Per-field liveness check; updates the stored error for `field`.
    pub fn check_field(&mut self, field: Field) -> Option<String> {
        let msg = validation::validate_field(field, &self.form);
        self.errors.set(field, msg.clone());
        if field == Field::Phone {
            self.phone.set_error(msg.clone());
        }
        msg
    }

    /// Validate the whole form; when valid, persist it and go to method
    /// selection.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let record = match validation::validate(&self.form) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(count = errors.len(), "Registration form has errors");
                self.phone
                    .set_error(errors.get(Field::Phone).map(String::from));
                self.errors = errors.clone();
                self.state.send_replace(RegistrationState::Editing);
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.errors = FieldErrors::default();
        self.phone.set_error(None);
        self.state.send_replace(RegistrationState::Submitting);

        let outcome = match self.persist_and_advance(&record).await {
            Ok(()) => {
                tracing::info!(country = %record.country, "Registration details saved");
                SubmitOutcome::Saved(record)
            }
            Err(reason) => {
                tracing::error!(%reason, "Error during form submission");
                SubmitOutcome::Failed(reason)
            }
        };
        self.state.send_replace(RegistrationState::Editing);
        outcome
    }

    async fn persist_and_advance(&self, record: &RegistrationRecord) -> Result<(), String> {
        let json = serde_json::to_string(record).map_err(|e| e.to_string())?;
        self.store
            .set(keys::REGISTRATION_DATA, &json)
            .await
            .map_err(|e| e.to_string())?;
        self.navigator
            .navigate(Step::OtpMethod)
            .map_err(|e| e.to_string())
    }

    fn apply_phone_events(&mut self) {
        for event in self.phone.take_events() {
            match event {
                PhoneInputEvent::Changed(value) => self.form.phone = value,
                PhoneInputEvent::CountryChanged(country) => {
                    self.form.country = country.code.to_string();
                }
            }
        }
    }
}

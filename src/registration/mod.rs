//! Registration step — personal info and contact details.
//!
//! The form is validated as a whole on submit. A valid record is persisted
//! under `registration_data` so the OTP steps can read the contact details
//! back and include the full record in the final verify call.

pub mod controller;
pub mod model;
pub mod validation;

pub use controller::{RegistrationController, RegistrationState, SubmitOutcome};
pub use model::{Gender, RegistrationForm, RegistrationRecord, StoredContact};
pub use validation::{Field, FieldErrors, validate, validate_field};

//! Country-aware phone number entry.

pub mod format;
pub mod input;
pub mod selector;

pub use format::{format, placeholder};
pub use input::{PhoneInputEvent, PhoneNumberInput};
pub use selector::{Anchor, CountrySelector, FilteredCountries, Placement};

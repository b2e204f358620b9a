//! Phone number input — country selector plus formatted digit buffer.

use crate::countries::Country;

use super::format::{format, placeholder};
use super::selector::{Anchor, CountrySelector};

/// Upper bound on raw keystroke input, independent of the template length.
pub const MAX_RAW_INPUT_LEN: usize = 20;

/// Change notifications emitted to the owner of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneInputEvent {
    /// The formatted value changed.
    Changed(String),
    /// The user picked a different country.
    CountryChanged(&'static Country),
}

/// Controlled phone number input.
#[derive(Debug, Clone)]
pub struct PhoneNumberInput {
    selector: CountrySelector,
    value: String,
    error: Option<String>,
    events: Vec<PhoneInputEvent>,
}

impl PhoneNumberInput {
    pub fn new(default_country: &'static Country) -> Self {
        Self {
            selector: CountrySelector::new(default_country),
            value: String::new(),
            error: None,
            events: Vec::new(),
        }
    }

    pub fn country(&self) -> &'static Country {
        self.selector.selected()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &'static str {
        placeholder(self.country().dial_code)
    }

    pub fn selector(&self) -> &CountrySelector {
        &self.selector
    }

    pub fn open_selector(&mut self, anchor: Anchor) {
        self.selector.open(anchor);
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.selector.set_search(term);
    }

    pub fn outside_click(&mut self) {
        self.selector.outside_click();
    }

    /// Overwrite the controlled value from the owner.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select a country. The digit buffer is always reset.
    pub fn change_country(&mut self, country: &'static Country) {
        let country = self.selector.select(country);
        self.events.push(PhoneInputEvent::CountryChanged(country));
        self.value.clear();
        self.events.push(PhoneInputEvent::Changed(String::new()));
    }

    /// Handle the full text of the field after a keystroke.
    pub fn input(&mut self, raw: &str) -> &str {
        let bounded: String = raw.chars().take(MAX_RAW_INPUT_LEN).collect();
        self.value = format(&bounded, self.country().dial_code);
        self.events.push(PhoneInputEvent::Changed(self.value.clone()));
        &self.value
    }

    /// Drain pending change notifications in emission order.
    pub fn take_events(&mut self) -> Vec<PhoneInputEvent> {
        std::mem::take(&mut self.events)
    }
}

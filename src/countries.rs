//! Country directory — static list of selectable countries.

use serde::Serialize;

/// A selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: &'static str,
    /// ISO-3166 alpha-2 code. Identity key.
    pub code: &'static str,
    pub dial_code: &'static str,
    /// Flag asset reference.
    pub flag: &'static str,
}

const fn country(
    name: &'static str,
    code: &'static str,
    dial_code: &'static str,
    flag: &'static str,
) -> Country {
    Country {
        name,
        code,
        dial_code,
        flag,
    }
}

/// ISO code of the country preselected in the phone input.
pub const DEFAULT_COUNTRY_CODE: &str = "AE";

static COUNTRIES: &[Country] = &[
    country("United Arab Emirates", "AE", "+971", "flags/ae.svg"),
    country("United States", "US", "+1", "flags/us.svg"),
    country("Canada", "CA", "+1", "flags/ca.svg"),
    country("United Kingdom", "GB", "+44", "flags/gb.svg"),
    country("Saudi Arabia", "SA", "+966", "flags/sa.svg"),
    country("Qatar", "QA", "+974", "flags/qa.svg"),
    country("Kuwait", "KW", "+965", "flags/kw.svg"),
    country("Bahrain", "BH", "+973", "flags/bh.svg"),
    country("Oman", "OM", "+968", "flags/om.svg"),
    country("Egypt", "EG", "+20", "flags/eg.svg"),
    country("India", "IN", "+91", "flags/in.svg"),
    country("Pakistan", "PK", "+92", "flags/pk.svg"),
    country("France", "FR", "+33", "flags/fr.svg"),
    country("Germany", "DE", "+49", "flags/de.svg"),
    country("Italy", "IT", "+39", "flags/it.svg"),
    country("Spain", "ES", "+34", "flags/es.svg"),
    country("Australia", "AU", "+61", "flags/au.svg"),
    country("China", "CN", "+86", "flags/cn.svg"),
    country("Japan", "JP", "+81", "flags/jp.svg"),
    country("Russia", "RU", "+7", "flags/ru.svg"),
];

/// All countries in display order.
pub fn all() -> &'static [Country] {
    COUNTRIES
}

/// Look up a country by ISO code (case-insensitive).
pub fn find_by_code(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// The country the phone input starts on.
pub fn default_country() -> &'static Country {
    find_by_code(DEFAULT_COUNTRY_CODE).unwrap_or(&COUNTRIES[0])
}

impl Country {
    /// Case-insensitive substring match against name, dial code, or ISO code.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.dial_code.contains(&term)
            || self.code.to_lowercase().contains(&term)
    }
}

/// Filter the directory by a search term. An empty term matches everything.
pub fn search(term: &str) -> Vec<&'static Country> {
    COUNTRIES.iter().filter(|c| c.matches(term)).collect()
}

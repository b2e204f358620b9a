//! Dial-code-aware phone number formatting.
//!
//! Formatting is progressive: whatever prefix of digits has been typed so
//! far is rendered with the partial grouping for the country's template.

/// Grouping template selected by dial code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    /// `(DDD) DDD-DDDD`
    NorthAmerica,
    /// `DDDD DDD DDDD`
    UnitedKingdom,
    /// `(DDD) - DDDD`
    Emirates,
    /// `DDD DDD DDDD`
    Default,
}

impl Template {
    fn for_dial_code(dial_code: &str) -> Self {
        match dial_code {
            "+1" => Self::NorthAmerica,
            "+44" => Self::UnitedKingdom,
            "+971" => Self::Emirates,
            _ => Self::Default,
        }
    }

    fn groups(&self) -> &'static [usize] {
        match self {
            Self::NorthAmerica | Self::Default => &[3, 3, 4],
            Self::UnitedKingdom => &[4, 3, 4],
            Self::Emirates => &[3, 4],
        }
    }
}

/// Format raw input for display under the given dial code.
///
/// Non-digit characters are dropped; digits beyond the template's natural
/// length are ignored.
pub fn format(raw: &str, dial_code: &str) -> String {
    let template = Template::for_dial_code(dial_code);
    let max_len: usize = template.groups().iter().sum();
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_len)
        .collect();

    let parts = split_groups(&digits, template.groups());
    match (template, parts.as_slice()) {
        (_, []) => String::new(),
        (_, [only]) => only.to_string(),
        (Template::NorthAmerica, [area, rest]) => format!("({area}) {rest}"),
        (Template::NorthAmerica, [area, mid, last, ..]) => format!("({area}) {mid}-{last}"),
        (Template::Emirates, [area, rest, ..]) => format!("({area}) - {rest}"),
        (_, groups) => groups.join(" "),
    }
}

/// Canonical masked placeholder for the dial code's template.
pub fn placeholder(dial_code: &str) -> &'static str {
    match Template::for_dial_code(dial_code) {
        Template::NorthAmerica => "(555) 123-4567",
        Template::UnitedKingdom => "7911 123 4567",
        Template::Emirates => "(050) - 1234",
        Template::Default => "123 456 7890",
    }
}

/// Split `digits` into consecutive chunks of the given sizes, stopping at the
/// first empty chunk.
fn split_groups<'a>(digits: &'a str, sizes: &[usize]) -> Vec<&'a str> {
    let mut parts = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for &size in sizes {
        if start >= digits.len() {
            break;
        }
        let end = (start + size).min(digits.len());
        parts.push(&digits[start..end]);
        start = end;
    }
    parts
}

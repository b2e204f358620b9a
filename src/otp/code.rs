//! Four-cell OTP digit editor.

/// Number of cells in a code.
pub const OTP_LENGTH: usize = 4;

/// Cell contents, one digit string per cell (empty when unfilled).
pub type OtpCode = [String; OTP_LENGTH];

/// An empty code.
pub fn empty_code() -> OtpCode {
    Default::default()
}

/// Every cell holds exactly one ASCII digit.
pub fn is_complete(code: &OtpCode) -> bool {
    code.iter().all(|cell| is_digit_cell(cell))
}

fn is_digit_cell(cell: &str) -> bool {
    cell.len() == 1 && cell.chars().all(|c| c.is_ascii_digit())
}

/// Controlled OTP input with auto-advance, backspace retreat, and paste
/// distribution from the first cell.
#[derive(Debug, Clone)]
pub struct OtpDigitInput {
    value: OtpCode,
    focus: Option<usize>,
    disabled: bool,
}

impl Default for OtpDigitInput {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OtpDigitInput {
    /// Mount the input. Cell 0 receives focus unless disabled.
    pub fn new(disabled: bool) -> Self {
        Self {
            value: empty_code(),
            focus: (!disabled).then_some(0),
            disabled,
        }
    }

    pub fn value(&self) -> &OtpCode {
        &self.value
    }

    /// Replace the controlled value from the owner.
    pub fn set_value(&mut self, value: OtpCode) {
        self.value = value;
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.value)
    }

    /// The cells joined into a single code string.
    pub fn code(&self) -> String {
        self.value.concat()
    }

    /// Reset every cell and return focus to the first.
    pub fn clear(&mut self) {
        self.value = empty_code();
        self.focus = (!self.disabled).then_some(0);
    }

    /// New content of cell `index` after direct typing. Only a single digit
    /// or an empty string is accepted; paste goes through [`Self::paste`].
    ///
    /// Returns the updated code when the change was accepted.
    pub fn input(&mut self, index: usize, incoming: &str) -> Option<&OtpCode> {
        if self.disabled || index >= OTP_LENGTH {
            return None;
        }
        if !incoming.is_empty() && !is_digit_cell(incoming) {
            return None;
        }
        self.value[index] = incoming.to_string();
        if !incoming.is_empty() && index < OTP_LENGTH - 1 {
            self.focus = Some(index + 1);
        }
        Some(&self.value)
    }

    /// Backspace pressed in cell `index`. Retreats focus when the cell is
    /// already empty; never edits the previous cell.
    pub fn backspace(&mut self, index: usize) {
        if self.disabled || index >= OTP_LENGTH {
            return;
        }
        if self.value[index].is_empty() && index > 0 {
            self.focus = Some(index - 1);
        }
    }

    /// Clipboard paste targeted at cell `index`. Only honored on cell 0.
    ///
    /// Returns the replacement code when the paste was applied.
    pub fn paste(&mut self, index: usize, clipboard: &str) -> Option<&OtpCode> {
        if self.disabled || index != 0 {
            return None;
        }
        let digits: Vec<char> = clipboard
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(OTP_LENGTH)
            .collect();

        let mut next = empty_code();
        for (cell, digit) in next.iter_mut().zip(&digits) {
            *cell = digit.to_string();
        }
        self.value = next;
        self.focus = Some(digits.len().min(OTP_LENGTH - 1));
        Some(&self.value)
    }
}

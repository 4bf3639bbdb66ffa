//! Types shared by the adapter traits and their implementations.

use genjen_core::constants::{CLEAR_KEY, SUBMIT_KEY};
use std::time::Duration;

use crate::error::{HardwareError, Result};

/// A key pressed on the 4x3 keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Clear key (`*`).
    Clear,

    /// Submit key (`#`).
    Submit,
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use genjen_hardware::Key;
    ///
    /// assert_eq!(Key::digit(5).unwrap().as_char(), '5');
    /// assert!(Key::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a keypad character to a key.
    ///
    /// Returns `None` for characters that are not on the keypad.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            CLEAR_KEY => Some(Self::Clear),
            SUBMIT_KEY => Some(Self::Submit),
            // to_digit(10) is always < 10
            _ => c.to_digit(10).map(|d| Self::Digit(d as u8)),
        }
    }

    /// The character printed on the key, `'?'` for an out-of-range digit.
    pub fn as_char(&self) -> char {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(*d), 10).unwrap_or('?'),
            Self::Clear => CLEAR_KEY,
            Self::Submit => SUBMIT_KEY,
        }
    }

    /// Get the digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// A tone emitted by a buzzer, as observed by test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneEvent {
    pub pitch_hz: u16,
    pub duration: Duration,
}

/// Fit text into a fixed-width display row.
///
/// Control characters are dropped, the text is truncated to `columns`
/// characters and the rest of the row is blank-padded, so writing the result
/// always overwrites the whole row.
///
/// # Examples
///
/// ```
/// use genjen_hardware::fit_line;
///
/// assert_eq!(fit_line("Alarm", 8), "Alarm   ");
/// assert_eq!(fit_line("Deaktiveret", 8), "Deaktive");
/// ```
pub fn fit_line(text: &str, columns: usize) -> String {
    let mut line: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(columns)
        .collect();
    let used = line.chars().count();
    line.extend(std::iter::repeat_n(' ', columns - used));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('0', Key::Digit(0))]
    #[case('7', Key::Digit(7))]
    #[case('*', Key::Clear)]
    #[case('#', Key::Submit)]
    fn test_key_from_char(#[case] c: char, #[case] expected: Key) {
        let key = Key::from_char(c).unwrap();
        assert_eq!(key, expected);
        assert_eq!(key.as_char(), c);
    }

    #[rstest]
    #[case('a')]
    #[case(' ')]
    #[case('\n')]
    fn test_key_from_char_unknown(#[case] c: char) {
        assert!(Key::from_char(c).is_none());
    }

    #[test]
    fn test_key_as_digit() {
        assert_eq!(Key::Digit(4).as_digit(), Some(4));
        assert_eq!(Key::Submit.as_digit(), None);
    }

    #[rstest]
    #[case("", 4, "    ")]
    #[case("ab", 4, "ab  ")]
    #[case("abcd", 4, "abcd")]
    #[case("abcdef", 4, "abcd")]
    #[case("a\tb", 4, "ab  ")]
    fn test_fit_line(#[case] text: &str, #[case] columns: usize, #[case] expected: &str) {
        assert_eq!(fit_line(text, columns), expected);
    }
}

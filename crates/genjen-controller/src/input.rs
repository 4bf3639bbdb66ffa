//! Keypad input accumulation.
//!
//! Digits are collected into a bounded buffer until the submit key turns
//! them into a completed [`Entry`] or the clear key throws them away.

use genjen_core::Entry;
use genjen_core::constants::MAX_INPUT_LENGTH;
use genjen_hardware::Key;

/// What a key press did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The buffer was emptied.
    Cleared,

    /// The buffer was handed over as a completed entry and is now empty.
    Submitted(Entry),

    /// The digit was appended.
    Appended(char),

    /// The digit was not appended because the buffer is full.
    Rejected,
}

/// Bounded buffer of typed digits.
///
/// # Examples
///
/// ```
/// use genjen_controller::{InputBuffer, KeyOutcome};
/// use genjen_hardware::Key;
///
/// let mut buffer = InputBuffer::new(2);
///
/// assert_eq!(buffer.press(Key::Digit(1)), KeyOutcome::Appended('1'));
/// assert_eq!(buffer.press(Key::Digit(2)), KeyOutcome::Appended('2'));
/// assert_eq!(buffer.press(Key::Digit(3)), KeyOutcome::Rejected);
///
/// match buffer.press(Key::Submit) {
///     KeyOutcome::Submitted(entry) => assert_eq!(entry.as_str(), "12"),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct InputBuffer {
    digits: Entry,
    capacity: usize,
}

impl InputBuffer {
    /// Create a buffer holding at most `capacity` digits.
    pub fn new(capacity: usize) -> Self {
        Self {
            digits: Entry::default(),
            capacity,
        }
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Clear => {
                self.digits.clear();
                KeyOutcome::Cleared
            }
            Key::Submit => KeyOutcome::Submitted(std::mem::take(&mut self.digits)),
            Key::Digit(_) if self.is_full() => KeyOutcome::Rejected,
            Key::Digit(_) => {
                let c = key.as_char();
                match self.digits.push(c) {
                    Ok(()) => KeyOutcome::Appended(c),
                    // Digit(d) with d > 9 does not come from a real keypad
                    Err(_) => KeyOutcome::Rejected,
                }
            }
        }
    }

    /// Digits typed so far.
    pub fn as_str(&self) -> &str {
        self.digits.as_str()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(MAX_INPUT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(buffer: &mut InputBuffer, keys: &str) -> Vec<KeyOutcome> {
        keys.chars()
            .map(|c| buffer.press(Key::from_char(c).unwrap()))
            .collect()
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(InputBuffer::default().capacity(), 8);
    }

    #[test]
    fn test_digits_accumulate() {
        let mut buffer = InputBuffer::default();

        press_all(&mut buffer, "258");

        assert_eq!(buffer.as_str(), "258");
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_ninth_digit_rejected() {
        let mut buffer = InputBuffer::default();

        press_all(&mut buffer, "12345678");
        assert!(buffer.is_full());

        assert_eq!(buffer.press(Key::Digit(9)), KeyOutcome::Rejected);
        assert_eq!(buffer.as_str(), "12345678");
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buffer = InputBuffer::default();

        let outcomes = press_all(&mut buffer, "12*");

        assert_eq!(outcomes.last(), Some(&KeyOutcome::Cleared));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_submit_hands_over_and_empties() {
        let mut buffer = InputBuffer::default();

        let outcomes = press_all(&mut buffer, "123#");

        assert_eq!(
            outcomes.last(),
            Some(&KeyOutcome::Submitted(Entry::new("123").unwrap()))
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_submit_empty_buffer() {
        let mut buffer = InputBuffer::default();
        assert_eq!(
            buffer.press(Key::Submit),
            KeyOutcome::Submitted(Entry::default())
        );
    }

    #[test]
    fn test_out_of_range_digit_rejected() {
        let mut buffer = InputBuffer::default();
        assert_eq!(buffer.press(Key::Digit(12)), KeyOutcome::Rejected);
        assert!(buffer.is_empty());
    }
}

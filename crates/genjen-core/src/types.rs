use crate::{
    Result,
    constants::{
        COLOR_ALARM, COLOR_ARMED, COLOR_DISARMED, COLOR_INVALID, LABEL_ALARM, LABEL_ARMED,
        LABEL_DISARMED, LABEL_INVALID,
    },
    error::Error,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Security mode of the controller.
///
/// The raw encoding (0, 1, 2) is what gets published to the shared state
/// store. Any other raw value is an invalid state; see [`Indication::for_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SecurityMode {
    /// Motion is watched and escalates to `Alarm`.
    Armed = 0,
    /// Motion is ignored.
    Disarmed = 1,
    /// Motion was sustained while armed; the alarm pattern is sounding.
    Alarm = 2,
}

impl SecurityMode {
    /// Create a security mode from its raw value.
    ///
    /// # Errors
    /// Returns `Error::InvalidMode` if the value is not 0, 1, or 2.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(SecurityMode::Armed),
            1 => Ok(SecurityMode::Disarmed),
            2 => Ok(SecurityMode::Alarm),
            _ => Err(Error::InvalidMode(value)),
        }
    }

    /// Convert the mode to its raw value.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the mode is `Armed`.
    #[inline]
    #[must_use]
    pub fn is_armed(self) -> bool {
        matches!(self, SecurityMode::Armed)
    }

    /// Returns `true` if the mode is `Alarm`.
    #[inline]
    #[must_use]
    pub fn is_alarm(self) -> bool {
        matches!(self, SecurityMode::Alarm)
    }

    /// Panel label for this mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        Indication::for_mode(self).label
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SecurityMode::Armed => write!(f, "Armed"),
            SecurityMode::Disarmed => write!(f, "Disarmed"),
            SecurityMode::Alarm => write!(f, "Alarm"),
        }
    }
}

/// What the panel shows for a mode: the label on the mode row and the
/// indicator color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indication {
    pub label: &'static str,
    pub color: (u8, u8, u8),
}

impl Indication {
    #[must_use]
    pub fn for_mode(mode: SecurityMode) -> Self {
        match mode {
            SecurityMode::Armed => Self {
                label: LABEL_ARMED,
                color: COLOR_ARMED,
            },
            SecurityMode::Disarmed => Self {
                label: LABEL_DISARMED,
                color: COLOR_DISARMED,
            },
            SecurityMode::Alarm => Self {
                label: LABEL_ALARM,
                color: COLOR_ALARM,
            },
        }
    }

    /// Indication for a raw stored mode value.
    ///
    /// Out-of-range values get the distinct "Invalid state" indication
    /// rather than an error.
    #[must_use]
    pub fn for_raw(raw: u8) -> Self {
        SecurityMode::from_u8(raw).map_or(Self::invalid(), Self::for_mode)
    }

    #[must_use]
    pub fn invalid() -> Self {
        Self {
            label: LABEL_INVALID,
            color: COLOR_INVALID,
        }
    }
}

/// A completed keypad entry: the digits typed before the submit key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry(String);

impl Entry {
    /// Create an entry from typed digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` on the first non-digit character.
    pub fn new(digits: impl Into<String>) -> Result<Self> {
        let digits = digits.into();
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(Error::InvalidKey(c));
        }
        Ok(Entry(digits))
    }

    /// Append one digit.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if `digit` is not an ASCII digit; the
    /// entry is left unchanged.
    pub fn push(&mut self, digit: char) -> Result<()> {
        if !digit.is_ascii_digit() {
            return Err(Error::InvalidKey(digit));
        }
        self.0.push(digit);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secret numeric code (1 or more ASCII digits)
///
/// # Security
/// Matching against an [`Entry`] is constant-time so that response timing
/// does not reveal how many leading digits were right.
#[derive(Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretCode(String);

impl SecretCode {
    /// Create a new secret code with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCode` if the code is empty or contains
    /// anything but ASCII digits.
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::InvalidCode("code must not be empty".to_string()));
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCode(format!(
                "code must contain digits only, got {code:?}"
            )));
        }
        Ok(SecretCode(code.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time check of an entry against this code.
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        self.0.as_bytes().ct_eq(entry.as_str().as_bytes()).into()
    }
}

impl PartialEq for SecretCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

// Codes never show up in logs.
impl fmt::Debug for SecretCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretCode(***)")
    }
}

impl TryFrom<String> for SecretCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        SecretCode::new(&value)
    }
}

impl From<SecretCode> for String {
    fn from(code: SecretCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for SecretCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SecretCode::new(s)
    }
}

/// Table of secret codes and the mode each one authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    /// Moves any mode to `Disarmed`.
    pub disarm: SecretCode,
    /// Moves any mode to `Armed`.
    pub arm: SecretCode,
    /// Silences an alarm by moving to `Armed`.
    pub stop_alarm: SecretCode,
}

impl CodeTable {
    pub fn new(disarm: SecretCode, arm: SecretCode, stop_alarm: SecretCode) -> Self {
        Self {
            disarm,
            arm,
            stop_alarm,
        }
    }

    /// Mode authorized by an entry, if it matches any code.
    ///
    /// Every code is compared so the lookup time does not depend on which
    /// one matched. When codes collide the disarm code wins, then arm.
    #[must_use]
    pub fn lookup(&self, entry: &Entry) -> Option<SecurityMode> {
        let disarm = self.disarm.matches(entry);
        let arm = self.arm.matches(entry);
        let stop_alarm = self.stop_alarm.matches(entry);

        if disarm {
            Some(SecurityMode::Disarmed)
        } else if arm || stop_alarm {
            Some(SecurityMode::Armed)
        } else {
            None
        }
    }

    /// Length of the longest code in the table.
    #[must_use]
    pub fn longest(&self) -> usize {
        self.disarm
            .len()
            .max(self.arm.len())
            .max(self.stop_alarm.len())
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        use crate::constants::{DEFAULT_ARM_CODE, DEFAULT_DISARM_CODE, DEFAULT_STOP_ALARM_CODE};

        Self {
            disarm: SecretCode(DEFAULT_DISARM_CODE.to_string()),
            arm: SecretCode(DEFAULT_ARM_CODE.to_string()),
            stop_alarm: SecretCode(DEFAULT_STOP_ALARM_CODE.to_string()),
        }
    }
}

/// One alarm activation, as listed on the status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Wall-clock time the alarm was raised.
    pub raised_at: DateTime<Local>,
}

impl AlarmRecord {
    #[must_use]
    pub fn now() -> Self {
        Self {
            raised_at: Local::now(),
        }
    }

    /// Time of day, e.g. `10:00`.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.raised_at.format("%H:%M").to_string()
    }

    /// Calendar date, e.g. `27/1/2023`.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.raised_at.format("%-d/%-m/%Y").to_string()
    }
}

//! Core constants for the GenJen security controller.
//!
//! This module collects every fixed value the controller relies on: the
//! default secret codes, keypad control characters, timing of the
//! scheduling tick, tone pitches and durations, and the labels and colors
//! shown on the panel for each security mode.
//!
//! # Usage
//!
//! ```
//! use genjen_core::constants::*;
//!
//! assert_eq!(DEFAULT_DISARM_CODE, "123");
//! assert_eq!(MOTION_THRESHOLD, 100);
//! assert_eq!(MAX_INPUT_LENGTH, 8);
//! ```

// ============================================================================
// Secret Codes
// ============================================================================

/// Default code that moves the system to `Disarmed`.
pub const DEFAULT_DISARM_CODE: &str = "123";

/// Default code that moves the system to `Armed`.
pub const DEFAULT_ARM_CODE: &str = "258";

/// Default code that silences an alarm and re-arms the system.
pub const DEFAULT_STOP_ALARM_CODE: &str = "0";

// ============================================================================
// Keypad
// ============================================================================

/// Maximum number of digits the input buffer accepts.
///
/// # Value: 8 digits
pub const MAX_INPUT_LENGTH: usize = 8;

/// Control key that clears the input buffer.
pub const CLEAR_KEY: char = '*';

/// Control key that submits the input buffer as a completed entry.
pub const SUBMIT_KEY: char = '#';

/// Physical layout of the 4x3 membrane keypad, row by row.
pub const KEYPAD_LAYOUT: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

// ============================================================================
// Motion Detection
// ============================================================================

/// Number of net positive motion samples that escalates `Armed` to `Alarm`.
///
/// # Value: 100 ticks (1.5 seconds of sustained motion at the default tick)
pub const MOTION_THRESHOLD: u32 = 100;

// ============================================================================
// Scheduling
// ============================================================================

/// Default length of one scheduling tick (milliseconds).
///
/// Every task waits one tick per loop iteration. Tone durations are
/// expressed in ticks and scale with this value.
///
/// # Value: 15ms
pub const DEFAULT_TICK_MS: u64 = 15;

/// Default capacity of the tone request queue.
pub const DEFAULT_TONE_QUEUE_CAPACITY: usize = 16;

/// Number of transitions kept in the state machine history.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Number of alarm activations kept in the alarm log.
pub const MAX_ALARM_LOG_SIZE: usize = 20;

// ============================================================================
// Tones
// ============================================================================

/// Pitch of the tone played when the input buffer is cleared (Hz).
pub const CLEAR_TONE_HZ: u16 = 200;

/// Pitch of the tone played when an entry is submitted (Hz).
pub const CONFIRM_TONE_HZ: u16 = 650;

/// Pitch of the tone played when a digit is rejected by a full buffer (Hz).
pub const REJECT_TONE_HZ: u16 = 100;

/// Multiplier applied to a digit's character code to get its pitch.
///
/// `'0'` (0x30) plays at 480 Hz, `'9'` (0x39) at 570 Hz.
pub const DIGIT_TONE_FACTOR: u16 = 10;

/// Length of every keypad feedback tone, in ticks.
pub const FEEDBACK_TONE_TICKS: u32 = 10;

/// Alarm pattern pitches, ascending then descending (Hz).
pub const ALARM_PATTERN_HZ: [u16; 4] = [250, 500, 750, 500];

/// Length of each alarm pattern step, in ticks.
pub const ALARM_TONE_TICKS: u32 = 5;

// ============================================================================
// Panel
// ============================================================================

/// Columns per display row.
pub const DISPLAY_COLUMNS: usize = 16;

/// Rows on the display.
pub const DISPLAY_ROWS: usize = 2;

/// Row that shows the security mode label.
pub const MODE_ROW: usize = 0;

/// Row that shows the digits entered so far.
pub const INPUT_ROW: usize = 1;

/// Text shown on the mode row before the first refresh.
pub const MSG_STARTUP: &str = "Program start";

/// Mode label for `Armed`.
pub const LABEL_ARMED: &str = "Aktiveret";

/// Mode label for `Disarmed`.
pub const LABEL_DISARMED: &str = "Deaktiveret";

/// Mode label for `Alarm`.
pub const LABEL_ALARM: &str = "Alarm";

/// Label shown when the stored mode is not a known variant.
pub const LABEL_INVALID: &str = "Invalid state";

/// Indicator color for `Armed` (red, green, blue).
pub const COLOR_ARMED: (u8, u8, u8) = (50, 50, 0);

/// Indicator color for `Disarmed`.
pub const COLOR_DISARMED: (u8, u8, u8) = (0, 50, 0);

/// Indicator color for `Alarm`.
pub const COLOR_ALARM: (u8, u8, u8) = (50, 0, 0);

/// Indicator color for an invalid stored mode.
pub const COLOR_INVALID: (u8, u8, u8) = (0, 0, 50);

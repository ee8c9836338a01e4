//! CLI Exit Code Registry
//!
//! Single source of truth for `gridveil` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (unspecified)                     |
//! | 2    | Usage error (bad target, bad arguments)         |
//! | 3    | Structure file unreadable, or sheet not in it   |
//! | 4    | Visibility record could not be written          |
//! | 5    | Explicit settings file unreadable or invalid    |
//! | 6    | `resolve`: at least one cell is redacted        |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, malformed targets.
pub const EXIT_USAGE: u8 = 2;

/// Structure JSON missing, malformed, or lacking the requested sheet.
pub const EXIT_STRUCTURE: u8 = 3;

/// Persisting the visibility record failed. The change was not saved.
pub const EXIT_STORAGE: u8 = 4;

/// `--config` pointed at a file that could not be loaded.
pub const EXIT_CONFIG: u8 = 5;

/// `resolve --check`: some requested cell would be withheld from the AI.
pub const EXIT_REDACTED: u8 = 6;

//! Application-wide constants
//!
//! Centralized location for magic strings and configuration values
//! that are used across multiple modules.

/// Header line of every rendered status message
pub const LIST_HEADER: &str = "Today's list:";

/// Bullet prefix for rendered list items
pub const BULLET: &str = "• ";

/// Date format used as a key inside the persisted record
pub const DATE_KEY_FMT: &str = "%Y-%m-%d";

/// Date format used in the daily header announcement
pub const HEADER_DATE_FMT: &str = "%d.%m.%Y";

/// File name of the persisted state record inside the data directory
pub const STATE_FILE_NAME: &str = "dayroll_state.json";

/// Environment variable consulted for the bot token when the config
/// file does not provide one
pub const TOKEN_ENV_VAR: &str = "DAYROLL_TOKEN";

// Daily job defaults
pub const DEFAULT_DAILY_HOUR: u32 = 10;
pub const DEFAULT_TIMEZONE: &str = "Europe/Sofia";

// Ephemeral acknowledgement lifetimes
/// TTL for the "List updated." notice after a plain append
pub const APPEND_ACK_TTL_SECS: u64 = 3;
/// TTL for wizard commit confirmations
pub const EDIT_ACK_TTL_SECS: u64 = 5;

/// Idle lifetime of an edit-wizard session. The original bot kept
/// sessions forever; an abandoned wizard now simply lapses.
pub const WIZARD_TTL_SECS: u64 = 10 * 60;

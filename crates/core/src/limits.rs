//! Size limits for the request bin service.
//!
//! MEMORY SAFETY: a bin is an in-memory structure fed by unauthenticated
//! traffic, so every unbounded input (history length, body size, id length)
//! gets a hard cap here.
//!
//! # Usage Note
//!
//! `DEFAULT_HISTORY_MAX_SIZE` and `DEFAULT_BODY_MAX_LENGTH` are defaults,
//! overridable per deployment through configuration. The bin id limits are
//! fixed: they define the key space of the registry and are not configurable.

// === Bin Id Limits ===

/// Maximum bin id length in characters.
///
/// Matches the length of a canonical UUID string, the most common id shape.
pub const BIN_ID_MAX_LEN: usize = 36;

/// Allowed bin id characters.
///
/// Letters, numbers, `-`, `_` and `.`. Anchored so the whole id must match.
pub const BIN_ID_PATTERN: &str = r"^[a-zA-Z0-9\-_\.]+$";

/// Reserved identifier that cannot name a bin.
///
/// `bin` collides with route prefixes in common deployments. Compared
/// case-insensitively.
pub const RESERVED_BIN_ID: &str = "bin";

// === History Limits ===

/// Default maximum number of requests retained per bin.
///
/// Oldest entries are evicted first once the cap is reached.
pub const DEFAULT_HISTORY_MAX_SIZE: usize = 20;

/// Default maximum captured body length in bytes (~128KB).
///
/// Bodies larger than this are truncated during capture, never rejected.
pub const DEFAULT_BODY_MAX_LENGTH: usize = 128_000;

// === Entity Limits ===

/// Default capacity of a bin entity's command mailbox.
///
/// Sends beyond this suspend the caller until the entity catches up.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Default timeout for reads awaiting an entity reply (milliseconds).
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

/// Default interval between idle-bin retention sweeps (seconds).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

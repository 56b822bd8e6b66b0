//! Feed timing and close-code constants.

use std::time::Duration;

/// Base reconnect delay; doubles per attempt.
pub const RECONNECT_DELAY_BASE: Duration = Duration::from_secs(1);
/// Automatic reconnect attempts before the feed gives up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Wall-clock window after which synthetic data is shown when no
/// connection has ever succeeded. Independent of the backoff schedule.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a single channel-open attempt.
pub const OPEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause before reconnecting with a freshly refreshed credential.
pub const REFRESH_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Normal closure; no reconnect is scheduled.
pub const CLOSE_NORMAL: u16 = 1000;
/// Backend-reserved closure code meaning the access token expired.
pub const CLOSE_TOKEN_EXPIRED: u16 = 4002;

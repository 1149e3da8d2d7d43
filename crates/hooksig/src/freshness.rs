//! Replay-window enforcement.
//!
//! Ages are computed from whole epoch-second counts on both sides, never from
//! clock fields such as the seconds-of-minute.

use chrono::Utc;

use crate::error::{RejectionReason, VerifyResult};

/// Maximum accepted signature age, in seconds (10 minutes).
///
/// A signature exactly this old is still accepted.
pub const REPLAY_WINDOW_SECS: i64 = 10 * 60;

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Parse a header timestamp as decimal epoch seconds.
pub fn parse_timestamp(value: &str) -> VerifyResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| RejectionReason::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// A timestamp that passed the replay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Signing time, epoch seconds.
    pub signed_at: i64,
    /// Seconds between signing and `now`; negative when signed "in the future".
    pub age_secs: i64,
}

/// Check a header timestamp against `now_secs`.
///
/// Timestamps ahead of `now_secs` are accepted.
pub fn check_freshness(timestamp: &str, now_secs: i64) -> VerifyResult<Freshness> {
    let signed_at = parse_timestamp(timestamp)?;
    let age_secs = now_secs.saturating_sub(signed_at);

    if age_secs > REPLAY_WINDOW_SECS {
        return Err(RejectionReason::Expired {
            age_secs,
            window_secs: REPLAY_WINDOW_SECS,
        });
    }

    Ok(Freshness {
        signed_at,
        age_secs,
    })
}

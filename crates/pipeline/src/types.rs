//! Value types shared by requests, progress items and persisted reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Upper bound on the tokens a provider may generate for one call.
///
/// Forwarded to the provider as-is; zero and oversized values are the
/// provider's to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCount(u32);

impl TokenCount {
    /// Creates a [`TokenCount`] from a raw integer.
    pub fn new(count: u32) -> Self {
        Self(count)
    }

    /// Returns the raw integer.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} tokens", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC instant. Serialises as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps an existing UTC instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// `YYYY-MM-DD_HH-MM-SS`, safe inside a file name on every platform.
    pub fn file_stamp(self) -> String {
        self.0.format("%Y-%m-%d_%H-%M-%S").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_stamp_uses_dashes_and_an_underscore() {
        let ts = Timestamp::from_utc(Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap());
        assert_eq!(ts.file_stamp(), "2024-03-09_07-05-01");
        assert_eq!(ts.to_string(), "2024-03-09T07:05:01+00:00");
    }

    #[test]
    fn timestamps_round_trip_through_rfc3339() {
        let json = serde_json::to_string(&Timestamp::from_utc(
            Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
        ))
        .unwrap();
        assert_eq!(json, "\"2024-03-09T07:05:01Z\"");
    }
}

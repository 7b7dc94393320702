//! Day arithmetic for certificate validity windows and threshold checks.

use crate::probe::CertificateSnapshot;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Default days-remaining cutoff below which a certificate is a warning.
pub const DEFAULT_YELLOW_DAYS: i64 = 30;
/// Default days-remaining cutoff below which a certificate is a failure.
pub const DEFAULT_RED_DAYS: i64 = -1;

/// Whole days elapsed from `from_unix` to `now_unix`, rounded half away from zero.
///
/// Negative when `from_unix` lies in the future. The fractional count is
/// derived from elapsed hours so that a 12 hour gap rounds to one day.
/// `now_unix` keeps its sub-second part; truncating it would move gaps just
/// under 12 hours onto the rounding boundary.
pub fn elapsed_days(from_unix: i64, now_unix: f64) -> i64 {
    let hours = (now_unix - from_unix as f64) / SECONDS_PER_HOUR;
    (hours / 24.0).round() as i64
}

/// Day counts for one certificate relative to the comparison time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    /// Days since `notBefore`; informational only.
    pub valid_since: i64,
    /// Days until `notAfter`; zero or negative once expired.
    pub days_remaining: i64,
}

impl Validity {
    pub fn at(cert: &CertificateSnapshot, now_unix: f64) -> Validity {
        Validity {
            valid_since: elapsed_days(cert.not_before_unix, now_unix),
            days_remaining: -elapsed_days(cert.not_after_unix, now_unix),
        }
    }
}

/// Severity cutoffs, in days remaining. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub yellow_days: i64,
    pub red_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            yellow_days: DEFAULT_YELLOW_DAYS,
            red_days: DEFAULT_RED_DAYS,
        }
    }
}

impl Thresholds {
    /// Evaluates the two thresholds independently of each other.
    pub fn classify(&self, days_remaining: i64) -> Flags {
        Flags {
            red: days_remaining < self.red_days,
            yellow: days_remaining < self.yellow_days,
        }
    }
}

/// Per-certificate threshold outcome fed to the aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub red: bool,
    pub yellow: bool,
}

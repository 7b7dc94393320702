//! Run-wide severity aggregation and exit codes.

use crate::validity::Flags;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// All certificates within both thresholds.
pub const EXIT_OK: i32 = 0;
/// Wrong usage: bad arguments or no endpoints.
pub const EXIT_USAGE: i32 = 1;
/// At least one certificate is about to expire.
pub const EXIT_YELLOW: i32 = 2;
/// At least one certificate is expired.
pub const EXIT_RED: i32 = 3;
/// An endpoint could not be reached or handshaken.
pub const EXIT_FATAL: i32 = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Yellow,
    Red,
}

impl Severity {
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => EXIT_OK,
            Severity::Yellow => EXIT_YELLOW,
            Severity::Red => EXIT_RED,
        }
    }
}

/// The pair of run-scoped flags, accumulated by logical OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub any_red: bool,
    pub any_yellow: bool,
}

impl Verdict {
    /// Folds per-certificate flags into a single verdict.
    pub fn fold<I>(flags: I) -> Verdict
    where
        I: IntoIterator<Item = Flags>,
    {
        flags
            .into_iter()
            .fold(Verdict::default(), |acc, f| acc.merge(f))
    }

    /// Never clears a flag that is already set.
    pub fn merge(self, flags: Flags) -> Verdict {
        Verdict {
            any_red: self.any_red || flags.red,
            any_yellow: self.any_yellow || flags.yellow,
        }
    }

    /// RED wins over YELLOW.
    pub fn severity(&self) -> Severity {
        if self.any_red {
            Severity::Red
        } else if self.any_yellow {
            Severity::Yellow
        } else {
            Severity::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK: Flags = Flags {
        red: false,
        yellow: false,
    };
    const YELLOW: Flags = Flags {
        red: false,
        yellow: true,
    };
    const RED: Flags = Flags {
        red: true,
        yellow: true,
    };
    const RED_ONLY: Flags = Flags {
        red: true,
        yellow: false,
    };

    #[test]
    fn test_exit_code_table() {
        assert_eq!(Verdict::fold(vec![]).severity().exit_code(), 0);
        assert_eq!(Verdict::fold(vec![OK, OK]).severity().exit_code(), 0);
        assert_eq!(Verdict::fold(vec![OK, YELLOW]).severity().exit_code(), 2);
        assert_eq!(Verdict::fold(vec![YELLOW, RED]).severity().exit_code(), 3);
        assert_eq!(Verdict::fold(vec![RED_ONLY]).severity().exit_code(), 3);
    }

    #[test]
    fn test_red_is_never_downgraded() {
        let mut verdict = Verdict::fold(vec![RED]);
        for flags in &[OK, YELLOW, OK, YELLOW] {
            verdict = verdict.merge(*flags);
            assert_eq!(verdict.severity(), Severity::Red);
        }
    }

    #[test]
    fn test_fold_is_order_independent() {
        let flags = vec![OK, YELLOW, RED_ONLY, OK];
        let forward = Verdict::fold(flags.clone());
        let backward = Verdict::fold(flags.into_iter().rev());
        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            Verdict {
                any_red: true,
                any_yellow: true
            }
        );
    }

    #[test]
    fn test_severity_ordering_and_names() {
        assert!(Severity::Red > Severity::Yellow);
        assert!(Severity::Yellow > Severity::Ok);
        assert_eq!(Severity::Yellow.to_string(), "YELLOW");
        assert_eq!("RED".parse::<Severity>().unwrap(), Severity::Red);
    }
}

//! Certificate expiry checks over TLS.
//!
//! Connects to each endpoint in turn, reads the peer certificate chain and
//! folds every certificate's remaining validity into one [`Severity`]:
//!
//! | Severity | Exit code | Meaning                                      |
//! |----------|-----------|----------------------------------------------|
//! | `OK`     | 0         | all certificates within both thresholds      |
//! | `YELLOW` | 2         | a certificate is below the `yellow` cutoff   |
//! | `RED`    | 3         | a certificate is below the `red` cutoff      |
//!
//! ```no_run
//! use std::time::Duration;
//! use tlsexpiry::{check_endpoints, now_unix, FailurePolicy, OpenSslProbe, Thresholds};
//!
//! let probe = OpenSslProbe::new(true, Duration::from_secs(10));
//! let hosts = vec!["example.com".to_string()];
//! let thresholds = Thresholds::default();
//! let report = check_endpoints(&probe, &hosts, thresholds, FailurePolicy::Abort, now_unix())?;
//! println!("{} (exit code {})", report.severity, report.severity.exit_code());
//! # Ok::<(), tlsexpiry::TLSValidationError>(())
//! ```

pub mod check;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod output;
pub mod probe;
pub mod severity;
pub mod validity;

pub use check::{check_endpoints, now_unix, FailurePolicy, RunReport};
pub use error::TLSValidationError;
pub use probe::{CertificateSnapshot, CertificateSource, OpenSslProbe};
pub use severity::{Severity, Verdict};
pub use validity::{Flags, Thresholds, Validity};

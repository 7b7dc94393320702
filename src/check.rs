//! Sequential evaluation of endpoints against the configured thresholds.

use crate::error::TLSValidationError;
use crate::probe::{CertificateSnapshot, CertificateSource};
use crate::severity::{Severity, Verdict};
use crate::validity::{Flags, Thresholds, Validity};
use openssl::asn1::Asn1Time;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use strum_macros::{Display, EnumString};
use tracing::{error, info, warn};

/// What to do when an endpoint cannot be reached or handshaken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Strict mode: the first transport failure ends the whole run.
    Abort,
    /// Score the endpoint RED and keep going.
    Red,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Abort
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateReport {
    #[serde(flatten)]
    pub certificate: CertificateSnapshot,
    #[serde(flatten)]
    pub validity: Validity,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub endpoint: String,
    pub certificates: Vec<CertificateReport>,
    /// Set only under [`FailurePolicy::Red`] when the endpoint failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndpointReport {
    fn flags(&self, thresholds: &Thresholds) -> Vec<Flags> {
        if self.error.is_some() {
            return vec![Flags {
                red: true,
                yellow: true,
            }];
        }
        self.certificates
            .iter()
            .map(|c| thresholds.classify(c.validity.days_remaining))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub checked_at: String,
    pub endpoints: Vec<EndpointReport>,
    pub verdict: Verdict,
    pub severity: Severity,
}

/// Current time as fractional seconds since the Unix epoch.
pub fn now_unix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Evaluates every endpoint in order and folds the results into one verdict.
///
/// Under [`FailurePolicy::Abort`] the first transport error is returned and
/// no later endpoint is contacted.
pub fn check_endpoints<S: CertificateSource>(
    source: &S,
    endpoints: &[String],
    thresholds: Thresholds,
    policy: FailurePolicy,
    now: f64,
) -> Result<RunReport, TLSValidationError> {
    let checked_at = Asn1Time::from_unix(now.floor() as i64)
        .map(|t| t.to_string())
        .unwrap_or_else(|_| now.to_string());
    info!("Comparing certificate validity bounds against {}", checked_at);

    let mut reports = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let report = match source.peer_chain(endpoint) {
            Ok(chain) => evaluate_chain(endpoint, chain, &thresholds, now),
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    error!("{}: {}", endpoint, e);
                    return Err(e);
                }
                FailurePolicy::Red => {
                    warn!("{}: {}, scoring as RED", endpoint, e);
                    EndpointReport {
                        endpoint: endpoint.clone(),
                        certificates: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            },
        };
        reports.push(report);
    }

    let verdict = Verdict::fold(reports.iter().flat_map(|r| r.flags(&thresholds)));
    Ok(RunReport {
        checked_at,
        endpoints: reports,
        verdict,
        severity: verdict.severity(),
    })
}

fn evaluate_chain(
    endpoint: &str,
    chain: Vec<CertificateSnapshot>,
    thresholds: &Thresholds,
    now: f64,
) -> EndpointReport {
    info!("{}: {} certs", endpoint, chain.len());
    let certificates = chain
        .into_iter()
        .map(|certificate| {
            let validity = Validity::at(&certificate, now);
            info!("--------------------------------------");
            info!("Issuer: {}", certificate.issuer);
            info!("NotBefore: {}", certificate.not_before);
            info!("NotAfter: {}", certificate.not_after);
            info!("Valid since: {} days", validity.valid_since);
            info!("Valid for: {} days", validity.days_remaining);
            let severity = Verdict::default()
                .merge(thresholds.classify(validity.days_remaining))
                .severity();
            CertificateReport {
                certificate,
                validity,
                severity,
            }
        })
        .collect();

    EndpointReport {
        endpoint: endpoint.to_string(),
        certificates,
        error: None,
    }
}

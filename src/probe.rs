use crate::endpoint::split_host_port;
use crate::error::TLSValidationError;
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::error::ErrorStack;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use openssl::x509::{X509NameRef, X509Ref};
use serde::Serialize;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

const SECONDS_PER_DAY: i64 = 86_400;

/// Default bound on connecting and handshaking with one endpoint.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Read-only view of one peer certificate, taken right after the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSnapshot {
    pub subject: String,
    pub issuer: String,
    pub not_before: String,
    pub not_after: String,
    pub not_before_unix: i64,
    pub not_after_unix: i64,
    pub serial: String,
}

impl CertificateSnapshot {
    pub fn from_x509(cert: &X509Ref) -> Result<CertificateSnapshot, TLSValidationError> {
        Ok(CertificateSnapshot {
            subject: render_name(cert.subject_name()),
            issuer: render_name(cert.issuer_name()),
            not_before: cert.not_before().to_string(),
            not_after: cert.not_after().to_string(),
            not_before_unix: unix_seconds(cert.not_before())?,
            not_after_unix: unix_seconds(cert.not_after())?,
            serial: cert.serial_number().to_bn()?.to_hex_str()?.to_string(),
        })
    }
}

/// Anything that can hand back the peer certificate chain of an endpoint, leaf first.
pub trait CertificateSource {
    fn peer_chain(&self, addr: &str) -> Result<Vec<CertificateSnapshot>, TLSValidationError>;
}

/// Blocking OpenSSL client used against real endpoints.
#[derive(Debug, Clone)]
pub struct OpenSslProbe {
    insecure: bool,
    timeout: Duration,
}

impl OpenSslProbe {
    /// `insecure` skips chain trust and hostname verification. `timeout`
    /// bounds the TCP connect and every read or write of the handshake.
    pub fn new(insecure: bool, timeout: Duration) -> OpenSslProbe {
        OpenSslProbe { insecure, timeout }
    }

    fn connect_tcp(&self, host: &str, port: u16) -> Result<TcpStream, TLSValidationError> {
        let address = format!("{}:{}", host, port);
        let candidates: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| TLSValidationError::DnsResolution {
                hostname: host.to_string(),
                source,
            })?
            .collect();

        let mut last_error = None;
        for socket_addr in candidates {
            debug!("connecting to {}", socket_addr);
            match TcpStream::connect_timeout(&socket_addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        let source = last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")
        });
        if source.kind() == io::ErrorKind::TimedOut {
            return Err(TLSValidationError::Timeout {
                operation: format!("connect to {}", address),
            });
        }
        Err(TLSValidationError::ConnectionFailed { address, source })
    }

    fn connector(&self) -> Result<SslConnector, TLSValidationError> {
        let mut builder = SslConnector::builder(SslMethod::tls_client())?;
        if self.insecure {
            builder.set_verify(SslVerifyMode::NONE);
        }
        Ok(builder.build())
    }
}

impl CertificateSource for OpenSslProbe {
    fn peer_chain(&self, addr: &str) -> Result<Vec<CertificateSnapshot>, TLSValidationError> {
        let (host, port) = split_host_port(addr)?;
        let tcp_stream = self.connect_tcp(&host, port)?;

        let stream = self
            .connector()?
            .configure()?
            .verify_hostname(!self.insecure)
            .connect(&host, tcp_stream)?;

        // On the client side the chain includes the leaf.
        let chain = stream
            .ssl()
            .peer_cert_chain()
            .ok_or_else(|| TLSValidationError::CertificateError {
                reason: format!("{} sent no certificate chain", addr),
            })?;
        let snapshots = chain
            .iter()
            .map(CertificateSnapshot::from_x509)
            .collect::<Result<Vec<_>, _>>()?;

        if snapshots.is_empty() {
            return Err(TLSValidationError::CertificateError {
                reason: format!("{} sent an empty certificate chain", addr),
            });
        }
        Ok(snapshots)
    }
}

fn render_name(name: &X509NameRef) -> String {
    name.entries()
        .map(|entry| {
            let key = entry.object().nid().short_name().unwrap_or("?");
            let value = entry
                .data()
                .to_string()
                .unwrap_or_else(|_| String::from("<non-utf8>"));
            format!("{}={}", key, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn unix_seconds(time: &Asn1TimeRef) -> Result<i64, ErrorStack> {
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(time)?;
    Ok(i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs))
}

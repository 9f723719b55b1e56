//! # TLS Phase
//!
//! Full, verified handshake over a fresh connection. The platform trust
//! store is the only verification input; there is no bypass switch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use egressr_common::network::report::PhaseOutcome;

use crate::classify;

/// Handshake prober. Cheap to clone; every clone shares the one client
/// config built from the native trust store.
#[derive(Clone)]
pub struct TlsProbe {
    connector: TlsConnector,
}

impl TlsProbe {
    pub fn from_native_roots() -> anyhow::Result<Self> {
        let loaded = rustls_native_certs::load_native_certs();
        let mut roots: RootCertStore = RootCertStore::empty();
        let (added, _ignored) = roots.add_parsable_certificates(loaded.certs);
        anyhow::ensure!(
            added > 0,
            "no usable roots in the platform trust store ({} load errors)",
            loaded.errors.len()
        );

        let config: ClientConfig = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
        })
    }

    /// Connects and handshakes with `host` as the SNI name, verifying the
    /// chain and hostname. The single deadline covers connect plus
    /// handshake. Success reports the negotiated protocol and cipher.
    pub async fn handshake(&self, host: &str, port: u16, deadline: Duration) -> PhaseOutcome {
        let start: Instant = Instant::now();
        let attempt = tokio::time::timeout(deadline, self.try_handshake(host, port)).await;
        let elapsed: Duration = start.elapsed();

        match attempt {
            Ok(Ok(detail)) => PhaseOutcome::success(elapsed, detail),
            Ok(Err(err)) => PhaseOutcome::failure(elapsed, classify::simplify(&format!("{err:#}"))),
            Err(err) => PhaseOutcome::failure(elapsed, classify::simplify(&err.to_string())),
        }
    }

    async fn try_handshake(&self, host: &str, port: u16) -> anyhow::Result<String> {
        let stream: TcpStream = TcpStream::connect((host, port)).await?;
        let server_name: ServerName<'static> = ServerName::try_from(host.to_string())?;
        let tls = self.connector.connect(server_name, stream).await?;

        let (_io, session) = tls.get_ref();
        let version: String = session
            .protocol_version()
            .map(version_name)
            .unwrap_or_else(|| "TLS".to_string());
        let cipher: String = session
            .negotiated_cipher_suite()
            .map(|suite| format!("{:?}", suite.suite()))
            .unwrap_or_else(|| "unknown cipher".to_string());

        Ok(format!("{version}, {cipher}"))
    }
}

fn version_name(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_0 => "TLS 1.0".to_string(),
        ProtocolVersion::TLSv1_1 => "TLS 1.1".to_string(),
        ProtocolVersion::TLSv1_2 => "TLS 1.2".to_string(),
        ProtocolVersion::TLSv1_3 => "TLS 1.3".to_string(),
        other => format!("{other:?}"),
    }
}

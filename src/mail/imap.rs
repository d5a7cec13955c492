//! IMAP-backed mailbox counter.

use std::sync::Arc;
use std::time::Duration;

use async_imap::error::Error as ImapError;
use async_trait::async_trait;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use super::{login_name, resolve_server, MailError, MailboxCounter};
use crate::config::{CountMode, ImapServer, MailConfig};
use crate::logger;

type Session = async_imap::Session<TlsStream<TcpStream>>;

/// Counts messages over IMAP with implicit TLS.
pub struct ImapCounter {
    config: MailConfig,
    connector: TlsConnector,
}

impl ImapCounter {
    /// Build the counter, loading the system root certificates once.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let rustls_native_certs::CertificateResult { certs, errors, .. } =
            rustls_native_certs::load_native_certs();
        for err in &errors {
            logger::log_warning(&format!("Skipping root certificate source: {err}"));
        }

        let mut root_store = rustls::RootCertStore::empty();
        let (added, ignored) = root_store.add_parsable_certificates(certs);
        if added == 0 {
            return Err(MailError::Tls(
                "no usable system root certificates".to_string(),
            ));
        }
        logger::log_debug(&format!(
            "Loaded {added} root certificates ({ignored} ignored)"
        ));

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Ok(Self::with_connector(
            config,
            TlsConnector::from(Arc::new(tls_config)),
        ))
    }

    pub(crate) const fn with_connector(config: MailConfig, connector: TlsConnector) -> Self {
        Self { config, connector }
    }

    async fn connect_and_login(
        &self,
        server: &ImapServer,
        address: &str,
        password: &str,
    ) -> Result<Session, MailError> {
        let tcp_stream = TcpStream::connect((server.host.as_str(), server.port))
            .await
            .map_err(|source| MailError::Connect {
                host: server.host.clone(),
                port: server.port,
                source,
            })?;

        let server_name = ServerName::try_from(server.host.clone())
            .map_err(|_| MailError::Tls(format!("invalid DNS name: {}", server.host)))?;
        let tls_stream = self
            .connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| MailError::Tls(e.to_string()))?;

        let mut client = async_imap::Client::new(tls_stream);
        client
            .read_response()
            .await
            .ok_or(MailError::MissingGreeting)??;

        let user = login_name(server, address)?;
        client
            .login(user, password)
            .await
            .map_err(|(err, _client)| login_error(err))
    }

    async fn count_on(
        &self,
        server: &ImapServer,
        address: &str,
        password: &str,
    ) -> Result<u32, MailError> {
        let mut session = self.connect_and_login(server, address, password).await?;
        let status = session
            .status(&self.config.mailbox, "(MESSAGES UNSEEN)")
            .await?;

        if let Err(e) = session.logout().await {
            logger::log_debug(&format!("IMAP logout from {} failed: {e}", server.host));
        }

        Ok(select_count(self.config.count, status.exists, status.unseen))
    }
}

/// A tagged NO or BAD answer to LOGIN means the credentials were refused
fn login_error(err: ImapError) -> MailError {
    match err {
        ImapError::No(_) | ImapError::Bad(_) => MailError::Auth(err),
        other => MailError::Imap(other),
    }
}

/// A server may omit UNSEEN from the STATUS reply; that reads as zero
const fn select_count(mode: CountMode, exists: u32, unseen: Option<u32>) -> u32 {
    match (mode, unseen) {
        (CountMode::All, _) => exists,
        (CountMode::Unseen, Some(unseen)) => unseen,
        (CountMode::Unseen, None) => 0,
    }
}

#[async_trait]
impl MailboxCounter for ImapCounter {
    async fn count_inbox(&self, address: &str, password: &str) -> Result<u32, MailError> {
        let server = resolve_server(&self.config, address)?;
        let limit = Duration::from_secs(self.config.timeout_secs);

        logger::log_debug(&format!(
            "Counting {} on {}:{}",
            self.config.mailbox, server.host, server.port
        ));

        tokio::time::timeout(limit, self.count_on(&server, address, password))
            .await
            .map_err(|_| MailError::Timeout(limit))?
    }
}

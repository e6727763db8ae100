//! Session establishment for the SMTP and IMAP legs of a sender.
//!
//! The two production handles (`lettre`'s blocking [`SmtpTransport`] and the
//! `imap` crate's TLS [`Session`](imap::Session)) are wrapped behind the
//! [`SmtpSession`] and [`ImapSession`] traits so the orchestrator can be
//! exercised against recording fakes.

use std::net::TcpStream;

pub use lettre::address::Envelope;

use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{SmtpTransport, Transport};
use log::info;
use native_tls::{TlsConnector, TlsStream};

use crate::error::{Error, SessionError};

/// IMAP over implicit TLS.
const IMAP_TLS_PORT: u16 = 993;

/// Account credentials shared by both legs of a session pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// SMTP server hostname. The IMAP hostname is derived from it.
    pub server: String,
    /// SMTP submission port: 587 (STARTTLS) or 465 (implicit TLS).
    pub port: u16,
    pub login: String,
    pub password: String,
}

/// The concrete IMAP session type used in production.
pub type TlsImapSession = imap::Session<TlsStream<TcpStream>>;

/// Outbound mail transmission over an authenticated SMTP session.
pub trait SmtpSession {
    /// Transmits raw message bytes to every envelope recipient.
    fn send_raw(&mut self, envelope: &Envelope, message: &[u8]) -> Result<(), SessionError>;

    /// Whether the underlying connection still answers.
    fn is_connected(&mut self) -> bool;

    /// Politely terminates the session.
    fn quit(&mut self) -> Result<(), SessionError>;
}

/// The slice of IMAP used here: listing mailboxes and appending sent copies.
pub trait ImapSession {
    fn list_mailboxes(&mut self) -> Result<Vec<String>, SessionError>;

    fn append(&mut self, mailbox: &str, message: &[u8]) -> Result<(), SessionError>;

    fn logout(&mut self) -> Result<(), SessionError>;
}

impl SmtpSession for SmtpTransport {
    fn send_raw(&mut self, envelope: &Envelope, message: &[u8]) -> Result<(), SessionError> {
        Transport::send_raw(self, envelope, message)?;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.test_connection().unwrap_or(false)
    }

    fn quit(&mut self) -> Result<(), SessionError> {
        // The pooled transport issues QUIT on each open connection as it is
        // dropped, which happens when the owning sender relinquishes it.
        Ok(())
    }
}

impl ImapSession for TlsImapSession {
    fn list_mailboxes(&mut self) -> Result<Vec<String>, SessionError> {
        let names = self.list(None, Some("*"))?;
        Ok(names.iter().map(|name| name.name().to_string()).collect())
    }

    fn append(&mut self, mailbox: &str, message: &[u8]) -> Result<(), SessionError> {
        imap::Session::append(self, mailbox, message).map_err(SessionError::from)
    }

    fn logout(&mut self) -> Result<(), SessionError> {
        imap::Session::logout(self).map_err(SessionError::from)
    }
}

/// Derives the IMAP hostname from the SMTP one by replacing the first
/// occurrence of `"smtp"`, e.g. `smtp.example.com` -> `imap.example.com`.
pub fn imap_host_for(smtp_host: &str) -> String {
    smtp_host.replacen("smtp", "imap", 1)
}

/// TLS mode of the SMTP leg, selected from the submission port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SmtpMode {
    /// Plain connect, explicit TLS upgrade before authentication (port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    ImplicitTls,
}

/// Maps the submission port to its TLS mode. Any port other than 587 or 465
/// is a configuration error, raised before any socket is opened.
pub(crate) fn smtp_mode(port: u16) -> Result<SmtpMode, Error> {
    match port {
        587 => Ok(SmtpMode::StartTls),
        465 => Ok(SmtpMode::ImplicitTls),
        other => Err(Error::InvalidPort(other)),
    }
}

/// Connects and authenticates the SMTP leg.
///
/// The port picks the builder via [`smtp_mode`]. `lettre` transports connect
/// lazily, so the connection probe forces the handshake and authentication
/// here rather than on the first send.
pub(crate) fn connect_smtp(credentials: &Credentials) -> Result<SmtpTransport, Error> {
    let builder = match smtp_mode(credentials.port)? {
        SmtpMode::StartTls => {
            SmtpTransport::starttls_relay(&credentials.server).map_err(Error::SmtpConnect)?
        }
        SmtpMode::ImplicitTls => {
            SmtpTransport::relay(&credentials.server).map_err(Error::SmtpConnect)?
        }
    };

    let transport = builder
        .port(credentials.port)
        .credentials(SmtpCredentials::new(
            credentials.login.clone(),
            credentials.password.clone(),
        ))
        .build();

    if transport.test_connection().map_err(Error::SmtpConnect)? {
        info!(
            "connected to SMTP server {}:{}",
            credentials.server, credentials.port
        );
        Ok(transport)
    } else {
        Err(Error::SmtpRejected(credentials.server.clone()))
    }
}

/// Connects and authenticates the IMAP leg on port 993, TLS from the start.
pub(crate) fn connect_imap(credentials: &Credentials) -> Result<TlsImapSession, Error> {
    let host = imap_host_for(&credentials.server);
    let tls = TlsConnector::builder().build()?;

    let client = imap::connect((host.as_str(), IMAP_TLS_PORT), host.as_str(), &tls)
        .map_err(Error::ImapConnect)?;
    let session = client
        .login(&credentials.login, &credentials.password)
        .map_err(|(e, _)| Error::ImapConnect(e))?;

    info!("connected to IMAP server {host}:{IMAP_TLS_PORT}");
    Ok(session)
}

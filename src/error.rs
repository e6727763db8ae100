use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while connecting or while constructing a message.
///
/// Transmit and archive faults during a send are deliberately absent: those
/// are folded into the failure variant of the [`SendReport`] instead of being
/// raised, so a caller always gets a structured result for that class.
///
/// [`SendReport`]: crate::report::SendReport
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid SMTP port {0}: use 587 (STARTTLS) or 465 (implicit TLS)")]
    InvalidPort(u16),

    #[error("failed to connect to SMTP server: {0}")]
    SmtpConnect(#[source] lettre::transport::smtp::Error),

    #[error("SMTP server {0} rejected the connection probe")]
    SmtpRejected(String),

    #[error("failed to connect to IMAP server: {0}")]
    ImapConnect(#[source] imap::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("invalid address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("unreadable attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unreadable signature {path}: {source}")]
    Signature {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported attachment content type: {0}")]
    ContentType(String),

    #[error("sender is already closed")]
    Closed,
}

/// Faults raised by a live SMTP or IMAP session during a send or teardown.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    #[error("{0}")]
    Other(String),
}

//! Send-and-archive orchestration and session lifecycle.

use std::path::{Path, PathBuf};

use lettre::SmtpTransport;
use log::{error, info, warn};

use crate::error::{Error, SessionError};
use crate::folders::ProviderFolders;
use crate::message::{self, OutgoingMessage};
use crate::report::SendReport;
use crate::session::{self, Credentials, ImapSession, SmtpSession, TlsImapSession};

/// The paired SMTP and IMAP handles backing one sender.
///
/// Either both legs are live or neither is: construction fails outright when
/// one leg cannot be established, and teardown relinquishes both at once, so
/// a half-connected pair is unrepresentable.
enum SessionPair<T, S> {
    Connected { smtp: T, imap: S },
    Closed,
}

/// Sends email over SMTP and archives a copy to the account's IMAP sent
/// folder.
///
/// A sender holds one authenticated SMTP session and one authenticated IMAP
/// session against the same account, created together by [`connect`] and
/// released together by [`close`] (or on drop). It is synchronous and not
/// meant for concurrent use; give each worker its own sender or guard one
/// with a mutex.
///
/// [`connect`]: EmailSender::connect
/// [`close`]: EmailSender::close
pub struct EmailSender<T: SmtpSession = SmtpTransport, S: ImapSession = TlsImapSession> {
    login: String,
    signature_path: Option<PathBuf>,
    folders: ProviderFolders,
    sessions: SessionPair<T, S>,
}

impl EmailSender {
    /// Establishes both legs against the credentials' account.
    ///
    /// The SMTP leg is attempted first; failure of either leg aborts
    /// construction, so no partially connected sender ever escapes. A port
    /// other than 587 or 465 fails before any socket is opened.
    pub fn connect(
        credentials: Credentials,
        signature_path: Option<PathBuf>,
    ) -> Result<Self, Error> {
        let smtp = session::connect_smtp(&credentials)?;
        let imap = session::connect_imap(&credentials)?;
        info!("sending as {}", credentials.login);
        Ok(Self::from_parts(smtp, imap, credentials.login, signature_path))
    }
}

impl<T: SmtpSession, S: ImapSession> EmailSender<T, S> {
    /// Assembles a sender from already-established sessions.
    pub fn from_parts(
        smtp: T,
        imap: S,
        login: impl Into<String>,
        signature_path: Option<PathBuf>,
    ) -> Self {
        Self {
            login: login.into(),
            signature_path,
            folders: ProviderFolders::default(),
            sessions: SessionPair::Connected { smtp, imap },
        }
    }

    /// Replaces the provider table consulted during sent-folder resolution.
    pub fn with_provider_folders(mut self, folders: ProviderFolders) -> Self {
        self.folders = folders;
        self
    }

    /// Sends one message and archives a copy of it.
    ///
    /// Transmission strictly precedes archiving and each is attempted exactly
    /// once; there is no retry. Faults on either step are folded into a
    /// failure report rather than raised, so the caller always receives a
    /// [`SendReport`] once a message has been built. Only message
    /// construction itself (malformed address, unreadable attachment or
    /// signature) returns `Err`.
    pub fn send(
        &mut self,
        subject: &str,
        body: &str,
        to: &str,
        cc: Option<&str>,
        attachment_path: Option<&Path>,
    ) -> Result<SendReport, Error> {
        let outgoing = message::build_message(
            &self.login,
            subject,
            body,
            to,
            cc,
            attachment_path,
            self.signature_path.as_deref(),
        )?;

        let SessionPair::Connected { smtp, imap } = &mut self.sessions else {
            return Err(Error::Closed);
        };

        info!("sending {subject:?} to {to}");
        if let Err(e) = smtp.send_raw(&outgoing.envelope, &outgoing.raw) {
            let error = format!("failed to send email to {to}: {e}");
            error!("{error}");
            return Ok(SendReport::failed(outgoing.summary, false, error));
        }
        info!("email sent");

        match archive(imap, &self.folders, &outgoing) {
            Ok(folder) => Ok(SendReport::delivered(outgoing.summary, folder)),
            Err(e) => {
                let error = format!("failed to archive email to {to}: {e}");
                error!("{error}");
                Ok(SendReport::failed(outgoing.summary, true, error))
            }
        }
    }

    /// Releases both sessions. Idempotent and infallible: teardown faults are
    /// logged and swallowed, and the handles are relinquished whatever
    /// happens.
    ///
    /// For the production SMTP transport the QUIT itself rides the handle
    /// drop: the pooled connections disconnect as the transport is released
    /// at the end of this call.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.sessions, SessionPair::Closed) {
            SessionPair::Closed => {}
            SessionPair::Connected { mut smtp, mut imap } => {
                if smtp.is_connected() {
                    match smtp.quit() {
                        Ok(()) => info!("SMTP session closed"),
                        Err(e) => error!("error closing SMTP session: {e}"),
                    }
                } else {
                    warn!("SMTP connection already dropped, skipping QUIT");
                }

                match imap.logout() {
                    Ok(()) => info!("IMAP session closed"),
                    Err(e) => error!("error closing IMAP session: {e}"),
                }
                // Both handles go out of scope here regardless of the
                // teardown outcome.
            }
        }
    }
}

/// Resolves the sent folder against the live listing and appends the raw
/// message there. A listing without a sent folder skips the append and
/// reports `None`.
fn archive<S: ImapSession>(
    imap: &mut S,
    folders: &ProviderFolders,
    outgoing: &OutgoingMessage,
) -> Result<Option<String>, SessionError> {
    let listing = imap.list_mailboxes()?;
    match folders.resolve(&listing) {
        Some(folder) => {
            info!("archiving copy to {folder}");
            imap.append(&folder, &outgoing.raw)?;
            info!("copy archived");
            Ok(Some(folder))
        }
        None => {
            warn!("no sent folder in mailbox listing, skipping archive");
            Ok(None)
        }
    }
}

impl<T: SmtpSession, S: ImapSession> Drop for EmailSender<T, S> {
    fn drop(&mut self) {
        self.close();
    }
}

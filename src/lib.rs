//! Send email over SMTP and archive a copy to the account's IMAP Sent folder.
//!
//! The SMTP and IMAP exchanges are delegated to `lettre` and `imap`; this
//! crate only decides the TLS connection mode (STARTTLS on 587, implicit TLS
//! on 465), detects the provider-specific sent-folder name, and ties
//! transmission and archiving into one operation with a structured result.
//!
//! ```no_run
//! use archmail::{Credentials, EmailSender};
//!
//! # fn main() -> Result<(), archmail::Error> {
//! let mut sender = EmailSender::connect(
//!     Credentials {
//!         server: "smtp.example.com".to_string(),
//!         port: 587,
//!         login: "me@example.com".to_string(),
//!         password: "app-password".to_string(),
//!     },
//!     None,
//! )?;
//!
//! let report = sender.send("hello", "hi there", "you@example.com", None, None)?;
//! if !report.success() {
//!     eprintln!("send failed: {:?}", report.error_message());
//! }
//! sender.close();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod folders;
pub mod message;
pub mod report;
pub mod sender;
pub mod session;

pub use error::{Error, SessionError};
pub use folders::ProviderFolders;
pub use message::MessageSummary;
pub use report::{SendOutcome, SendReport, SEND_FAILURE_CODE};
pub use sender::EmailSender;
pub use session::{Credentials, ImapSession, SmtpSession, TlsImapSession};

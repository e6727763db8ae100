//! The structured result of one send attempt.

use crate::message::MessageSummary;

/// Error code carried by every failed send, mirroring an internal server
/// failure.
pub const SEND_FAILURE_CODE: u16 = 500;

/// Outcome of the send-and-archive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed { error: String, code: u16 },
}

/// Always returned by a send, on success or failure.
///
/// `delivered` and `archived` are reported separately: a failure during the
/// archive step happens after the message has already left over SMTP, so
/// `success() == false` does not imply the message was not delivered. Check
/// `delivered` to tell "not sent" apart from "sent but not archived".
#[derive(Debug, Clone)]
pub struct SendReport {
    pub message: MessageSummary,
    pub delivered: bool,
    pub archived: bool,
    /// Mailbox the copy was appended to; `None` when the listing has no
    /// recognizable sent folder and archiving was skipped.
    pub archive_folder: Option<String>,
    pub outcome: SendOutcome,
}

impl SendReport {
    pub(crate) fn delivered(message: MessageSummary, archive_folder: Option<String>) -> Self {
        Self {
            message,
            delivered: true,
            archived: archive_folder.is_some(),
            archive_folder,
            outcome: SendOutcome::Delivered,
        }
    }

    pub(crate) fn failed(message: MessageSummary, delivered: bool, error: String) -> Self {
        Self {
            message,
            delivered,
            archived: false,
            archive_folder: None,
            outcome: SendOutcome::Failed {
                error,
                code: SEND_FAILURE_CODE,
            },
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.outcome, SendOutcome::Delivered)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            SendOutcome::Delivered => None,
            SendOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn error_code(&self) -> Option<u16> {
        match &self.outcome {
            SendOutcome::Delivered => None,
            SendOutcome::Failed { code, .. } => Some(*code),
        }
    }
}

//! MIME message construction on top of `lettre`'s builder.
//!
//! Builds the transmittable message, its SMTP envelope with the fully
//! expanded recipient list, and a summary of the descriptive fields for the
//! send report. Unreadable attachment or signature files surface as errors
//! here, never as a silently degraded message.

use std::fs;
use std::path::{Path, PathBuf};

use lettre::address::Envelope;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};

use crate::error::Error;

/// Descriptive fields of a built message, echoed back in every send report.
#[derive(Debug, Clone)]
pub struct MessageSummary {
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub recipient: String,
    pub cc: Vec<String>,
    pub signature_path: Option<PathBuf>,
    pub attachment_path: Option<PathBuf>,
}

/// A message ready for transmission.
pub struct OutgoingMessage {
    pub envelope: Envelope,
    pub raw: Vec<u8>,
    pub summary: MessageSummary,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, Error> {
    let address = address.trim();
    address.parse().map_err(|source| Error::Address {
        address: address.to_string(),
        source,
    })
}

/// Renders the plain body plus an HTML signature fragment as the HTML
/// alternative.
fn html_body_with_signature(body: &str, signature: &str) -> String {
    format!("<p>{}</p>{}", body.replace('\n', "<br>"), signature)
}

/// Builds the full message.
///
/// `cc` is a comma-separated address string; every address in it joins the
/// envelope recipient list alongside the primary recipient. The signature
/// file, when given, is an HTML fragment appended below the body.
pub fn build_message(
    sender: &str,
    subject: &str,
    body: &str,
    to: &str,
    cc: Option<&str>,
    attachment_path: Option<&Path>,
    signature_path: Option<&Path>,
) -> Result<OutgoingMessage, Error> {
    let from = parse_mailbox(sender)?;
    let to_mailbox = parse_mailbox(to)?;

    let cc_addresses: Vec<String> = cc
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect();
    let cc_mailboxes = cc_addresses
        .iter()
        .map(|address| parse_mailbox(address))
        .collect::<Result<Vec<_>, _>>()?;

    let html_body = match signature_path {
        Some(path) => {
            let signature = fs::read_to_string(path).map_err(|source| Error::Signature {
                path: path.to_path_buf(),
                source,
            })?;
            Some(html_body_with_signature(body, &signature))
        }
        None => None,
    };

    let mut builder = Message::builder()
        .from(from)
        .to(to_mailbox)
        .subject(subject);
    for mailbox in &cc_mailboxes {
        builder = builder.cc(mailbox.clone());
    }

    let text_part = SinglePart::builder()
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string());
    let body_part = match &html_body {
        Some(html) => MultiPart::alternative().singlepart(text_part).singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html.clone()),
        ),
        None => MultiPart::alternative().singlepart(text_part),
    };

    let message = match attachment_path {
        Some(path) => {
            let content = fs::read(path).map_err(|source| Error::Attachment {
                path: path.to_path_buf(),
                source,
            })?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let content_type = ContentType::parse(mime.as_ref())
                .map_err(|_| Error::ContentType(mime.to_string()))?;

            builder.multipart(
                MultiPart::mixed()
                    .multipart(body_part)
                    .singlepart(Attachment::new(filename).body(content, content_type)),
            )?
        }
        None => builder.multipart(body_part)?,
    };

    let envelope = message.envelope().clone();
    let raw = message.formatted();

    Ok(OutgoingMessage {
        envelope,
        raw,
        summary: MessageSummary {
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            html_body,
            recipient: to.to_string(),
            cc: cc_addresses,
            signature_path: signature_path.map(Path::to_path_buf),
            attachment_path: attachment_path.map(Path::to_path_buf),
        },
    })
}

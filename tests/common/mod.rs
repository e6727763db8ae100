//! Recording fakes for the SMTP and IMAP session traits.
//!
//! Both fakes push into one shared call log so tests can assert the relative
//! order of transmit, archive and teardown operations.

use std::cell::RefCell;
use std::rc::Rc;

use archmail::session::Envelope;
use archmail::{ImapSession, SessionError, SmtpSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendRaw,
    ListMailboxes,
    Append(String),
    Quit,
    Logout,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    // Surfaces library log output under `cargo test -- --nocapture`.
    let _ = env_logger::builder().is_test(true).try_init();
    Rc::new(RefCell::new(Vec::new()))
}

pub struct FakeSmtp {
    log: CallLog,
    pub connected: bool,
    pub fail_send: bool,
}

impl FakeSmtp {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            connected: true,
            fail_send: false,
        }
    }
}

impl SmtpSession for FakeSmtp {
    fn send_raw(&mut self, _envelope: &Envelope, _message: &[u8]) -> Result<(), SessionError> {
        self.log.borrow_mut().push(Call::SendRaw);
        if self.fail_send {
            Err(SessionError::Other("454 connection dropped".to_string()))
        } else {
            Ok(())
        }
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn quit(&mut self) -> Result<(), SessionError> {
        self.log.borrow_mut().push(Call::Quit);
        Ok(())
    }
}

pub struct FakeImap {
    log: CallLog,
    pub mailboxes: Vec<String>,
    pub fail_append: bool,
}

impl FakeImap {
    pub fn new(log: &CallLog, mailboxes: &[&str]) -> Self {
        Self {
            log: log.clone(),
            mailboxes: mailboxes.iter().map(|m| m.to_string()).collect(),
            fail_append: false,
        }
    }
}

impl ImapSession for FakeImap {
    fn list_mailboxes(&mut self) -> Result<Vec<String>, SessionError> {
        self.log.borrow_mut().push(Call::ListMailboxes);
        Ok(self.mailboxes.clone())
    }

    fn append(&mut self, mailbox: &str, _message: &[u8]) -> Result<(), SessionError> {
        self.log.borrow_mut().push(Call::Append(mailbox.to_string()));
        if self.fail_append {
            Err(SessionError::Other("NO append failed".to_string()))
        } else {
            Ok(())
        }
    }

    fn logout(&mut self) -> Result<(), SessionError> {
        self.log.borrow_mut().push(Call::Logout);
        Ok(())
    }
}

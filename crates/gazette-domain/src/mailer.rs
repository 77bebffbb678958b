//! The mail-service boundary.
//!
//! Delivery itself is an external collaborator; the dispatcher only needs
//! something that accepts an [`Outbound`] message and either delivers it or
//! fails.  [`TracingMailer`] is the default implementation (and the hook
//! where a real transport plugs in); [`MemoryMailer`] records sends for
//! tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

/// A single outbound message with its full recipient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mail delivery failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The transport rejected or failed to deliver the message.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Something that can deliver an [`Outbound`] message.
pub trait Mailer: Send + Sync {
    fn send(&self, mail: &Outbound) -> Result<(), MailError>;
}

/// Mailer that logs deliveries instead of sending them.
#[derive(Debug, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send(&self, mail: &Outbound) -> Result<(), MailError> {
        tracing::info!(
            subject = %mail.subject,
            from = %mail.from,
            recipients = mail.to.len(),
            "delivering mail"
        );
        Ok(())
    }
}

/// Mailer that records every send in memory.  Test double.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Outbound>>,
    fail_next: AtomicUsize,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` send attempts fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Messages successfully sent so far.
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, mail: &Outbound) -> Result<(), MailError> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(MailError::Transport("injected failure".to_string()));
        }
        self.sent.lock().expect("mailer lock").push(mail.clone());
        Ok(())
    }
}

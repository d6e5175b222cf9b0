//! Outgoing mail.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::ServiceError;

/// Sends plain-text mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ServiceError>;
}

/// Mailer that only logs outgoing mail. Used when no mail transport is
/// configured.
#[derive(Debug, Clone)]
pub struct TracingMailer {
    from: String,
}

impl TracingMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl Default for TracingMailer {
    fn default() -> Self {
        Self::new("no-reply@library.local")
    }
}

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ServiceError> {
        tracing::info!(
            from = %self.from,
            to,
            subject,
            body_len = body.len(),
            "mail sent"
        );
        metrics::counter!("mails_sent_total").increment(1);
        Ok(())
    }
}

/// A mail handed to the [`InMemoryMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Default)]
struct InMemoryMailerState {
    sent: Vec<SentMail>,
    fail_on_send: bool,
}

/// In-memory mailer for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    state: Arc<RwLock<InMemoryMailerState>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mailer to fail on every send.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns every mail sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMail> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ServiceError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(ServiceError::Mail("Mail server unavailable".to_string()));
        }

        state.sent.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

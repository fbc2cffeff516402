//! Mailbox polling.
//!
//! Narrow interface over the product-request mailbox: fetch unread
//! messages as plain text. The production implementation speaks IMAP over
//! TLS; tests use a fake.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// IMAP over implicit TLS.
const IMAP_PORT: u16 = 993;

/// Errors that can occur while polling the mailbox.
#[derive(Error, Debug)]
pub enum MailboxError {
    /// No mailbox credentials are configured.
    #[error("Mailbox credentials are not configured")]
    NotConfigured,

    /// IMAP protocol or connection failure.
    #[error("IMAP error: {0}")]
    ImapError(String),

    /// A blocking task failed to complete.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl MailboxError {
    /// Create an IMAP error.
    pub fn imap(msg: impl Into<String>) -> Self {
        Self::ImapError(msg.into())
    }
}

/// A fetched email reduced to the fields extraction needs.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub from: String,
    pub content: String,
}

/// Source of unread product-request emails.
#[async_trait]
pub trait MailboxSource: Send + Sync {
    /// Fetch all unread messages, marking them read.
    async fn fetch_unread(&self) -> Result<Vec<EmailMessage>, MailboxError>;
}

/// Mailbox connection settings.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    pub server: String,
    pub user: String,
    pub password: String,
}

/// IMAP implementation of [`MailboxSource`].
///
/// Created with `None` when credentials are absent; fetching then fails
/// with [`MailboxError::NotConfigured`], which the API maps to 503.
pub struct ImapMailbox {
    config: Option<MailboxConfig>,
}

impl ImapMailbox {
    /// Create a mailbox source from optional credentials.
    pub fn new(config: Option<MailboxConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailboxSource for ImapMailbox {
    async fn fetch_unread(&self) -> Result<Vec<EmailMessage>, MailboxError> {
        let config = self.config.clone().ok_or(MailboxError::NotConfigured)?;

        // The imap crate is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || fetch_blocking(config))
            .await
            .map_err(|e| MailboxError::TaskError(e.to_string()))?
    }
}

/// Connect, fetch every unseen message, and reduce each to text.
fn fetch_blocking(config: MailboxConfig) -> Result<Vec<EmailMessage>, MailboxError> {
    let tls = native_tls::TlsConnector::builder()
        .build()
        .map_err(|e| MailboxError::imap(e.to_string()))?;

    let client = imap::connect((config.server.as_str(), IMAP_PORT), &config.server, &tls)
        .map_err(|e| MailboxError::imap(e.to_string()))?;

    let mut session = client
        .login(&config.user, &config.password)
        .map_err(|(e, _)| MailboxError::imap(e.to_string()))?;

    session
        .select("INBOX")
        .map_err(|e| MailboxError::imap(e.to_string()))?;

    let mut unseen: Vec<u32> = session
        .search("UNSEEN")
        .map_err(|e| MailboxError::imap(e.to_string()))?
        .into_iter()
        .collect();
    unseen.sort_unstable();

    if unseen.is_empty() {
        session.logout().ok();
        return Ok(Vec::new());
    }

    let sequence = unseen
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");

    // Fetching RFC822 (not PEEK) marks the messages seen, so each unread
    // request is processed exactly once.
    let fetches = session
        .fetch(sequence, "RFC822")
        .map_err(|e| MailboxError::imap(e.to_string()))?;

    let mut emails = Vec::with_capacity(fetches.len());
    for fetch in fetches.iter() {
        let Some(body) = fetch.body() else { continue };
        match mailparse::parse_mail(body) {
            Ok(parsed) => emails.push(to_message(&parsed)),
            Err(e) => warn!(error = %e, "Skipping unparseable message"),
        }
    }

    session.logout().ok();

    debug!(count = emails.len(), "Fetched unread emails");
    Ok(emails)
}

/// Reduce a parsed message to subject/from/text content.
fn to_message(parsed: &mailparse::ParsedMail<'_>) -> EmailMessage {
    use mailparse::MailHeaderMap;

    EmailMessage {
        subject: parsed
            .headers
            .get_first_value("Subject")
            .unwrap_or_default(),
        from: parsed.headers.get_first_value("From").unwrap_or_default(),
        content: extract_text(parsed),
    }
}

/// Pull the text content out of a possibly-multipart message, preferring
/// a text/plain part.
fn extract_text(parsed: &mailparse::ParsedMail<'_>) -> String {
    if parsed.subparts.is_empty() {
        return parsed.get_body().unwrap_or_default();
    }

    for part in &parsed.subparts {
        if part.ctype.mimetype.starts_with("text/plain") {
            return part.get_body().unwrap_or_default();
        }
    }

    parsed
        .subparts
        .first()
        .map(|part| part.get_body().unwrap_or_default())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_mailbox() {
        let mailbox = ImapMailbox::new(None);
        let result = mailbox.fetch_unread().await;
        assert!(matches!(result, Err(MailboxError::NotConfigured)));
    }

    #[test]
    fn test_to_message_plain() {
        let raw = concat!(
            "Subject: Need laptops\r\n",
            "From: buyer@example.com\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "We need 5 laptops with 16GB RAM.\r\n",
        );

        let parsed = mailparse::parse_mail(raw.as_bytes()).unwrap();
        let message = to_message(&parsed);

        assert_eq!(message.subject, "Need laptops");
        assert_eq!(message.from, "buyer@example.com");
        assert!(message.content.contains("5 laptops"));
    }

    #[test]
    fn test_extract_text_prefers_plain_part() {
        let raw = concat!(
            "Subject: Mixed\r\n",
            "Content-Type: multipart/alternative; boundary=\"sep\"\r\n",
            "\r\n",
            "--sep\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>ignored</p>\r\n",
            "--sep\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain wins\r\n",
            "--sep--\r\n",
        );

        let parsed = mailparse::parse_mail(raw.as_bytes()).unwrap();
        assert!(extract_text(&parsed).contains("plain wins"));
    }
}

//! Outgoing mail contract

use async_trait::async_trait;

use super::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingMail {
    /// Mail carrying an exported playlist as `playlist.json`
    pub fn export_playlist(target_email: &str, content: String) -> Self {
        Self {
            to: target_email.to_string(),
            subject: "Export Playlist".to_string(),
            text: "Here is your requested export playlist".to_string(),
            attachments: vec![MailAttachment {
                filename: "playlist.json".to_string(),
                content_type: "application/json".to_string(),
                content,
            }],
        }
    }
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DomainError>;
}

//! SMTP MailSender

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::{DomainError, MailSender, OutgoingMail};
use crate::infrastructure::config::MailConfig;

pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailSender {
    pub fn new(config: &MailConfig) -> Result<Self, DomainError> {
        let builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| DomainError::Internal(format!("smtp relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let builder = builder.port(config.port);
        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| DomainError::Validation(format!("MAIL_FROM: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn build_message(from: Mailbox, mail: OutgoingMail) -> Result<Message, DomainError> {
    let to = mail
        .to
        .parse::<Mailbox>()
        .map_err(|e| DomainError::Validation(format!("recipient {}: {}", mail.to, e)))?;

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(mail.text));
    for attachment in mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| DomainError::Internal(format!("content type: {}", e)))?;
        body = body.singlepart(
            Attachment::new(attachment.filename).body(attachment.content, content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject)
        .multipart(body)
        .map_err(|e| DomainError::Internal(format!("mail build: {}", e)))
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DomainError> {
        let recipient = mail.to.clone();
        let message = build_message(self.from.clone(), mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DomainError::Transient(format!("smtp: {}", e)))?;

        tracing::debug!("Mail to {} accepted: {:?}", recipient, response.code());
        Ok(())
    }
}

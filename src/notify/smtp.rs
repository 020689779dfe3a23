//! SMTP delivery through `lettre`.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::debug;

use crate::config::{SmtpConfig, SmtpSecurity, SMTP_TIMEOUT};
use crate::error_handling::DeliveryError;

use super::{Email, Notifier};

/// Sends email through one configured SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Builds the relay transport. No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        if config.host.is_empty() {
            return Err(DeliveryError::NotConfigured("SMTP host is empty"));
        }

        let from = Mailbox::new(
            (!config.from_name.is_empty()).then(|| config.from_name.clone()),
            parse_address(&config.from_address)?,
        );

        let builder = match config.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let mut builder = builder.port(config.port).timeout(Some(SMTP_TIMEOUT));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        debug!(
            "SMTP relay {}:{} ({:?})",
            config.host, config.port, config.security
        );
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: Email) -> Result<Message, DeliveryError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, parse_address(&email.to)?))
            .subject(email.subject);

        let message = match email.attachment {
            None => builder.header(ContentType::TEXT_PLAIN).body(email.body)?,
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    DeliveryError::Attachment {
                        path: attachment.filename.clone().into(),
                        reason: e.to_string(),
                    }
                })?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(email.body))
                        .singlepart(
                            Attachment::new(attachment.filename)
                                .body(attachment.content, content_type),
                        ),
                )?
            }
        };
        Ok(message)
    }
}

impl Notifier for SmtpNotifier {
    async fn send(&self, email: Email) -> Result<(), DeliveryError> {
        let message = self.build_message(email)?;
        let response = self.transport.send(message).await?;
        debug!("SMTP relay answered {}", response.code());
        Ok(())
    }
}

fn parse_address(address: &str) -> Result<Address, DeliveryError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|source| DeliveryError::Address {
            address: address.to_string(),
            source,
        })
}

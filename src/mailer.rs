//! Mail-sending collaborator.

use crate::config::Config;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Trait defining the outbound mail interface.
///
/// The dispatcher only depends on this trait, so tests can substitute
/// a recording or failing double for the SMTP relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempts to deliver a single message.
    async fn send(&self, message: Message) -> Result<(), crate::error::Error>;
}

/// Production mailer delivering through an SMTP relay over TLS.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the relay transport from configuration.
    ///
    /// Every delivery attempt is bounded by the configured timeout so a
    /// stalled relay cannot hold a request handler indefinitely.
    pub fn from_config(config: &Config) -> Result<Self, crate::error::Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ))
            .timeout(Some(config.send_timeout()))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<(), crate::error::Error> {
        self.transport.send(message).await?;
        Ok(())
    }
}

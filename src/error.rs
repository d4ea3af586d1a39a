//! Error types.

/// Error type for contactmail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Contactmail config is invalid: {0}")]
    Config(#[from] serini::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build mail message: {0}")]
    MailBuild(#[from] lettre::error::Error),
    #[error("Failed to send mail: {0}")]
    MailSend(#[from] lettre::transport::smtp::Error),
}

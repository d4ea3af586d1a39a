//! Dispatch of accepted submissions to the mail collaborator.
//!
//! Two deliveries per accepted submission: a notification to the site
//! operator and an acknowledgment back to the submitter. Both are
//! best-effort: a failed delivery is logged and absorbed, the caller
//! still gets a success verdict because the submission was accepted at
//! the application boundary.

use crate::config::Config;
use crate::mailer::Mailer;
use crate::submission::Submission;
use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use std::sync::Arc;

const CONFIRMATION: &str = "Message sent! You will get a reply soon.";
const UNSPECIFIED_PROJECT: &str = "General inquiry";

/// Caller-visible verdict for one accepted submission.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message: String,
}

/// Orchestrates the two mail deliveries for accepted submissions.
pub struct ContactDispatcher {
    config: Arc<Config>,
    mailer: Arc<dyn Mailer>,
}

impl ContactDispatcher {
    pub fn new(config: Arc<Config>, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    /// Attempt both deliveries and report intake success.
    ///
    /// The two sends are independent; neither failure changes the outcome.
    pub async fn dispatch(&self, submission: &Submission, client_id: &str) -> DispatchOutcome {
        log::info!(
            "Accepted submission from <{}> (client {})",
            submission.email,
            client_id
        );

        let (notification, acknowledgment) = tokio::join!(
            self.send_operator_notification(submission, client_id),
            self.send_acknowledgment(submission),
        );

        if let Err(e) = notification {
            log::warn!("Failed to deliver operator notification: {e}");
        }
        if let Err(e) = acknowledgment {
            log::warn!(
                "Failed to deliver acknowledgment to <{}>: {e}",
                submission.email
            );
        }

        DispatchOutcome {
            success: true,
            message: CONFIRMATION.to_string(),
        }
    }

    async fn send_operator_notification(
        &self,
        submission: &Submission,
        client_id: &str,
    ) -> Result<(), crate::error::Error> {
        let project_type = submission
            .project_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNSPECIFIED_PROJECT);

        let message = Message::builder()
            .from(self.from_mailbox()?)
            .reply_to(submitter_mailbox(submission)?)
            .to(self.config.operator_address.parse()?)
            .subject(format!(
                "New inquiry from {} - {}",
                submission.name, project_type
            ))
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "New contact form submission ({site})\n\
                 \n\
                 Name: {name}\n\
                 Email: {email}\n\
                 Project type: {project_type}\n\
                 \n\
                 Message:\n\
                 {body}\n\
                 \n\
                 ---\n\
                 Sent: {timestamp}\n\
                 Client: {client_id}\n",
                site = self.config.site_name,
                name = submission.name,
                email = submission.email,
                body = submission.message,
                timestamp = chrono::Utc::now().to_rfc3339(),
            ))?;

        self.mailer.send(message).await
    }

    async fn send_acknowledgment(
        &self,
        submission: &Submission,
    ) -> Result<(), crate::error::Error> {
        let message = Message::builder()
            .from(self.from_mailbox()?)
            .to(submitter_mailbox(submission)?)
            .subject(format!(
                "Thank you for your message - {}",
                self.config.site_name
            ))
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Hi {name},\n\
                 \n\
                 Thank you for reaching out. Your message has been received\n\
                 and you will get a reply as soon as possible, usually within\n\
                 24 hours.\n\
                 \n\
                 Your message:\n\
                 {body}\n\
                 \n\
                 Best regards,\n\
                 {site}\n",
                name = submission.name,
                body = submission.message,
                site = self.config.site_name,
            ))?;

        self.mailer.send(message).await
    }

    fn from_mailbox(&self) -> Result<Mailbox, crate::error::Error> {
        Ok(Mailbox::new(
            Some(self.config.site_name.clone()),
            self.config.from_address().parse()?,
        ))
    }
}

fn submitter_mailbox(submission: &Submission) -> Result<Mailbox, crate::error::Error> {
    Ok(Mailbox::new(
        Some(submission.name.clone()),
        submission.email.parse()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::testing::{FailingMailer, RecordingMailer};
    use testresult::TestResult;

    fn test_config() -> Arc<Config> {
        Arc::new(crate::config::testing::test_config())
    }

    fn test_submission() -> Submission {
        Submission {
            name: "Ola Nordmann".to_string(),
            email: "ola@example.com".to_string(),
            project_type: None,
            message: "Jeg vil ha en nettside".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_two_mails() -> TestResult {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = ContactDispatcher::new(test_config(), mailer.clone());

        let outcome = dispatcher.dispatch(&test_submission(), "203.0.113.7").await;

        assert!(outcome.success);
        assert_eq!(outcome.message, CONFIRMATION);

        let sent = mailer.sent_messages();
        assert_eq!(sent.len(), 2);
        let recipients: Vec<String> = sent
            .iter()
            .flat_map(|m| m.envelope().to().iter().map(|a| a.to_string()))
            .collect();
        assert!(recipients.contains(&"owner@example.org".to_string()));
        assert!(recipients.contains(&"ola@example.com".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_acknowledgment_echoes_message() -> TestResult {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = ContactDispatcher::new(test_config(), mailer.clone());

        dispatcher.dispatch(&test_submission(), "203.0.113.7").await;

        let sent = mailer.sent_messages();
        let ack = sent
            .iter()
            .find(|m| {
                m.envelope()
                    .to()
                    .iter()
                    .any(|a| a.to_string() == "ola@example.com")
            })
            .expect("no acknowledgment sent");
        let formatted = String::from_utf8(ack.formatted())?;
        assert!(formatted.contains("Jeg vil ha en nettside"));
        assert!(formatted.contains("Hi Ola Nordmann"));
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_carries_metadata() -> TestResult {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = ContactDispatcher::new(test_config(), mailer.clone());

        dispatcher.dispatch(&test_submission(), "203.0.113.7").await;

        let sent = mailer.sent_messages();
        let notification = sent
            .iter()
            .find(|m| {
                m.envelope()
                    .to()
                    .iter()
                    .any(|a| a.to_string() == "owner@example.org")
            })
            .expect("no operator notification sent");
        let formatted = String::from_utf8(notification.formatted())?;
        assert!(formatted.contains("Client: 203.0.113.7"));
        assert!(formatted.contains("ola@example.com"));
        assert!(formatted.contains("Project type: General inquiry"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_failures_do_not_fail_dispatch() {
        let dispatcher = ContactDispatcher::new(test_config(), Arc::new(FailingMailer));

        let outcome = dispatcher.dispatch(&test_submission(), "203.0.113.7").await;

        assert!(outcome.success);
        assert_eq!(outcome.message, CONFIRMATION);
    }
}

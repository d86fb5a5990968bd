use crate::config::MailSettings;
use crate::models::{BloodRequest, Donor};
use crate::services::mailer::{MailClient, MailError, OutgoingMail};

pub const MATCH_SUBJECT: &str = "RedConnect: Blood Request Match";

/// What happened to the optional email of a notification pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    NotConfigured,
    NoRecipients,
    Sent { recipients: usize },
    Failed,
}

/// Summary of one notification pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReport {
    pub logged: usize,
    pub email: EmailOutcome,
}

/// Tells matched donors about a blood request
///
/// Each match is logged. When a mail relay is configured, one message goes
/// out to every matched donor with an email address. Failures are logged and
/// never reach the caller.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    mailer: Option<MailClient>,
}

impl Notifier {
    pub fn new(mailer: Option<MailClient>) -> Self {
        Self { mailer }
    }

    /// Log-only notifier
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    /// Build a notifier from settings, falling back to log-only when mail is
    /// not configured
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        match MailClient::from_settings(settings) {
            Ok(client) => Ok(Self::new(Some(client))),
            Err(MailError::NotConfigured) => Ok(Self::disabled()),
            Err(e) => Err(e),
        }
    }

    pub fn mail_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn notify(&self, donors: &[Donor], request: &BloodRequest) -> NotificationReport {
        for donor in donors {
            tracing::info!(
                "Notify {} ({}/{}) about request {}",
                donor.full_name,
                donor.email,
                donor.phone,
                request.id
            );
        }

        let email = match &self.mailer {
            None => EmailOutcome::NotConfigured,
            Some(mailer) => self.send_email(mailer, donors, request).await,
        };

        NotificationReport {
            logged: donors.len(),
            email,
        }
    }

    async fn send_email(
        &self,
        mailer: &MailClient,
        donors: &[Donor],
        request: &BloodRequest,
    ) -> EmailOutcome {
        let recipients: Vec<String> = donors
            .iter()
            .map(|d| d.email.trim())
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect();

        if recipients.is_empty() {
            return EmailOutcome::NoRecipients;
        }

        let count = recipients.len();
        let mail = OutgoingMail {
            from: mailer.default_sender().to_string(),
            to: recipients,
            subject: MATCH_SUBJECT.to_string(),
            text: match_body(request),
        };

        match mailer.send(&mail).await {
            Ok(()) => {
                tracing::info!("Match email for request {} sent to {} donors", request.id, count);
                EmailOutcome::Sent { recipients: count }
            }
            Err(e) => {
                tracing::warn!("Notification send failed: {}", e);
                EmailOutcome::Failed
            }
        }
    }
}

/// Body of the match email
pub fn match_body(request: &BloodRequest) -> String {
    format!(
        "A patient in {} needs {}. Please check RedConnect.",
        request.city, request.blood_group_needed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodGroup;
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    fn donor(name: &str, email: &str) -> Donor {
        Donor {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: email.to_string(),
            phone: "9000000000".to_string(),
            blood_group: BloodGroup::ONegative,
            date_of_birth: None,
            city: "Mumbai".to_string(),
            region: None,
            available: true,
            last_donation_date: None,
            created_at: Utc::now(),
        }
    }

    fn request() -> BloodRequest {
        BloodRequest {
            id: Uuid::new_v4(),
            patient_name: "Priya Sharma".to_string(),
            contact_person: "Vikram".to_string(),
            email: None,
            phone: "9222222222".to_string(),
            blood_group_needed: BloodGroup::ONegative,
            units_required: 1,
            hospital_name: "General Care".to_string(),
            city: "Mumbai".to_string(),
            created_at: Utc::now(),
        }
    }

    fn notifier_for(url: String) -> Notifier {
        let client = MailClient::new(
            url,
            "mailer".to_string(),
            Some("pw".to_string()),
            "no-reply@redconnect.local".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        Notifier::new(Some(client))
    }

    #[test]
    fn test_match_body() {
        assert_eq!(
            match_body(&request()),
            "A patient in Mumbai needs O-. Please check RedConnect."
        );
    }

    #[tokio::test]
    async fn test_disabled_only_logs() {
        let donors = vec![donor("Rahul", "rahul@example.com")];
        let report = Notifier::disabled().notify(&donors, &request()).await;

        assert_eq!(report.logged, 1);
        assert_eq!(report.email, EmailOutcome::NotConfigured);
    }

    #[test]
    fn test_from_default_settings_is_log_only() {
        let notifier = Notifier::from_settings(&MailSettings::default()).unwrap();
        assert!(!notifier.mail_enabled());
    }

    #[tokio::test]
    async fn test_one_mail_for_all_recipients() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "to": ["rahul@example.com", "ravi@example.com"],
                "subject": MATCH_SUBJECT,
            })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let donors = vec![
            donor("Rahul", "rahul@example.com"),
            donor("Ravi", "ravi@example.com"),
            donor("Rita", ""),
        ];
        let report = notifier_for(server.url()).notify(&donors, &request()).await;

        mock.assert_async().await;
        assert_eq!(report.logged, 3);
        assert_eq!(report.email, EmailOutcome::Sent { recipients: 2 });
    }

    #[tokio::test]
    async fn test_no_mail_without_recipients() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .expect(0)
            .create_async()
            .await;

        let report = notifier_for(server.url()).notify(&[], &request()).await;

        mock.assert_async().await;
        assert_eq!(report.email, EmailOutcome::NoRecipients);
    }

    #[tokio::test]
    async fn test_relay_failure_is_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(500)
            .create_async()
            .await;

        let donors = vec![donor("Rahul", "rahul@example.com")];
        let report = notifier_for(server.url()).notify(&donors, &request()).await;

        assert_eq!(report.email, EmailOutcome::Failed);
    }
}

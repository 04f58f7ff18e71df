use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use tracing::info;

use super::domain::CandidateRecord;
use crate::config::SmtpConfig;

/// Outbound hook for tier result messages (e.g., SMTP or a test double).
pub trait NotificationSender: Send + Sync {
    fn send(&self, message: &TierResultMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("could not build message: {0}")]
    Build(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Rendered result message for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierResultMessage {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl TierResultMessage {
    pub fn for_candidate(record: &CandidateRecord) -> Self {
        let tier = record.tier();
        let definition = tier.definition();
        let skills = record.skills.labelled();

        let mut html = String::new();
        html.push_str("<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n");
        html.push_str("<h1>Skills Assessment Results</h1>\n");
        html.push_str(&format!("<p>Dear {},</p>\n", escape_html(&record.name)));
        html.push_str("<p>Thank you for completing our skills assessment. Based on your responses, you have been assigned to:</p>\n");
        html.push_str(&format!(
            "<h2>Tier {}</h2>\n<h3>{}</h3>\n<p>{}</p>\n",
            tier, definition.title, definition.description
        ));
        html.push_str("<h3>Your Skills Summary:</h3>\n<ul>\n");
        for (label, declared) in skills {
            html.push_str(&format!("<li>{label}: {}</li>\n", mark(declared)));
        }
        html.push_str("</ul>\n<p>We will be in touch soon with next steps based on your tier assignment.</p>\n</div>\n");

        let mut text = format!(
            "Dear {},\n\nBased on your responses you have been assigned to Tier {}.\n{}\n{}\n\nYour skills summary:\n",
            record.name, tier, definition.title, definition.description
        );
        for (label, declared) in skills {
            text.push_str(&format!("- {label}: {}\n", if declared { "yes" } else { "no" }));
        }
        text.push_str("\nWe will be in touch soon with next steps based on your tier assignment.\n");

        Self {
            recipient_name: record.name.clone(),
            recipient_email: record.email.clone(),
            subject: format!("Your Skills Assessment Results - Tier {tier}"),
            html,
            text,
        }
    }
}

fn mark(declared: bool) -> &'static str {
    if declared {
        "&#9989;"
    } else {
        "&#10060;"
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Delivers messages through an authenticated STARTTLS relay.
pub struct SmtpNotifier {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|err| NotifyError::Address {
                address: config.from.clone(),
                reason: err.to_string(),
            })?;

        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { from, transport })
    }
}

impl NotificationSender for SmtpNotifier {
    fn send(&self, message: &TierResultMessage) -> Result<(), NotifyError> {
        let address = message
            .recipient_email
            .parse::<Address>()
            .map_err(|err| NotifyError::Address {
                address: message.recipient_email.clone(),
                reason: err.to_string(),
            })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(message.recipient_name.clone()), address))
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))
            .map_err(|err| NotifyError::Build(err.to_string()))?;

        let response = self
            .transport
            .send(&email)
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        info!(
            recipient = %message.recipient_email,
            code = %response.code(),
            "tier result email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::candidates::domain::{CandidateDraft, CandidateId, SkillSet};
    use chrono::Utc;

    fn record(name: &str, skills: SkillSet) -> CandidateRecord {
        CandidateRecord::new(
            CandidateId(9),
            CandidateDraft {
                name: name.to_string(),
                email: "ada@example.com".to_string(),
                contact: None,
                skills,
            },
            Utc::now(),
        )
    }

    #[test]
    fn message_names_tier_and_skills() {
        let skills = SkillSet {
            knows_golang: true,
            knows_system_design: true,
            ..SkillSet::default()
        };
        let message = TierResultMessage::for_candidate(&record("Ada", skills));

        assert_eq!(message.subject, "Your Skills Assessment Results - Tier 5");
        assert_eq!(message.recipient_email, "ada@example.com");
        assert!(message.html.contains("Tier 5 - Architect/Lead Developer"));
        assert!(message.text.contains("- Golang: yes"));
        assert!(message.text.contains("- React/Next.js: no"));
    }

    #[test]
    fn html_escapes_candidate_name() {
        let message =
            TierResultMessage::for_candidate(&record("<b>Ada</b>", SkillSet::default()));
        assert!(message.html.contains("Dear &lt;b&gt;Ada&lt;/b&gt;,"));
        assert!(!message.html.contains("<b>Ada</b>"));
    }
}

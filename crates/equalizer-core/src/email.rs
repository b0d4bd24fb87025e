use serde::{Deserialize, Serialize};

/// Negotiation email drafted from the unfair clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub email_subject: String,
    pub email_body: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub closing_recommendation: String,
}

impl EmailDraft {
    /// Subject line and body, formatted for pasting into a mail client.
    pub fn clipboard_text(&self) -> String {
        format!("Subject: {}\n\n{}", self.email_subject, self.email_body)
    }
}

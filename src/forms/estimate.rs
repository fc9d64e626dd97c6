use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Body of `POST /estimate`. Field names follow the job protocol, so they are
/// camelCase on the wire. The attachment is a URL into external object
/// storage; raw file bytes never pass through this service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitEstimateForm {
    #[validate(min_length = 1)]
    pub message: String,
    #[validate(min_length = 1)]
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "attachmentUrl", default)]
    pub attachment_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_valid::Validate;

    #[test]
    fn accepts_message_and_session() {
        let form: SubmitEstimateForm = serde_json::from_value(serde_json::json!({
            "message": "Estimate cost for a 2,500 sq ft custom home",
            "sessionId": "b51e5d45-7b9c-4a44-9af9-9f6d1f7c41a0"
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        assert!(form.attachment_url.is_none());
    }

    #[test]
    fn accepts_attachment_url() {
        let form: SubmitEstimateForm = serde_json::from_value(serde_json::json!({
            "message": "Estimate from the attached plans",
            "sessionId": "s-1",
            "attachmentUrl": "https://storage.example.com/plans.pdf"
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(
            form.attachment_url.as_deref(),
            Some("https://storage.example.com/plans.pdf")
        );
    }

    #[test]
    fn rejects_empty_message() {
        let form: SubmitEstimateForm = serde_json::from_value(serde_json::json!({
            "message": "",
            "sessionId": "s-1"
        }))
        .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn rejects_empty_session_id() {
        let form: SubmitEstimateForm = serde_json::from_value(serde_json::json!({
            "message": "hi",
            "sessionId": ""
        }))
        .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn missing_message_fails_deserialization() {
        let parsed = serde_json::from_value::<SubmitEstimateForm>(serde_json::json!({
            "sessionId": "s-1"
        }));
        assert!(parsed.is_err());
    }
}

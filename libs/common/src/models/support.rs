//! Support and feedback models

use serde::{Deserialize, Serialize};

/// Category of a support inquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    TechnicalIssue,
    BillingQuestion,
    FeatureRequest,
    GeneralInquiry,
    AccountAccess,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::TechnicalIssue => "technical_issue",
            InquiryType::BillingQuestion => "billing_question",
            InquiryType::FeatureRequest => "feature_request",
            InquiryType::GeneralInquiry => "general_inquiry",
            InquiryType::AccountAccess => "account_access",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
    }
}

/// File attached to a support request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Contact-support form submission, sent as multipart
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSupportRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub attachment: Option<Attachment>,
}

impl ContactSupportRequest {
    /// Text fields in multipart order
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("subject", self.subject.clone()),
            ("inquiryType", self.inquiry_type.as_str().to_string()),
            ("message", self.message.clone()),
        ]
    }
}

/// Category of product feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Suggestion,
    BugReport,
    Compliment,
    Other,
}

/// Feedback form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub feedback_type: FeedbackType,
    /// Optional reply address; empty means anonymous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Acknowledgement returned by write endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

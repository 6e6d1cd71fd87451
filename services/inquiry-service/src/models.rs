use serde::Serialize;

/// A contact-form submission that has passed validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// One field-level violation, shaped like the `detail` entries API clients
/// already parse: `{"type": ..., "loc": [...], "msg": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &str, kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            kind,
            loc: vec![field.to_string()],
            msg: msg.into(),
        }
    }
}

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct InquiryResponse {
    pub status: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(&'static str),
    Fields(Vec<FieldError>),
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: &'static str,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

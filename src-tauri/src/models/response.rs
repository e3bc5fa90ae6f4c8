use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, message: None }
    }

    /// Attaches a message the frontend shows to the user as-is.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_omitted_when_absent() {
        let json = serde_json::to_string(&SuccessResponse::new(3)).unwrap();
        assert_eq!(json, r#"{"data":3}"#);
    }

    #[test]
    fn test_message_included() {
        let json = serde_json::to_string(&SuccessResponse::with_message(2, "Imported 2 student(s).")).unwrap();
        assert_eq!(json, r#"{"data":2,"message":"Imported 2 student(s)."}"#);
    }
}

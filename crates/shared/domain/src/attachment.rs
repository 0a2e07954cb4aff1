//! Attachment entity and upload DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::MAX_ATTACHMENT_BYTES;

/// Stored binary resource. Owned by the entity that uploaded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    /// Name the file was uploaded with
    pub file_name: String,
    /// Location of the stored bytes
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: 0,
            file_name: file_name.into(),
            file_path: file_path.into(),
            created_at: Utc::now(),
        }
    }
}

/// Upload payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttachmentCreationDto {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(custom(function = "validate_content"))]
    pub content: Vec<u8>,
}

impl AttachmentCreationDto {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Extension of the uploaded file name, lowercased, if it has one
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

fn validate_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.is_empty() {
        let mut err = ValidationError::new("empty");
        err.message = Some("attachment content must not be empty".into());
        return Err(err);
    }
    if content.len() > MAX_ATTACHMENT_BYTES {
        let mut err = ValidationError::new("too_large");
        err.message = Some("attachment exceeds the maximum upload size".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentResultDto {
    pub id: i64,
    pub file_name: String,
    pub file_path: String,
}

impl From<&Attachment> for AttachmentResultDto {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id,
            file_name: attachment.file_name.clone(),
            file_path: attachment.file_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let dto = AttachmentCreationDto::new("Photo.PNG", vec![1u8]);
        assert_eq!(dto.extension().as_deref(), Some("png"));
        assert_eq!(AttachmentCreationDto::new("README", vec![1u8]).extension(), None);
    }

    #[test]
    fn test_empty_content_is_invalid() {
        let dto = AttachmentCreationDto::new("a.png", Vec::new());
        assert!(dto.validate().is_err());
    }
}

use thiserror::Error;

use crate::services::StoreError;

/// Failure of a registry operation at the request boundary
///
/// Validation failures are reported back to the submitter verbatim. Storage
/// failures are logged and shown as a generic message.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RegistryError {
    pub fn validation(message: impl Into<String>) -> Self {
        RegistryError::Validation(message.into())
    }

    /// Message safe to show to the person who submitted the form
    pub fn user_message(&self) -> String {
        match self {
            RegistryError::Validation(message) => format!("Error: {}", message),
            RegistryError::Storage(_) => {
                "Error: your submission could not be saved, please try again later".to_string()
            }
        }
    }
}

impl From<validator::ValidationErrors> for RegistryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {}", field, detail)
            })
            .collect();
        fields.sort();
        RegistryError::Validation(fields.join("; "))
    }
}

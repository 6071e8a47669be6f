use super::error::AccessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ClientError, // bad or unauthorized requests
    ServerError, // configuration, storage and IO failures
}

impl AccessError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::InsufficientPrivilege(_) => "ACCESS_DENIED",
            AccessError::UnknownRole(_) => "UNKNOWN_ROLE",
            AccessError::UnknownPrincipal(_) => "UNKNOWN_PRINCIPAL",
            AccessError::AlreadyExists(_) => "ALREADY_EXISTS",
            AccessError::DoesNotExist(_) => "DOES_NOT_EXIST",
            AccessError::Validation(_) => "VALIDATION_ERROR",
            AccessError::Session(_) => "SESSION_ERROR",
            AccessError::Config(_) => "CONFIG_ERROR",
            AccessError::Storage(_) => "STORAGE_ERROR",
            AccessError::Io(_) => "IO_ERROR",
            AccessError::Serialization(_) => "SERIALIZATION_ERROR",
            AccessError::Yaml(_) => "YAML_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AccessError::InsufficientPrivilege(_)
            | AccessError::UnknownRole(_)
            | AccessError::UnknownPrincipal(_)
            | AccessError::AlreadyExists(_)
            | AccessError::DoesNotExist(_)
            | AccessError::Validation(_)
            | AccessError::Session(_) => ErrorCategory::ClientError,
            _ => ErrorCategory::ServerError,
        }
    }
}

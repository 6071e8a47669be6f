//! Helper functions for creating specific error types

use super::types::AccessError;

/// Helper functions for creating specific errors
impl AccessError {
    pub fn insufficient_privilege<S: Into<String>>(message: S) -> Self {
        Self::InsufficientPrivilege(message.into())
    }

    pub fn unknown_role<S: Into<String>>(message: S) -> Self {
        Self::UnknownRole(message.into())
    }

    pub fn unknown_principal<S: Into<String>>(message: S) -> Self {
        Self::UnknownPrincipal(message.into())
    }

    pub fn already_exists<S: Into<String>>(message: S) -> Self {
        Self::AlreadyExists(message.into())
    }

    pub fn does_not_exist<S: Into<String>>(message: S) -> Self {
        Self::DoesNotExist(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Denial for a role the acting principal cannot administer
    pub fn missing_admin_option(role_name: &str, granted_without_option: bool) -> Self {
        let requirement = format!(
            "To execute this query, it's necessary to have the role {} granted with ADMIN option",
            role_name
        );
        if granted_without_option {
            Self::InsufficientPrivilege(format!(
                "Role {} is granted, but without ADMIN option. {}",
                role_name, requirement
            ))
        } else {
            Self::InsufficientPrivilege(requirement)
        }
    }

    /// Denial for a missing privilege, `grant` being its rendered form
    pub fn missing_grant(grant: &str) -> Self {
        Self::InsufficientPrivilege(format!(
            "To execute this query, it's necessary to have the grant {}",
            grant
        ))
    }
}

//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{Role, User};
use crate::infrastructure::crypto::password::MAX_PASSWORD_BYTES;

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    /// Role labels, e.g. `["ROLE_ADMIN", "ROLE_USER"]`
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            roles: u.role_labels(),
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i32,
    pub label: String,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            label: r.label,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    /// At most 72 bytes, the bcrypt input limit
    #[validate(length(min = 1), custom(function = "fits_bcrypt"))]
    pub password: String,
    /// Selected role labels
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Length is checked in bytes; `length(max)` counts characters.
fn fits_bcrypt(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some(format!("must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(err);
    }
    Ok(())
}

/// Edit form submission.
///
/// Only `roles` takes effect; name, email and password are accepted for form
/// compatibility and then replaced by the stored values.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UpdateUserRequest {
    /// The submitted form as a user carrying `id`.
    pub fn into_user(self, id: i32) -> User {
        User::new(
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
        .with_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: password.to_string(),
            roles: vec![],
        }
    }

    #[test]
    fn test_password_limit_counts_bytes() {
        assert!(create(&"a".repeat(72)).validate().is_ok());
        assert!(create(&"a".repeat(73)).validate().is_err());

        // 36 characters but 72 bytes, then 37 characters and 74 bytes
        assert!(create(&"é".repeat(36)).validate().is_ok());
        let err = create(&"é".repeat(37)).validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));
    }

    #[test]
    fn test_update_ignores_shape_of_discarded_fields() {
        let request = UpdateUserRequest {
            name: Some(String::new()),
            email: Some("not-an-email".to_string()),
            password: None,
            roles: vec!["ROLE_USER".to_string()],
        };
        assert!(request.validate().is_ok());
    }
}

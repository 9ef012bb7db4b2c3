use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unknown role: {0}")]
    UnresolvedRole(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Password hashing failed: {0}")]
    Crypto(#[from] bcrypt::BcryptError),
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Database(e) => {
                let msg = e.to_string();
                // Unique violations come back as driver messages; SQLite and
                // Postgres phrase them differently.
                if msg.contains("UNIQUE") || msg.contains("duplicate") {
                    DomainError::Conflict(msg)
                } else {
                    DomainError::Storage(msg)
                }
            }
            InfraError::Crypto(e) => DomainError::Crypto(e.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        InfraError::from(err).into()
    }
}

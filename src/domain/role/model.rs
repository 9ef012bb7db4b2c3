/// Label of the administrator role seeded by the migrations.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Label of the regular user role seeded by the migrations.
pub const ROLE_USER: &str = "ROLE_USER";

/// A named authority that can be granted to users.
///
/// Ordered by id so role sets iterate in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role {
    pub id: i32,
    /// Unique label, e.g. `ROLE_ADMIN`
    pub label: String,
}

impl Role {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

use std::collections::BTreeSet;

use crate::domain::Role;

/// User account
///
/// `password` holds plaintext only between construction and the first save;
/// everything read back from a repository carries the bcrypt hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Assigned by the store on first save
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<Role>,
}

impl User {
    /// A not yet persisted user without roles.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn has_role(&self, label: &str) -> bool {
        self.roles.iter().any(|r| r.label == label)
    }

    pub fn role_labels(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.label.clone()).collect()
    }
}

//! Database entities module

pub mod role;
pub mod user;
pub mod users_roles;

pub use role::Entity as Role;
pub use user::Entity as User;
pub use users_roles::Entity as UsersRoles;

pub mod identity;

// Re-export key types for convenience
pub use identity::UserAccountService;

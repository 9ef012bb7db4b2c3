//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories, the transactional unit of work and the
//! provider that hands both out.

pub mod repository_provider;
pub mod role_repository;
pub mod unit_of_work;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use role_repository::SeaOrmRoleRepository;
pub use unit_of_work::SeaOrmUnitOfWork;
pub use user_repository::SeaOrmUserRepository;

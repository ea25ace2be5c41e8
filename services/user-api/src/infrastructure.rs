// Infrastructure layer modules
pub mod config;
pub mod id_generator;
pub mod logging;
pub mod route_config;
pub mod user_repository;

// Re-exports
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use id_generator::{IdGenerationError, IdGenerator, UuidV4Generator};
pub use logging::init_logging;
pub use route_config::{RouteConfig, RouteMode, UnknownRouteMode};
pub use user_repository::{DynamoUserRepository, UserRepository, UserRepositoryError};

// Domain layer modules
pub mod route_message;
pub mod user;

// Re-exports
pub use route_message::{RouteMessage, ROUTE_MESSAGE};
pub use user::{NewUser, User};

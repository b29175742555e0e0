// Taskboard - task-management GraphQL service over a document store

// Configuration and state wiring
pub mod app_state;
pub mod config;

// Document store
pub mod store;

// Entity shapes
pub mod models;

// GraphQL schema and resolvers
pub mod graphql;

// HTTP surface
pub mod server;

// Sessions and credentials
pub mod session;

// Dashboard data layer (query strings, response cache, view helpers)
pub mod client;

// Common utilities
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};

// Infrastructure layer - External dependencies and adapters
pub mod clock;
pub mod config;
pub mod http_source;
pub mod summary_client;

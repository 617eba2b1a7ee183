// Application layer - Polling use cases and per-source state
pub mod confidence;
pub mod in_flight;
pub mod monitor;
pub mod poller;
pub mod reducer;
pub mod reducers;
pub mod snapshot_source;
pub mod store;
pub mod summary_service;

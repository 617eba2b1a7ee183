// Domain layer - Payloads and the state kept per data source
pub mod accumulator;
pub mod history;
pub mod inspection;
pub mod numeric;
pub mod projection;
pub mod sequence;
pub mod summary;

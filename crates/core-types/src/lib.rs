pub mod enums;
pub mod error;
pub mod params;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Network, PositionSide};
pub use error::CoreError;
pub use params::QueryParams;
pub use structs::{Credential, Endpoints, FuturesBalance, Position, SpotBalance};

//! Pool Manager - Registry of reward pools and aggregate holdings
//!
//! Governance reads a voter's weight as the sum of their stake across every
//! registered pool staking the governance token.

pub mod pool_manager;
pub mod errors;
pub mod events;

#[cfg(not(target_arch = "wasm32"))]
pub mod batch;

pub use pool_manager::{PoolManager, PoolRegistryEntry};
pub use errors::ManagerError;
pub use events::*;

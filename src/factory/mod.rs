//! Pool Factory - Creates reward pools and charges the creation fee

pub mod pool_factory;
pub mod errors;
pub mod events;

pub use pool_factory::{PoolFactory, FactoryConfig};
pub use errors::FactoryError;
pub use events::*;

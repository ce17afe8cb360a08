//! Error types for the pool factory

use odra::prelude::*;

#[odra::odra_error]
pub enum FactoryError {
    /// Caller is not the factory owner
    Unauthorized = 400,
    /// Schedule end is not after its start
    InvalidRange = 401,
    /// Pool is already recorded by the factory
    PoolExists = 402,
    /// A required address was never configured
    NotConfigured = 403,
}

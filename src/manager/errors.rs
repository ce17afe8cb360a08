//! Error types for the pool manager

use odra::prelude::*;

#[odra::odra_error]
pub enum ManagerError {
    /// Caller is neither the owner nor an authorized registrar
    Unauthorized = 500,
    /// Pool is not in the registry
    PoolNotFound = 501,
    /// Address is not a contract
    NotAPool = 502,
}

//! Events for the pool manager

use odra::prelude::*;

/// Event emitted when a pool enters the registry
#[odra::event]
pub struct PoolAdded {
    pub pool: Address,
    pub is_governance_pool: bool,
    pub index: u32,
}

/// Event emitted when a registered pool is re-added
#[odra::event]
pub struct PoolUpdated {
    pub pool: Address,
    pub is_governance_pool: bool,
}

/// Event emitted when a pool is deactivated
#[odra::event]
pub struct PoolRemoved {
    pub pool: Address,
}

/// Event emitted when a registrar is added or removed
#[odra::event]
pub struct AuthorizationChanged {
    pub account: Address,
    pub authorized: bool,
}

/// Event emitted when manager ownership changes
#[odra::event]
pub struct ManagerOwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

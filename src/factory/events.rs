//! Events for the pool factory

use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when a pool is created or adopted
#[odra::event]
pub struct PoolCreated {
    pub pool: Address,
    pub creator: Address,
    /// Account the pool ownership was handed to
    pub owner: Address,
    pub stake_asset: Address,
    pub reward_asset: Option<Address>,
    pub fee_paid: U256,
    pub pool_count: u32,
}

/// Event emitted when the creation fee changes
#[odra::event]
pub struct FeeUpdated {
    pub fee_asset: Address,
    pub fee_amount: U256,
}

/// Event emitted when an account gains or loses fee exemption
#[odra::event]
pub struct PrivilegeUpdated {
    pub account: Address,
    pub privileged: bool,
}

/// Event emitted when factory ownership changes
#[odra::event]
pub struct FactoryOwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

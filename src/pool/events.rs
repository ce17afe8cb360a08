//! Events for reward pools

use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted once a pool is initialized
#[odra::event]
pub struct PoolInitialized {
    pub owner: Address,
    pub stake_asset: Address,
    pub reward_asset: Option<Address>,
    pub reward_per_block: U256,
    pub start_block: u64,
    pub bonus_end_block: u64,
}

/// Event emitted when stake is deposited
#[odra::event]
pub struct Deposit {
    pub user: Address,
    pub payer: Address,
    /// Amount actually received by the pool
    pub amount: U256,
    /// Amount the payer asked to transfer
    pub nominal_amount: U256,
}

/// Event emitted when stake is withdrawn
#[odra::event]
pub struct Withdraw {
    pub user: Address,
    pub amount: U256,
}

/// Event emitted when a user exits without settling rewards
#[odra::event]
pub struct EmergencyWithdraw {
    pub user: Address,
    pub amount: U256,
    /// Pending rewards returned to the pool
    pub forfeited: U256,
}

/// Event emitted when pending rewards are paid out
#[odra::event]
pub struct RewardPaid {
    pub user: Address,
    pub amount: U256,
}

/// Event emitted when the owner tops up rewards
#[odra::event]
pub struct RewardsDeposited {
    pub depositor: Address,
    pub amount: U256,
    pub reward_per_block: U256,
    pub bonus_end_block: u64,
}

/// Event emitted when the owner pulls unallocated rewards
#[odra::event]
pub struct RewardsWithdrawn {
    pub recipient: Address,
    pub amount: U256,
}

/// Event emitted when the emission schedule changes
#[odra::event]
pub struct ScheduleUpdated {
    pub reward_per_block: U256,
    pub bonus_end_block: u64,
}

/// Event emitted when fee-on-transfer surplus is skimmed
#[odra::event]
pub struct StakeTokenFeeSkimmed {
    pub recipient: Address,
    pub amount: U256,
}

/// Event emitted when a stray token is recovered
#[odra::event]
pub struct TokenSwept {
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
}

/// Event emitted when pool ownership changes
#[odra::event]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

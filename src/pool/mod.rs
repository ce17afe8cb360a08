//! Reward Pools - Stake a token, earn a token or native CSPR
//!
//! A pool emits its reward asset linearly over a block range and splits the
//! emission between stakers in proportion to their principal.

pub mod asset;
pub mod reward_pool;
pub mod errors;
pub mod events;

#[cfg(test)]
mod tests;

pub use asset::Asset;
pub use reward_pool::{RewardPool, RewardPoolFactory, ScheduleKind, PoolPhase, UserInfo, PoolInfo, BLOCK_INTERVAL_MILLIS};
pub use errors::PoolError;
pub use events::*;

//! Mathematical utilities for reward pool accounting
//! Implements checked arithmetic, the accumulator formulas and the
//! conversions between CEP-18 amounts (U256) and native motes (U512)
use odra::casper_types::{U256, U512};
use crate::pool::errors::PoolError;

/// Fixed-point scale of `acc_reward_per_share`
pub const PRECISION_FACTOR: u128 = 1_000_000_000_000;

/// Absolute tolerance, in base units, between the scheduled emission
/// (`reward_per_block * remaining_blocks`) and the funded rewards.
///
/// Empirical: rate re-derivation truncates by at most one unit per remaining
/// block, so this holds for schedules shorter than 10 000 blocks.
pub const REWARD_VARIANCE_TOLERANCE: u64 = 10_000;

/// Safe math operations for U256
pub struct SafeMath;

impl SafeMath {
    /// Safe addition with overflow check
    pub fn add(a: U256, b: U256) -> Result<U256, PoolError> {
        a.checked_add(b).ok_or(PoolError::Overflow)
    }

    /// Safe subtraction with underflow check
    pub fn sub(a: U256, b: U256) -> Result<U256, PoolError> {
        a.checked_sub(b).ok_or(PoolError::Overflow)
    }

    /// Safe multiplication with overflow check
    pub fn mul(a: U256, b: U256) -> Result<U256, PoolError> {
        a.checked_mul(b).ok_or(PoolError::Overflow)
    }

    /// Safe division with zero check
    pub fn div(a: U256, b: U256) -> Result<U256, PoolError> {
        if b.is_zero() {
            return Err(PoolError::Overflow);
        }
        Ok(a / b)
    }

    /// Absolute difference of two U256 values
    pub fn abs_diff(a: U256, b: U256) -> U256 {
        if a > b { a - b } else { b - a }
    }
}

/// Accumulator math shared by every reward pool
pub struct RewardMath;

impl RewardMath {
    /// Number of rewarded blocks in `[from, to)` for a schedule ending at `end`
    pub fn multiplier(from: u64, to: u64, end: u64) -> u64 {
        let to = to.min(end);
        to.saturating_sub(from)
    }

    /// Accumulator increase for `reward` spread over `total_staked`
    pub fn reward_per_share(reward: U256, total_staked: U256) -> Result<U256, PoolError> {
        SafeMath::div(SafeMath::mul(reward, U256::from(PRECISION_FACTOR))?, total_staked)
    }

    /// Accumulator-scaled claim of `amount` at accumulator `acc`
    pub fn accumulated(amount: U256, acc_reward_per_share: U256) -> Result<U256, PoolError> {
        Ok(SafeMath::mul(amount, acc_reward_per_share)? / U256::from(PRECISION_FACTOR))
    }

    /// Reward earned since the last snapshot; never negative
    pub fn pending(amount: U256, acc_reward_per_share: U256, reward_debt: U256) -> Result<U256, PoolError> {
        Ok(Self::accumulated(amount, acc_reward_per_share)?.saturating_sub(reward_debt))
    }

    /// Rate that spreads `available` evenly over `blocks`
    pub fn rate_for(available: U256, blocks: u64) -> U256 {
        if blocks == 0 {
            return U256::zero();
        }
        available / U256::from(blocks)
    }

    /// Number of whole blocks `available` funds at `rate`
    pub fn blocks_funded(available: U256, rate: U256) -> Result<u64, PoolError> {
        if rate.is_zero() {
            return Ok(0);
        }
        let blocks = available / rate;
        if blocks > U256::from(u64::MAX) {
            return Err(PoolError::AmountTooLarge);
        }
        Ok(blocks.as_u64())
    }

    /// Whether `scheduled` and `available` agree within the variance tolerance
    pub fn within_tolerance(scheduled: U256, available: U256) -> bool {
        SafeMath::abs_diff(scheduled, available) <= U256::from(REWARD_VARIANCE_TOLERANCE)
    }
}

/// Converts native motes into a CEP-18 sized amount
pub fn motes_to_amount(motes: U512) -> Result<U256, PoolError> {
    let mut bytes = [0u8; 64];
    motes.to_little_endian(&mut bytes);
    if bytes[32..].iter().any(|byte| *byte != 0) {
        return Err(PoolError::AmountTooLarge);
    }
    Ok(U256::from_little_endian(&bytes[..32]))
}

/// Converts a CEP-18 sized amount into native motes
pub fn amount_to_motes(amount: U256) -> U512 {
    let mut bytes = [0u8; 32];
    amount.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}

//! Error types for reward pools

use odra::prelude::*;

#[odra::odra_error]
pub enum PoolError {
    /// `initialize` was already called
    AlreadyInitialized = 300,
    /// Pool has not been initialized yet
    NotInitialized = 301,
    /// Schedule end is not after its start, or an extension does not extend
    InvalidRange = 302,
    /// Caller is not the pool owner
    Unauthorized = 303,
    /// Withdrawal larger than the caller's stake
    InsufficientStake = 304,
    /// Pool cannot cover the reward owed
    InsufficientRewardBalance = 305,
    /// Pool holds less of an asset than it tried to send
    InsufficientBalance = 306,
    /// Withdrawals are locked until the lock block
    WithdrawLocked = 307,
    /// Token is the stake or reward asset and cannot be swept
    ProtectedToken = 308,
    /// Arithmetic overflow or division by zero
    Overflow = 309,
    /// Amount does not fit the target representation
    AmountTooLarge = 310,
    /// Stated amount differs from the attached native value
    AttachedValueMismatch = 311,
}

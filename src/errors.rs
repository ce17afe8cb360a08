//! Error definitions shared by the bundled CEP-18 token contracts
use odra::prelude::*;

/// Custom errors for the CEP-18 token contracts
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer
    InsufficientAllowance = 100,

    /// Insufficient balance for operation
    InsufficientBalance = 101,

    /// Transfer fee above the allowed maximum
    InvalidFee = 102,

    /// Unauthorized access
    Unauthorized = 103,
}

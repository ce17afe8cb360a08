//! Reward asset abstraction
//!
//! A pool holds two assets: the stake token and the reward asset. The reward
//! asset is either a CEP-18 token or native CSPR; both are driven through
//! [`Asset`] so the accounting in the pool never branches on the kind.

use alloc::rc::Rc;
use odra::prelude::*;
use odra::casper_types::U256;
use odra::{ContractEnv, ContractRef};
use super::errors::PoolError;
use crate::math::{amount_to_motes, motes_to_amount, SafeMath};
use crate::token::Cep18TokenContractRef;

/// An asset a pool can hold, receive and pay out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    /// CEP-18 token at the given address
    Token(Address),
    /// Native currency (CSPR motes)
    Native,
}

impl Asset {
    /// Builds an asset from its storage marker, `None` being native currency
    pub fn from_marker(marker: Option<Address>) -> Self {
        match marker {
            Some(token) => Asset::Token(token),
            None => Asset::Native,
        }
    }

    /// Storage marker of the asset
    pub fn marker(&self) -> Option<Address> {
        match self {
            Asset::Token(token) => Some(*token),
            Asset::Native => None,
        }
    }

    /// Whether the asset is the given CEP-18 token
    pub fn is_token(&self, token: Address) -> bool {
        *self == Asset::Token(token)
    }

    /// Amount of the asset held by the calling contract
    pub fn self_balance(&self, env: &Rc<ContractEnv>) -> Result<U256, PoolError> {
        match self {
            Asset::Token(token) => {
                let token = Cep18TokenContractRef::new(env.clone(), *token);
                Ok(token.balance_of(env.self_address()))
            }
            Asset::Native => motes_to_amount(env.self_balance()),
        }
    }

    /// Pulls `amount` from `from` into the calling contract.
    ///
    /// Returns what actually arrived. Tokens are measured by balance delta, so
    /// a fee-on-transfer token yields less than `amount`. Native currency is
    /// whatever value was attached to the call.
    pub fn transfer_in(&self, env: &Rc<ContractEnv>, from: Address, amount: U256) -> Result<U256, PoolError> {
        match self {
            Asset::Token(token) => {
                let before = self.self_balance(env)?;
                let mut token = Cep18TokenContractRef::new(env.clone(), *token);
                token.transfer_from(from, env.self_address(), amount);
                let after = self.self_balance(env)?;
                SafeMath::sub(after, before)
            }
            Asset::Native => motes_to_amount(env.attached_value()),
        }
    }

    /// Sends `amount` from the calling contract to `to`
    pub fn transfer_out(&self, env: &Rc<ContractEnv>, to: Address, amount: U256) -> Result<(), PoolError> {
        if amount.is_zero() {
            return Ok(());
        }
        if self.self_balance(env)? < amount {
            return Err(PoolError::InsufficientBalance);
        }
        match self {
            Asset::Token(token) => {
                let mut token = Cep18TokenContractRef::new(env.clone(), *token);
                token.transfer(to, amount);
            }
            Asset::Native => env.transfer_tokens(&to, &amount_to_motes(amount)),
        }
        Ok(())
    }
}

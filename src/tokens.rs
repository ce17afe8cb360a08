//! Fee-on-transfer CEP-18 token
//!
//! Every transfer between non-excluded accounts withholds `fee_bps` of the
//! amount and routes it to a fee collector, so the receiver gets less than the
//! nominal amount. Pools must measure what actually arrives instead of
//! trusting the amount they asked for.
use odra::prelude::*;
use odra::casper_types::U256;
use crate::events::{Transfer, Approval, TransferFeeCharged};
use crate::errors::TokenError;

/// Basis points divisor
pub const BPS_DIVISOR: u64 = 10_000;

/// Highest transfer fee the token accepts (10%)
pub const MAX_FEE_BPS: u64 = 1_000;

/// Tax token - CEP-18 with a transfer fee
#[odra::module]
pub struct TaxToken {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    /// Transfer fee in basis points
    fee_bps: Var<u64>,
    /// Receiver of withheld fees
    fee_collector: Var<Address>,
    /// Accounts that neither pay nor trigger the fee
    excluded: Mapping<Address, bool>,
    owner: Var<Address>,
}

#[odra::module]
impl TaxToken {
    pub fn init(&mut self, name: String, symbol: String, initial_supply: U256, fee_bps: u64) {
        if fee_bps > MAX_FEE_BPS { self.env().revert(TokenError::InvalidFee); }
        let caller = self.env().caller();
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(18);
        self.total_supply.set(initial_supply);
        self.balances.set(&caller, initial_supply);
        self.fee_bps.set(fee_bps);
        self.fee_collector.set(caller);
        self.owner.set(caller);
        self.env().emit_event(Transfer { from: self.env().self_address(), to: caller, value: initial_supply });
    }

    pub fn name(&self) -> String { self.name.get_or_default() }
    pub fn symbol(&self) -> String { self.symbol.get_or_default() }
    pub fn decimals(&self) -> u8 { self.decimals.get_or_default() }
    pub fn total_supply(&self) -> U256 { self.total_supply.get_or_default() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.balances.get(&owner).unwrap_or_default() }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.allowances.get(&(owner, spender)).unwrap_or_default() }
    pub fn fee_bps(&self) -> u64 { self.fee_bps.get_or_default() }
    pub fn fee_collector(&self) -> Option<Address> { self.fee_collector.get() }
    pub fn is_excluded(&self, account: Address) -> bool { self.excluded.get(&account).unwrap_or(false) }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.approve_internal(caller, spender, amount);
        true
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount { self.env().revert(TokenError::InsufficientAllowance); }
        self.approve_internal(from, caller, current_allowance - amount);
        self.transfer_internal(from, to, amount);
        true
    }

    pub fn set_fee_collector(&mut self, collector: Address) {
        self.only_owner();
        self.fee_collector.set(collector);
    }

    pub fn set_excluded(&mut self, account: Address, excluded: bool) {
        self.only_owner();
        self.excluded.set(&account, excluded);
    }

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount { self.env().revert(TokenError::InsufficientBalance); }
        self.balances.set(&from, from_balance - amount);

        let fee = self.fee_for(from, to, amount);
        let received = amount - fee;
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + received);
        self.env().emit_event(Transfer { from, to, value: received });

        if !fee.is_zero() {
            let collector = self.fee_collector.get_or_revert_with(TokenError::Unauthorized);
            let collector_balance = self.balance_of(collector);
            self.balances.set(&collector, collector_balance + fee);
            self.env().emit_event(TransferFeeCharged { from, collector, fee });
        }
    }

    fn fee_for(&self, from: Address, to: Address, amount: U256) -> U256 {
        if self.is_excluded(from) || self.is_excluded(to) {
            return U256::zero();
        }
        amount * U256::from(self.fee_bps()) / U256::from(BPS_DIVISOR)
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.env().emit_event(Approval { owner, spender, value: amount });
    }

    fn only_owner(&self) {
        let owner = self.owner.get_or_revert_with(TokenError::Unauthorized);
        if self.env().caller() != owner { self.env().revert(TokenError::Unauthorized); }
    }
}

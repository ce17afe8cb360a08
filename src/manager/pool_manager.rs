//! Pool Manager
//!
//! Append-only registry of reward pools. Entries are never deleted: removal
//! only clears `is_active`, so indices stay valid for auditing.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::ManagerError;
use super::events::*;
use crate::pool::reward_pool::RewardPoolContractRef;

/// Registry entry of a pool
#[odra::odra_type]
pub struct PoolRegistryEntry {
    pub pool_address: Address,
    /// Counts toward governance weight
    pub is_governance_pool: bool,
    /// Cleared when the pool is removed
    pub is_active: bool,
}

/// Pool Manager contract
#[odra::module]
pub struct PoolManager {
    owner: Var<Address>,
    /// Accounts allowed to register pools, e.g. the pool factory
    authorized: Mapping<Address, bool>,
    /// Registry entries (stored as index -> entry)
    entries: Mapping<u32, PoolRegistryEntry>,
    pools_length: Var<u32>,
    /// Pool -> registry index
    pool_index: Mapping<Address, u32>,
}

#[odra::module]
impl PoolManager {
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.owner.set(caller);
        self.pools_length.set(0);
    }

    /// Register pools with the given flag. Registered pools are updated to
    /// the new flag and reactivated instead of being added twice.
    ///
    /// Every address must be a contract answering the pool interface, so
    /// a bad entry fails here rather than in every later holdings query.
    pub fn add_pools(&mut self, pools: Vec<Address>, is_governance_pool: bool) {
        self.only_registrar();

        for pool in pools {
            self.require_pool(pool);
            match self.pool_index.get(&pool) {
                Some(index) => {
                    self.entries.set(&index, PoolRegistryEntry {
                        pool_address: pool,
                        is_governance_pool,
                        is_active: true,
                    });
                    self.env().emit_event(PoolUpdated { pool, is_governance_pool });
                }
                None => {
                    let index = self.pools_length.get_or_default();
                    self.entries.set(&index, PoolRegistryEntry {
                        pool_address: pool,
                        is_governance_pool,
                        is_active: true,
                    });
                    self.pool_index.set(&pool, index);
                    self.pools_length.set(index + 1);
                    self.env().emit_event(PoolAdded { pool, is_governance_pool, index });
                }
            }
        }
    }

    /// Deactivate pools; their entries stay in the registry
    pub fn remove_pools(&mut self, pools: Vec<Address>) {
        self.only_registrar();

        for pool in pools {
            let index = self
                .pool_index
                .get(&pool)
                .unwrap_or_revert_with(&self.env(), ManagerError::PoolNotFound);
            let mut entry = self
                .entries
                .get(&index)
                .unwrap_or_revert_with(&self.env(), ManagerError::PoolNotFound);
            entry.is_active = false;
            self.entries.set(&index, entry);
            self.env().emit_event(PoolRemoved { pool });
        }
    }

    // ============ View Functions ============

    pub fn all_active_pools(&self) -> Vec<Address> {
        self.active_entries().into_iter().map(|entry| entry.pool_address).collect()
    }

    /// Number of entries ever registered, removed ones included
    pub fn pools_length(&self) -> u32 {
        self.pools_length.get_or_default()
    }

    pub fn pool_at(&self, index: u32) -> Option<PoolRegistryEntry> {
        self.entries.get(&index)
    }

    pub fn entry_of(&self, pool: Address) -> Option<PoolRegistryEntry> {
        self.pool_index.get(&pool).and_then(|index| self.entries.get(&index))
    }

    /// Stake of `account` summed over every active pool staking `stake_asset`
    pub fn view_total_holdings(&self, account: Address, stake_asset: Address) -> U256 {
        self.sum_holdings(account, stake_asset, false)
    }

    /// Same as `view_total_holdings`, restricted to governance pools
    pub fn view_total_governance_holdings(&self, account: Address, stake_asset: Address) -> U256 {
        self.sum_holdings(account, stake_asset, true)
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    pub fn is_authorized(&self, account: Address) -> bool {
        self.authorized.get(&account).unwrap_or(false)
    }

    // ============ Owner Functions ============

    pub fn add_authorized(&mut self, account: Address) {
        self.only_owner();
        self.authorized.set(&account, true);
        self.env().emit_event(AuthorizationChanged { account, authorized: true });
    }

    pub fn remove_authorized(&mut self, account: Address) {
        self.only_owner();
        self.authorized.set(&account, false);
        self.env().emit_event(AuthorizationChanged { account, authorized: false });
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.only_owner();
        let previous_owner = self.env().caller();
        self.owner.set(new_owner);
        self.env().emit_event(ManagerOwnershipTransferred { previous_owner, new_owner });
    }

    // ============ Internal Functions ============

    fn active_entries(&self) -> Vec<PoolRegistryEntry> {
        (0..self.pools_length())
            .filter_map(|index| self.entries.get(&index))
            .filter(|entry| entry.is_active)
            .collect()
    }

    /// Registered addresses are checked pool contracts. `holding_of`
    /// returns zero instead of reverting for foreign stake assets and
    /// uninitialized pools.
    fn sum_holdings(&self, account: Address, stake_asset: Address, governance_only: bool) -> U256 {
        let mut total = U256::zero();
        for entry in self.active_entries() {
            if governance_only && !entry.is_governance_pool {
                continue;
            }
            let pool = RewardPoolContractRef::new(self.env(), entry.pool_address);
            total += pool.holding_of(account, stake_asset);
        }
        total
    }

    /// Reverts unless `pool` is a contract exposing the pool views
    fn require_pool(&self, pool: Address) {
        if !pool.is_contract() {
            self.env().revert(ManagerError::NotAPool);
        }
        // Contracts without the entry point revert the call
        RewardPoolContractRef::new(self.env(), pool).is_initialized();
    }

    fn only_owner(&self) {
        let owner = self.owner.get_or_revert_with(ManagerError::Unauthorized);
        if self.env().caller() != owner {
            self.env().revert(ManagerError::Unauthorized);
        }
    }

    fn only_registrar(&self) {
        let caller = self.env().caller();
        if Some(caller) != self.owner() && !self.is_authorized(caller) {
            self.env().revert(ManagerError::Unauthorized);
        }
    }
}

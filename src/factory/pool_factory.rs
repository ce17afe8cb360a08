//! Factory contract for reward pools
//!
//! The PoolFactory is responsible for:
//! - Deploying and initializing reward pools
//! - Charging the creation fee in the configured fee asset
//! - Recording every pool and its creator
//! - Registering new pools with the PoolManager, when one is configured
use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::FactoryError;
use super::events::*;
use crate::manager::pool_manager::PoolManagerContractRef;
use crate::pool::reward_pool::{RewardPoolContractRef, RewardPoolFactoryContractRef, ScheduleKind};
use crate::token::Cep18TokenContractRef;

/// Deployment-specific settings, supplied once at factory construction
#[odra::odra_type]
pub struct FactoryConfig {
    /// Factory owner
    pub admin: Address,
    /// Address of the deployed `RewardPoolFactory` contract
    pub pool_deployer: Address,
    /// Token the creation fee is paid in
    pub fee_asset: Address,
    pub fee_amount: U256,
    /// Receiver of creation fees
    pub fee_sink: Address,
    /// Owner of the pools created by the factory owner
    pub pool_admin: Address,
    /// Registry new pools are added to
    pub pool_manager: Option<Address>,
}

/// Schedule of a pool about to be initialized
struct PoolParams {
    stake_asset: Address,
    reward_asset: Option<Address>,
    start_block: u64,
    end_block: u64,
    lock_block: Option<u64>,
    schedule: ScheduleKind,
}

/// Factory contract for creating and tracking reward pools
#[odra::module]
pub struct PoolFactory {
    owner: Var<Address>,
    pool_deployer: Var<Address>,
    fee_asset: Var<Address>,
    fee_amount: Var<U256>,
    fee_sink: Var<Address>,
    pool_admin: Var<Address>,
    pool_manager: Var<Option<Address>>,
    /// Accounts exempt from the creation fee
    privileged: Mapping<Address, bool>,
    /// List of all pools (stored as index -> address)
    all_pools: Mapping<u32, Address>,
    all_pools_length: Var<u32>,
    /// Pool -> account that created it
    creators: Mapping<Address, Address>,
}

#[odra::module]
impl PoolFactory {
    pub fn init(&mut self, config: FactoryConfig) {
        self.owner.set(config.admin);
        self.pool_deployer.set(config.pool_deployer);
        self.fee_asset.set(config.fee_asset);
        self.fee_amount.set(config.fee_amount);
        self.fee_sink.set(config.fee_sink);
        self.pool_admin.set(config.pool_admin);
        self.pool_manager.set(config.pool_manager);
        self.all_pools_length.set(0);
    }

    // ============ Pool Creation ============

    /// Create a pool owned by the pool admin, free of charge.
    /// Only callable by the factory owner.
    pub fn create_pool_by_owner(
        &mut self,
        stake_asset: Address,
        reward_asset: Option<Address>,
        start_block: u64,
        end_block: u64,
        lock_block: Option<u64>,
        schedule: ScheduleKind,
    ) -> Address {
        self.only_owner();
        let params = PoolParams { stake_asset, reward_asset, start_block, end_block, lock_block, schedule };
        self.validate(&params);

        let pool = self.deploy_pool();
        let pool_admin = self.pool_admin.get_or_revert_with(FactoryError::NotConfigured);
        self.setup_pool(pool, params, pool_admin, U256::zero());
        pool
    }

    /// Create a pool owned by the caller, charging the creation fee unless
    /// the caller is privileged
    pub fn create_pool(
        &mut self,
        stake_asset: Address,
        reward_asset: Option<Address>,
        start_block: u64,
        end_block: u64,
        lock_block: Option<u64>,
        schedule: ScheduleKind,
    ) -> Address {
        let params = PoolParams { stake_asset, reward_asset, start_block, end_block, lock_block, schedule };
        self.validate(&params);

        let caller = self.env().caller();
        let fee_paid = self.charge_fee(caller);
        let pool = self.deploy_pool();
        self.setup_pool(pool, params, caller, fee_paid);
        pool
    }

    /// Initialize and record an already constructed, empty pool instance.
    ///
    /// Supports deployments where the pool code is installed separately
    /// (e.g. behind an upgradable package) and only `initialize` runs here.
    pub fn adopt_pool(
        &mut self,
        pool: Address,
        stake_asset: Address,
        reward_asset: Option<Address>,
        start_block: u64,
        end_block: u64,
        lock_block: Option<u64>,
        schedule: ScheduleKind,
    ) {
        let params = PoolParams { stake_asset, reward_asset, start_block, end_block, lock_block, schedule };
        self.validate(&params);
        if self.creators.get(&pool).is_some() {
            self.env().revert(FactoryError::PoolExists);
        }

        let caller = self.env().caller();
        let fee_paid = self.charge_fee(caller);
        self.setup_pool(pool, params, caller, fee_paid);
    }

    // ============ View Functions ============

    /// Get pool by index
    pub fn all_pools(&self, index: u32) -> Option<Address> {
        self.all_pools.get(&index)
    }

    pub fn all_pools_length(&self) -> u32 {
        self.all_pools_length.get_or_default()
    }

    pub fn creator_of(&self, pool: Address) -> Option<Address> {
        self.creators.get(&pool)
    }

    pub fn owner(&self) -> Address {
        self.owner.get_or_revert_with(FactoryError::NotConfigured)
    }

    pub fn fee_asset(&self) -> Option<Address> {
        self.fee_asset.get()
    }

    pub fn fee_amount(&self) -> U256 {
        self.fee_amount.get_or_default()
    }

    pub fn fee_sink(&self) -> Option<Address> {
        self.fee_sink.get()
    }

    pub fn pool_admin(&self) -> Option<Address> {
        self.pool_admin.get()
    }

    pub fn pool_manager(&self) -> Option<Address> {
        self.pool_manager.get().flatten()
    }

    /// Whether `account` creates pools without paying the fee
    pub fn is_privileged(&self, account: Address) -> bool {
        account == self.owner() || self.privileged.get(&account).unwrap_or(false)
    }

    // ============ Owner Functions ============

    pub fn set_fee(&mut self, fee_asset: Address, fee_amount: U256) {
        self.only_owner();
        self.fee_asset.set(fee_asset);
        self.fee_amount.set(fee_amount);
        self.env().emit_event(FeeUpdated { fee_asset, fee_amount });
    }

    pub fn set_fee_sink(&mut self, fee_sink: Address) {
        self.only_owner();
        self.fee_sink.set(fee_sink);
    }

    pub fn set_pool_admin(&mut self, pool_admin: Address) {
        self.only_owner();
        self.pool_admin.set(pool_admin);
    }

    /// Set or clear the registry new pools are added to
    pub fn set_pool_manager(&mut self, pool_manager: Option<Address>) {
        self.only_owner();
        self.pool_manager.set(pool_manager);
    }

    pub fn set_privileged(&mut self, account: Address, privileged: bool) {
        self.only_owner();
        self.privileged.set(&account, privileged);
        self.env().emit_event(PrivilegeUpdated { account, privileged });
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.only_owner();
        let previous_owner = self.env().caller();
        self.owner.set(new_owner);
        self.env().emit_event(FactoryOwnershipTransferred { previous_owner, new_owner });
    }

    // ============ Internal Functions ============

    fn validate(&self, params: &PoolParams) {
        if params.end_block <= params.start_block {
            self.env().revert(FactoryError::InvalidRange);
        }
    }

    /// Deploy an empty RewardPool through the pool deployer contract
    fn deploy_pool(&mut self) -> Address {
        let deployer_address = self.pool_deployer.get_or_revert_with(FactoryError::NotConfigured);
        let mut deployer = RewardPoolFactoryContractRef::new(self.env(), deployer_address);
        let (pool, _pool_access_uref) = deployer.new_contract(String::from("RewardPool"));
        pool
    }

    /// Pull the creation fee from `payer` into the fee sink
    fn charge_fee(&mut self, payer: Address) -> U256 {
        let fee = self.fee_amount();
        if fee.is_zero() || self.is_privileged(payer) {
            return U256::zero();
        }

        let fee_asset = self.fee_asset.get_or_revert_with(FactoryError::NotConfigured);
        let fee_sink = self.fee_sink.get_or_revert_with(FactoryError::NotConfigured);
        let mut token = Cep18TokenContractRef::new(self.env(), fee_asset);
        token.transfer_from(payer, fee_sink, fee);
        fee
    }

    /// Initialize `pool`, hand it to `owner`, record it and register it
    fn setup_pool(&mut self, pool: Address, params: PoolParams, owner: Address, fee_paid: U256) {
        let creator = self.env().caller();
        let mut pool_ref = RewardPoolContractRef::new(self.env(), pool);
        // Pools start without emission; deposit_rewards derives the rate
        pool_ref.initialize(
            params.stake_asset,
            params.reward_asset,
            U256::zero(),
            params.start_block,
            params.end_block,
            params.lock_block,
            params.schedule,
        );
        pool_ref.transfer_ownership(owner);

        let pool_index = self.all_pools_length.get_or_default();
        self.all_pools.set(&pool_index, pool);
        self.all_pools_length.set(pool_index + 1);
        self.creators.set(&pool, creator);

        if let Some(manager) = self.pool_manager() {
            let mut manager_ref = PoolManagerContractRef::new(self.env(), manager);
            manager_ref.add_pools(vec![pool], false);
        }

        self.env().emit_event(PoolCreated {
            pool,
            creator,
            owner,
            stake_asset: params.stake_asset,
            reward_asset: params.reward_asset,
            fee_paid,
            pool_count: pool_index + 1,
        });
    }

    fn only_owner(&self) {
        if self.env().caller() != self.owner() {
            self.env().revert(FactoryError::Unauthorized);
        }
    }
}

//! Reward Pool - Stake a CEP-18 token to earn a token or native CSPR
//!
//! Rewards are emitted linearly at `reward_per_block` between `start_block`
//! and `bonus_end_block` and split pro rata over the staked principal through
//! an accumulator (`acc_reward_per_share`, scaled by `PRECISION_FACTOR`).
//!
//! The contract is constructed empty by `init` and configured by a separate
//! `initialize` call, so the same code can be deployed once per pool by the
//! factory or prepared ahead of time by deployment tooling.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::asset::Asset;
use super::errors::PoolError;
use super::events::*;
use crate::math::{RewardMath, SafeMath, REWARD_VARIANCE_TOLERANCE};
use crate::token::Cep18TokenContractRef;

/// Casper block interval used by the block-based clock
pub const BLOCK_INTERVAL_MILLIS: u64 = 16_384;

/// Milliseconds per second, used by the timestamp clock
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Cadence of a pool's emission schedule
#[odra::odra_type]
#[derive(Default)]
pub enum ScheduleKind {
    /// One unit per Casper block interval
    #[default]
    Block = 0,
    /// One unit per second
    Timestamp = 1,
}

impl ScheduleKind {
    /// Current schedule unit for a block time in milliseconds
    pub fn clock(&self, block_time_millis: u64) -> u64 {
        match self {
            ScheduleKind::Block => block_time_millis / BLOCK_INTERVAL_MILLIS,
            ScheduleKind::Timestamp => block_time_millis / MILLIS_PER_SECOND,
        }
    }
}

/// Lifecycle phase of a pool
#[odra::odra_type]
#[derive(Default)]
pub enum PoolPhase {
    #[default]
    Uninitialized = 0,
    /// Initialized, emission not started
    Pending = 1,
    /// Emitting rewards
    Active = 2,
    /// Emission schedule over
    Finished = 3,
}

/// Per staker state
#[odra::odra_type]
#[derive(Default)]
pub struct UserInfo {
    /// Principal currently staked
    pub amount: U256,
    /// `amount * acc_reward_per_share` at the last interaction
    pub reward_debt: U256,
}

/// Snapshot of the pool configuration and accumulator
#[odra::odra_type]
pub struct PoolInfo {
    pub stake_asset: Address,
    /// `None` when rewards are paid in native CSPR
    pub reward_asset: Option<Address>,
    pub schedule: ScheduleKind,
    pub reward_per_block: U256,
    pub start_block: u64,
    pub bonus_end_block: u64,
    pub lock_block: Option<u64>,
    pub acc_reward_per_share: U256,
    pub last_reward_block: u64,
    pub total_staked: U256,
}

/// Reward Pool contract
#[odra::module(factory=on)]
pub struct RewardPool {
    /// Account or contract that constructed the instance
    deployer: Var<Address>,
    initialized: Var<bool>,
    owner: Var<Address>,
    stake_asset: Var<Address>,
    /// `None` marks native CSPR rewards
    reward_asset: Var<Option<Address>>,
    schedule: Var<ScheduleKind>,
    reward_per_block: Var<U256>,
    start_block: Var<u64>,
    bonus_end_block: Var<u64>,
    lock_block: Var<Option<u64>>,
    acc_reward_per_share: Var<U256>,
    last_reward_block: Var<u64>,
    total_staked: Var<U256>,
    /// Rewards credited to the accumulator so far
    total_rewards_allocated: Var<U256>,
    /// Rewards transferred to stakers so far
    total_rewards_paid: Var<U256>,
    users: Mapping<Address, UserInfo>,
    /// Every address that ever deposited, by index
    stakers: Mapping<u32, Address>,
    staker_count: Var<u32>,
    is_staker: Mapping<Address, bool>,
}

#[odra::module(factory=on)]
impl RewardPool {
    /// Construct an empty pool; `initialize` configures it
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.deployer.set(caller);
        self.initialized.set(false);
    }

    /// Configure the pool. Callable once; the caller becomes the owner.
    ///
    /// # Arguments
    /// * `reward_asset` - CEP-18 reward token, or `None` for native CSPR
    /// * `reward_per_block` - emission per schedule unit; may be zero and
    ///   derived later from `deposit_rewards`
    /// * `lock_block` - withdrawals are refused before this unit
    pub fn initialize(
        &mut self,
        stake_asset: Address,
        reward_asset: Option<Address>,
        reward_per_block: U256,
        start_block: u64,
        bonus_end_block: u64,
        lock_block: Option<u64>,
        schedule: ScheduleKind,
    ) {
        if self.initialized.get_or_default() {
            self.env().revert(PoolError::AlreadyInitialized);
        }
        if bonus_end_block <= start_block {
            self.env().revert(PoolError::InvalidRange);
        }

        let caller = self.env().caller();
        self.schedule.set(schedule);
        let now = self.current_block();

        self.initialized.set(true);
        self.owner.set(caller);
        self.stake_asset.set(stake_asset);
        self.reward_asset.set(reward_asset);
        self.reward_per_block.set(reward_per_block);
        self.start_block.set(start_block);
        self.bonus_end_block.set(bonus_end_block);
        self.lock_block.set(lock_block);
        self.acc_reward_per_share.set(U256::zero());
        self.last_reward_block.set(now.max(start_block));
        self.total_staked.set(U256::zero());
        self.total_rewards_allocated.set(U256::zero());
        self.total_rewards_paid.set(U256::zero());
        self.staker_count.set(0);

        self.env().emit_event(PoolInitialized {
            owner: caller,
            stake_asset,
            reward_asset,
            reward_per_block,
            start_block,
            bonus_end_block,
        });
    }

    // ========================================
    // Accrual
    // ========================================

    /// Advance the accumulator to `min(now, bonus_end_block)`
    pub fn update_pool(&mut self) {
        self.require_initialized();
        self.accrue().unwrap_or_revert(&self.env());
    }

    // ========================================
    // Staking Functions
    // ========================================

    /// Stake `amount` for the caller; `deposit(0)` only harvests
    pub fn deposit(&mut self, amount: U256) {
        let caller = self.env().caller();
        self.deposit_to(amount, caller);
    }

    /// Stake `amount` paid by the caller on behalf of `beneficiary`.
    ///
    /// The beneficiary's pending reward is settled to the beneficiary first.
    pub fn deposit_to(&mut self, amount: U256, beneficiary: Address) {
        self.require_initialized();
        let env = self.env();
        let caller = env.caller();

        self.accrue().unwrap_or_revert(&env);

        let mut user = self.user_info(beneficiary);
        self.settle(beneficiary, &user).unwrap_or_revert(&env);

        let mut received = U256::zero();
        if !amount.is_zero() {
            let stake = Asset::Token(self.stake_asset());
            received = stake.transfer_in(&env, caller, amount).unwrap_or_revert(&env);
            user.amount = SafeMath::add(user.amount, received).unwrap_or_revert(&env);
            let total = SafeMath::add(self.total_staked.get_or_default(), received).unwrap_or_revert(&env);
            self.total_staked.set(total);
            self.register_staker(beneficiary);
        }

        user.reward_debt = RewardMath::accumulated(user.amount, self.acc_reward_per_share.get_or_default())
            .unwrap_or_revert(&env);
        self.users.set(&beneficiary, user);

        env.emit_event(Deposit {
            user: beneficiary,
            payer: caller,
            amount: received,
            nominal_amount: amount,
        });
    }

    /// Claim pending rewards without touching the stake
    pub fn harvest(&mut self) {
        self.deposit(U256::zero());
    }

    /// Withdraw `amount` of principal and settle pending rewards.
    ///
    /// Reverts with `InsufficientRewardBalance` when the pool cannot pay the
    /// reward owed; no principal moves in that case.
    pub fn withdraw(&mut self, amount: U256) {
        self.require_initialized();
        let env = self.env();
        let caller = env.caller();

        let mut user = self.user_info(caller);
        if amount > user.amount {
            env.revert(PoolError::InsufficientStake);
        }
        self.require_unlocked();

        self.accrue().unwrap_or_revert(&env);
        self.settle(caller, &user).unwrap_or_revert(&env);

        if !amount.is_zero() {
            user.amount = user.amount - amount;
            let total = SafeMath::sub(self.total_staked.get_or_default(), amount).unwrap_or_revert(&env);
            self.total_staked.set(total);
            Asset::Token(self.stake_asset())
                .transfer_out(&env, caller, amount)
                .unwrap_or_revert(&env);
        }

        user.reward_debt = RewardMath::accumulated(user.amount, self.acc_reward_per_share.get_or_default())
            .unwrap_or_revert(&env);
        self.users.set(&caller, user);

        env.emit_event(Withdraw { user: caller, amount });
    }

    /// Return the caller's whole principal and forfeit pending rewards.
    ///
    /// Never touches the reward asset, so it succeeds on an under-funded pool.
    pub fn emergency_withdraw(&mut self) {
        self.require_initialized();
        let env = self.env();
        let caller = env.caller();
        self.require_unlocked();
        self.accrue().unwrap_or_revert(&env);

        let user = self.user_info(caller);
        let amount = user.amount;
        let forfeited = RewardMath::pending(amount, self.acc_reward_per_share.get_or_default(), user.reward_debt)
            .unwrap_or_revert(&env);

        // Forfeited rewards go back to the unallocated balance
        self.total_rewards_allocated
            .set(self.total_rewards_allocated.get_or_default().saturating_sub(forfeited));
        self.users.set(&caller, UserInfo::default());
        let total = SafeMath::sub(self.total_staked.get_or_default(), amount).unwrap_or_revert(&env);
        self.total_staked.set(total);

        Asset::Token(self.stake_asset())
            .transfer_out(&env, caller, amount)
            .unwrap_or_revert(&env);

        env.emit_event(EmergencyWithdraw { user: caller, amount, forfeited });
    }

    // ========================================
    // Owner Functions
    // ========================================

    /// Top up the reward asset.
    ///
    /// Native pools take the attached CSPR; `amount` is either zero or must
    /// equal the attached value. With
    /// `extend_if_needed` the schedule end moves out so the current rate
    /// spends the available rewards; otherwise the rate is re-derived to
    /// spread them over the remaining schedule.
    #[odra(payable)]
    pub fn deposit_rewards(&mut self, amount: U256, extend_if_needed: bool) {
        self.only_owner();
        let env = self.env();
        let caller = env.caller();

        self.accrue().unwrap_or_revert(&env);
        let reward_asset = self.reward_asset_kind();
        let received = reward_asset.transfer_in(&env, caller, amount).unwrap_or_revert(&env);
        if reward_asset == Asset::Native && !amount.is_zero() && amount != received {
            env.revert(PoolError::AttachedValueMismatch);
        }

        let next = self.next_reward_block();
        let end = self.bonus_end_block.get_or_default();
        let available = self.available_rewards();
        let rate = self.reward_per_block.get_or_default();

        if extend_if_needed && !rate.is_zero() {
            let funded = RewardMath::blocks_funded(available, rate).unwrap_or_revert(&env);
            let funded_end = next.saturating_add(funded);
            if funded_end > end {
                self.restart_if_finished();
                self.bonus_end_block.set(funded_end);
            }
        } else if end > next {
            self.reward_per_block.set(RewardMath::rate_for(available, end - next));
        }

        env.emit_event(RewardsDeposited {
            depositor: caller,
            amount: received,
            reward_per_block: self.reward_per_block.get_or_default(),
            bonus_end_block: self.bonus_end_block.get_or_default(),
        });
    }

    /// Push the schedule end out to `new_end_block`.
    ///
    /// Accrual is settled up to now first; the rate is then re-derived so the
    /// available rewards cover the new remaining range.
    pub fn update_bonus_end_block(&mut self, new_end_block: u64) {
        self.only_owner();
        let env = self.env();

        if new_end_block <= self.bonus_end_block.get_or_default() {
            env.revert(PoolError::InvalidRange);
        }
        let next = self.next_reward_block();
        if new_end_block <= next {
            env.revert(PoolError::InvalidRange);
        }

        self.accrue().unwrap_or_revert(&env);
        self.restart_if_finished();
        self.bonus_end_block.set(new_end_block);

        let rate = RewardMath::rate_for(self.available_rewards(), new_end_block - next);
        self.reward_per_block.set(rate);

        env.emit_event(ScheduleUpdated {
            reward_per_block: rate,
            bonus_end_block: new_end_block,
        });
    }

    /// Change the emission rate for future blocks
    pub fn set_reward_per_block(&mut self, reward_per_block: U256) {
        self.only_owner();
        self.accrue().unwrap_or_revert(&self.env());
        self.reward_per_block.set(reward_per_block);

        self.env().emit_event(ScheduleUpdated {
            reward_per_block,
            bonus_end_block: self.bonus_end_block.get_or_default(),
        });
    }

    /// Send the stake tokens held beyond `total_staked` to `recipient`
    pub fn skim_stake_token_fee(&mut self, recipient: Address) {
        self.only_owner();
        let env = self.env();
        let amount = self.stake_token_fee_balance();
        Asset::Token(self.stake_asset())
            .transfer_out(&env, recipient, amount)
            .unwrap_or_revert(&env);

        env.emit_event(StakeTokenFeeSkimmed { recipient, amount });
    }

    /// Pull rewards that are not owed to anyone yet
    pub fn emergency_reward_withdraw(&mut self, amount: U256) {
        self.only_owner();
        let env = self.env();
        let caller = env.caller();

        self.accrue().unwrap_or_revert(&env);
        if amount > self.available_rewards() {
            env.revert(PoolError::InsufficientRewardBalance);
        }
        self.reward_asset_kind()
            .transfer_out(&env, caller, amount)
            .unwrap_or_revert(&env);

        env.emit_event(RewardsWithdrawn { recipient: caller, amount });
    }

    /// Recover a token sent to the pool by mistake
    pub fn sweep_token(&mut self, token: Address, recipient: Address) {
        self.only_owner();
        let env = self.env();
        if token == self.stake_asset() || self.reward_asset_kind().is_token(token) {
            env.revert(PoolError::ProtectedToken);
        }

        let mut token_ref = Cep18TokenContractRef::new(env.clone(), token);
        let amount = token_ref.balance_of(env.self_address());
        if !amount.is_zero() {
            token_ref.transfer(recipient, amount);
        }

        env.emit_event(TokenSwept { token, recipient, amount });
    }

    /// Hand the pool over to `new_owner`
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.only_owner();
        let previous_owner = self.env().caller();
        self.owner.set(new_owner);

        self.env().emit_event(OwnershipTransferred { previous_owner, new_owner });
    }

    // ========================================
    // View Functions
    // ========================================

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    pub fn deployer(&self) -> Option<Address> {
        self.deployer.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get_or_default()
    }

    pub fn stake_asset(&self) -> Address {
        self.stake_asset.get_or_revert_with(PoolError::NotInitialized)
    }

    /// Reward token address, `None` for native CSPR
    pub fn reward_asset(&self) -> Option<Address> {
        self.reward_asset_kind().marker()
    }

    pub fn is_native_reward_pool(&self) -> bool {
        self.reward_asset_kind() == Asset::Native
    }

    pub fn reward_per_block(&self) -> U256 {
        self.reward_per_block.get_or_default()
    }

    pub fn start_block(&self) -> u64 {
        self.start_block.get_or_default()
    }

    pub fn bonus_end_block(&self) -> u64 {
        self.bonus_end_block.get_or_default()
    }

    pub fn lock_block(&self) -> Option<u64> {
        self.lock_block.get().flatten()
    }

    pub fn total_staked(&self) -> U256 {
        self.total_staked.get_or_default()
    }

    pub fn pool_info(&self) -> PoolInfo {
        PoolInfo {
            stake_asset: self.stake_asset(),
            reward_asset: self.reward_asset(),
            schedule: self.schedule(),
            reward_per_block: self.reward_per_block(),
            start_block: self.start_block(),
            bonus_end_block: self.bonus_end_block(),
            lock_block: self.lock_block(),
            acc_reward_per_share: self.acc_reward_per_share.get_or_default(),
            last_reward_block: self.last_reward_block.get_or_default(),
            total_staked: self.total_staked(),
        }
    }

    pub fn user_info(&self, user: Address) -> UserInfo {
        self.users.get(&user).unwrap_or_default()
    }

    /// Staked amount of `account` if this pool stakes `stake_asset`, else zero.
    ///
    /// Never reverts, so registries can aggregate over many pools safely.
    pub fn holding_of(&self, account: Address, stake_asset: Address) -> U256 {
        match self.stake_asset.get() {
            Some(asset) if asset == stake_asset => self.user_info(account).amount,
            _ => U256::zero(),
        }
    }

    /// Current schedule unit
    pub fn current_block(&self) -> u64 {
        self.schedule().clock(self.env().get_block_time())
    }

    /// First schedule unit that still earns rewards from now on
    pub fn next_reward_block(&self) -> u64 {
        self.current_block().max(self.start_block())
    }

    pub fn phase(&self) -> PoolPhase {
        if !self.is_initialized() {
            return PoolPhase::Uninitialized;
        }
        let now = self.current_block();
        if now < self.start_block() {
            PoolPhase::Pending
        } else if now < self.bonus_end_block() {
            PoolPhase::Active
        } else {
            PoolPhase::Finished
        }
    }

    /// Reward `user` would receive if they harvested now
    pub fn pending_reward(&self, user: Address) -> U256 {
        let info = self.user_info(user);
        RewardMath::pending(info.amount, self.projected_acc_reward_per_share(), info.reward_debt)
            .unwrap_or_revert(&self.env())
    }

    /// Reward asset held by the pool, excluding staked principal when the
    /// reward and stake asset are the same token
    pub fn reward_balance(&self) -> U256 {
        let env = self.env();
        let held = self.reward_asset_kind().self_balance(&env).unwrap_or_revert(&env);
        if self.reward_asset_kind().is_token(self.stake_asset()) {
            held.saturating_sub(self.total_staked())
        } else {
            held
        }
    }

    /// Rewards accrued to stakers and not yet paid out
    pub fn unharvested_rewards(&self) -> U256 {
        let allocated = self.total_rewards_allocated.get_or_default() + self.projected_reward();
        allocated.saturating_sub(self.total_rewards_paid.get_or_default())
    }

    /// Rewards not yet owed to anyone, funding the rest of the schedule
    pub fn available_rewards(&self) -> U256 {
        self.reward_balance().saturating_sub(self.unharvested_rewards())
    }

    /// Owed rewards plus what the remaining schedule will emit
    pub fn rewards_left_to_pay(&self) -> U256 {
        self.unharvested_rewards() + self.scheduled_rewards()
    }

    /// Whether the funded rewards cover the remaining schedule, within
    /// `REWARD_VARIANCE_TOLERANCE`
    pub fn is_solvent(&self) -> bool {
        self.scheduled_rewards() <= self.available_rewards() + U256::from(REWARD_VARIANCE_TOLERANCE)
    }

    /// Stake tokens held by the pool
    pub fn total_stake_token_balance(&self) -> U256 {
        let env = self.env();
        Asset::Token(self.stake_asset()).self_balance(&env).unwrap_or_revert(&env)
    }

    /// Stake tokens held beyond `total_staked`, e.g. fee-on-transfer reflections.
    ///
    /// Always zero when stake and reward are the same token, as the surplus is
    /// then reward funding.
    pub fn stake_token_fee_balance(&self) -> U256 {
        if self.reward_asset_kind().is_token(self.stake_asset()) {
            return U256::zero();
        }
        self.total_stake_token_balance().saturating_sub(self.total_staked())
    }

    pub fn staker_count(&self) -> u32 {
        self.staker_count.get_or_default()
    }

    pub fn staker_at(&self, index: u32) -> Option<Address> {
        self.stakers.get(&index)
    }

    // ========================================
    // Internal Functions
    // ========================================

    fn accrue(&mut self) -> Result<(), PoolError> {
        let now = self.current_block();
        let last = self.last_reward_block.get_or_default();
        let target = now.min(self.bonus_end_block());
        if target <= last {
            return Ok(());
        }

        let total_staked = self.total_staked();
        if total_staked.is_zero() {
            self.last_reward_block.set(target);
            return Ok(());
        }

        let reward = SafeMath::mul(U256::from(target - last), self.reward_per_block())?;
        let increase = RewardMath::reward_per_share(reward, total_staked)?;
        let acc = SafeMath::add(self.acc_reward_per_share.get_or_default(), increase)?;
        let allocated = SafeMath::add(self.total_rewards_allocated.get_or_default(), reward)?;

        self.acc_reward_per_share.set(acc);
        self.total_rewards_allocated.set(allocated);
        self.last_reward_block.set(target);
        Ok(())
    }

    /// Reward that `accrue` would allocate if called now
    fn projected_reward(&self) -> U256 {
        let last = self.last_reward_block.get_or_default();
        let blocks = RewardMath::multiplier(last, self.current_block(), self.bonus_end_block());
        if blocks == 0 || self.total_staked().is_zero() {
            return U256::zero();
        }
        U256::from(blocks) * self.reward_per_block()
    }

    fn projected_acc_reward_per_share(&self) -> U256 {
        let acc = self.acc_reward_per_share.get_or_default();
        let reward = self.projected_reward();
        if reward.is_zero() {
            return acc;
        }
        let increase = RewardMath::reward_per_share(reward, self.total_staked()).unwrap_or_revert(&self.env());
        acc + increase
    }

    /// Emission still scheduled from `next_reward_block` to the end
    fn scheduled_rewards(&self) -> U256 {
        let end = self.bonus_end_block();
        let remaining = end.saturating_sub(self.next_reward_block());
        U256::from(remaining) * self.reward_per_block()
    }

    /// Pay `user` their pending reward, refusing if the pool cannot cover it
    fn settle(&mut self, to: Address, user: &UserInfo) -> Result<U256, PoolError> {
        if user.amount.is_zero() {
            return Ok(U256::zero());
        }
        let pending = RewardMath::pending(user.amount, self.acc_reward_per_share.get_or_default(), user.reward_debt)?;
        if pending.is_zero() {
            return Ok(pending);
        }
        if self.reward_balance() < pending {
            return Err(PoolError::InsufficientRewardBalance);
        }

        let env = self.env();
        self.reward_asset_kind().transfer_out(&env, to, pending)?;
        let paid = SafeMath::add(self.total_rewards_paid.get_or_default(), pending)?;
        self.total_rewards_paid.set(paid);

        env.emit_event(RewardPaid { user: to, amount: pending });
        Ok(pending)
    }

    /// A finished pool that gets extended resumes from now, not from its old
    /// end, so the gap is never paid retroactively
    fn restart_if_finished(&mut self) {
        let now = self.current_block();
        if self.last_reward_block.get_or_default() < now {
            self.last_reward_block.set(now);
        }
    }

    fn register_staker(&mut self, user: Address) {
        if self.is_staker.get(&user).unwrap_or(false) {
            return;
        }
        let index = self.staker_count.get_or_default();
        self.stakers.set(&index, user);
        self.staker_count.set(index + 1);
        self.is_staker.set(&user, true);
    }

    fn schedule(&self) -> ScheduleKind {
        self.schedule.get_or_default()
    }

    fn reward_asset_kind(&self) -> Asset {
        Asset::from_marker(self.reward_asset.get_or_revert_with(PoolError::NotInitialized))
    }

    fn require_initialized(&self) {
        if !self.is_initialized() {
            self.env().revert(PoolError::NotInitialized);
        }
    }

    fn require_unlocked(&self) {
        if let Some(lock_block) = self.lock_block() {
            if self.current_block() < lock_block {
                self.env().revert(PoolError::WithdrawLocked);
            }
        }
    }

    fn only_owner(&self) {
        let owner = self.owner.get_or_revert_with(PoolError::NotInitialized);
        if self.env().caller() != owner {
            self.env().revert(PoolError::Unauthorized);
        }
    }
}

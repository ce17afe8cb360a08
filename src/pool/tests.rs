//! Tests for reward pools

#[cfg(test)]
mod tests {
    use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
    use odra::casper_types::{U256, U512};
    use odra::prelude::*;
    use crate::math::RewardMath;
    use crate::pool::reward_pool::RewardPoolHostRef;
    use crate::pool::{RewardPool, ScheduleKind, PoolPhase, PoolError, BLOCK_INTERVAL_MILLIS};
    use crate::token::{Cep18, Cep18HostRef, Cep18InitArgs};
    use crate::tokens::{TaxToken, TaxTokenInitArgs};

    const TOKEN_SUPPLY: u64 = 1_000_000_000;
    const USER_STAKE_BALANCE: u64 = 1_000_000;

    struct Fixture {
        env: HostEnv,
        owner: Address,
        alice: Address,
        bob: Address,
        stake: Cep18HostRef,
        reward: Cep18HostRef,
        pool: RewardPoolHostRef,
        start: u64,
    }

    impl Fixture {
        fn pool_address(&self) -> Address {
            self.pool.address().clone()
        }

        /// Owner tops up rewards without moving the schedule end
        fn fund(&mut self, value: u64) {
            self.env.set_caller(self.owner);
            if self.pool.is_native_reward_pool() {
                self.pool.with_tokens(U512::from(value)).deposit_rewards(U256::zero(), false);
            } else {
                let pool = self.pool_address();
                self.reward.approve(pool, amount(value));
                self.pool.deposit_rewards(amount(value), false);
            }
        }

        fn deposit(&mut self, user: Address, value: u64) {
            self.env.set_caller(user);
            self.pool.deposit(amount(value));
        }

        fn advance_to(&self, block: u64) {
            let now = current_block(&self.env);
            if block > now {
                self.env.advance_block_time((block - now) * BLOCK_INTERVAL_MILLIS);
            }
        }
    }

    fn amount(value: u64) -> U256 {
        U256::from(value)
    }

    fn current_block(env: &HostEnv) -> u64 {
        env.block_time() / BLOCK_INTERVAL_MILLIS
    }

    fn deploy_token(env: &HostEnv, name: &str, symbol: &str) -> Cep18HostRef {
        Cep18::deploy(env, Cep18InitArgs {
            name: String::from(name),
            symbol: String::from(symbol),
            decimals: 18,
            initial_supply: amount(TOKEN_SUPPLY),
        })
    }

    /// Pool over `duration` blocks starting 10 blocks from now, with alice
    /// and bob holding stake tokens and having approved the pool
    fn setup(native: bool, reward_per_block: u64, duration: u64, lock_offset: Option<u64>) -> Fixture {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let alice = env.get_account(1);
        let bob = env.get_account(2);

        let mut stake = deploy_token(&env, "Stake Token", "STAKE");
        let reward = deploy_token(&env, "Reward Token", "RWD");
        stake.transfer(alice, amount(USER_STAKE_BALANCE));
        stake.transfer(bob, amount(USER_STAKE_BALANCE));

        let mut pool = RewardPool::deploy(&env, NoArgs);
        let start = current_block(&env) + 10;
        let reward_asset = if native { None } else { Some(reward.address().clone()) };
        pool.initialize(
            stake.address().clone(),
            reward_asset,
            amount(reward_per_block),
            start,
            start + duration,
            lock_offset.map(|offset| start + offset),
            ScheduleKind::Block,
        );

        let pool_address = pool.address().clone();
        for user in [alice, bob] {
            env.set_caller(user);
            stake.approve(pool_address, U256::MAX);
        }
        env.set_caller(owner);

        Fixture { env, owner, alice, bob, stake, reward, pool, start }
    }

    #[test]
    fn test_initialize_configures_pool() {
        let f = setup(false, 1_000, 100, Some(50));
        let info = f.pool.pool_info();

        assert!(f.pool.is_initialized());
        assert_eq!(f.pool.owner(), Some(f.owner));
        assert_eq!(f.pool.deployer(), Some(f.owner));
        assert_eq!(info.stake_asset, f.stake.address().clone());
        assert_eq!(info.reward_asset, Some(f.reward.address().clone()));
        assert_eq!(info.reward_per_block, amount(1_000));
        assert_eq!(info.start_block, f.start);
        assert_eq!(info.bonus_end_block, f.start + 100);
        assert_eq!(info.lock_block, Some(f.start + 50));
        assert_eq!(info.last_reward_block, f.start);
        assert_eq!(info.total_staked, U256::zero());
        assert_eq!(f.pool.phase(), PoolPhase::Pending);
        assert_eq!(f.pool.next_reward_block(), f.start);
        assert!(!f.pool.is_native_reward_pool());
    }

    #[test]
    fn test_initialize_only_once() {
        let mut f = setup(false, 1_000, 100, None);
        let stake = f.stake.address().clone();
        let result = f.pool.try_initialize(stake, None, amount(1), f.start, f.start + 10, None, ScheduleKind::Block);
        assert_eq!(result, Err(PoolError::AlreadyInitialized.into()));
    }

    #[test]
    fn test_initialize_rejects_empty_range() {
        let env = odra_test::env();
        let stake = deploy_token(&env, "Stake Token", "STAKE");
        let mut pool = RewardPool::deploy(&env, NoArgs);

        let result = pool.try_initialize(stake.address().clone(), None, amount(1), 100, 100, None, ScheduleKind::Block);
        assert_eq!(result, Err(PoolError::InvalidRange.into()));
        assert!(!pool.is_initialized());
    }

    #[test]
    fn test_uninitialized_pool() {
        let env = odra_test::env();
        let stake = deploy_token(&env, "Stake Token", "STAKE");
        let mut pool = RewardPool::deploy(&env, NoArgs);

        assert_eq!(pool.phase(), PoolPhase::Uninitialized);
        assert_eq!(pool.try_deposit(amount(10)), Err(PoolError::NotInitialized.into()));
        assert_eq!(pool.try_stake_asset(), Err(PoolError::NotInitialized.into()));
        // Registries rely on this never reverting
        assert_eq!(pool.holding_of(env.get_account(0), stake.address().clone()), U256::zero());
    }

    #[test]
    fn test_timestamp_schedule_counts_seconds() {
        let env = odra_test::env();
        let stake = deploy_token(&env, "Stake Token", "STAKE");
        let mut pool = RewardPool::deploy(&env, NoArgs);
        let now = env.block_time() / 1_000;

        pool.initialize(stake.address().clone(), None, amount(1), now + 60, now + 120, None, ScheduleKind::Timestamp);
        assert_eq!(pool.current_block(), now);
        assert_eq!(pool.phase(), PoolPhase::Pending);

        env.advance_block_time(60_000);
        assert_eq!(pool.phase(), PoolPhase::Active);
        env.advance_block_time(60_000);
        assert_eq!(pool.phase(), PoolPhase::Finished);
    }

    #[test]
    fn test_rewards_split_by_stake_share() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        assert_eq!(f.pool.reward_per_block(), amount(1_000));

        f.deposit(f.alice, 100);
        f.deposit(f.bob, 400);
        assert_eq!(f.pool.total_staked(), amount(500));

        f.advance_to(f.start + 10);
        assert_eq!(f.pool.phase(), PoolPhase::Active);
        assert_eq!(f.pool.pending_reward(f.alice), amount(2_000));
        assert_eq!(f.pool.pending_reward(f.bob), amount(8_000));

        f.env.set_caller(f.alice);
        f.pool.withdraw(amount(100));
        assert_eq!(f.reward.balance_of(f.alice), amount(2_000));
        assert_eq!(f.stake.balance_of(f.alice), amount(USER_STAKE_BALANCE));
        assert_eq!(f.pool.user_info(f.alice).amount, U256::zero());
        assert_eq!(f.pool.pending_reward(f.alice), U256::zero());

        // Bob now earns the whole emission
        f.advance_to(f.start + 20);
        assert_eq!(f.pool.pending_reward(f.bob), amount(18_000));

        f.advance_to(f.start + 105);
        assert_eq!(f.pool.phase(), PoolPhase::Finished);
        f.env.set_caller(f.bob);
        f.pool.harvest();

        // Everything funded was paid out, nothing more
        assert_eq!(f.reward.balance_of(f.bob), amount(98_000));
        assert_eq!(f.reward.balance_of(f.alice) + f.reward.balance_of(f.bob), amount(100_000));
        assert_eq!(f.pool.reward_balance(), U256::zero());
        assert_eq!(f.pool.unharvested_rewards(), U256::zero());
        assert_eq!(f.pool.rewards_left_to_pay(), U256::zero());
        assert_eq!(f.pool.total_staked(), f.pool.user_info(f.bob).amount);
    }

    #[test]
    fn test_equal_stakes_split_evenly() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        f.deposit(f.alice, 100);
        f.deposit(f.bob, 100);

        // Halfway through the schedule each holds half of rate * elapsed
        f.advance_to(f.start + 50);
        assert_eq!(f.pool.pending_reward(f.alice), amount(1_000 * 50 / 2));
        assert_eq!(f.pool.pending_reward(f.bob), amount(1_000 * 50 / 2));
        assert_eq!(f.pool.unharvested_rewards(), amount(50_000));
    }

    #[test]
    fn test_empty_pool_leaves_emission_unallocated() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);

        f.advance_to(f.start + 20);
        f.deposit(f.alice, 100);
        f.advance_to(f.start + 30);

        assert_eq!(f.pool.pending_reward(f.alice), amount(10_000));
        assert_eq!(f.pool.unharvested_rewards(), amount(10_000));
        // The 20 empty blocks stay in the pool as available rewards
        assert_eq!(f.pool.available_rewards(), amount(90_000));
        assert_eq!(f.pool.rewards_left_to_pay(), amount(80_000));
        assert!(f.pool.is_solvent());

        f.pool.update_pool();
        f.pool.update_pool();
        assert_eq!(f.pool.pool_info().last_reward_block, f.start + 30);
        assert_eq!(f.pool.pending_reward(f.alice), amount(10_000));
    }

    #[test]
    fn test_underfunded_pool_blocks_withdraw_but_not_emergency_exit() {
        let mut f = setup(false, 1_000, 100, None);
        // Funded behind the pool's back, far below the schedule
        let pool = f.pool_address();
        f.reward.transfer(pool, amount(5_000));
        assert!(!f.pool.is_solvent());

        f.deposit(f.alice, 100);
        f.advance_to(f.start + 10);
        assert_eq!(f.pool.pending_reward(f.alice), amount(10_000));

        f.env.set_caller(f.alice);
        assert_eq!(f.pool.try_withdraw(amount(100)), Err(PoolError::InsufficientRewardBalance.into()));
        assert_eq!(f.pool.try_harvest(), Err(PoolError::InsufficientRewardBalance.into()));
        assert_eq!(f.pool.user_info(f.alice).amount, amount(100));
        assert_eq!(f.stake.balance_of(f.alice), amount(USER_STAKE_BALANCE - 100));

        f.pool.emergency_withdraw();
        let info = f.pool.user_info(f.alice);
        assert_eq!(info.amount, U256::zero());
        assert_eq!(info.reward_debt, U256::zero());
        assert_eq!(f.pool.total_staked(), U256::zero());
        assert_eq!(f.pool.pending_reward(f.alice), U256::zero());
        assert_eq!(f.stake.balance_of(f.alice), amount(USER_STAKE_BALANCE));
        assert_eq!(f.reward.balance_of(f.alice), U256::zero());
    }

    #[test]
    fn test_emergency_exit_releases_forfeited_rewards() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        f.deposit(f.alice, 100);
        f.deposit(f.bob, 100);

        f.advance_to(f.start + 50);
        assert_eq!(f.pool.pending_reward(f.bob), amount(25_000));

        // Exit without a prior pool update
        f.env.set_caller(f.alice);
        f.pool.emergency_withdraw();
        assert_eq!(f.pool.pool_info().last_reward_block, f.start + 50);
        assert_eq!(f.pool.pending_reward(f.bob), amount(25_000));
        assert_eq!(f.pool.unharvested_rewards(), amount(25_000));
        assert_eq!(f.pool.available_rewards(), amount(75_000));
        assert_eq!(f.reward.balance_of(f.alice), U256::zero());

        f.advance_to(f.start + 105);
        f.env.set_caller(f.bob);
        f.pool.withdraw(amount(100));
        assert_eq!(f.reward.balance_of(f.bob), amount(75_000));

        assert_eq!(f.pool.total_staked(), U256::zero());
        assert_eq!(f.pool.unharvested_rewards(), U256::zero());
        assert_eq!(f.pool.rewards_left_to_pay(), U256::zero());
        assert_eq!(f.pool.reward_balance(), amount(25_000));
        assert_eq!(f.pool.available_rewards(), amount(25_000));

        f.env.set_caller(f.owner);
        let owner_before = f.reward.balance_of(f.owner);
        f.pool.emergency_reward_withdraw(amount(25_000));
        assert_eq!(f.reward.balance_of(f.owner), owner_before + amount(25_000));
        assert_eq!(f.pool.reward_balance(), U256::zero());
    }

    #[test]
    fn test_withdraw_guards() {
        let mut f = setup(false, 1_000, 100, Some(50));
        f.fund(100_000);
        f.deposit(f.alice, 100);

        f.env.set_caller(f.alice);
        assert_eq!(f.pool.try_withdraw(amount(200)), Err(PoolError::InsufficientStake.into()));
        assert_eq!(f.pool.try_withdraw(amount(50)), Err(PoolError::WithdrawLocked.into()));
        assert_eq!(f.pool.try_emergency_withdraw(), Err(PoolError::WithdrawLocked.into()));

        f.advance_to(f.start + 50);
        f.env.set_caller(f.alice);
        f.pool.withdraw(amount(100));
        assert_eq!(f.stake.balance_of(f.alice), amount(USER_STAKE_BALANCE));
        assert_eq!(f.reward.balance_of(f.alice), amount(50_000));
    }

    #[test]
    fn test_fee_on_transfer_stake_token() {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let alice = env.get_account(1);
        let bob = env.get_account(2);
        let carol = env.get_account(3);

        let mut stake = TaxToken::deploy(&env, TaxTokenInitArgs {
            name: String::from("Tax Token"),
            symbol: String::from("TAX"),
            initial_supply: amount(TOKEN_SUPPLY),
            fee_bps: 1_000,
        });
        stake.set_excluded(owner, true);
        stake.transfer(alice, amount(1_000));
        stake.transfer(bob, amount(1_000));
        let reward = deploy_token(&env, "Reward Token", "RWD");

        let mut pool = RewardPool::deploy(&env, NoArgs);
        let start = current_block(&env) + 10;
        let stake_address = stake.address().clone();
        pool.initialize(stake_address, Some(reward.address().clone()), U256::zero(), start, start + 100, None, ScheduleKind::Block);
        let pool_address = pool.address().clone();

        // 10% is withheld on the way in; only what arrived is credited
        env.set_caller(alice);
        stake.approve(pool_address, amount(1_000));
        pool.deposit(amount(1_000));
        assert_eq!(pool.user_info(alice).amount, amount(900));
        assert_eq!(pool.total_staked(), amount(900));
        assert_eq!(pool.stake_token_fee_balance(), U256::zero());

        // Fees routed to the pool accumulate outside the staked principal
        env.set_caller(owner);
        stake.set_fee_collector(pool_address);
        env.set_caller(bob);
        stake.transfer(carol, amount(1_000));
        assert_eq!(stake.balance_of(carol), amount(900));
        assert_eq!(pool.stake_token_fee_balance(), amount(100));
        assert_eq!(pool.total_stake_token_balance(), amount(1_000));
        assert_eq!(pool.total_staked(), amount(900));

        env.set_caller(owner);
        let owner_before = stake.balance_of(owner);
        pool.skim_stake_token_fee(owner);
        assert_eq!(stake.balance_of(owner), owner_before + amount(100));
        assert_eq!(pool.stake_token_fee_balance(), U256::zero());
        assert_eq!(pool.total_staked(), amount(900));

        // The fee on the way out lands back in the pool as skimmable surplus
        env.set_caller(alice);
        pool.withdraw(amount(900));
        assert_eq!(stake.balance_of(alice), amount(810));
        assert_eq!(pool.total_staked(), U256::zero());
        assert_eq!(pool.stake_token_fee_balance(), amount(90));
    }

    #[test]
    fn test_same_token_pool_keeps_principal_out_of_rewards() {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let alice = env.get_account(1);
        let mut token = deploy_token(&env, "Stake Token", "STAKE");
        token.transfer(alice, amount(USER_STAKE_BALANCE));

        let mut pool = RewardPool::deploy(&env, NoArgs);
        let start = current_block(&env) + 10;
        let token_address = token.address().clone();
        pool.initialize(token_address, Some(token_address), amount(1_000), start, start + 100, None, ScheduleKind::Block);
        let pool_address = pool.address().clone();

        token.approve(pool_address, amount(100_000));
        pool.deposit_rewards(amount(100_000), false);
        assert_eq!(pool.reward_balance(), amount(100_000));

        env.set_caller(alice);
        token.approve(pool_address, amount(100));
        pool.deposit(amount(100));
        assert_eq!(pool.reward_balance(), amount(100_000));
        assert_eq!(pool.stake_token_fee_balance(), U256::zero());

        env.advance_block_time(20 * BLOCK_INTERVAL_MILLIS);
        env.set_caller(alice);
        pool.withdraw(amount(100));
        assert_eq!(token.balance_of(alice), amount(USER_STAKE_BALANCE + 10_000));
        assert_eq!(pool.reward_balance(), amount(90_000));
        assert_eq!(token.balance_of(owner), amount(TOKEN_SUPPLY - USER_STAKE_BALANCE - 100_000));
    }

    #[test]
    fn test_extension_with_reward_top_up() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        f.deposit(f.alice, 100);
        f.advance_to(f.start + 50);

        // Top up and let the end move so the current rate spends it
        f.env.set_caller(f.owner);
        let pool = f.pool_address();
        f.reward.approve(pool, amount(50_000));
        f.pool.deposit_rewards(amount(50_000), true);

        assert_eq!(f.pool.bonus_end_block(), f.start + 150);
        assert_eq!(f.pool.reward_per_block(), amount(1_000));
        assert_eq!(f.pool.unharvested_rewards(), amount(50_000));
        assert_eq!(f.pool.rewards_left_to_pay(), f.pool.reward_balance());
        let scheduled = f.pool.rewards_left_to_pay() - f.pool.unharvested_rewards();
        assert!(RewardMath::within_tolerance(scheduled, f.pool.available_rewards()));
        assert!(f.pool.is_solvent());

        // Stretching the schedule lowers the rate over the same budget
        f.pool.update_bonus_end_block(f.start + 250);
        assert_eq!(f.pool.reward_per_block(), amount(500));
        assert!(f.pool.is_solvent());

        f.advance_to(f.start + 260);
        assert_eq!(f.pool.pending_reward(f.alice), amount(150_000));
        f.env.set_caller(f.alice);
        f.pool.harvest();
        assert_eq!(f.reward.balance_of(f.alice), amount(150_000));
        assert_eq!(f.pool.reward_balance(), U256::zero());
    }

    #[test]
    fn test_extension_after_finish_does_not_pay_gap() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        f.deposit(f.alice, 100);
        f.advance_to(f.start + 120);
        assert_eq!(f.pool.phase(), PoolPhase::Finished);

        f.fund(50_000);
        assert_eq!(f.pool.available_rewards(), amount(50_000));

        f.pool.update_bonus_end_block(f.start + 170);
        assert_eq!(f.pool.phase(), PoolPhase::Active);
        assert_eq!(f.pool.reward_per_block(), amount(1_000));
        assert_eq!(f.pool.pool_info().last_reward_block, f.start + 120);

        // Blocks 100..120 earned nothing
        f.advance_to(f.start + 180);
        assert_eq!(f.pool.pending_reward(f.alice), amount(150_000));
        f.env.set_caller(f.alice);
        f.pool.harvest();
        assert_eq!(f.pool.reward_balance(), U256::zero());
    }

    #[test]
    fn test_update_bonus_end_block_must_extend() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);

        assert_eq!(f.pool.try_update_bonus_end_block(f.start + 100), Err(PoolError::InvalidRange.into()));
        assert_eq!(f.pool.try_update_bonus_end_block(f.start + 50), Err(PoolError::InvalidRange.into()));

        f.advance_to(f.start + 200);
        assert_eq!(f.pool.try_update_bonus_end_block(f.start + 150), Err(PoolError::InvalidRange.into()));
    }

    #[test]
    fn test_native_reward_pool() {
        let mut f = setup(true, 1_000, 100, None);
        assert!(f.pool.is_native_reward_pool());
        assert_eq!(f.pool.reward_asset(), None);

        f.fund(100_000);
        assert_eq!(f.pool.reward_balance(), amount(100_000));
        assert_eq!(f.pool.reward_per_block(), amount(1_000));

        f.deposit(f.alice, 100);
        f.advance_to(f.start + 10);

        let before = f.env.balance_of(&f.alice);
        f.env.set_caller(f.alice);
        f.pool.withdraw(amount(100));
        let after = f.env.balance_of(&f.alice);

        assert_eq!(after - before, U512::from(10_000u64));
        assert_eq!(f.pool.reward_balance(), amount(90_000));
        assert_eq!(f.stake.balance_of(f.alice), amount(USER_STAKE_BALANCE));
    }

    #[test]
    fn test_native_top_up_must_match_attached_value() {
        let mut f = setup(true, 1_000, 100, None);
        f.env.set_caller(f.owner);

        assert_eq!(
            f.pool.try_deposit_rewards(amount(1_000), false),
            Err(PoolError::AttachedValueMismatch.into())
        );
        assert_eq!(
            f.pool.with_tokens(U512::from(500u64)).try_deposit_rewards(amount(1_000), false),
            Err(PoolError::AttachedValueMismatch.into())
        );
        assert_eq!(f.pool.reward_balance(), U256::zero());

        f.pool.with_tokens(U512::from(1_000u64)).deposit_rewards(amount(1_000), false);
        assert_eq!(f.pool.reward_balance(), amount(1_000));
    }

    #[test]
    fn test_owner_only_operations() {
        let mut f = setup(false, 1_000, 100, None);
        let stray = deploy_token(&f.env, "Stray", "STRAY").address().clone();

        f.env.set_caller(f.alice);
        let unauthorized = Err(PoolError::Unauthorized.into());
        assert_eq!(f.pool.try_deposit_rewards(U256::zero(), false), unauthorized);
        assert_eq!(f.pool.try_update_bonus_end_block(f.start + 200), unauthorized);
        assert_eq!(f.pool.try_set_reward_per_block(amount(1)), unauthorized);
        assert_eq!(f.pool.try_skim_stake_token_fee(f.alice), unauthorized);
        assert_eq!(f.pool.try_emergency_reward_withdraw(amount(1)), unauthorized);
        assert_eq!(f.pool.try_sweep_token(stray, f.alice), unauthorized);
        assert_eq!(f.pool.try_transfer_ownership(f.alice), unauthorized);

        f.env.set_caller(f.owner);
        f.pool.transfer_ownership(f.alice);
        assert_eq!(f.pool.owner(), Some(f.alice));
        assert_eq!(f.pool.try_set_reward_per_block(amount(1)), unauthorized);

        f.env.set_caller(f.alice);
        f.pool.set_reward_per_block(amount(500));
        assert_eq!(f.pool.reward_per_block(), amount(500));
    }

    #[test]
    fn test_emergency_reward_withdraw_limited_to_available() {
        let mut f = setup(false, 1_000, 100, None);
        f.fund(100_000);
        f.deposit(f.alice, 100);
        f.advance_to(f.start + 30);

        f.env.set_caller(f.owner);
        let owner_before = f.reward.balance_of(f.owner);
        assert_eq!(
            f.pool.try_emergency_reward_withdraw(amount(70_001)),
            Err(PoolError::InsufficientRewardBalance.into())
        );
        f.pool.emergency_reward_withdraw(amount(70_000));
        assert_eq!(f.reward.balance_of(f.owner), owner_before + amount(70_000));
        assert_eq!(f.pool.reward_balance(), amount(30_000));

        // Accrued rewards remain claimable
        f.env.set_caller(f.alice);
        f.pool.harvest();
        assert_eq!(f.reward.balance_of(f.alice), amount(30_000));
    }

    #[test]
    fn test_sweep_token() {
        let mut f = setup(false, 1_000, 100, None);
        let mut stray = deploy_token(&f.env, "Stray", "STRAY");
        let pool = f.pool_address();
        stray.transfer(pool, amount(500));

        let stray_address = stray.address().clone();
        f.pool.sweep_token(stray_address, f.bob);
        assert_eq!(stray.balance_of(f.bob), amount(500));
        assert_eq!(stray.balance_of(pool), U256::zero());

        let stake = f.stake.address().clone();
        let reward = f.reward.address().clone();
        assert_eq!(f.pool.try_sweep_token(stake, f.bob), Err(PoolError::ProtectedToken.into()));
        assert_eq!(f.pool.try_sweep_token(reward, f.bob), Err(PoolError::ProtectedToken.into()));
    }

    #[test]
    fn test_deposit_to_and_staker_index() {
        let mut f = setup(false, 1_000, 100, None);
        let stake = f.stake.address().clone();
        let reward = f.reward.address().clone();

        f.env.set_caller(f.bob);
        f.pool.deposit_to(amount(100), f.alice);
        assert_eq!(f.pool.user_info(f.alice).amount, amount(100));
        assert_eq!(f.pool.user_info(f.bob).amount, U256::zero());
        assert_eq!(f.stake.balance_of(f.bob), amount(USER_STAKE_BALANCE - 100));
        assert_eq!(f.pool.staker_count(), 1);
        assert_eq!(f.pool.staker_at(0), Some(f.alice));

        f.deposit(f.alice, 50);
        assert_eq!(f.pool.staker_count(), 1);
        f.deposit(f.bob, 10);
        assert_eq!(f.pool.staker_count(), 2);
        assert_eq!(f.pool.staker_at(1), Some(f.bob));

        assert_eq!(f.pool.holding_of(f.alice, stake), amount(150));
        assert_eq!(f.pool.holding_of(f.alice, reward), U256::zero());
        assert_eq!(f.pool.total_staked(), amount(160));
    }
}

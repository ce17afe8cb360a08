//! Host-side holdings aggregation
//!
//! A contract cannot recover from a reverted call to another contract, so the
//! on-chain registry relies on pools answering through a view that never
//! reverts. Off-chain readers (indexers, the CLI) can do better: every pool is
//! queried on its own and pools that fail are reported instead of summed.

use odra::casper_types::U256;
use odra::host::{HostEnv, HostRefLoader};
use odra::prelude::*;
use crate::manager::PoolManager;
use crate::pool::RewardPool;

/// Best-effort sum of an account's stake over a set of pools
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HoldingsReport {
    pub total: U256,
    /// Pools whose calls reverted and were left out of `total`
    pub skipped: Vec<Address>,
}

/// Sum the stake of `account` over `pools` staking `stake_asset`
pub fn total_holdings(env: &HostEnv, pools: &[Address], account: Address, stake_asset: Address) -> HoldingsReport {
    let mut report = HoldingsReport::default();
    for pool_address in pools {
        let pool = RewardPool::load(env, *pool_address);
        let holding = pool.try_stake_asset().and_then(|asset| {
            if asset == stake_asset {
                pool.try_user_info(account).map(|info| info.amount)
            } else {
                Ok(U256::zero())
            }
        });
        match holding {
            Ok(amount) => report.total += amount,
            Err(_) => report.skipped.push(*pool_address),
        }
    }
    report
}

/// `total_holdings` over the active pools of a deployed PoolManager
pub fn registry_holdings(env: &HostEnv, manager: Address, account: Address, stake_asset: Address) -> HoldingsReport {
    let pools = PoolManager::load(env, manager).all_active_pools();
    total_holdings(env, &pools, account, stake_asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, HostRef, NoArgs};
    use crate::manager::pool_manager::tests::{deploy_pool, deploy_token, stake};

    #[test]
    fn test_skips_reverting_pools() {
        let env = odra_test::env();
        let alice = env.get_account(1);
        let mut token = deploy_token(&env, "A");
        let other = deploy_token(&env, "B");
        let a = token.address().clone();

        let mut first = deploy_pool(&env, a);
        let mut second = deploy_pool(&env, a);
        let foreign = deploy_pool(&env, other.address().clone());
        let uninitialized = RewardPool::deploy(&env, NoArgs);
        stake(&env, &mut token, &mut first, alice, 150);
        stake(&env, &mut token, &mut second, alice, 50);

        let mut manager = PoolManager::deploy(&env, NoArgs);
        let uninitialized_address = uninitialized.address().clone();
        manager.add_pools(
            vec![
                first.address().clone(),
                uninitialized_address,
                foreign.address().clone(),
                second.address().clone(),
            ],
            false,
        );

        let report = registry_holdings(&env, manager.address().clone(), alice, a);
        assert_eq!(report.total, U256::from(200u64));
        assert_eq!(report.skipped, vec![uninitialized_address]);
        assert_eq!(report.total, manager.view_total_holdings(alice, a));
    }
}

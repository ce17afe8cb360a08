//! CLI tool for deploying and interacting with reward pool contracts.
//!
//! Deployment settings are read once from the environment:
//! - `REWARD_POOLS_FEE_ASSET` - CEP-18 fee token; a fee token is deployed when unset
//! - `REWARD_POOLS_FEE_AMOUNT` - pool creation fee, defaults to zero
//! - `REWARD_POOLS_FEE_SINK` - fee receiver, defaults to the deployer
//! - `REWARD_POOLS_POOL_ADMIN` - owner of pools created by the factory owner,
//!   defaults to the deployer

use std::str::FromStr;

use reward_pools::factory::{FactoryConfig, PoolFactory};
use reward_pools::manager::{batch, PoolManager};
use reward_pools::pool::{RewardPoolFactory, ScheduleKind};
use reward_pools::token::Cep18;
use odra::casper_types::U256;
use odra::prelude::{Address, Addressable};
use odra::host::{HostEnv, NoArgs};
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// Deployment settings resolved from the environment
#[derive(Clone, Debug, Default)]
pub struct DeploymentConfig {
    pub fee_asset: Option<Address>,
    pub fee_amount: U256,
    pub fee_sink: Option<Address>,
    pub pool_admin: Option<Address>,
}

impl DeploymentConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            fee_asset: address_var("REWARD_POOLS_FEE_ASSET")?,
            fee_amount: match std::env::var("REWARD_POOLS_FEE_AMOUNT") {
                Ok(value) => U256::from_dec_str(&value)
                    .map_err(|_| format!("REWARD_POOLS_FEE_AMOUNT is not a decimal amount: {value}"))?,
                Err(_) => U256::zero(),
            },
            fee_sink: address_var("REWARD_POOLS_FEE_SINK")?,
            pool_admin: address_var("REWARD_POOLS_POOL_ADMIN")?,
        })
    }
}

fn address_var(name: &str) -> Result<Option<Address>, String> {
    match std::env::var(name) {
        Ok(value) => Address::from_str(&value)
            .map(Some)
            .map_err(|_| format!("{name} is not a valid address: {value}")),
        Err(_) => Ok(None),
    }
}

/// Deploys the PoolManager registry.
pub struct PoolManagerDeployScript;

impl DeployScript for PoolManagerDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        let _manager = PoolManager::load_or_deploy(
            &env,
            NoArgs,
            container,
            300_000_000_000
        )?;

        Ok(())
    }
}

/// Deploys the PoolFactory together with the contract it deploys pools through.
/// Requires the PoolManager to be deployed first.
pub struct PoolFactoryDeployScript {
    config: DeploymentConfig,
}

impl DeployScript for PoolFactoryDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        use reward_pools::factory::pool_factory::PoolFactoryInitArgs;
        use reward_pools::token::Cep18InitArgs;

        let caller = env.caller();
        let mut manager = container.contract_ref::<PoolManager>(env)?;
        let manager_address = manager.address().clone();

        let pool_deployer = RewardPoolFactory::load_or_deploy(
            &env,
            NoArgs,
            container,
            500_000_000_000
        )?;

        let fee_asset = match self.config.fee_asset {
            Some(fee_asset) => fee_asset,
            None => Cep18::load_or_deploy(
                &env,
                Cep18InitArgs {
                    name: String::from("Pool Creation Fee"),
                    symbol: String::from("PFEE"),
                    decimals: 18,
                    initial_supply: U256::zero(),
                },
                container,
                300_000_000_000
            )?.address().clone(),
        };

        let factory = PoolFactory::load_or_deploy(
            &env,
            PoolFactoryInitArgs {
                config: FactoryConfig {
                    admin: caller,
                    pool_deployer: pool_deployer.address().clone(),
                    fee_asset,
                    fee_amount: self.config.fee_amount,
                    fee_sink: self.config.fee_sink.unwrap_or(caller),
                    pool_admin: self.config.pool_admin.unwrap_or(caller),
                    pool_manager: Some(manager_address),
                },
            },
            container,
            500_000_000_000
        )?;

        // The factory registers every pool it creates
        env.set_gas(50_000_000_000);
        manager.add_authorized(factory.address().clone());

        Ok(())
    }
}

/// Deploys the complete system (PoolManager + PoolFactory).
pub struct FullDeployScript {
    config: DeploymentConfig,
}

impl DeployScript for FullDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        PoolManagerDeployScript.deploy(env, container)?;

        PoolFactoryDeployScript { config: self.config.clone() }.deploy(env, container)?;

        Ok(())
    }
}

/// Scenario to create a pool paying a CEP-18 reward token.
pub struct CreateTokenPoolScenario;

impl Scenario for CreateTokenPoolScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new("stake_asset", "Address of the staked token", NamedCLType::Key),
            CommandArg::new("reward_asset", "Address of the reward token", NamedCLType::Key),
            CommandArg::new("start_block", "First rewarded block", NamedCLType::U64),
            CommandArg::new("end_block", "Block the emission ends at", NamedCLType::U64),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut factory = container.contract_ref::<PoolFactory>(env)?;
        let stake_asset = args.get_single::<Address>("stake_asset")?;
        let reward_asset = args.get_single::<Address>("reward_asset")?;
        let start_block = args.get_single::<u64>("start_block")?;
        let end_block = args.get_single::<u64>("end_block")?;

        env.set_gas(600_000_000_000);
        let pool = factory.try_create_pool_by_owner(
            stake_asset,
            Some(reward_asset),
            start_block,
            end_block,
            None,
            ScheduleKind::Block,
        )?;

        println!("Token reward pool created: {:?}", pool);
        Ok(())
    }
}

impl ScenarioMetadata for CreateTokenPoolScenario {
    const NAME: &'static str = "create-token-pool";
    const DESCRIPTION: &'static str = "Creates a pool paying a CEP-18 reward token";
}

/// Scenario to create a pool paying native CSPR.
pub struct CreateNativePoolScenario;

impl Scenario for CreateNativePoolScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new("stake_asset", "Address of the staked token", NamedCLType::Key),
            CommandArg::new("start_block", "First rewarded block", NamedCLType::U64),
            CommandArg::new("end_block", "Block the emission ends at", NamedCLType::U64),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut factory = container.contract_ref::<PoolFactory>(env)?;
        let stake_asset = args.get_single::<Address>("stake_asset")?;
        let start_block = args.get_single::<u64>("start_block")?;
        let end_block = args.get_single::<u64>("end_block")?;

        env.set_gas(600_000_000_000);
        let pool = factory.try_create_pool_by_owner(
            stake_asset,
            None,
            start_block,
            end_block,
            None,
            ScheduleKind::Block,
        )?;

        println!("Native reward pool created: {:?}", pool);
        Ok(())
    }
}

impl ScenarioMetadata for CreateNativePoolScenario {
    const NAME: &'static str = "create-native-pool";
    const DESCRIPTION: &'static str = "Creates a pool paying native CSPR";
}

/// Scenario to report an account's stake across the registry.
pub struct HoldingsScenario;

impl Scenario for HoldingsScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new("account", "Account to report", NamedCLType::Key),
            CommandArg::new("stake_asset", "Address of the staked token", NamedCLType::Key),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let manager = container.contract_ref::<PoolManager>(env)?;
        let account = args.get_single::<Address>("account")?;
        let stake_asset = args.get_single::<Address>("stake_asset")?;

        let report = batch::registry_holdings(env, manager.address().clone(), account, stake_asset);
        println!("Total holdings: {}", report.total);
        for pool in report.skipped {
            println!("Skipped pool: {:?}", pool);
        }
        Ok(())
    }
}

impl ScenarioMetadata for HoldingsScenario {
    const NAME: &'static str = "holdings";
    const DESCRIPTION: &'static str = "Sums an account's stake over the registered pools";
}

/// Main function to run the CLI tool.
pub fn main() {
    let config = match DeploymentConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Invalid deployment configuration: {message}");
            std::process::exit(1);
        }
    };

    OdraCli::new()
        .about("CLI tool for reward pool smart contracts")
        // Deploy scripts
        .deploy(PoolManagerDeployScript)
        .deploy(PoolFactoryDeployScript { config: config.clone() })
        .deploy(FullDeployScript { config })
        // Contract references
        .contract::<PoolManager>()
        .contract::<PoolFactory>()
        .contract::<RewardPoolFactory>()
        .contract::<Cep18>()
        // Scenarios
        .scenario(CreateTokenPoolScenario)
        .scenario(CreateNativePoolScenario)
        .scenario(HoldingsScenario)
        .build()
        .run();
}

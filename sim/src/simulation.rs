//! Deployment and serial execution of contract calls

use anyhow::Context;
use coinlab_calculator::{Calculator, CalculatorReceipt, Operation};
use coinlab_core::{
    Address, Amount, Chain, Clock, DeploymentConfig, Ledger, LedgerEvent, Operand, Timestamp,
};
use coinlab_ico::{Ico, IcoReceipt, SaleParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{Result, SimError};
use crate::world::World;

/// Addresses of the deployed contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    pub token: Address,
    pub calculator: Option<Address>,
    pub sale: Option<Address>,
}

pub struct Simulation {
    chain: Chain<World>,
    clock: Arc<dyn Clock>,
    contracts: Contracts,
}

impl Simulation {
    /// Deploy everything `config` describes, at the clock's current time.
    ///
    /// Order: token, genesis funding, calculator, sale (followed by the token
    /// owner approving the sale for the whole offer).
    pub fn from_config(config: &DeploymentConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let holder = config.token.holder()?;
        let mut world = World::genesis(
            config.token.deployer()?,
            &config.token.name,
            &config.token.symbol,
            holder,
            config.token.initial_supply()?,
        );

        for account in &config.accounts {
            let address = account.address()?;
            world.native.credit(address, account.native()?)?;
            let tokens = account.tokens()?;
            if tokens > 0 {
                world.token.transfer(holder, address, tokens)?;
            }
        }

        let calculator = match &config.calculator {
            Some(calc) => {
                let address = world.next_contract_address(calc.deployer()?);
                world.calculator = Some(Calculator::with_fee(
                    address,
                    world.token.address(),
                    calc.beneficiary()?,
                    calc.fee()?,
                ));
                Some(address)
            }
            None => None,
        };

        let sale = match &config.sale {
            Some(sale) => {
                let deployer = sale.deployer()?;
                let token_owner = sale.token_owner()?;
                let offer = sale.offer()?;
                let address = world.next_contract_address(deployer);
                let params = SaleParams::new(
                    world.token.address(),
                    offer,
                    Amount::from(sale.price),
                    sale.duration_secs,
                    sale.locked,
                )
                .with_token_owner(token_owner);

                world.sale = Some(Ico::deploy(address, deployer, params, clock.now())?);
                world.token.approve(token_owner, address, offer)?;
                Some(address)
            }
            None => None,
        };

        world.token.drain_events();

        let contracts = Contracts {
            token: world.token.address(),
            calculator,
            sale,
        };
        info!(
            token = %contracts.token,
            calculator = ?contracts.calculator,
            sale = ?contracts.sale,
            "deployment complete"
        );

        Ok(Self {
            chain: Chain::new(world),
            clock,
            contracts,
        })
    }

    /// Load a TOML deployment file and deploy it.
    pub fn load<P: AsRef<Path>>(path: P, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = DeploymentConfig::load(path)
            .with_context(|| format!("Failed to load deployment config {}", path.display()))?;
        Self::from_config(&config, clock).context("Failed to deploy contracts")
    }

    pub fn contracts(&self) -> Contracts {
        self.contracts
    }

    pub fn chain(&self) -> &Chain<World> {
        &self.chain
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Pay the calculator fee and compute `a <op> b`.
    pub async fn calculate(
        &self,
        caller: Address,
        operation: Operation,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.chain
            .execute(operation.name(), |world| {
                let calculator = world.calculator.as_ref().ok_or(SimError::NoCalculator)?;
                Ok(calculator.perform(&mut world.token, caller, operation, a, b)?)
            })
            .await
    }

    pub async fn buy(&self, buyer: Address, payment: Amount) -> Result<IcoReceipt> {
        self.chain
            .execute("buy", |world| {
                let now = self.clock.now();
                let sale = world.sale.as_mut().ok_or(SimError::NoSale)?;
                Ok(sale.buy(&mut world.token, &mut world.native, buyer, payment, now)?)
            })
            .await
    }

    pub async fn withdraw(&self, caller: Address) -> Result<IcoReceipt> {
        self.chain
            .execute("withdraw", |world| {
                let now = self.clock.now();
                let sale = world.sale.as_mut().ok_or(SimError::NoSale)?;
                Ok(sale.withdraw(&mut world.native, caller, now)?)
            })
            .await
    }

    pub async fn claim(&self, caller: Address) -> Result<IcoReceipt> {
        self.chain
            .execute("claim", |world| {
                let now = self.clock.now();
                let sale = world.sale.as_mut().ok_or(SimError::NoSale)?;
                Ok(sale.claim(&mut world.token, caller, now)?)
            })
            .await
    }

    pub async fn transfer(&self, from: Address, to: Address, amount: Amount) -> Result<Vec<LedgerEvent>> {
        self.chain
            .execute("transfer", |world| {
                world.token.transfer(from, to, amount)?;
                Ok(world.token.drain_events())
            })
            .await
    }

    pub async fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>> {
        self.chain
            .execute("approve", |world| {
                world.token.approve(owner, spender, amount)?;
                Ok(world.token.drain_events())
            })
            .await
    }

    /// Credit native currency to an account.
    pub async fn fund(&self, account: Address, amount: Amount) -> Result<()> {
        self.chain
            .execute("fund", |world| Ok(world.native.credit(account, amount)?))
            .await
    }

    pub async fn token_balance(&self, account: Address) -> Amount {
        self.chain.view(|world| world.token.balance_of(&account)).await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.chain
            .view(|world| world.token.allowance(&owner, &spender))
            .await
    }

    pub async fn native_balance(&self, account: Address) -> Amount {
        self.chain.view(|world| world.native.balance_of(&account)).await
    }

    /// Payment collected by the sale and not yet withdrawn
    pub async fn sale_balance(&self) -> Result<Amount> {
        self.chain
            .view(|world| world.sale.as_ref().map(Ico::balance).ok_or(SimError::NoSale))
            .await
    }

    pub async fn escrowed(&self, buyer: Address) -> Result<Amount> {
        self.chain
            .view(|world| {
                world
                    .sale
                    .as_ref()
                    .map(|sale| sale.escrowed(&buyer))
                    .ok_or(SimError::NoSale)
            })
            .await
    }

    pub async fn calculator_price(&self) -> Result<Amount> {
        self.chain
            .view(|world| {
                world
                    .calculator
                    .as_ref()
                    .map(Calculator::price)
                    .ok_or(SimError::NoCalculator)
            })
            .await
    }
}

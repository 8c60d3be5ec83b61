//! World state shared by every simulated call

use coinlab_calculator::Calculator;
use coinlab_core::{Address, Amount, NativeBalances, Token};
use coinlab_ico::Ico;
use std::collections::HashMap;

/// Everything a call can touch: the token ledger, native balances and the
/// deployed contracts.
#[derive(Debug)]
pub struct World {
    pub token: Token,
    pub native: NativeBalances,
    pub calculator: Option<Calculator>,
    pub sale: Option<Ico>,
    nonces: HashMap<Address, u64>,
}

impl World {
    /// Deploy the token as `deployer`'s first contract.
    pub fn genesis(
        deployer: Address,
        name: &str,
        symbol: &str,
        holder: Address,
        initial_supply: Amount,
    ) -> Self {
        let mut nonces = HashMap::new();
        let address = Self::bump(&mut nonces, deployer);
        let token = Token::new(address, name, symbol, holder, initial_supply);

        Self {
            token,
            native: NativeBalances::new(),
            calculator: None,
            sale: None,
            nonces,
        }
    }

    /// Address of the next contract `deployer` creates.
    pub fn next_contract_address(&mut self, deployer: Address) -> Address {
        Self::bump(&mut self.nonces, deployer)
    }

    /// Contracts `deployer` has created so far
    pub fn nonce(&self, deployer: &Address) -> u64 {
        self.nonces.get(deployer).copied().unwrap_or(0)
    }

    fn bump(nonces: &mut HashMap<Address, u64>, deployer: Address) -> Address {
        let nonce = nonces.entry(deployer).or_insert(0);
        let address = Address::contract(&deployer, *nonce);
        *nonce += 1;
        address
    }
}

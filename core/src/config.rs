//! Deployment configuration (TOML)
//!
//! Describes the token to deploy, the optional calculator and sale contracts,
//! and the genesis funding of named accounts.
//!
//! Example:
//! ```toml
//! [token]
//! name = "Dev"
//! symbol = "DEV"
//! holder = "owner"
//! initial_supply = "100"
//!
//! [sale]
//! deployer = "owner"
//! offer = "20"
//! price = 100
//! duration_secs = 3600
//! locked = true
//! ```
//!
//! Accounts are given either as `0x`-prefixed addresses or as labels, which
//! resolve through [`Address::from_label`]. Amounts are decimal coin strings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::address::Address;
use crate::error::ConfigError;
use crate::units::{parse_ether, Amount};

fn default_fee() -> String {
    "1".to_string()
}

fn default_zero() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub token: TokenConfig,

    #[serde(default)]
    pub calculator: Option<CalculatorConfig>,

    #[serde(default)]
    pub sale: Option<SaleConfig>,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,

    /// Receives the whole initial supply
    pub holder: String,

    pub initial_supply: String,

    /// Deploying account, defaults to the holder
    #[serde(default)]
    pub deployer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Receives every fee
    pub beneficiary: String,

    /// Fee per operation, 1 coin unless set
    #[serde(default = "default_fee")]
    pub fee: String,

    /// Deploying account, defaults to the beneficiary
    #[serde(default)]
    pub deployer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Sale owner, the only account allowed to withdraw
    pub deployer: String,

    /// Account whose tokens are sold, defaults to the deployer
    #[serde(default)]
    pub token_owner: Option<String>,

    /// Token cap, approved by the token owner at deployment
    pub offer: String,

    /// Payment units per token unit
    pub price: u64,

    pub duration_secs: u64,

    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub label: String,

    /// Native currency credited at genesis
    #[serde(default = "default_zero")]
    pub native: String,

    /// Tokens sent from the token holder at genesis
    #[serde(default = "default_zero")]
    pub tokens: String,
}

impl DeploymentConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DeploymentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every amount and address resolves and the contract parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolve_account("token.holder", &self.token.holder)?;
        if let Some(deployer) = &self.token.deployer {
            resolve_account("token.deployer", deployer)?;
        }
        amount("token.initial_supply", &self.token.initial_supply)?;
        if self.token.name.trim().is_empty() || self.token.symbol.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "token name and symbol must not be empty".to_string(),
            ));
        }

        if let Some(calculator) = &self.calculator {
            calculator.beneficiary()?;
            calculator.deployer()?;
            if calculator.fee()? == 0 {
                return Err(ConfigError::InvalidValue(
                    "calculator.fee must be positive".to_string(),
                ));
            }
        }

        if let Some(sale) = &self.sale {
            sale.deployer()?;
            sale.token_owner()?;
            sale.offer()?;
            if sale.price == 0 {
                return Err(ConfigError::InvalidValue(
                    "sale.price must be positive".to_string(),
                ));
            }
        }

        for account in &self.accounts {
            account.address()?;
            amount("accounts.native", &account.native)?;
            amount("accounts.tokens", &account.tokens)?;
        }

        Ok(())
    }
}

impl TokenConfig {
    pub fn holder(&self) -> Result<Address, ConfigError> {
        resolve_account("token.holder", &self.holder)
    }

    pub fn deployer(&self) -> Result<Address, ConfigError> {
        match &self.deployer {
            Some(deployer) => resolve_account("token.deployer", deployer),
            None => self.holder(),
        }
    }

    pub fn initial_supply(&self) -> Result<Amount, ConfigError> {
        amount("token.initial_supply", &self.initial_supply)
    }
}

impl CalculatorConfig {
    pub fn beneficiary(&self) -> Result<Address, ConfigError> {
        resolve_account("calculator.beneficiary", &self.beneficiary)
    }

    pub fn deployer(&self) -> Result<Address, ConfigError> {
        match &self.deployer {
            Some(deployer) => resolve_account("calculator.deployer", deployer),
            None => self.beneficiary(),
        }
    }

    pub fn fee(&self) -> Result<Amount, ConfigError> {
        amount("calculator.fee", &self.fee)
    }
}

impl SaleConfig {
    pub fn deployer(&self) -> Result<Address, ConfigError> {
        resolve_account("sale.deployer", &self.deployer)
    }

    pub fn token_owner(&self) -> Result<Address, ConfigError> {
        match &self.token_owner {
            Some(owner) => resolve_account("sale.token_owner", owner),
            None => self.deployer(),
        }
    }

    pub fn offer(&self) -> Result<Amount, ConfigError> {
        amount("sale.offer", &self.offer)
    }
}

impl AccountConfig {
    pub fn address(&self) -> Result<Address, ConfigError> {
        resolve_account("accounts.label", &self.label)
    }

    pub fn native(&self) -> Result<Amount, ConfigError> {
        amount("accounts.native", &self.native)
    }

    pub fn tokens(&self) -> Result<Amount, ConfigError> {
        amount("accounts.tokens", &self.tokens)
    }
}

/// Resolve a configured account: `0x…` parses as an address, anything else is a label.
pub fn resolve_account(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    let value = value.trim();
    if value.starts_with("0x") || value.starts_with("0X") {
        value
            .parse()
            .map_err(|source| ConfigError::InvalidAddress { field, source })
    } else if value.is_empty() {
        Err(ConfigError::InvalidValue(format!("{} must not be empty", field)))
    } else {
        Ok(Address::from_label(value))
    }
}

fn amount(field: &'static str, value: &str) -> Result<Amount, ConfigError> {
    parse_ether(value).map_err(|source| ConfigError::InvalidAmount { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ether;
    use std::io::Write;

    const FULL: &str = r#"
[token]
name = "Dev"
symbol = "DEV"
holder = "owner"
initial_supply = "100"

[calculator]
beneficiary = "calculator-owner"

[sale]
deployer = "owner"
offer = "20"
price = 100
duration_secs = 3600
locked = true

[[accounts]]
label = "alice"
native = "10"
tokens = "1"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = DeploymentConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.token.initial_supply().unwrap(), ether(100));
        assert_eq!(config.token.holder().unwrap(), Address::from_label("owner"));
        assert_eq!(config.token.deployer().unwrap(), Address::from_label("owner"));

        let calculator = config.calculator.as_ref().unwrap();
        assert_eq!(calculator.fee().unwrap(), ether(1));
        assert_eq!(
            calculator.deployer().unwrap(),
            Address::from_label("calculator-owner")
        );

        let sale = config.sale.as_ref().unwrap();
        assert_eq!(sale.offer().unwrap(), ether(20));
        assert_eq!(sale.price, 100);
        assert!(sale.locked);
        assert_eq!(sale.token_owner().unwrap(), Address::from_label("owner"));

        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].native().unwrap(), ether(10));
        assert_eq!(config.accounts[0].tokens().unwrap(), ether(1));
    }

    #[test]
    fn test_optional_sections() {
        let config = DeploymentConfig::from_toml_str(
            r#"
[token]
name = "Token"
symbol = "TKN"
holder = "0x00000000000000000000000000000000000000aa"
initial_supply = "1000"
"#,
        )
        .unwrap();

        assert!(config.calculator.is_none());
        assert!(config.sale.is_none());
        assert!(config.accounts.is_empty());
        assert_eq!(
            config.token.holder().unwrap().to_string(),
            "0x00000000000000000000000000000000000000aa"
        );
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let content = FULL.replace("price = 100", "price = 0");
        let err = DeploymentConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_zero_fee_is_rejected() {
        let content = FULL.replace(
            "beneficiary = \"calculator-owner\"",
            "beneficiary = \"calculator-owner\"\nfee = \"0\"",
        );
        let err = DeploymentConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_bad_amount_is_rejected() {
        let content = FULL.replace("offer = \"20\"", "offer = \"twenty\"");
        let err = DeploymentConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAmount {
                field: "sale.offer",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_address_is_rejected() {
        let content = FULL.replace("holder = \"owner\"", "holder = \"0x12\"");
        let err = DeploymentConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = DeploymentConfig::from_toml_str("[token\nname = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = DeploymentConfig::load(file.path()).unwrap();
        assert_eq!(config.token.symbol, "DEV");
    }

    #[test]
    fn test_load_missing_file() {
        let err = DeploymentConfig::load("/nonexistent/coinlab/deployment.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

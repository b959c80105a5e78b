//! Deployment configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use verity_bounty::DEFAULT_BOUNTY_FRACTION;
use verity_criteria::Criterion;
use verity_engine::BountyAwardPolicy;
use verity_operator::DEFAULT_MINIMUM_TIMEOUT_SECS;
use verity_types::{Address, Amount};
use verity_utils::LogFormat;

use crate::NodeError;

/// Configuration for a verity node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. `"info"` or `"debug,verity_engine=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Owner of every deployed component.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// Address of the oracle dispatcher.
    #[serde(default = "default_oracle")]
    pub oracle: Address,

    #[serde(default)]
    pub operator: OperatorConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub engines: Vec<EngineConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperatorConfig {
    #[serde(default = "default_operator")]
    pub address: Address,

    /// Shortest disablement timer the operator accepts.
    #[serde(default = "default_minimum_timeout")]
    pub minimum_timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token")]
    pub address: Address,

    /// Balances minted at startup.
    #[serde(default)]
    pub mints: Vec<MintConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintConfig {
    pub wallet: Address,
    pub amount: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Unique name; also the engine's address.
    pub name: String,

    #[serde(default)]
    pub criterion: Criterion,

    #[serde(default)]
    pub award_policy: BountyAwardPolicy,

    #[serde(default)]
    pub bounty: BountyConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BountyConfig {
    /// Tokens minted into the engine's fund at deployment.
    #[serde(default)]
    pub deposit: Amount,

    #[serde(default)]
    pub allocator: AllocatorConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocatorConfig {
    /// `fraction` is in parts per 10^18 of the fund balance.
    Fractional {
        #[serde(default = "default_fraction")]
        fraction: u64,
    },
    Fixed {
        amount: Amount,
    },
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_owner() -> Address {
    Address::new("owner")
}

fn default_oracle() -> Address {
    Address::new("oracle")
}

fn default_operator() -> Address {
    Address::new("operator")
}

fn default_token() -> Address {
    Address::new("token")
}

fn default_minimum_timeout() -> u64 {
    DEFAULT_MINIMUM_TIMEOUT_SECS
}

fn default_fraction() -> u64 {
    DEFAULT_BOUNTY_FRACTION
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject configurations that cannot be deployed.
    ///
    /// Every component (oracle, operator, token, and each engine with its fund
    /// and allocator) needs an address of its own, distinct from the owner and
    /// from every minted wallet.
    pub fn validate(&self) -> Result<(), NodeError> {
        let fixed = [&self.owner, &self.oracle, &self.operator.address, &self.token.address];
        if fixed.iter().any(|a| a.is_null()) {
            return Err(NodeError::Config("component addresses must not be null".into()));
        }
        let mut components = BTreeMap::new();
        let mut claim = |address: Address, what: String| match components.insert(address.clone(), what.clone()) {
            Some(previous) => Err(NodeError::Config(format!(
                "address {address} is used by both {previous} and {what}"
            ))),
            None => Ok(()),
        };
        claim(self.oracle.clone(), "the oracle".into())?;
        claim(self.operator.address.clone(), "the operator".into())?;
        claim(self.token.address.clone(), "the token".into())?;
        for engine in &self.engines {
            if engine.name.trim().is_empty() {
                return Err(NodeError::Config("engine name must not be empty".into()));
            }
            for (address, what) in engine.component_addresses() {
                claim(address, what)?;
            }
        }
        let wallets = std::iter::once(&self.owner).chain(self.token.mints.iter().map(|m| &m.wallet));
        for wallet in wallets {
            if let Some(component) = components.get(wallet) {
                return Err(NodeError::Config(format!(
                    "wallet {wallet} shares its address with {component}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            owner: default_owner(),
            oracle: default_oracle(),
            operator: OperatorConfig::default(),
            token: TokenConfig::default(),
            engines: Vec::new(),
        }
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            address: default_operator(),
            minimum_timeout_secs: default_minimum_timeout(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            address: default_token(),
            mints: Vec::new(),
        }
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::Fractional {
            fraction: default_fraction(),
        }
    }
}

impl EngineConfig {
    pub fn new(name: impl Into<String>, criterion: Criterion) -> Self {
        Self {
            name: name.into(),
            criterion,
            award_policy: BountyAwardPolicy::default(),
            bounty: BountyConfig::default(),
        }
    }

    pub fn fund_address(&self) -> Address {
        Address::new(format!("{}.fund", self.name))
    }

    pub fn allocator_address(&self) -> Address {
        Address::new(format!("{}.allocator", self.name))
    }

    /// The engine, fund and allocator addresses, each with a label for errors.
    pub fn component_addresses(&self) -> [(Address, String); 3] {
        [
            (Address::new(self.name.clone()), format!("engine {:?}", self.name)),
            (self.fund_address(), format!("the fund of engine {:?}", self.name)),
            (self.allocator_address(), format!("the allocator of engine {:?}", self.name)),
        ]
    }
}

use crate::enums::{Network, PositionSide};
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// One set of API credentials plus the name the report shows for it.
///
/// Immutable once built. The secret never leaves this struct except through
/// `api_secret()`, and `Debug` redacts both key and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    name: String,
    api_key: String,
    api_secret: String,
    network: Network,
}

impl Credential {
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        network: Network,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "name".to_string(),
                "account name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            network,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("network", &self.network)
            .finish()
    }
}

/// The pair of REST base URLs a session talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub spot_url: String,
    pub futures_url: String,
}

impl Endpoints {
    pub fn for_network(network: Network) -> Self {
        Self {
            spot_url: network.spot_url().to_string(),
            futures_url: network.futures_url().to_string(),
        }
    }
}

/// A spot asset with a non-zero holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
    pub total: Decimal,
}

impl SpotBalance {
    pub fn new(asset: impl Into<String>, free: Decimal, locked: Decimal) -> Self {
        Self {
            asset: asset.into(),
            free,
            locked,
            total: free + locked,
        }
    }
}

/// A futures margin asset with a positive wallet balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuturesBalance {
    pub asset: String,
    pub wallet_balance: Decimal,
    pub unrealized_profit: Decimal,
    pub available_balance: Decimal,
}

/// An open futures position. `position_amt` is signed: positive is long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub unrealized_profit: Decimal,
    pub leverage: u32,
}

impl Position {
    pub fn side(&self) -> PositionSide {
        PositionSide::from_amount(self.position_amt)
    }
}

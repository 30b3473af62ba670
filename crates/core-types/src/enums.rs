use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which Binance deployment an account lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Production,
    Testnet,
}

impl Network {
    pub fn from_testnet_flag(testnet: bool) -> Self {
        if testnet {
            Network::Testnet
        } else {
            Network::Production
        }
    }

    /// Base URL of the spot REST API.
    pub fn spot_url(&self) -> &'static str {
        match self {
            Network::Production => "https://api.binance.com",
            Network::Testnet => "https://testnet.binance.vision",
        }
    }

    /// Base URL of the USD-M futures REST API.
    pub fn futures_url(&self) -> &'static str {
        match self {
            Network::Production => "https://fapi.binance.com",
            Network::Testnet => "https://testnet.binancefuture.com",
        }
    }
}

/// Directional exposure of a derivatives position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Positive amounts are long, everything else is short.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            PositionSide::Long
        } else {
            PositionSide::Short
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

use core_types::{FuturesBalance, Position, SpotBalance};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.
// Numeric fields arrive as decimal strings; `Decimal` accepts both strings and numbers.

/// The response from `GET /api/v3/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotAccountResponse {
    pub balances: Vec<SpotBalanceResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotBalanceResponse {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl SpotAccountResponse {
    /// Keeps only assets with a positive total.
    pub fn into_balances(self) -> Vec<SpotBalance> {
        self.balances
            .into_iter()
            .map(|b| SpotBalance::new(b.asset, b.free, b.locked))
            .filter(|b| b.total > Decimal::ZERO)
            .collect()
    }
}

/// The response from `GET /fapi/v2/account`. There are more fields, only the assets matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct FuturesAccountResponse {
    pub assets: Vec<FuturesAssetResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAssetResponse {
    pub asset: String,
    pub wallet_balance: Decimal,
    pub unrealized_profit: Decimal,
    pub available_balance: Decimal,
}

impl FuturesAccountResponse {
    /// Keeps only assets with a positive wallet balance.
    pub fn into_balances(self) -> Vec<FuturesBalance> {
        self.assets
            .into_iter()
            .filter(|a| a.wallet_balance > Decimal::ZERO)
            .map(|a| FuturesBalance {
                asset: a.asset,
                wallet_balance: a.wallet_balance,
                unrealized_profit: a.unrealized_profit,
                available_balance: a.available_balance,
            })
            .collect()
    }
}

/// A single entry from `GET /fapi/v2/positionRisk`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRiskResponse {
    pub symbol: String,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub un_realized_profit: Decimal,
    #[serde(deserialize_with = "leverage_from_str_or_int")]
    pub leverage: u32, // Comes as a string, e.g., "10"
}

/// Drops the flat entries the exchange reports for every tradable symbol.
pub fn open_positions(entries: Vec<PositionRiskResponse>) -> Vec<Position> {
    entries
        .into_iter()
        .filter(|p| !p.position_amt.is_zero())
        .map(|p| Position {
            symbol: p.symbol,
            position_amt: p.position_amt,
            entry_price: p.entry_price,
            mark_price: p.mark_price,
            unrealized_profit: p.un_realized_profit,
            leverage: p.leverage,
        })
        .collect()
}

fn leverage_from_str_or_int<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Represents an error response from the Binance API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

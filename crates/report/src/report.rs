use crate::format::{format_leverage, format_number, format_pnl, AMOUNT_DP, PRICE_DP};
use chrono::{DateTime, Local};
use comfy_table::{presets, CellAlignment, Table};
use core_types::{FuturesBalance, Position, PositionSide, SpotBalance};
use serde::Serialize;

const RULE_WIDTH: usize = 80;

pub const TITLE: &str = "Binance multi-account portfolio viewer";
pub const NO_DATA: &str = "  No data (empty account or request failed)";
pub const COMPLETION_MARKER: &str = "Query complete";

/// Everything fetched for one account, already filtered.
///
/// `spot_balances` is `None` when the spot table was not requested, which
/// is different from an empty (or failed) spot read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_balances: Option<Vec<SpotBalance>>,
    pub futures_balances: Vec<FuturesBalance>,
    pub positions: Vec<Position>,
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn render_header(queried_at: DateTime<Local>) -> String {
    format!(
        "{}\nQuery time: {}\n",
        TITLE,
        queried_at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn render_footer() -> String {
    format!("\n{}\n{}\n", rule(), COMPLETION_MARKER)
}

/// Renders one account section: a banner followed by one block per table.
pub fn render_account(report: &AccountReport) -> String {
    let mut out = format!("\n{}\nAccount: {}\n{}\n", rule(), report.account, rule());

    if let Some(spot) = &report.spot_balances {
        push_section(&mut out, "Spot balances:", spot_table(spot));
    }
    push_section(
        &mut out,
        "Futures balances:",
        futures_balance_table(&report.futures_balances),
    );
    push_section(&mut out, "Futures positions:", position_table(&report.positions));
    out
}

fn push_section(out: &mut String, title: &str, table: Option<Table>) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    match table {
        Some(table) => out.push_str(&table.to_string()),
        None => out.push_str(NO_DATA),
    }
    out.push('\n');
}

fn new_table(header: &[&str], right_aligned: &[usize]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::ASCII_FULL_CONDENSED)
        .set_header(header.to_vec());
    for idx in right_aligned {
        if let Some(column) = table.column_mut(*idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn spot_table(balances: &[SpotBalance]) -> Option<Table> {
    if balances.is_empty() {
        return None;
    }
    let mut table = new_table(&["Asset", "Free", "Locked", "Total"], &[1, 2, 3]);
    for b in balances {
        table.add_row(vec![
            b.asset.clone(),
            format_number(b.free, AMOUNT_DP),
            format_number(b.locked, AMOUNT_DP),
            format_number(b.total, AMOUNT_DP),
        ]);
    }
    Some(table)
}

fn futures_balance_table(balances: &[FuturesBalance]) -> Option<Table> {
    if balances.is_empty() {
        return None;
    }
    let mut table = new_table(
        &["Asset", "Wallet Balance", "Unrealized PnL", "Available"],
        &[1, 2, 3],
    );
    for b in balances {
        table.add_row(vec![
            b.asset.clone(),
            format_number(b.wallet_balance, AMOUNT_DP),
            format_pnl(b.unrealized_profit),
            format_number(b.available_balance, AMOUNT_DP),
        ]);
    }
    Some(table)
}

fn position_table(positions: &[Position]) -> Option<Table> {
    if positions.is_empty() {
        return None;
    }
    let mut table = new_table(
        &[
            "Symbol",
            "Size",
            "Side",
            "Entry Price",
            "Mark Price",
            "Unrealized PnL",
            "Leverage",
        ],
        &[1, 3, 4, 5, 6],
    );
    for p in positions {
        table.add_row(vec![
            p.symbol.clone(),
            format_number(p.position_amt.abs(), PRICE_DP),
            p.side().as_str().to_string(),
            format_number(p.entry_price, PRICE_DP),
            format_number(p.mark_price, PRICE_DP),
            format_pnl(p.unrealized_profit),
            format_leverage(p.leverage),
        ]);
    }
    Some(table)
}

// --- JSON output ---

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: DateTime<Local>,
    accounts: Vec<JsonAccount<'a>>,
}

#[derive(Serialize)]
struct JsonAccount<'a> {
    account: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    spot_balances: Option<&'a [SpotBalance]>,
    futures_balances: &'a [FuturesBalance],
    positions: Vec<JsonPosition<'a>>,
}

#[derive(Serialize)]
struct JsonPosition<'a> {
    #[serde(flatten)]
    position: &'a Position,
    side: PositionSide,
}

/// Renders all reports as a single pretty-printed JSON document.
pub fn render_json(
    generated_at: DateTime<Local>,
    reports: &[AccountReport],
) -> serde_json::Result<String> {
    let document = JsonDocument {
        generated_at,
        accounts: reports
            .iter()
            .map(|r| JsonAccount {
                account: &r.account,
                spot_balances: r.spot_balances.as_deref(),
                futures_balances: &r.futures_balances,
                positions: r
                    .positions
                    .iter()
                    .map(|p| JsonPosition {
                        position: p,
                        side: p.side(),
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn funded_report() -> AccountReport {
        AccountReport {
            account: "main".to_string(),
            spot_balances: None,
            futures_balances: vec![FuturesBalance {
                asset: "USDT".to_string(),
                wallet_balance: dec!(1000.00),
                unrealized_profit: dec!(50.25),
                available_balance: dec!(950.00),
            }],
            positions: vec![Position {
                symbol: "BTCUSDT".to_string(),
                position_amt: dec!(0.5),
                entry_price: dec!(60000),
                mark_price: dec!(61000),
                unrealized_profit: dec!(500),
                leverage: 10,
            }],
        }
    }

    fn empty_report() -> AccountReport {
        AccountReport {
            account: "backup".to_string(),
            spot_balances: Some(vec![]),
            futures_balances: vec![],
            positions: vec![],
        }
    }

    #[test]
    fn renders_balance_and_position_rows() {
        let text = render_account(&funded_report());

        assert!(text.contains("Account: main"));
        assert!(!text.contains("Spot balances:"));
        assert!(text.contains("1,000.00"));
        assert!(text.contains("+50.25"));
        assert!(text.contains("950.00"));

        let row = text
            .lines()
            .find(|l| l.contains("BTCUSDT"))
            .expect("position row");
        assert!(row.contains("0.5000"));
        assert!(row.contains("long"));
        assert!(row.contains("60,000.0000"));
        assert!(row.contains("61,000.0000"));
        assert!(row.contains("+500.00"));
        assert!(row.contains("10x"));
        assert!(!text.contains(NO_DATA));
    }

    #[test]
    fn short_position_shows_absolute_size() {
        let mut report = funded_report();
        report.positions[0].position_amt = dec!(-2.25);
        report.positions[0].unrealized_profit = dec!(-3.2);

        let text = render_account(&report);
        let row = text.lines().find(|l| l.contains("BTCUSDT")).unwrap();
        assert!(row.contains("2.2500"));
        assert!(!row.contains("-2.2500"));
        assert!(row.contains("short"));
        assert!(row.contains("-3.20"));
        assert!(!row.contains("+-"));
    }

    #[test]
    fn empty_sections_print_placeholder() {
        let text = render_account(&empty_report());
        assert!(text.contains("Spot balances:"));
        assert_eq!(text.matches(NO_DATA).count(), 3);
    }

    #[test]
    fn footer_carries_completion_marker() {
        assert!(render_footer().trim_end().ends_with(COMPLETION_MARKER));
    }

    #[test]
    fn json_includes_derived_side() {
        let json = render_json(Local::now(), &[funded_report(), empty_report()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let accounts = value["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["account"], "main");
        assert!(accounts[0].get("spot_balances").is_none());
        assert_eq!(accounts[0]["positions"][0]["side"], "long");
        assert_eq!(accounts[0]["positions"][0]["leverage"], 10);
        assert_eq!(accounts[1]["spot_balances"].as_array().unwrap().len(), 0);
    }
}

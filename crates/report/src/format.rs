use rust_decimal::{Decimal, RoundingStrategy};
use thousands::Separable;

/// Display precision for currency amounts.
pub const AMOUNT_DP: u32 = 2;
/// Display precision for prices and position sizes.
pub const PRICE_DP: u32 = 4;

/// Rounds half away from zero and groups the integer part with commas.
///
/// A value that rounds to zero is printed without a sign. Values too wide to
/// carry `dp` decimals keep the widest scale that fits.
pub fn format_number(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    // Padding through the scale, not `{:.N}`, which overflows rust_decimal's buffer on huge values.
    rounded.rescale(dp);
    rounded.to_string().separate_with_commas()
}

/// A profit or loss with an explicit `+` when it is not negative.
pub fn format_pnl(value: Decimal) -> String {
    let text = format_number(value, AMOUNT_DP);
    if text.starts_with('-') {
        text
    } else {
        format!("+{}", text)
    }
}

pub fn format_leverage(leverage: u32) -> String {
    format!("{}x", leverage)
}

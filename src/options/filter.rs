//! Forecast-driven option chain screening
//!
//! Keeps contracts expiring within the forecast window whose
//! breakeven-plus-margin price sits inside the predicted range. The
//! margin is two ask-widths on the strike. Contracts already expired
//! pass the expiry gate (negative days are <= any horizon) and are
//! screened like any other contract; deliberate, do not "fix".

use super::contract::{OptionContract, OptionType, SelectedOption};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Margin applied to the strike, in ask-widths.
const ASK_MARGIN: f64 = 2.0;

/// Screen a chain against a range forecast. Returns every qualifying
/// CALL (in input order), then every qualifying PUT (in input order),
/// each annotated with the forecast context. Empty input or no
/// qualifying contract yields an empty vec.
pub fn select(
    contracts: &[OptionContract],
    current_price: f64,
    predicted_high: f64,
    predicted_low: f64,
    horizon_days: usize,
    as_of: DateTime<Utc>,
) -> Vec<SelectedOption> {
    let in_window: Vec<&OptionContract> = contracts
        .iter()
        .filter(|c| c.days_to_expiry(as_of) <= horizon_days as i64)
        .collect();

    let mut selected = Vec::new();
    for contract in &in_window {
        if contract.option_type == OptionType::Call
            && contract.strike + ASK_MARGIN * contract.ask < predicted_high
        {
            selected.push(annotate(
                contract,
                predicted_high,
                predicted_low,
                current_price,
                horizon_days,
            ));
        }
    }
    for contract in &in_window {
        if contract.option_type == OptionType::Put
            && contract.strike - ASK_MARGIN * contract.ask > predicted_low
        {
            selected.push(annotate(
                contract,
                predicted_high,
                predicted_low,
                current_price,
                horizon_days,
            ));
        }
    }

    debug!(
        total = contracts.len(),
        in_window = in_window.len(),
        selected = selected.len(),
        "screened option chain"
    );
    selected
}

fn annotate(
    contract: &OptionContract,
    predicted_high: f64,
    predicted_low: f64,
    current_price: f64,
    horizon_days: usize,
) -> SelectedOption {
    SelectedOption {
        contract: contract.clone(),
        predicted_high,
        predicted_low,
        current_price,
        horizon_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
    }

    fn contract(option_type: OptionType, strike: f64, ask: f64, days_out: i64) -> OptionContract {
        OptionContract::new(
            "TEST",
            option_type,
            strike,
            ask,
            as_of() + Duration::days(days_out),
        )
    }

    #[test]
    fn test_call_inside_predicted_ceiling_selected() {
        let chain = vec![contract(OptionType::Call, 100.0, 5.0, 10)];
        let selected = select(&chain, 100.0, 120.0, 80.0, 30, as_of());

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].predicted_high, 120.0);
        assert_eq!(selected[0].horizon_days, 30);
    }

    #[test]
    fn test_call_breakeven_at_or_above_ceiling_rejected() {
        // 110 + 2*6 = 122 >= 120
        let chain = vec![contract(OptionType::Call, 110.0, 6.0, 10)];
        assert!(select(&chain, 100.0, 120.0, 80.0, 30, as_of()).is_empty());
    }

    #[test]
    fn test_put_above_predicted_floor_selected() {
        // 90 - 2*3 = 84 > 80
        let chain = vec![contract(OptionType::Put, 90.0, 3.0, 10)];
        let selected = select(&chain, 100.0, 120.0, 80.0, 30, as_of());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_expiry_beyond_horizon_rejected() {
        // would qualify on price, but expires past the forecast window
        let chain = vec![contract(OptionType::Call, 100.0, 5.0, 40)];
        assert!(select(&chain, 100.0, 120.0, 80.0, 30, as_of()).is_empty());
    }

    #[test]
    fn test_expired_contract_passes_expiry_gate() {
        let chain = vec![contract(OptionType::Call, 100.0, 5.0, -5)];
        let selected = select(&chain, 100.0, 120.0, 80.0, 30, as_of());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_empty_chain_is_not_an_error() {
        assert!(select(&[], 100.0, 120.0, 80.0, 30, as_of()).is_empty());
    }

    #[test]
    fn test_calls_precede_puts_in_input_order() {
        let chain = vec![
            contract(OptionType::Put, 90.0, 3.0, 10),
            contract(OptionType::Call, 100.0, 5.0, 10),
            contract(OptionType::Call, 95.0, 4.0, 10),
        ];
        let selected = select(&chain, 100.0, 120.0, 80.0, 30, as_of());

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].contract.strike, 100.0);
        assert_eq!(selected[1].contract.strike, 95.0);
        assert_eq!(selected[2].contract.option_type, OptionType::Put);
    }
}

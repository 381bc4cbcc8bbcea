//! P&L accounting properties.

use proptest::prelude::*;
use rust_decimal::Decimal;

use risk_engine::{RiskLimits, RiskManager};
use types::{OrderId, Price, Quantity, Side, Symbol, Trade};

fn symbol() -> Symbol {
    Symbol::new("AAPL")
}

fn trade(ticks: i64, qty: u64) -> Trade {
    Trade::new(
        OrderId::new(1),
        OrderId::new(2),
        symbol(),
        Price::from_ticks(ticks),
        Quantity::new(qty),
        1,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Average-cost accounting only splits P&L between realized and
    /// unrealized; the total must equal the mark-to-market value of all
    /// cash flows, regardless of ordering, partial closes, or flips.
    #[test]
    fn total_pnl_equals_mark_to_market(
        fills in prop::collection::vec(
            (any::<bool>(), 5_000..20_000i64, 1..500u64), 1..40,
        ),
        mark in 5_000..20_000i64,
    ) {
        let mut risk = RiskManager::new(RiskLimits::default());
        let mark_price = Price::from_ticks(mark);

        let mut expected = Decimal::ZERO;
        for &(buy, ticks, qty) in &fills {
            let side = if buy { Side::Buy } else { Side::Sell };
            risk.update_position(&trade(ticks, qty), side);

            let qty = Decimal::from(qty);
            let price = Price::from_ticks(ticks).as_decimal();
            expected += match side {
                Side::Buy => qty * (mark_price.as_decimal() - price),
                Side::Sell => qty * (price - mark_price.as_decimal()),
            };
        }

        risk.update_unrealized(&symbol(), mark_price);

        // Decimal division in the average-price update can shave the
        // last of 28 significant digits; allow for that.
        let delta = (risk.total_pnl() - expected).abs();
        prop_assert!(
            delta < Decimal::new(1, 12),
            "total {} vs mark-to-market {}", risk.total_pnl(), expected,
        );
    }

    /// Realized P&L is exactly the sum of close × (exit − entry) over
    /// closing slices when entries share one price.
    #[test]
    fn realized_pnl_additivity_single_entry_price(
        entry in 10_000..15_000i64,
        opened in 100..1_000u64,
        closes in prop::collection::vec((5_000..20_000i64, 1..100u64), 1..10),
    ) {
        let total_close: u64 = closes.iter().map(|&(_, q)| q).sum();
        prop_assume!(total_close <= opened);

        let mut risk = RiskManager::new(RiskLimits::default());
        risk.update_position(&trade(entry, opened), Side::Buy);

        let mut expected = Decimal::ZERO;
        for &(exit, qty) in &closes {
            risk.update_position(&trade(exit, qty), Side::Sell);
            expected += Decimal::from(qty)
                * (Price::from_ticks(exit).as_decimal() - Price::from_ticks(entry).as_decimal());
        }

        let position = risk.position(&symbol()).unwrap();
        prop_assert_eq!(position.realized_pnl, expected);
        prop_assert_eq!(position.quantity, (opened - total_close) as i64);
    }
}

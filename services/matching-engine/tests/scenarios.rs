//! End-to-end matching scenarios against the public engine API.

use matching_engine::MatchingEngine;
use types::{Order, OrderId, OrderStatus, Price, Quantity, Side, Symbol};

fn engine() -> MatchingEngine {
    MatchingEngine::new(Symbol::new("AAPL"))
}

fn limit(id: u64, side: Side, price: f64, qty: u64) -> Order {
    Order::limit(
        OrderId::new(id),
        Symbol::new("AAPL"),
        side,
        Price::from_f64(price),
        Quantity::new(qty),
        id,
    )
}

fn market(id: u64, side: Side, qty: u64) -> Order {
    Order::market(
        OrderId::new(id),
        Symbol::new("AAPL"),
        side,
        Quantity::new(qty),
        id,
    )
}

#[test]
fn simple_limit_match() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.00, 100));
    let trades = engine.submit(limit(2, Side::Buy, 150.00, 100));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity(), Quantity::new(100));
    assert_eq!(trades[0].price(), Price::from_f64(150.00));
    assert_eq!(trades[0].buy_order_id(), OrderId::new(2));
    assert_eq!(trades[0].sell_order_id(), OrderId::new(1));

    // Both filled, book empty.
    assert_eq!(engine.book().order_count(), 0);
    assert_eq!(engine.book().best_bid(), None);
    assert_eq!(engine.book().best_ask(), None);
}

#[test]
fn partial_fill_leaves_resting_remainder() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.00, 500));
    let trades = engine.submit(limit(2, Side::Buy, 150.00, 200));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity(), Quantity::new(200));
    assert_eq!(trades[0].price(), Price::from_f64(150.00));

    // The sell keeps 300 at 150.00; the buy is gone.
    let resting = engine.book().order(OrderId::new(1)).unwrap();
    assert_eq!(resting.remaining(), Quantity::new(300));
    assert_eq!(resting.status(), OrderStatus::PartiallyFilled);
    assert!(!engine.book().contains(OrderId::new(2)));

    let level = engine
        .book()
        .level(Side::Sell, Price::from_f64(150.00))
        .unwrap();
    assert_eq!(level.total_quantity(), Quantity::new(300));
}

#[test]
fn market_order_sweeps_levels_in_price_order() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.00, 100));
    engine.submit(limit(2, Side::Sell, 150.50, 100));
    engine.submit(limit(3, Side::Sell, 151.00, 100));

    let trades = engine.submit(market(4, Side::Buy, 250));

    assert_eq!(trades.len(), 3);
    assert_eq!(trades[0].quantity(), Quantity::new(100));
    assert_eq!(trades[0].price(), Price::from_f64(150.00));
    assert_eq!(trades[1].quantity(), Quantity::new(100));
    assert_eq!(trades[1].price(), Price::from_f64(150.50));
    assert_eq!(trades[2].quantity(), Quantity::new(50));
    assert_eq!(trades[2].price(), Price::from_f64(151.00));

    // 50 remains on the last ask level; no residual buy rests.
    let level = engine
        .book()
        .level(Side::Sell, Price::from_f64(151.00))
        .unwrap();
    assert_eq!(level.total_quantity(), Quantity::new(50));
    assert_eq!(engine.book().best_ask(), Some(Price::from_f64(151.00)));
    assert_eq!(engine.book().best_bid(), None);
    assert!(!engine.book().contains(OrderId::new(4)));
}

#[test]
fn time_priority_fills_earliest_arrival() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.00, 100));
    engine.submit(limit(2, Side::Sell, 150.00, 100));
    engine.submit(limit(3, Side::Sell, 150.00, 100));

    let trades = engine.submit(limit(4, Side::Buy, 150.00, 100));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].sell_order_id(), OrderId::new(1));

    // Orders 2 and 3 remain, still in arrival order.
    assert!(engine.book().contains(OrderId::new(2)));
    assert!(engine.book().contains(OrderId::new(3)));
    let front = engine
        .book()
        .front_order(Side::Sell, Price::from_f64(150.00))
        .unwrap();
    assert_eq!(front.id(), OrderId::new(2));
}

#[test]
fn cancel_removes_level_and_is_not_repeatable() {
    let mut engine = engine();

    engine.submit(limit(7, Side::Buy, 150.00, 100));

    assert!(engine.cancel(OrderId::new(7)));
    assert_eq!(engine.book().best_bid(), None);
    assert!(!engine.cancel(OrderId::new(7)));
}

#[test]
fn trades_within_one_submit_are_price_then_time_ordered() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.50, 60));
    engine.submit(limit(2, Side::Sell, 150.00, 40));
    engine.submit(limit(3, Side::Sell, 150.00, 40));

    let trades = engine.submit(limit(4, Side::Buy, 151.00, 120));

    // Best price first, FIFO within the level.
    assert_eq!(trades.len(), 3);
    assert_eq!(trades[0].sell_order_id(), OrderId::new(2));
    assert_eq!(trades[1].sell_order_id(), OrderId::new(3));
    assert_eq!(trades[2].sell_order_id(), OrderId::new(1));
    assert_eq!(trades[2].quantity(), Quantity::new(40));

    // 20 of the sell at 150.50 remain.
    let resting = engine.book().order(OrderId::new(1)).unwrap();
    assert_eq!(resting.remaining(), Quantity::new(20));
}

#[test]
fn book_never_rests_crossed() {
    let mut engine = engine();

    engine.submit(limit(1, Side::Sell, 150.00, 50));
    engine.submit(limit(2, Side::Buy, 152.00, 200));
    engine.submit(limit(3, Side::Sell, 151.00, 50));

    if let (Some(bid), Some(ask)) = (engine.book().best_bid(), engine.book().best_ask()) {
        assert!(bid < ask, "book left crossed: bid {bid} >= ask {ask}");
    }
}

//! Tests for the price-time matcher and fill bookkeeping.

#[cfg(test)]
mod tests {
    use crate::engine::tests::test_helpers::*;
    use crate::engine::{Engine, Side};

    #[test]
    fn equal_quantities_complete_both_orders() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let standing = place(&mut engine, "A", 0, 100, 5000, 1, 1);
        let incoming = place(&mut engine, "B", 1, 100, 5000, 2, 1);

        for id in [standing, incoming] {
            let order = engine.order(id).unwrap();
            assert!(!order.open);
            assert_eq!(order.qty, 0);
            assert_eq!(order.total_filled, 100);
            assert_eq!(order.fills.len(), 1);
        }
        assert_eq!(engine.book().level_count(Side::Buy), 0);
        assert_eq!(engine.book().level_count(Side::Sell), 0);
    }

    #[test]
    fn both_fill_records_are_the_same_event() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let standing = place(&mut engine, "A", 0, 60, 5000, 1, 1);
        let incoming = place(&mut engine, "B", 1, 60, 5000, 2, 1);

        let standing_fill = &engine.order(standing).unwrap().fills[0];
        let incoming_fill = &engine.order(incoming).unwrap().fills[0];
        assert_eq!(standing_fill, incoming_fill);
        assert_eq!(standing_fill.price, 5000);
        assert_eq!(standing_fill.qty, 60);
    }

    #[test]
    fn fills_execute_at_the_standing_price() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 0, 10, 5100, 2, 1);
        // Buyer is willing to pay 5300 but the book is better.
        let incoming = place(&mut engine, "B", 1, 10, 5300, 1, 1);

        let order = engine.order(incoming).unwrap();
        assert_eq!(order.fills[0].price, 5100);
        assert_eq!(engine.quote().last, 5100);
    }

    #[test]
    fn partial_fill_leaves_the_standing_remainder_open() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let standing = place(&mut engine, "A", 0, 100, 5000, 1, 1);
        let incoming = place(&mut engine, "B", 1, 60, 5000, 2, 1);

        let standing_order = engine.order(standing).unwrap();
        assert!(standing_order.open);
        assert_eq!(standing_order.qty, 40);
        assert_eq!(standing_order.total_filled, 60);

        let incoming_order = engine.order(incoming).unwrap();
        assert!(!incoming_order.open);
        assert_eq!(incoming_order.total_filled, 60);
    }

    #[test]
    fn time_priority_within_a_level_is_strict_fifo() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let first = place(&mut engine, "A", 0, 50, 5000, 1, 1);
        let second = place(&mut engine, "B", 1, 50, 5000, 1, 1);
        place(&mut engine, "C", 2, 60, 5000, 2, 1);

        assert!(!engine.order(first).unwrap().open, "earlier order fills first");
        assert_eq!(engine.order(first).unwrap().total_filled, 50);

        let later = engine.order(second).unwrap();
        assert!(later.open);
        assert_eq!(later.qty, 40);
        assert_eq!(later.total_filled, 10);
    }

    #[test]
    fn price_priority_beats_time_priority() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let worse = place(&mut engine, "A", 0, 10, 4900, 1, 1);
        let better = place(&mut engine, "B", 1, 10, 5000, 1, 1);
        place(&mut engine, "C", 2, 10, 4900, 2, 1);

        assert!(!engine.order(better).unwrap().open, "best price fills first");
        assert!(engine.order(worse).unwrap().open);
    }

    #[test]
    fn market_orders_sweep_levels_best_first() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 0, 10, 4900, 1, 1);
        place(&mut engine, "A", 0, 10, 5000, 1, 1);
        let incoming = place(&mut engine, "B", 1, 25, 0, 2, 2);

        let order = engine.order(incoming).unwrap();
        assert_eq!(order.total_filled, 20);
        assert_eq!(order.fills[0].price, 5000, "best bid first");
        assert_eq!(order.fills[1].price, 4900);
        assert!(!order.open, "market remainder never rests");
        assert_eq!(engine.quote().bid, crate::engine::NO_PRICE);
    }

    #[test]
    fn a_limit_below_the_spread_rests_without_crossing() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 0, 10, 5100, 2, 1);
        let incoming = place(&mut engine, "B", 1, 10, 5000, 1, 1);

        let order = engine.order(incoming).unwrap();
        assert!(order.open);
        assert!(order.fills.is_empty());
        assert_eq!(engine.quote().bid, 5000);
        assert_eq!(engine.quote().ask, 5100);
    }

    #[test]
    fn two_execution_events_per_cross_standing_first() {
        let (mut engine, recorder) = recorded_engine();
        place(&mut engine, "ALICE", 0, 100, 5000, 1, 1);
        place(&mut engine, "BOB", 1, 60, 5000, 2, 1);

        let events = recorder.executions();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].account, "ALICE");
        assert_eq!(events[1].account, "BOB");
        for event in &events {
            assert_eq!(event.standing_id, 0);
            assert_eq!(event.incoming_id, 1);
            assert_eq!(event.price, 5000);
            assert_eq!(event.filled, 60);
            assert!(!event.standing_complete, "standing has 40 left");
            assert!(event.incoming_complete);
            assert_eq!(event.filled_at, events[0].filled_at);
        }
        // Each message carries the addressee's own order record.
        assert_eq!(events[0].order.id, 0);
        assert_eq!(events[1].order.id, 1);
    }

    #[test]
    fn execution_events_precede_the_ticker() {
        let (mut engine, recorder) = recorded_engine();
        place(&mut engine, "A", 0, 10, 5000, 1, 1);
        let tickers_before = recorder.ticker_count();
        let executions_before = recorder.execution_count();

        place(&mut engine, "B", 1, 10, 5000, 2, 1);
        assert_eq!(recorder.execution_count(), executions_before + 2);
        assert_eq!(recorder.ticker_count(), tickers_before + 1);
    }

    #[test]
    fn a_sweep_emits_events_in_cross_order() {
        let (mut engine, recorder) = recorded_engine();
        place(&mut engine, "A", 0, 10, 5000, 1, 1);
        place(&mut engine, "B", 1, 10, 4900, 1, 1);
        place(&mut engine, "C", 2, 20, 0, 2, 2);

        let events = recorder.executions();
        assert_eq!(events.len(), 4);
        // First cross at 5000, second at 4900; standing account first each time.
        assert_eq!(events[0].price, 5000);
        assert_eq!(events[0].account, "A");
        assert_eq!(events[1].account, "C");
        assert_eq!(events[2].price, 4900);
        assert_eq!(events[2].account, "B");
        assert_eq!(events[3].account, "C");
        assert!(events[0].filled_at < events[2].filled_at);
    }

    #[test]
    fn self_cross_fills_but_does_not_settle() {
        let (mut engine, recorder) = recorded_engine();
        place(&mut engine, "ALICE", 0, 10, 5000, 1, 1);
        place(&mut engine, "ALICE", 0, 10, 5000, 2, 1);

        let account = engine.accounts().resolve(0).unwrap();
        assert_eq!(account.shares, 0);
        assert_eq!(account.cents, 0);
        assert_eq!(account.posmin, 0);
        assert_eq!(account.posmax, 0);

        // The fill itself still happened and was published.
        assert_eq!(engine.order(0).unwrap().total_filled, 10);
        assert_eq!(engine.quote().last, 5000);
        assert_eq!(recorder.execution_count(), 2);
    }

    #[test]
    fn same_name_under_two_account_ids_still_skips_the_ledger() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "ALICE", 0, 10, 5000, 1, 1);
        place(&mut engine, "ALICE", 1, 10, 5000, 2, 1);

        // Ledger updates are skipped by name, not by account slot.
        assert_eq!(engine.accounts().resolve(0).unwrap().shares, 0);
        assert_eq!(engine.accounts().resolve(1).unwrap().shares, 0);
        assert_eq!(engine.order(0).unwrap().total_filled, 10);
    }
}

//! Tests for the account ledger as driven by the matcher.

#[cfg(test)]
mod tests {
    use crate::engine::tests::test_helpers::*;
    use crate::engine::{Engine, EngineError};

    #[test]
    fn a_cross_moves_shares_and_cash_in_opposite_directions() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "BUYER", 0, 10, 5000, 1, 1);
        place(&mut engine, "SELLER", 1, 10, 5000, 2, 1);

        let buyer = engine.accounts().resolve(0).unwrap();
        assert_eq!(buyer.shares, 10);
        assert_eq!(buyer.cents, -50_000);
        assert_eq!(buyer.posmax, 10);
        assert_eq!(buyer.posmin, 0);

        let seller = engine.accounts().resolve(1).unwrap();
        assert_eq!(seller.shares, -10);
        assert_eq!(seller.cents, 50_000);
        assert_eq!(seller.posmin, -10);
        assert_eq!(seller.posmax, 0);
    }

    #[test]
    fn the_ledger_balances_across_the_whole_market() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 0, 30, 5000, 1, 1);
        place(&mut engine, "B", 1, 20, 4950, 1, 1);
        place(&mut engine, "C", 2, 45, 4950, 2, 2);

        let mut shares = 0i64;
        let mut cents = 0i64;
        for id in 0..3 {
            let account = engine.accounts().resolve(id).unwrap();
            shares += i64::from(account.shares);
            cents += i64::from(account.cents);
        }
        assert_eq!(shares, 0, "every share bought was sold");
        assert_eq!(cents, 0, "every cent paid was received");
    }

    #[test]
    fn fills_settle_at_the_standing_price_for_both_parties() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "MAKER", 0, 10, 5100, 2, 1);
        place(&mut engine, "TAKER", 1, 10, 5300, 1, 1);

        let maker = engine.accounts().resolve(0).unwrap();
        let taker = engine.accounts().resolve(1).unwrap();
        assert_eq!(maker.cents, 51_000);
        assert_eq!(taker.cents, -51_000);
    }

    #[test]
    fn statusall_returns_every_order_in_submission_order() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 0, 10, 5000, 1, 1);
        place(&mut engine, "B", 1, 10, 5000, 2, 1);
        place(&mut engine, "A", 0, 5, 4800, 1, 1);
        place(&mut engine, "A", 0, 7, 0, 2, 2);

        let orders = engine.account_orders(0).unwrap();
        let ids: Vec<u32> = orders.iter().map(|view| view.id).collect();
        assert_eq!(ids, vec![0, 2, 3], "closed orders are reported too");
    }

    #[test]
    fn unknown_accounts_are_rejected_before_indexing() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "A", 2, 10, 5000, 1, 1);

        // Slot 1 exists in storage but has never been touched.
        assert_eq!(
            engine.account_orders(1).unwrap_err(),
            EngineError::AccountUnknown { account_id: 1 }
        );
        assert_eq!(
            engine.account_orders(-1).unwrap_err(),
            EngineError::AccountUnknown { account_id: -1 }
        );
        assert_eq!(
            engine.account_orders(4999).unwrap_err(),
            EngineError::AccountUnknown { account_id: 4999 }
        );
        assert!(engine.account_orders(2).is_ok());
    }

    #[test]
    fn order_views_carry_the_first_touch_name() {
        let mut engine = Engine::new("TESTEX", "FOO");
        place(&mut engine, "ALICE", 0, 10, 5000, 1, 1);
        // Same id, different name: the original name sticks.
        let id = place(&mut engine, "MALLORY", 0, 10, 4900, 1, 1);
        assert_eq!(engine.order_view(id).unwrap().account, "ALICE");
        assert_eq!(engine.account_name_for(i64::from(id)).unwrap(), "ALICE");
    }

    #[test]
    fn account_name_lookup_rejects_unknown_ids() {
        let engine = Engine::new("TESTEX", "FOO");
        assert!(matches!(
            engine.account_name_for(0),
            Err(EngineError::NoSuchId { id: 0 })
        ));
    }
}

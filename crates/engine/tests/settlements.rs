use engine::{Amount, EngineError, Expense, NewExpense, SettleScope, SplitShare, User};

mod common;

async fn dinner(engine: &engine::Engine, payer: &User, guest: &User, share: i64) -> Expense {
    engine
        .create_split_expense(
            NewExpense::new(payer.id, Amount::new(10_000), "dinner")
                .split(SplitShare::new(guest.id, Amount::new(share))),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn settle_all_clears_the_pair() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;

    let expense = dinner(&engine, &alice, &bob, 6_000).await;
    let balance = engine.friend_balance(alice.id, bob.id).await.unwrap();
    assert_eq!(balance.net, Amount::new(6_000));

    let request = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    assert_eq!(request.scope, SettleScope::All);
    let incoming = engine.list_settle_requests(alice.id).await.unwrap().incoming;
    assert_eq!(incoming.len(), 1);

    let err = engine
        .accept_settle_request(bob.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    let outcome = engine
        .accept_settle_request(alice.id, request.id)
        .await
        .unwrap();
    assert_eq!(outcome.settled_rows, 1);
    assert_eq!(outcome.scope, SettleScope::All);

    let balance = engine.friend_balance(bob.id, alice.id).await.unwrap();
    assert_eq!(balance.net, Amount::ZERO);
    let list = engine.list_expenses(alice.id).await.unwrap();
    let settled = list.expenses.iter().find(|e| e.id == expense.id).unwrap();
    assert!(settled.is_settled);
    assert!(engine.list_settle_requests(alice.id).await.unwrap().incoming.is_empty());
}

#[tokio::test]
async fn accepting_twice_settles_nothing_more() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;
    let expense = dinner(&engine, &alice, &bob, 4_000).await;

    let request = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    engine
        .accept_settle_request(alice.id, request.id)
        .await
        .unwrap();

    let err = engine
        .accept_settle_request(alice.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));

    let err = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NothingToSettle(_)));
    let err = engine
        .send_settle_request(bob.id, alice.id, SettleScope::Individual(expense.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NothingToSettle(_)));
}

#[tokio::test]
async fn individual_settlement_touches_one_expense() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;

    let first = dinner(&engine, &alice, &bob, 3_000).await;
    dinner(&engine, &bob, &alice, 1_000).await;

    let request = engine
        .send_settle_request(alice.id, bob.id, SettleScope::Individual(first.id))
        .await
        .unwrap();
    let outcome = engine
        .accept_settle_request(bob.id, request.id)
        .await
        .unwrap();
    assert_eq!(outcome.settled_rows, 1);

    // Only bob's share of alice's dinner is gone.
    let balance = engine.friend_balance(alice.id, bob.id).await.unwrap();
    assert_eq!(balance.net, Amount::new(-1_000));
    let rows = engine.split_rows_between(alice.id, bob.id).await.unwrap();
    assert_eq!(rows.iter().filter(|row| row.is_splitted_settled).count(), 1);
}

#[tokio::test]
async fn duplicate_requests_are_rejected_per_kind() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;
    let expense = dinner(&engine, &alice, &bob, 2_000).await;

    engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    let err = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateSettleRequest));

    // A different kind between the same pair is still allowed.
    engine
        .send_settle_request(bob.id, alice.id, SettleScope::Individual(expense.id))
        .await
        .unwrap();
    assert_eq!(engine.list_settle_requests(bob.id).await.unwrap().outgoing.len(), 2);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;

    let err = engine
        .send_settle_request(alice.id, alice.id, SettleScope::All)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SelfRequest));

    let err = engine
        .send_settle_request(alice.id, bob.id, SettleScope::All)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NothingToSettle(_)));

    let err = engine
        .send_settle_request(alice.id, bob.id, SettleScope::Individual(uuid::Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .send_settle_request(alice.id, uuid::Uuid::new_v4(), SettleScope::All)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn reject_and_remove_respect_the_sides() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;
    dinner(&engine, &alice, &bob, 2_000).await;

    let request = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    let err = engine
        .reject_settle_request(bob.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));
    let err = engine
        .remove_settle_request(alice.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));

    engine
        .reject_settle_request(alice.id, request.id)
        .await
        .unwrap();

    let request = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    engine
        .remove_settle_request(bob.id, request.id)
        .await
        .unwrap();
    assert!(engine.list_settle_requests(alice.id).await.unwrap().incoming.is_empty());

    // Nothing was settled along the way.
    let balance = engine.friend_balance(alice.id, bob.id).await.unwrap();
    assert_eq!(balance.net, Amount::new(2_000));
}

#[tokio::test]
async fn settling_settled_rows_is_a_no_op() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;
    let expense = dinner(&engine, &alice, &bob, 6_000).await;

    let all = engine
        .send_settle_request(bob.id, alice.id, SettleScope::All)
        .await
        .unwrap();
    let one = engine
        .send_settle_request(bob.id, alice.id, SettleScope::Individual(expense.id))
        .await
        .unwrap();

    let outcome = engine.accept_settle_request(alice.id, all.id).await.unwrap();
    assert_eq!(outcome.settled_rows, 1);

    // The individual request now covers only settled rows.
    let outcome = engine.accept_settle_request(alice.id, one.id).await.unwrap();
    assert_eq!(outcome.settled_rows, 0);
    assert_eq!(outcome.scope, SettleScope::Individual(expense.id));

    let balance = engine.friend_balance(alice.id, bob.id).await.unwrap();
    assert_eq!(balance.net, Amount::ZERO);
    let rows = engine.split_rows_between(alice.id, bob.id).await.unwrap();
    assert!(rows.iter().all(|row| row.is_splitted_settled));
    assert!(engine.list_settle_requests(alice.id).await.unwrap().incoming.is_empty());
}

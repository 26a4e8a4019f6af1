use engine::{Amount, EngineError, NewExpense, SplitShare};

mod common;

#[tokio::test]
async fn request_then_accept_creates_a_friendship() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;

    let request = engine.send_friend_request(alice.id, bob.id).await.unwrap();
    let bob_requests = engine.list_friend_requests(bob.id).await.unwrap();
    assert_eq!(bob_requests.incoming.len(), 1);
    assert!(bob_requests.outgoing.is_empty());
    assert_eq!(bob_requests.incoming[0].id, request.id);
    let alice_requests = engine.list_friend_requests(alice.id).await.unwrap();
    assert_eq!(alice_requests.outgoing.len(), 1);

    engine.accept_friend_request(bob.id, alice.id).await.unwrap();

    let friends = engine.list_friends(alice.id).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].user.id, bob.id);
    assert_eq!(friends[0].summary.net, Amount::ZERO);
    let friends = engine.list_friends(bob.id).await.unwrap();
    assert_eq!(friends[0].user.id, alice.id);
    assert!(engine.list_friend_requests(bob.id).await.unwrap().incoming.is_empty());
}

#[tokio::test]
async fn pending_request_blocks_both_directions() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;

    engine.send_friend_request(alice.id, bob.id).await.unwrap();

    let err = engine.send_friend_request(alice.id, bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadyPendingOrFriends));
    let err = engine.send_friend_request(bob.id, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadyPendingOrFriends));

    engine.accept_friend_request(bob.id, alice.id).await.unwrap();
    let err = engine.send_friend_request(bob.id, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadyPendingOrFriends));
}

#[tokio::test]
async fn request_to_self_or_unknown_user_fails() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;

    let err = engine.send_friend_request(alice.id, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::SelfRequest));
    let err = engine
        .send_friend_request(alice.id, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn accept_without_request_fails() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;

    let err = engine.accept_friend_request(bob.id, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));

    // Only the receiver can accept.
    engine.send_friend_request(alice.id, bob.id).await.unwrap();
    let err = engine.accept_friend_request(alice.id, bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));
}

#[tokio::test]
async fn reject_and_remove_respect_the_sides() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;

    let request = engine.send_friend_request(alice.id, bob.id).await.unwrap();
    let err = engine
        .reject_friend_request(alice.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));
    let err = engine
        .remove_friend_request(bob.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RequestNotFound(_)));

    engine.reject_friend_request(bob.id, request.id).await.unwrap();
    assert!(engine.list_friend_requests(alice.id).await.unwrap().outgoing.is_empty());

    let request = engine.send_friend_request(alice.id, bob.id).await.unwrap();
    engine.remove_friend_request(alice.id, request.id).await.unwrap();
    assert!(engine.list_friend_requests(bob.id).await.unwrap().incoming.is_empty());
    assert!(engine.list_friends(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn balance_is_antisymmetric() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let bob = common::user(&engine, "bob").await;
    common::befriend(&engine, &alice, &bob).await;

    engine
        .create_split_expense(
            NewExpense::new(alice.id, Amount::new(10_000), "dinner")
                .split(SplitShare::new(bob.id, Amount::new(6_000))),
        )
        .await
        .unwrap();
    engine
        .create_split_expense(
            NewExpense::new(bob.id, Amount::new(5_000), "cinema")
                .split(SplitShare::new(alice.id, Amount::new(2_500))),
        )
        .await
        .unwrap();

    let from_alice = engine.friend_balance(alice.id, bob.id).await.unwrap();
    let from_bob = engine.friend_balance(bob.id, alice.id).await.unwrap();
    assert_eq!(from_alice.net, Amount::new(3_500));
    assert_eq!(from_bob.net.minor(), -from_alice.net.minor());

    let friends = engine.list_friends(alice.id).await.unwrap();
    let summary = friends[0].summary;
    assert_eq!(summary.net, Amount::new(3_500));
    assert_eq!(summary.expense_count.current_user, 1);
    assert_eq!(summary.expense_count.friend, 1);
    assert_eq!(summary.unsettled_count, 2);

    let rows = engine.friend_expenses(bob.id, alice.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|row| row.is_created_by_you).count(), 1);
}

#[tokio::test]
async fn strangers_have_no_balance() {
    let engine = common::engine().await;
    let alice = common::user(&engine, "alice").await;
    let carol = common::user(&engine, "carol").await;

    let err = engine.friend_balance(alice.id, carol.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFriends(_)));
    let err = engine.friend_expenses(alice.id, carol.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFriends(_)));
}

use super::support::*;

#[tokio::test]
async fn send_marks_both_sides_pending() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();

    assert_eq!(social.friend_status(&alice.id, &bob.id).await.unwrap(), FriendStatus::None);

    let status = social.send_friend_request(&alice.id, &bob.id).await.expect("send");
    assert_eq!(status, FriendStatus::Pending);
    assert_eq!(social.friend_status(&alice.id, &bob.id).await.unwrap(), FriendStatus::Pending);
    assert_eq!(social.friend_status(&bob.id, &alice.id).await.unwrap(), FriendStatus::Pending);

    let alice = h.reload(&alice).await;
    let bob = h.reload(&bob).await;
    assert!(alice.sent_friend_requests.contains(&bob.id));
    assert!(bob.recv_friend_requests.contains(&alice.id));
    assert!(alice.recv_friend_requests.is_empty());
    assert!(bob.sent_friend_requests.is_empty());
}

#[tokio::test]
async fn resending_leaves_state_unchanged() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();

    social.send_friend_request(&alice.id, &bob.id).await.expect("send");
    let before = (h.reload(&alice).await, h.reload(&bob).await);
    let keys_before = h.store().key_count().unwrap();

    let status = social.send_friend_request(&alice.id, &bob.id).await.expect("resend");
    assert_eq!(status, FriendStatus::Pending);
    // a crossed request is absorbed too
    let status = social.send_friend_request(&bob.id, &alice.id).await.expect("reverse send");
    assert_eq!(status, FriendStatus::Pending);

    let after = (h.reload(&alice).await, h.reload(&bob).await);
    assert_eq!(before, after);
    assert_eq!(keys_before, h.store().key_count().unwrap());
}

#[tokio::test]
async fn accept_creates_symmetric_friendship() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();

    social.send_friend_request(&alice.id, &bob.id).await.expect("send");
    social.accept_friend_request(&bob.id, &alice.id).await.expect("accept");

    let alice = h.reload(&alice).await;
    let bob = h.reload(&bob).await;
    assert!(alice.friends.contains(&bob.id));
    assert!(bob.friends.contains(&alice.id));
    for user in [&alice, &bob] {
        assert!(user.sent_friend_requests.is_empty());
        assert!(user.recv_friend_requests.is_empty());
    }
    assert_eq!(social.friend_status(&alice.id, &bob.id).await.unwrap(), FriendStatus::Friend);
    assert_eq!(social.friend_status(&bob.id, &alice.id).await.unwrap(), FriendStatus::Friend);

    // already friends: sending is a no-op
    let status = social.send_friend_request(&bob.id, &alice.id).await.expect("send to friend");
    assert_eq!(status, FriendStatus::Friend);
    assert!(h.reload(&bob).await.sent_friend_requests.is_empty());

    let friends = social.friends(&alice.id).await.expect("friends");
    assert_eq!(friends.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), [bob.id.as_str()]);
}

#[tokio::test]
async fn decline_removes_pending_edge_only() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();

    social.send_friend_request(&alice.id, &bob.id).await.expect("send");
    social.decline_friend_request(&bob.id, &alice.id).await.expect("decline");

    assert_eq!(social.friend_status(&alice.id, &bob.id).await.unwrap(), FriendStatus::None);
    let alice = h.reload(&alice).await;
    let bob = h.reload(&bob).await;
    assert!(alice.friends.is_empty() && bob.friends.is_empty());
    assert!(alice.sent_friend_requests.is_empty() && bob.recv_friend_requests.is_empty());

    // the requester may ask again afterwards
    let status = social.send_friend_request(&alice.id, &bob.id).await.expect("send again");
    assert_eq!(status, FriendStatus::Pending);
}

#[tokio::test]
async fn accept_without_request_is_not_found() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();

    let err = social
        .accept_friend_request(&bob.id, &alice.id)
        .await
        .expect_err("no pending request");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "friend_request"));

    // only the target may accept
    social.send_friend_request(&alice.id, &bob.id).await.expect("send");
    let err = social
        .accept_friend_request(&alice.id, &bob.id)
        .await
        .expect_err("requester cannot accept");
    assert!(matches!(err, GraphError::NotFound { .. }));
    assert!(h.reload(&alice).await.friends.is_empty());
}

#[tokio::test]
async fn transitions_with_missing_user_mutate_nothing() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let social = h.network.social();
    let keys_before = h.store().key_count().unwrap();

    let err = social
        .send_friend_request(&alice.id, "ghost")
        .await
        .expect_err("missing target");
    assert!(matches!(err, GraphError::NotFound { ref entity_id, .. } if entity_id.as_deref() == Some("ghost")));

    let err = social
        .accept_friend_request(&alice.id, "ghost")
        .await
        .expect_err("missing requester");
    assert!(matches!(err, GraphError::NotFound { .. }));

    assert_eq!(keys_before, h.store().key_count().unwrap());
    assert!(h.reload(&alice).await.sent_friend_requests.is_empty());
}

#[tokio::test]
async fn ids_naming_other_records_are_not_users() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let social = h.network.social();
    let claim = email_claim_id(&bob);
    assert!(h.store().get_document(&h.network.keys().user(&claim)).await.unwrap().is_some());
    let keys_before = h.store().key_count().unwrap();

    let err = social.send_friend_request(&alice.id, &claim).await.expect_err("claim as target");
    assert!(matches!(err, GraphError::NotFound { ref entity, ref entity_id } if entity == "user" && entity_id.as_deref() == Some(claim.as_str())));
    let err = social.send_friend_request(&claim, &alice.id).await.expect_err("claim as requester");
    assert!(matches!(err, GraphError::NotFound { .. }));
    let err = social.accept_friend_request(&alice.id, &claim).await.expect_err("claim accepted");
    assert!(matches!(err, GraphError::NotFound { .. }));
    let err = social.decline_friend_request(&claim, &alice.id).await.expect_err("claim declines");
    assert!(matches!(err, GraphError::NotFound { .. }));

    assert_eq!(keys_before, h.store().key_count().unwrap());
    assert!(h.reload(&alice).await.sent_friend_requests.is_empty());
    assert!(social.outgoing_requests(&alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn request_listings_show_both_directions() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let carol = h.user("Carol").await;
    let social = h.network.social();

    social.send_friend_request(&bob.id, &alice.id).await.expect("bob -> alice");
    social.send_friend_request(&carol.id, &alice.id).await.expect("carol -> alice");
    social.send_friend_request(&alice.id, &bob.id).await.expect("crossed");

    let mut incoming: Vec<String> = social
        .incoming_requests(&alice.id)
        .await
        .expect("incoming")
        .into_iter()
        .map(|u| u.id)
        .collect();
    incoming.sort();
    let mut expected = vec![bob.id.clone(), carol.id.clone()];
    expected.sort();
    assert_eq!(incoming, expected);

    let outgoing = social.outgoing_requests(&carol.id).await.expect("outgoing");
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].id, alice.id);
    assert!(social.outgoing_requests(&alice.id).await.expect("outgoing").is_empty());
}

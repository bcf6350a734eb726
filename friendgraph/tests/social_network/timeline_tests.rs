use super::support::*;

#[tokio::test]
async fn merges_own_and_friends_posts_newest_first() {
    let h = Harness::new();
    let a = h.user("Alice").await;
    let b = h.user("Bob").await;
    let c = h.user("Carol").await;
    h.befriend(&a, &b).await;
    h.befriend(&c, &a).await;

    let b_post = h.post(&b, "B at T1").await;
    let c_post = h.post(&c, "C at T2").await;
    let a_post = h.post(&a, "A at T3").await;
    // replies never show up on a timeline
    h.reply(&b, &a_post, "reply from B").await;

    let timeline = h.network.timeline().build_timeline(&a.id).await.expect("timeline");
    assert_eq!(ids(&timeline), [a_post.id.clone(), c_post.id.clone(), b_post.id.clone()]);
}

#[tokio::test]
async fn without_friends_only_own_posts_appear() {
    let h = Harness::new();
    let a = h.user("Alice").await;
    let stranger = h.user("Stranger").await;
    h.network
        .social()
        .send_friend_request(&stranger.id, &a.id)
        .await
        .expect("pending request");

    let own = h.post(&a, "just me").await;
    h.post(&stranger, "not a friend yet").await;

    let timeline = h.network.timeline().build_timeline(&a.id).await.expect("timeline");
    assert_eq!(ids(&timeline), [own.id.clone()]);

    let theirs = h.network.timeline().build_timeline(&stranger.id).await.expect("timeline");
    assert_eq!(theirs.len(), 1);
}

#[tokio::test]
async fn unknown_viewer_is_not_found() {
    let h = Harness::new();
    let err = h
        .network
        .timeline()
        .build_timeline("nobody")
        .await
        .expect_err("unknown viewer");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "user"));
}

#[tokio::test]
async fn friend_that_cannot_be_loaded_is_skipped() {
    use friendgraph::runtime::{MutationPlan, commands::RelationMutation};

    let h = Harness::new();
    let a = h.user("Alice").await;
    let b = h.user("Bob").await;
    h.befriend(&a, &b).await;
    let b_post = h.post(&b, "bob was here").await;

    // a dangling edge to a user that was never stored
    let mut plan = MutationPlan::new();
    plan.relate(RelationMutation::add(h.network.keys().friends(&a.id), "ghost"));
    h.store().execute(plan).await.expect("add dangling friend");

    let timeline = h.network.timeline().build_timeline(&a.id).await.expect("timeline");
    assert_eq!(ids(&timeline), [b_post.id.clone()]);
}

#[tokio::test]
async fn deleted_posts_leave_the_timeline() {
    let h = Harness::new();
    let a = h.user("Alice").await;
    let b = h.user("Bob").await;
    h.befriend(&a, &b).await;

    let keep = h.post(&b, "staying around").await;
    let gone = h.post(&b, "about to vanish").await;
    h.network.content().delete_post(&b.id, &gone.id).await.expect("delete");

    let timeline = h.network.timeline().build_timeline(&a.id).await.expect("timeline");
    assert_eq!(ids(&timeline), [keep.id.clone()]);
}

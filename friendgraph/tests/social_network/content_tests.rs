use super::support::*;

#[tokio::test]
async fn post_text_needs_three_characters() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let content = h.network.content();

    let err = content.create_post(&alice.id, "hi", None).await.expect_err("too short");
    match err {
        GraphError::Validation(validation) => {
            assert!(validation.has_field("text"));
            assert_eq!(validation.issues[0].message, "Post can't be less than 3 characters.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(content.list_top_level_posts(&alice.id).await.unwrap().is_empty());

    let post = content.create_post(&alice.id, "  hi!  ", None).await.expect("long enough");
    assert_eq!(post.text, "hi!");
    assert_eq!(post.author, alice.id);
    assert!(!post.is_reply());
    assert_eq!(post.likes(), 0);
    assert_eq!(post.url(), format!("/posts/{}", post.id));
}

#[tokio::test]
async fn post_requires_existing_author_and_parent() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let content = h.network.content();

    let err = content.create_post("ghost", "hello there", None).await.expect_err("no author");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "user"));

    let err = content
        .create_post(&alice.id, "hello there", Some("missing"))
        .await
        .expect_err("no parent");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "post"));
    assert!(content.list_top_level_posts(&alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn ids_naming_other_records_are_rejected_on_write() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let content = h.network.content();
    let post = h.post(&alice, "a real post").await;
    let claim = email_claim_id(&alice);
    let index = post_index_id(&alice);
    let keys_before = h.store().key_count().unwrap();

    let err = content.create_post(&claim, "hello there", None).await.expect_err("claim as author");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "user"));
    let err = content
        .create_post(&alice.id, "hello there", Some(&index))
        .await
        .expect_err("index as parent");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "post"));

    let err = content.toggle_like(&post.id, &claim).await.expect_err("claim as liker");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "user"));
    let err = content.toggle_like(&index, &alice.id).await.expect_err("index as post");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "post"));

    let err = content.delete_post(&alice.id, &index).await.expect_err("index deleted");
    assert!(matches!(err, GraphError::NotFound { .. }));

    assert_eq!(keys_before, h.store().key_count().unwrap());
    assert_eq!(content.like_count(&post.id).await.unwrap(), 0);
    assert_eq!(ids(&content.list_top_level_posts(&alice.id).await.unwrap()), [post.id.clone()]);
}

#[tokio::test]
async fn replies_are_listed_under_parent_not_author() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let content = h.network.content();

    let root = h.post(&alice, "root post").await;
    let first = h.reply(&bob, &root, "first reply").await;
    let second = h.reply(&alice, &root, "second reply").await;
    let nested = h.reply(&bob, &first, "nested reply").await;

    assert!(first.is_reply());
    assert_eq!(first.parent.as_deref(), Some(root.id.as_str()));

    let replies = content.list_replies(&root.id).await.expect("replies");
    assert_eq!(ids(&replies), [second.id.clone(), first.id.clone()]);
    assert_eq!(content.reply_count(&root.id).await.unwrap(), 2);
    assert_eq!(content.reply_count(&first.id).await.unwrap(), 1);
    assert_eq!(ids(&content.list_replies(&first.id).await.unwrap()), [nested.id.clone()]);

    let alice_top = content.list_top_level_posts(&alice.id).await.unwrap();
    assert_eq!(ids(&alice_top), [root.id.clone()]);
    assert!(content.list_top_level_posts(&bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn top_level_posts_are_newest_first() {
    let h = Harness::new();
    let alice = h.user("Alice").await;

    let older = h.post(&alice, "older post").await;
    let newer = h.post(&alice, "newer post").await;
    assert!(newer.date_posted > older.date_posted);

    let posts = h.network.content().list_top_level_posts(&alice.id).await.unwrap();
    assert_eq!(ids(&posts), [newer.id.clone(), older.id.clone()]);
}

#[tokio::test]
async fn equal_timestamps_order_by_descending_id() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let content = h.network.content();

    let a = content.create_post(&alice.id, "same instant one", None).await.unwrap();
    let b = content.create_post(&alice.id, "same instant two", None).await.unwrap();
    assert_eq!(a.date_posted, b.date_posted);

    let mut expected = vec![a.id.clone(), b.id.clone()];
    expected.sort();
    expected.reverse();
    assert_eq!(ids(&content.list_top_level_posts(&alice.id).await.unwrap()), expected);
}

#[tokio::test]
async fn toggle_like_twice_restores_liker_set() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let content = h.network.content();
    let post = h.post(&alice, "like me").await;

    let state = content.toggle_like(&post.id, &bob.id).await.expect("like");
    assert!(state.liked);
    assert_eq!(state.likes, 1);

    let state = content.toggle_like(&post.id, &alice.id).await.expect("self like");
    assert_eq!(state.likes, 2);

    let loaded = content.get_post(&post.id).await.expect("post");
    assert_eq!(loaded.likes() as u64, content.like_count(&post.id).await.unwrap());
    assert!(loaded.liked_by.contains(&bob.id));

    let state = content.toggle_like(&post.id, &bob.id).await.expect("unlike");
    assert!(!state.liked);
    assert_eq!(state.likes, 1);
    let state = content.toggle_like(&post.id, &alice.id).await.expect("unlike");
    assert_eq!(state.likes, 0);

    let loaded = content.get_post(&post.id).await.expect("post");
    assert!(loaded.liked_by.is_empty());
    assert_eq!(content.like_count(&post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn toggle_like_on_missing_post_changes_nothing() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let keys_before = h.store().key_count().unwrap();

    let err = h
        .network
        .content()
        .toggle_like("missing", &alice.id)
        .await
        .expect_err("missing post");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "post"));
    assert_eq!(keys_before, h.store().key_count().unwrap());
}

#[tokio::test]
async fn delete_removes_whole_reply_tree() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let content = h.network.content();

    let keep = h.post(&alice, "unrelated post").await;
    let root = h.post(&alice, "root post").await;
    let r1 = h.reply(&bob, &root, "reply one").await;
    let r2 = h.reply(&alice, &root, "reply two").await;
    let r11 = h.reply(&alice, &r1, "reply one one").await;
    let r111 = h.reply(&bob, &r11, "reply one one one").await;
    content.toggle_like(&r11.id, &bob.id).await.expect("like nested");
    content.toggle_like(&root.id, &bob.id).await.expect("like root");

    let deleted = content.delete_post(&alice.id, &root.id).await.expect("delete");
    assert_eq!(deleted.len(), 5);
    assert_eq!(deleted.last(), Some(&root.id));
    for id in [&root.id, &r1.id, &r2.id, &r11.id, &r111.id] {
        assert!(deleted.contains(id));
        assert!(content.find_post(id).await.unwrap().is_none());
    }

    let err = content.list_replies(&root.id).await.expect_err("deleted post");
    assert!(matches!(err, GraphError::NotFound { .. }));
    assert_eq!(content.reply_count(&root.id).await.unwrap(), 0);
    assert_eq!(ids(&content.list_top_level_posts(&alice.id).await.unwrap()), [keep.id.clone()]);

    // two users with their profiles and unique claims, plus the surviving post and its index
    let remaining = h.store().key_count().unwrap();
    assert_eq!(remaining, 10);
    h.network.content().delete_post(&alice.id, &keep.id).await.expect("delete keep");
    assert_eq!(h.store().key_count().unwrap(), remaining - 2);
}

#[tokio::test]
async fn deleting_a_reply_detaches_it_from_parent() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let content = h.network.content();

    let root = h.post(&alice, "root post").await;
    let reply = h.reply(&bob, &root, "bob's reply").await;
    let other = h.reply(&alice, &root, "alice's reply").await;

    let deleted = content.delete_post(&bob.id, &reply.id).await.expect("delete reply");
    assert_eq!(deleted, [reply.id.clone()]);
    assert_eq!(ids(&content.list_replies(&root.id).await.unwrap()), [other.id.clone()]);
    assert_eq!(content.reply_count(&root.id).await.unwrap(), 1);
}

#[tokio::test]
async fn only_the_author_may_delete() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let bob = h.user("Bob").await;
    let content = h.network.content();

    let root = h.post(&alice, "alice's post").await;
    let reply = h.reply(&bob, &root, "bob's reply").await;
    let keys_before = h.store().key_count().unwrap();

    let err = content.delete_post(&bob.id, &root.id).await.expect_err("not the author");
    assert!(matches!(
        err,
        GraphError::Unauthorized { ref actor_id, ref entity_id } if *actor_id == bob.id && *entity_id == root.id
    ));
    assert_eq!(keys_before, h.store().key_count().unwrap());
    assert!(content.find_post(&reply.id).await.unwrap().is_some());

    let err = content.delete_post(&alice.id, "missing").await.expect_err("missing post");
    assert!(matches!(err, GraphError::NotFound { .. }));
}

#![allow(dead_code, unused_imports)]

use std::sync::Arc;

pub use chrono::{Duration, TimeZone, Utc};
pub use friendgraph::{
    Argon2Hasher, DirectoryImageStore, FriendStatus, FriendgraphConfig, GraphError, GraphStore, MemoryStore,
    MockTimeProvider, Post, Registration, SocialNetwork, TimeProvider, User,
};
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse";

/// A fresh in-memory network with a stepped clock and a cheap hasher.
pub struct Harness {
    pub network: SocialNetwork<MemoryStore>,
    pub clock: MockTimeProvider,
    pub media: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let media = tempfile::tempdir().expect("media dir");
        let config = FriendgraphConfig::default();
        let clock = MockTimeProvider::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let network = SocialNetwork::new(
            MemoryStore::new(),
            DirectoryImageStore::new(media.path(), "/uploads"),
            &config,
            Arc::new(Argon2Hasher::with_cost(1024, 1).expect("hasher")),
            Arc::new(clock.clone()),
        );
        Self { network, clock, media }
    }

    pub fn store(&self) -> &MemoryStore {
        self.network.store()
    }

    pub fn tick(&self) {
        self.clock.advance(Duration::minutes(1));
    }

    pub async fn user(&self, name: &str) -> User {
        self.network
            .identity()
            .register(&registration(name, &format!("{}@example.com", name.to_lowercase())))
            .await
            .expect("register user")
    }

    /// Reloads a user with its relationship sets.
    pub async fn reload(&self, user: &User) -> User {
        self.network.identity().get_user(&user.id).await.expect("reload user")
    }

    pub async fn post(&self, author: &User, text: &str) -> Post {
        self.tick();
        self.network
            .content()
            .create_post(&author.id, text, None)
            .await
            .expect("create post")
    }

    pub async fn reply(&self, author: &User, parent: &Post, text: &str) -> Post {
        self.tick();
        self.network
            .content()
            .create_post(&author.id, text, Some(&parent.id))
            .await
            .expect("create reply")
    }

    pub async fn befriend(&self, a: &User, b: &User) {
        let social = self.network.social();
        social.send_friend_request(&a.id, &b.id).await.expect("send request");
        social.accept_friend_request(&b.id, &a.id).await.expect("accept request");
    }
}

pub fn registration(name: &str, email: &str) -> Registration {
    Registration {
        name: name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
    }
}

pub fn ids(posts: &[Post]) -> Vec<String> {
    posts.iter().map(|post| post.id.clone()).collect()
}

/// An id whose user key lands on `user`'s email claim rather than a user.
pub fn email_claim_id(user: &User) -> String {
    format!("unique:email:{}", user.email)
}

/// An id whose post key lands on `author`'s top-level post index.
pub fn post_index_id(author: &User) -> String {
    format!("rev_rel:author_top:{}", author.id)
}

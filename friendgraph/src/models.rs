//! Entity models stored by the engines.
//!
//! Documents hold scalar fields only. Relationship sets and like sets live in
//! their own keys and are hydrated on read; they are never serialized into the
//! document, so stored and derived state cannot drift apart.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::relative_age;

/// A registered user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Stored normalised (trimmed, lower case).
    pub email: String,
    pub password_hash: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    /// Confirmed, symmetric friendships.
    #[serde(skip)]
    pub friends: BTreeSet<String>,
    /// Outgoing pending requests.
    #[serde(skip)]
    pub sent_friend_requests: BTreeSet<String>,
    /// Incoming pending requests.
    #[serde(skip)]
    pub recv_friend_requests: BTreeSet<String>,
}

impl User {
    pub fn url(&self) -> String {
        format!("/users/{}", self.id)
    }
}

/// One-to-one companion of a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub owner: String,
    #[serde(default)]
    pub status: String,
}

/// A top-level post or, when `parent` is set, a reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author: String,
    pub date_posted: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip)]
    pub liked_by: BTreeSet<String>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.parent.is_some()
    }

    /// Number of likes; always the size of the liker set.
    pub fn likes(&self) -> usize {
        self.liked_by.len()
    }

    pub fn url(&self) -> String {
        format!("/posts/{}", self.id)
    }

    pub fn posted_relative(&self, now: DateTime<Utc>) -> String {
        relative_age(self.date_posted, now)
    }
}

/// Relationship between a viewer and another user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    Friend,
    Pending,
    None,
}

impl std::fmt::Display for FriendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Friend => "friend",
            Self::Pending => "pending",
            Self::None => "none",
        };
        f.write_str(label)
    }
}

/// Outcome of a like toggle.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u64,
}

/// Newest first, equal timestamps by descending id.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date_posted.cmp(&a.date_posted).then_with(|| b.id.cmp(&a.id)));
}

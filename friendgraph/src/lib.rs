//! friendgraph core library.
//!
//! Identity, friend requests, posts with threaded replies and likes, and a
//! friends timeline, all over a pluggable `GraphStore` (Redis or in-memory).

pub mod client;
pub mod config;
pub mod content;
pub mod errors;
pub mod hashing;
pub mod id;
pub mod identity;
pub mod keys;
pub mod media;
pub mod models;
pub mod profiles;
pub mod runtime;
pub mod social;
pub mod time;
pub mod timeline;
pub mod validators;

pub use client::SocialNetwork;
pub use config::{ConfigError, FriendgraphConfig, StoreBackend};
pub use content::ContentGraph;
pub use errors::{GraphError, GraphResult, ValidationError, ValidationIssue};
pub use hashing::{Argon2Hasher, PasswordHasher};
pub use identity::{IdentityStore, Registration};
pub use keys::KeySpace;
pub use media::{DirectoryImageStore, ImageStore};
pub use models::{FriendStatus, LikeState, Post, Profile, User};
pub use profiles::{ProfileView, Profiles};
pub use runtime::{GraphStore, MemoryStore, RedisStore};
pub use social::SocialGraph;
pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};
pub use timeline::TimelineAggregator;

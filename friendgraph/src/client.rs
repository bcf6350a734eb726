//! `SocialNetwork`: the engines wired to one shared store.
//!
//! # Example
//! ```ignore
//! let config = FriendgraphConfig::load_or_default(Path::new("friendgraph.toml"))?;
//! let network = SocialNetwork::connect(&config.redis_url()?, &config).await?;
//! let alice = network.identity().register(&form).await?;
//! network.content().create_post(&alice.id, "hello there", None).await?;
//! let feed = network.timeline().build_timeline(&alice.id).await?;
//! ```

use std::sync::Arc;

use crate::{
    config::FriendgraphConfig,
    content::ContentGraph,
    errors::GraphResult,
    hashing::{Argon2Hasher, PasswordHasher},
    identity::IdentityStore,
    keys::KeySpace,
    media::{DirectoryImageStore, ImageStore},
    profiles::Profiles,
    runtime::{GraphStore, MemoryStore, RedisStore},
    social::SocialGraph,
    time::{SystemTimeProvider, TimeProvider},
    timeline::TimelineAggregator,
};

#[derive(Clone)]
pub struct SocialNetwork<S, M = DirectoryImageStore> {
    store: S,
    keys: KeySpace,
    identity: IdentityStore<S>,
    social: SocialGraph<S>,
    content: ContentGraph<S>,
    timeline: TimelineAggregator<S>,
    profiles: Profiles<S, M>,
}

impl<S, M> SocialNetwork<S, M>
where
    S: GraphStore,
    M: ImageStore,
{
    /// Builds every engine over `store`. The hasher and clock are shared by
    /// all of them.
    pub fn new(
        store: S,
        images: M,
        config: &FriendgraphConfig,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let keys = KeySpace::new(&config.store.prefix, &config.store.service);
        let identity = IdentityStore::new(
            store.clone(),
            keys.clone(),
            hasher,
            clock.clone(),
            config.rules.clone(),
        );
        let content = ContentGraph::new(store.clone(), keys.clone(), clock, config.rules.clone());
        let social = SocialGraph::new(store.clone(), keys.clone(), identity.clone());
        let timeline = TimelineAggregator::new(store.clone(), keys.clone(), content.clone());
        let profiles = Profiles::new(store.clone(), keys.clone(), identity.clone(), content.clone(), images);
        Self {
            store,
            keys,
            identity,
            social,
            content,
            timeline,
            profiles,
        }
    }

    pub fn identity(&self) -> &IdentityStore<S> {
        &self.identity
    }

    pub fn social(&self) -> &SocialGraph<S> {
        &self.social
    }

    pub fn content(&self) -> &ContentGraph<S> {
        &self.content
    }

    pub fn timeline(&self) -> &TimelineAggregator<S> {
        &self.timeline
    }

    pub fn profiles(&self) -> &Profiles<S, M> {
        &self.profiles
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }
}

fn default_images(config: &FriendgraphConfig) -> DirectoryImageStore {
    DirectoryImageStore::new(&config.media.directory, &config.media.public_base)
}

impl SocialNetwork<MemoryStore> {
    /// In-process network with the system clock and default Argon2 cost.
    pub fn in_memory(config: &FriendgraphConfig) -> Self {
        Self::new(
            MemoryStore::new(),
            default_images(config),
            config,
            Arc::new(Argon2Hasher::new()),
            Arc::new(SystemTimeProvider),
        )
    }
}

impl SocialNetwork<RedisStore> {
    /// Connects to Redis at `url` and keys everything under the configured
    /// prefix and service.
    pub async fn connect(url: &str, config: &FriendgraphConfig) -> GraphResult<Self> {
        let store = RedisStore::connect(url).await?;
        log::debug!("connected to redis for {}:{}", config.store.prefix, config.store.service);
        Ok(Self::new(
            store,
            default_images(config),
            config,
            Arc::new(Argon2Hasher::new()),
            Arc::new(SystemTimeProvider),
        ))
    }
}

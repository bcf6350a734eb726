use crate::{
    content::ContentGraph,
    errors::GraphResult,
    keys::KeySpace,
    models::{Post, sort_newest_first},
    runtime::GraphStore,
};

/// Read-only merge of a user's own top-level posts with their friends'.
#[derive(Clone)]
pub struct TimelineAggregator<S> {
    store: S,
    keys: KeySpace,
    content: ContentGraph<S>,
}

impl<S> TimelineAggregator<S>
where
    S: GraphStore,
{
    pub fn new(store: S, keys: KeySpace, content: ContentGraph<S>) -> Self {
        Self { store, keys, content }
    }

    /// Newest first, equal timestamps by descending id.
    ///
    /// A friend whose posts cannot be loaded is left out of the result rather
    /// than failing the whole timeline.
    pub async fn build_timeline(&self, user_id: &str) -> GraphResult<Vec<Post>> {
        let mut posts = self.content.list_top_level_posts(user_id).await?;

        for friend_id in self.store.members(&self.keys.friends(user_id)).await? {
            match self.content.list_top_level_posts(&friend_id).await {
                Ok(friend_posts) => posts.extend(friend_posts),
                Err(err) => log::warn!("timeline for {user_id}: skipping friend {friend_id}: {err}"),
            }
        }

        sort_newest_first(&mut posts);
        Ok(posts)
    }
}

//! Content graph engine: posts, threaded replies and likes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    config::RuleSettings,
    errors::{GraphError, GraphResult, ValidationError, ValidationIssue},
    id::{generate_entity_id, is_well_formed},
    keys::KeySpace,
    models::{LikeState, Post},
    runtime::{
        GraphStore, MutationCommand, MutationPlan,
        commands::{IndexEntry, MemberToggle, TreeDelete, build_entity_write},
        decode_document, encode_error,
    },
    time::TimeProvider,
    validators::check_min_length,
};

#[derive(Clone)]
pub struct ContentGraph<S> {
    store: S,
    keys: KeySpace,
    clock: Arc<dyn TimeProvider>,
    rules: RuleSettings,
}

impl<S> ContentGraph<S>
where
    S: GraphStore,
{
    pub fn new(store: S, keys: KeySpace, clock: Arc<dyn TimeProvider>, rules: RuleSettings) -> Self {
        Self {
            store,
            keys,
            clock,
            rules,
        }
    }

    /// Creates a top-level post, or a reply when `parent_id` is given.
    ///
    /// Replies may answer replies; there is no depth limit. The author and the
    /// parent are checked inside the same plan that writes the post.
    pub async fn create_post(&self, author_id: &str, text: &str, parent_id: Option<&str>) -> GraphResult<Post> {
        let text = text.trim();
        let mut issues: Vec<ValidationIssue> = Vec::new();
        check_min_length("text", "Post", text, self.rules.min_post_length, &mut issues);
        ValidationError::new(issues).into_result()?;

        let post = Post {
            id: generate_entity_id(),
            text: text.to_string(),
            author: author_id.to_string(),
            date_posted: self.posted_now(),
            parent: parent_id.map(str::to_string),
            liked_by: Default::default(),
        };
        let score = post.date_posted.timestamp_millis();

        let mut plan = MutationPlan::new();
        plan.require_entity(self.keys.user(author_id), "user", author_id)?;
        let index_key = match parent_id {
            Some(parent_id) => {
                plan.require_entity(self.keys.post(parent_id), "post", parent_id)?;
                self.keys.replies(parent_id)
            }
            None => self.keys.top_level_posts(author_id),
        };
        plan.push(MutationCommand::PutEntity(
            build_entity_write(self.keys.post(&post.id), &post.id, &post).map_err(encode_error)?,
        ))
        .push(MutationCommand::IndexInsert(IndexEntry {
            index_key,
            member: post.id.clone(),
            score,
        }));

        self.store.execute(plan).await?;
        log::info!("user {author_id} posted {}", post.id);
        Ok(post)
    }

    /// Deletes a post and every reply below it. Only the author may do this.
    ///
    /// Returns the deleted ids, deepest replies first.
    pub async fn delete_post(&self, actor_id: &str, post_id: &str) -> GraphResult<Vec<String>> {
        let mut plan = MutationPlan::new();
        plan.require_owned(self.keys.post(post_id), "post", post_id, "author", actor_id)?
            .push(MutationCommand::DeleteTree(TreeDelete {
                root_id: post_id.to_string(),
                entity_prefix: self.keys.post_prefix(),
                children_prefix: self.keys.replies_prefix(),
                top_level_prefix: self.keys.top_level_prefix(),
                likes_prefix: self.keys.liked_by_prefix(),
            }));

        let results = self.store.execute(plan).await?;
        let deleted: Vec<String> = results
            .first()
            .and_then(|result| result.get("deleted"))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .ok_or_else(|| GraphError::other("delete_tree returned no deleted list"))?;
        log::info!("user {actor_id} deleted post {post_id} ({} posts removed)", deleted.len());
        Ok(deleted)
    }

    /// Flips `user_id`'s like on a post. Calling it twice restores the
    /// original liker set.
    pub async fn toggle_like(&self, post_id: &str, user_id: &str) -> GraphResult<LikeState> {
        let mut plan = MutationPlan::new();
        plan.require_entity(self.keys.post(post_id), "post", post_id)?
            .require_entity(self.keys.user(user_id), "user", user_id)?
            .push(MutationCommand::ToggleMember(MemberToggle {
                relation_key: self.keys.liked_by(post_id),
                member: user_id.to_string(),
            }));

        let results = self.store.execute(plan).await?;
        let result = results
            .first()
            .ok_or_else(|| GraphError::other("toggle returned no result"))?;
        let liked = result.get("member").and_then(Value::as_bool);
        let likes = result.get("count").and_then(Value::as_u64);
        match (liked, likes) {
            (Some(liked), Some(likes)) => Ok(LikeState { liked, likes }),
            _ => Err(GraphError::other(format!("malformed toggle result: {result}"))),
        }
    }

    pub async fn find_post(&self, post_id: &str) -> GraphResult<Option<Post>> {
        if !is_well_formed(post_id) {
            return Ok(None);
        }
        match self.store.get_document(&self.keys.post(post_id)).await? {
            Some(raw) => Ok(Some(self.hydrate(decode_document(&raw)?).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_post(&self, post_id: &str) -> GraphResult<Post> {
        self.find_post(post_id)
            .await?
            .ok_or_else(|| GraphError::not_found("post", post_id))
    }

    pub async fn like_count(&self, post_id: &str) -> GraphResult<u64> {
        self.ensure_post(post_id).await?;
        self.store.cardinality(&self.keys.liked_by(post_id)).await
    }

    /// Direct replies, newest first.
    pub async fn list_replies(&self, post_id: &str) -> GraphResult<Vec<Post>> {
        self.ensure_post(post_id).await?;
        let ids = self.store.index_newest_first(&self.keys.replies(post_id)).await?;
        self.load_posts(&ids).await
    }

    /// Counts direct replies without loading them.
    pub async fn reply_count(&self, post_id: &str) -> GraphResult<u64> {
        self.store.index_len(&self.keys.replies(post_id)).await
    }

    /// The author's posts that are not replies, newest first.
    pub async fn list_top_level_posts(&self, author_id: &str) -> GraphResult<Vec<Post>> {
        if !is_well_formed(author_id) || self.store.get_document(&self.keys.user(author_id)).await?.is_none() {
            return Err(GraphError::not_found("user", author_id));
        }
        let ids = self
            .store
            .index_newest_first(&self.keys.top_level_posts(author_id))
            .await?;
        self.load_posts(&ids).await
    }

    /// Loads posts in the order given, skipping ids whose document is gone.
    async fn load_posts(&self, post_ids: &[String]) -> GraphResult<Vec<Post>> {
        let keys: Vec<String> = post_ids.iter().map(|id| self.keys.post(id)).collect();
        let docs = self.store.get_documents(&keys).await?;
        let mut posts = Vec::with_capacity(docs.len());
        for raw in docs.into_iter().flatten() {
            posts.push(self.hydrate(decode_document(&raw)?).await?);
        }
        Ok(posts)
    }

    async fn hydrate(&self, mut post: Post) -> GraphResult<Post> {
        post.liked_by = self
            .store
            .members(&self.keys.liked_by(&post.id))
            .await?
            .into_iter()
            .collect();
        Ok(post)
    }

    async fn ensure_post(&self, post_id: &str) -> GraphResult<()> {
        if is_well_formed(post_id) && self.store.get_document(&self.keys.post(post_id)).await?.is_some() {
            Ok(())
        } else {
            Err(GraphError::not_found("post", post_id))
        }
    }

    /// Current time cut to the millisecond resolution of the index scores.
    fn posted_now(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
    }
}

pub mod account;
pub mod content;
pub mod profile;
pub mod social;
pub mod tour;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use friendgraph::{GraphStore, ImageStore, Post, SocialNetwork};

use crate::output::PostRow;

/// The acting user given with `--as`.
pub fn require_actor(actor: Option<&str>) -> Result<&str> {
    actor.context("this command acts on behalf of a user; pass --as <USER_ID>")
}

/// Rows for a list of posts, with reply counts looked up per post.
pub async fn post_rows<S, M>(network: &SocialNetwork<S, M>, posts: &[Post], now: DateTime<Utc>) -> Result<Vec<PostRow>>
where
    S: GraphStore,
    M: ImageStore,
{
    let mut rows = Vec::with_capacity(posts.len());
    for post in posts {
        let replies = network.content().reply_count(&post.id).await?;
        rows.push(PostRow::new(post, replies, now));
    }
    Ok(rows)
}

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use friendgraph::{GraphStore, ImageStore, SocialNetwork};

use crate::commands::{post_rows, require_actor};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Write",
        commands: &[
            "friendgraph post create 'hello everyone' --as <ME>",
            "friendgraph post reply <POST_ID> 'nice one' --as <ME>",
            "friendgraph post delete <POST_ID> --as <ME>       # Removes all replies too",
        ],
    },
    ExampleGroup {
        title: "Read",
        commands: &[
            "friendgraph post show <POST_ID>",
            "friendgraph post replies <POST_ID>",
            "friendgraph post list <USER_ID>",
            "friendgraph post like <POST_ID> --as <ME>         # Run again to unlike",
        ],
    },
];

pub const TIMELINE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Timeline",
    commands: &[
        "friendgraph timeline --as <ME>",
        "friendgraph --output json timeline --as <ME>",
    ],
}];

#[derive(Subcommand)]
pub enum PostCommands {
    /// Publish a top-level post
    #[command(name = "create")]
    Create { text: String },

    /// Reply to a post or to another reply
    #[command(name = "reply")]
    Reply { post_id: String, text: String },

    /// Delete one of your posts and every reply below it
    #[command(name = "delete")]
    Delete { post_id: String },

    /// Like a post, or unlike it if you already do
    #[command(name = "like")]
    Like { post_id: String },

    /// Show a single post
    #[command(name = "show")]
    Show { post_id: String },

    /// Direct replies to a post, newest first
    #[command(name = "replies")]
    Replies { post_id: String },

    /// A user's top-level posts, newest first
    #[command(name = "list")]
    List { user_id: String },
}

pub async fn handle_post_commands<S, M>(
    command: PostCommands,
    actor: Option<&str>,
    network: &SocialNetwork<S, M>,
    output: &OutputManager,
) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let content = network.content();
    let now = Utc::now();

    match command {
        PostCommands::Create { text } => {
            let post = content.create_post(require_actor(actor)?, &text, None).await?;
            output.success(&format!("Posted {}", post.url()));
            output.display(&post_rows(network, &[post], now).await?)?;
        }
        PostCommands::Reply { post_id, text } => {
            let post = content
                .create_post(require_actor(actor)?, &text, Some(&post_id))
                .await?;
            output.success(&format!("Replied {} {}", theme::REPLY, post.url()));
        }
        PostCommands::Delete { post_id } => {
            let deleted = content.delete_post(require_actor(actor)?, &post_id).await?;
            output.success(&format!("Deleted {} post(s)", deleted.len()));
            for id in &deleted {
                output.verbose(id);
            }
        }
        PostCommands::Like { post_id } => {
            let state = content.toggle_like(&post_id, require_actor(actor)?).await?;
            let verb = if state.liked { "Liked" } else { "Unliked" };
            output.success(&format!("{verb} {post_id} ({} {})", theme::HEART, state.likes));
        }
        PostCommands::Show { post_id } => {
            let post = content.get_post(&post_id).await?;
            output.display(&post_rows(network, &[post], now).await?)?;
        }
        PostCommands::Replies { post_id } => {
            let replies = content.list_replies(&post_id).await?;
            output.display(&post_rows(network, &replies, now).await?)?;
        }
        PostCommands::List { user_id } => {
            let posts = content.list_top_level_posts(&user_id).await?;
            output.display(&post_rows(network, &posts, now).await?)?;
        }
    }

    Ok(())
}

pub async fn handle_timeline<S, M>(actor: Option<&str>, network: &SocialNetwork<S, M>, output: &OutputManager) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let me = require_actor(actor)?;
    let posts = network.timeline().build_timeline(me).await?;
    output.heading(&format!("Timeline ({} posts)", posts.len()));
    output.display(&post_rows(network, &posts, Utc::now()).await?)
}

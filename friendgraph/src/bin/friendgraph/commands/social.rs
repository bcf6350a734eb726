use anyhow::Result;
use clap::Subcommand;

use friendgraph::{GraphStore, ImageStore, SocialNetwork, User};

use crate::commands::require_actor;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, StatusRow, UserRow};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Requests",
        commands: &[
            "friendgraph friend request <USER_ID> --as <ME>    # Ask to be friends",
            "friendgraph friend accept <USER_ID> --as <ME>     # Accept their request",
            "friendgraph friend decline <USER_ID> --as <ME>    # Decline their request",
        ],
    },
    ExampleGroup {
        title: "Inspect",
        commands: &[
            "friendgraph friend status <USER_ID> --as <ME>",
            "friendgraph friend list --as <ME>",
            "friendgraph friend incoming --as <ME>",
        ],
    },
];

#[derive(Subcommand)]
pub enum FriendCommands {
    /// Send a friend request
    #[command(name = "request")]
    Request { user_id: String },

    /// Accept a pending request from a user
    #[command(name = "accept")]
    Accept { user_id: String },

    /// Decline a pending request from a user
    #[command(name = "decline")]
    Decline { user_id: String },

    /// Show whether you are friends, pending or unrelated
    #[command(name = "status")]
    Status { user_id: String },

    /// List your friends
    #[command(name = "list")]
    List,

    /// Requests waiting for your answer
    #[command(name = "incoming")]
    Incoming,

    /// Requests you sent that are still pending
    #[command(name = "outgoing")]
    Outgoing,
}

pub async fn handle_friend_commands<S, M>(
    command: FriendCommands,
    actor: Option<&str>,
    network: &SocialNetwork<S, M>,
    output: &OutputManager,
) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let me = require_actor(actor)?;
    let social = network.social();

    match command {
        FriendCommands::Request { user_id } => {
            let status = social.send_friend_request(me, &user_id).await?;
            output.success(&format!("Friend request to {user_id}: {status}"));
        }
        FriendCommands::Accept { user_id } => {
            social.accept_friend_request(me, &user_id).await?;
            output.success(&format!("You and {user_id} are now friends"));
        }
        FriendCommands::Decline { user_id } => {
            social.decline_friend_request(me, &user_id).await?;
            output.success(&format!("Declined the request from {user_id}"));
        }
        FriendCommands::Status { user_id } => {
            let status = social.friend_status(me, &user_id).await?;
            output.display(&[StatusRow {
                viewer: me.to_string(),
                subject: user_id,
                status,
            }])?;
        }
        FriendCommands::List => show_users(output, "Friends", &social.friends(me).await?)?,
        FriendCommands::Incoming => show_users(output, "Incoming requests", &social.incoming_requests(me).await?)?,
        FriendCommands::Outgoing => show_users(output, "Outgoing requests", &social.outgoing_requests(me).await?)?,
    }

    Ok(())
}

fn show_users(output: &OutputManager, title: &str, users: &[User]) -> Result<()> {
    output.heading(&format!("{title} ({})", users.len()));
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    output.display(&rows)
}

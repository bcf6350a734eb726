use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;

use friendgraph::{GraphStore, ImageStore, SocialNetwork};

use crate::commands::{post_rows, require_actor};
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, ProfileRow};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Profiles",
    commands: &[
        "friendgraph profile show <USER_ID>",
        "friendgraph profile status 'out hiking' --as <ME>",
        "friendgraph profile picture ./me.png --as <ME>",
        "friendgraph profile clear-picture --as <ME>",
    ],
}];

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show a profile with its top-level posts
    #[command(name = "show")]
    Show { user_id: String },

    /// Set your status line
    #[command(name = "status")]
    Status { text: String },

    /// Upload a profile picture (png, jpg, gif or webp)
    #[command(name = "picture")]
    Picture { path: PathBuf },

    /// Remove your profile picture
    #[command(name = "clear-picture")]
    ClearPicture,
}

pub async fn handle_profile_commands<S, M>(
    command: ProfileCommands,
    actor: Option<&str>,
    network: &SocialNetwork<S, M>,
    output: &OutputManager,
) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let profiles = network.profiles();
    let now = Utc::now();

    match command {
        ProfileCommands::Show { user_id } => {
            let view = profiles.profile(&user_id).await?;
            output.display(&[ProfileRow::new(&view.profile, &view.user, view.posts.len(), now)])?;
            output.heading("Posts");
            output.display(&post_rows(network, &view.posts, now).await?)?;
        }
        ProfileCommands::Status { text } => {
            let me = require_actor(actor)?;
            let profile = profiles.update_status(me, me, &text).await?;
            output.success(&format!("Status set to '{}'", profile.status));
        }
        ProfileCommands::Picture { path } => {
            let me = require_actor(actor)?;
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .with_context(|| format!("{} has no file extension", path.display()))?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let user = profiles.set_picture(me, &bytes, extension).await?;
            output.success(&format!("Picture stored at {}", user.picture.unwrap_or_default()));
        }
        ProfileCommands::ClearPicture => {
            profiles.clear_picture(require_actor(actor)?).await?;
            output.success("Picture removed");
        }
    }

    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};

use friendgraph::{
    Argon2Hasher, DirectoryImageStore, FriendgraphConfig, MemoryStore, MockTimeProvider, Registration, SocialNetwork,
    TimeProvider, User,
};

use crate::commands::post_rows;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Walkthrough",
    commands: &[
        "friendgraph tour                  # Run the scripted walkthrough in memory",
        "friendgraph --verbose tour        # Also list deleted post ids",
    ],
}];

/// Scripted walkthrough against a private in-memory network with a stepped
/// clock. Nothing is written to the configured store.
pub async fn handle_tour(config: &FriendgraphConfig, output: &OutputManager) -> Result<()> {
    let clock = MockTimeProvider::new(Utc::now() - Duration::hours(3));
    let network = SocialNetwork::new(
        MemoryStore::new(),
        DirectoryImageStore::new(&config.media.directory, &config.media.public_base),
        config,
        Arc::new(Argon2Hasher::new()),
        Arc::new(clock.clone()),
    );

    output.heading("Accounts");
    let alice = register(&network, output, "Alice", "alice@example.com").await?;
    let bob = register(&network, output, "Bob", "bob@example.com").await?;
    let carol = register(&network, output, "Carol", "carol@example.com").await?;

    output.heading("Friends");
    let social = network.social();
    for friend in [&bob, &carol] {
        social.send_friend_request(&alice.id, &friend.id).await?;
        output.bullet(&format!(
            "{} {} {}: {}",
            alice.name,
            theme::ARROW,
            friend.name,
            social.friend_status(&friend.id, &alice.id).await?
        ));
        social.accept_friend_request(&friend.id, &alice.id).await?;
        output.bullet(&format!(
            "{} accepted: {}",
            friend.name,
            social.friend_status(&alice.id, &friend.id).await?
        ));
    }

    output.heading("Posts");
    let content = network.content();
    content.create_post(&bob.id, "First post from Bob", None).await?;
    clock.advance(Duration::minutes(30));
    content.create_post(&carol.id, "Carol checking in", None).await?;
    clock.advance(Duration::minutes(30));
    let hello = content.create_post(&alice.id, "Hello from Alice", None).await?;
    clock.advance(Duration::minutes(5));
    let reply = content.create_post(&bob.id, "Welcome!", Some(&hello.id)).await?;
    clock.advance(Duration::minutes(1));
    content.create_post(&carol.id, "Seconded", Some(&reply.id)).await?;
    let like = content.toggle_like(&hello.id, &bob.id).await?;
    output.indented(theme::HEART, &format!("Bob liked Alice's post ({} like)", like.likes));

    output.heading("Alice's timeline");
    let now = clock.now();
    let timeline = network.timeline().build_timeline(&alice.id).await?;
    output.display(&post_rows(&network, &timeline, now).await?)?;

    output.heading("Cascade delete");
    let deleted = content.delete_post(&alice.id, &hello.id).await?;
    output.success(&format!("Deleting Alice's post removed {} posts", deleted.len()));
    for id in &deleted {
        output.verbose(id);
    }
    let timeline = network.timeline().build_timeline(&alice.id).await?;
    output.display(&post_rows(&network, &timeline, clock.now()).await?)?;

    Ok(())
}

async fn register(
    network: &SocialNetwork<MemoryStore>,
    output: &OutputManager,
    name: &str,
    email: &str,
) -> Result<User> {
    let password = format!("{}-password", name.to_lowercase());
    let user = network
        .identity()
        .register(&Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.clone(),
            confirm_password: password,
        })
        .await?;
    output.bullet(&format!("{} ({})", user.name, user.id));
    Ok(user)
}

use anyhow::Result;
use clap::Args;

use friendgraph::{GraphError, GraphStore, ImageStore, Registration, SocialNetwork};

use crate::examples::ExampleGroup;
use crate::output::{OutputManager, UserRow};

pub const REGISTER_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Create an account",
    commands: &[
        "friendgraph register --name Alice --email alice@example.com --password 'hunter22!'",
        "friendgraph register --name Bob --email bob@example.com --password s3cretpw --confirm s3cretpw",
    ],
}];

pub const LOGIN_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Check credentials",
    commands: &["friendgraph login --email alice@example.com --password 'hunter22!'"],
}];

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name (at least three characters)
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm: Option<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

pub async fn handle_register<S, M>(args: RegisterArgs, network: &SocialNetwork<S, M>, output: &OutputManager) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let registration = Registration {
        confirm_password: args.confirm.unwrap_or_else(|| args.password.clone()),
        name: args.name,
        email: args.email,
        password: args.password,
    };
    let user = network.identity().register(&registration).await?;
    output.success(&format!("Registered {} ({})", user.name, user.id));
    output.display(&[UserRow::from(&user)])
}

pub async fn handle_login<S, M>(args: LoginArgs, network: &SocialNetwork<S, M>, output: &OutputManager) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    match network.identity().verify_credentials(&args.email, &args.password).await {
        Ok(user) => {
            output.success(&format!("Welcome back, {}", user.name));
            output.key_value("Use", &format!("--as {}", user.id));
            Ok(())
        }
        // unknown email and wrong password report the same error
        Err(GraphError::NotFound { .. } | GraphError::InvalidCredentials) => {
            Err(GraphError::InvalidCredentials.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn handle_show_user<S, M>(user_id: &str, network: &SocialNetwork<S, M>, output: &OutputManager) -> Result<()>
where
    S: GraphStore,
    M: ImageStore,
{
    let user = network.identity().get_user(user_id).await?;
    output.display(&[UserRow::from(&user)])
}

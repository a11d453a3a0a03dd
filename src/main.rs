use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsroom::app::AppContext;
use newsroom::cli::{commands, Cli, Commands, FavoritesAction};
use newsroom::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Headlines {
            country,
            category,
            pick,
        } => {
            commands::headlines(&ctx, country.as_deref(), category, pick).await?;
        }
        Commands::Categories => commands::categories(),
        Commands::Search { query, pick } => {
            commands::search(&ctx, &query, pick).await?;
        }
        Commands::Watch => {
            commands::watch(&ctx).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&ctx)?,
            FavoritesAction::Show { title } => commands::show_favorite(&ctx, &title)?,
        },
        Commands::SignUp {
            email,
            password,
            confirm,
        } => {
            commands::sign_up(&ctx, &email, &password, &confirm).await?;
        }
        Commands::SignIn { email, password } => {
            commands::sign_in(&ctx, &email, &password).await?;
        }
        Commands::SignOut => {
            commands::sign_out(&ctx).await?;
        }
        Commands::ResetPassword { email } => {
            commands::reset_password(&ctx, &email).await?;
        }
    }

    Ok(())
}

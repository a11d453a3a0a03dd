pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::Category;

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(about = "Read the news from your terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show top headlines
    Headlines {
        /// Two-letter country code (e.g. "us", "in")
        #[arg(long)]
        country: Option<String>,
        /// Restrict to one category
        #[arg(long)]
        category: Option<Category>,
        #[command(flatten)]
        pick: Pick,
    },
    /// List the available categories
    Categories,
    /// Search articles
    Search {
        query: String,
        #[command(flatten)]
        pick: Pick,
    },
    /// Search as you type: each stdin line is the current search box text
    Watch,
    /// Saved articles of the signed-in user
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Create an account
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password again
        #[arg(long)]
        confirm: String,
    },
    /// Sign in to an existing account
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    SignOut,
    /// Send a password reset email
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List saved articles
    List,
    /// Show one saved article
    Show {
        /// Title the article was saved under
        title: String,
    },
}

/// Act on one article of a listing, numbered from 1.
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct Pick {
    /// Save the Nth result to favorites
    #[arg(long, value_name = "N")]
    pub save: Option<usize>,
    /// Open the Nth result in the browser
    #[arg(long, value_name = "N")]
    pub open: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headlines_with_category() {
        let cli = Cli::try_parse_from([
            "newsroom", "headlines", "--country", "us", "--category", "Sports", "--save", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Headlines {
                country,
                category,
                pick,
            } => {
                assert_eq!(country.as_deref(), Some("us"));
                assert_eq!(category, Some(Category::Sports));
                assert_eq!(pick.save, Some(2));
                assert_eq!(pick.open, None);
            }
            _ => panic!("expected headlines"),
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Cli::try_parse_from(["newsroom", "headlines", "--category", "weather"]).is_err());
    }

    #[test]
    fn test_parse_favorites_show() {
        let cli = Cli::try_parse_from(["newsroom", "favorites", "show", "Some title"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Favorites {
                action: FavoritesAction::Show { title }
            } if title == "Some title"
        ));
    }

    #[test]
    fn test_sign_up_requires_confirmation() {
        assert!(Cli::try_parse_from([
            "newsroom", "sign-up", "--email", "a@b.c", "--password", "pw",
        ])
        .is_err());
    }
}

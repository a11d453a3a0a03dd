use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;

use crate::app::{AppContext, NewsError, Result};
use crate::cli::Pick;
use crate::domain::{Article, Category, FetchState};

const EMPTY_MESSAGE: &str = "No articles found";

pub async fn headlines(
    ctx: &AppContext,
    country: Option<&str>,
    category: Option<Category>,
    pick: Pick,
) -> Result<()> {
    let controller = ctx.fetch_controller();

    let (heading, handle) = match (country, category) {
        (None, Some(category)) => (category.heading(), controller.load_category(category)),
        (None, None) => ("Top Headlines".to_string(), controller.load_default_headlines()),
        (Some(country), category) => (
            category.map_or_else(|| "Top Headlines".to_string(), Category::heading),
            controller.load_top_headlines(Some(country), category),
        ),
    };
    wait(handle).await?;

    show_results(ctx, &controller.state(), &heading, pick)
}

pub fn categories() {
    for category in Category::ALL {
        println!("{:<14} {}", category.as_str(), category.heading());
    }
}

pub async fn search(ctx: &AppContext, query: &str, pick: Pick) -> Result<()> {
    let controller = ctx.fetch_controller();

    let Some(handle) = controller.search(query) else {
        println!("Enter a search term");
        return Ok(());
    };
    wait(handle).await?;

    show_results(ctx, &controller.state(), &format!("Results for \"{}\"", query.trim()), pick)
}

/// Treat every stdin line as the search box contents and print results as they settle.
pub async fn watch(ctx: &AppContext) -> Result<()> {
    let controller = ctx.fetch_controller();
    let mut events = controller.subscribe();
    let (debouncer, forwarder) = ctx.search_debouncer(controller.clone());
    let mut debouncer = Some(debouncer);

    println!(
        "Type a search query; results appear after {}s without typing. Ctrl-D to quit.",
        ctx.config.search.debounce().as_secs()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(state) => print_state(&state, "Results"),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if debouncer.is_some() => match line? {
                Some(text) => {
                    if let Some(debouncer) = &debouncer {
                        debouncer.input(text);
                    }
                }
                // Closing the input lets a pending query settle
                None => debouncer = None,
            },
            _ = tokio::time::sleep(Duration::from_millis(200)), if debouncer.is_none() => {
                if forwarder.is_finished() && !controller.state().is_loading() {
                    // The final state may have landed after the last recv
                    for state in drain_pending(&mut events) {
                        print_state(&state, "Results");
                    }
                    break;
                }
            }
        }
    }

    Ok(())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let state = ctx.favorites().fetch_articles();

    if let Some(error) = state.error {
        return Err(NewsError::Other(error));
    }
    if state.articles.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }

    print_list("Favorites", &state.articles);
    Ok(())
}

pub fn show_favorite(ctx: &AppContext, title: &str) -> Result<()> {
    if ctx.auth.current_user().is_none() {
        return Err(NewsError::NotSignedIn);
    }

    match ctx.favorites().fetch_specific_article(title) {
        Some(article) => print_detail(&article),
        None => println!("No favorite titled \"{}\"", title),
    }
    Ok(())
}

pub async fn sign_up(ctx: &AppContext, email: &str, password: &str, confirm: &str) -> Result<()> {
    let uid = ctx.auth.sign_up(email, password, confirm).await?;
    println!("Account created ({})", uid);
    Ok(())
}

pub async fn sign_in(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    ctx.auth.sign_in(email, password).await?;
    println!("Signed in as {}", email);
    Ok(())
}

pub async fn sign_out(ctx: &AppContext) -> Result<()> {
    ctx.auth.sign_out().await?;
    println!("Signed out");
    Ok(())
}

pub async fn reset_password(ctx: &AppContext, email: &str) -> Result<()> {
    ctx.auth.reset_password(email).await?;
    println!("Password reset email sent to {}", email);
    Ok(())
}

async fn wait(handle: JoinHandle<()>) -> Result<()> {
    handle
        .await
        .map_err(|e| NewsError::Other(format!("Fetch task failed: {}", e)))
}

fn drain_pending(events: &mut broadcast::Receiver<FetchState>) -> Vec<FetchState> {
    let mut pending = Vec::new();
    loop {
        match events.try_recv() {
            Ok(state) => pending.push(state),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => return pending,
        }
    }
}

fn show_results(ctx: &AppContext, state: &FetchState, heading: &str, pick: Pick) -> Result<()> {
    let articles = match state {
        FetchState::Success(articles) => articles,
        FetchState::Failure(message) => return Err(NewsError::Other(message.clone())),
        FetchState::Idle | FetchState::Loading => return Ok(()),
    };

    if articles.is_empty() {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    }
    print_list(heading, articles);

    if let Some(n) = pick.save {
        let article = nth(articles, n)?;
        if ctx.favorites().add_article(article)? {
            println!("Saved to favorites: {}", article.display_title());
        } else {
            println!("Sign in to save favorites");
        }
    }

    if let Some(n) = pick.open {
        let article = nth(articles, n)?;
        println!("Opening {}", article.url);
        open::that(&article.url)?;
    }

    Ok(())
}

fn nth(articles: &[Article], n: usize) -> Result<&Article> {
    n.checked_sub(1)
        .and_then(|i| articles.get(i))
        .ok_or_else(|| NewsError::Other(format!("No article #{} (have {})", n, articles.len())))
}

fn print_state(state: &FetchState, heading: &str) {
    match state {
        FetchState::Idle => {}
        FetchState::Loading => println!("Searching..."),
        FetchState::Success(articles) if articles.is_empty() => println!("{}", EMPTY_MESSAGE),
        FetchState::Success(articles) => print_list(heading, articles),
        FetchState::Failure(message) => eprintln!("{}", message),
    }
}

fn print_list(heading: &str, articles: &[Article]) {
    println!("{}", heading);
    for (i, article) in articles.iter().enumerate() {
        println!("{:>3}. {}", i + 1, article.display_title());
        if !article.source.name.is_empty() {
            println!("     {} {}", article.source.name, article.published_at);
        }
    }
}

fn print_detail(article: &Article) {
    println!("{}", article.display_title());
    if !article.source.name.is_empty() {
        println!("{}", article.source.name);
    }
    if !article.published_at.is_empty() {
        println!("Published: {}", article.published_at);
    }
    println!();
    println!("{}", article.display_content());
    println!();
    println!("{}", article.url);
}

use anyhow::Result;
use tracing::warn;

use flame_client::deck::{DeckEvent, DeckKey};
use flame_client::feed::{FeedState, FeedView};
use flame_client::matches::MatchesView;
use flame_client::{AppContext, AppContextInner, ViewScope};

use super::Input;
use crate::render;

const FEED_HELP: &str = "[l]ike  [p]ass  [n]ext page  [b]ack page  <number> jump  [q]uit";

pub async fn feed(ctx: AppContext) -> Result<()> {
    let scope = ViewScope::new();
    let mut view = FeedView::new(ctx, scope.clone());
    let mut input = Input::new();

    view.load().await?;
    loop {
        match view.state() {
            FeedState::Redirect(route) => {
                println!("Your profile isn't finished yet.");
                println!("{}", render::route_hint(route));
                break;
            }
            FeedState::Empty => {
                println!("No one new nearby. Check back later.");
                break;
            }
            FeedState::Loading => {}
            FeedState::Cards => {
                println!();
                print!("{}", render::card(view.deck()));
                println!("{FEED_HELP}");
            }
        }

        let line = tokio::select! {
            line = input.line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let events: Vec<DeckEvent> = match line.as_str() {
            "q" | "quit" => break,
            "l" | "like" => view.deck_mut().key(DeckKey::Right).await,
            "p" | "pass" => view.deck_mut().key(DeckKey::Left).await,
            "n" | "" => view.deck_mut().key(DeckKey::Down).await,
            "b" => view.deck_mut().key(DeckKey::Up).await,
            other => {
                match other.parse::<usize>() {
                    Ok(n) if n > 0 => view.deck_mut().select_page(n - 1),
                    _ => println!("{FEED_HELP}"),
                }
                Vec::new()
            }
        };

        for event in &events {
            if let DeckEvent::Swiped { decision, .. } = event {
                println!("{}", if decision.liked() { "♥ Liked" } else { "✗ Passed" });
            }
        }
        if let Err(e) = view.handle(&events).await {
            warn!("Could not load more profiles: {}", e);
            println!("  ✗ {e}");
        }
    }

    scope.teardown();
    Ok(())
}

pub async fn matches(ctx: &AppContextInner) -> Result<()> {
    let Some(view) = MatchesView::load(ctx, ViewScope::new()).await? else {
        return Ok(());
    };
    if view.is_empty() {
        println!("No matches yet. Keep swiping!");
        return Ok(());
    }
    for row in view.summaries() {
        println!("{}", render::match_row(&row));
    }
    Ok(())
}

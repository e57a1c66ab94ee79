use std::sync::Arc;

use tracing::{debug, info};

use flame_types::api::FeedQuery;

use crate::context::{AppContext, Route};
use crate::deck::{DeckBackend, DeckEvent, RemoteDeck, SwipeDeck};
use crate::error::Result;
use crate::scope::ViewScope;

pub const ONBOARDING_REQUIRED: &str = "ONBOARDING_REQUIRED";

/// What the feed screen is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Cards,
    /// A freshly loaded batch was empty.
    Empty,
    /// The server wants onboarding finished first.
    Redirect(Route),
}

/// Discovery feed: fetches batches and hands them to the deck.
pub struct FeedView {
    ctx: AppContext,
    deck: SwipeDeck,
    state: FeedState,
    scope: ViewScope,
}

impl FeedView {
    pub fn new(ctx: AppContext, scope: ViewScope) -> Self {
        let backend: Arc<dyn DeckBackend> = Arc::new(RemoteDeck::new(ctx.clone()));
        Self::with_backend(ctx, backend, scope)
    }

    pub fn with_backend(ctx: AppContext, backend: Arc<dyn DeckBackend>, scope: ViewScope) -> Self {
        let deck = SwipeDeck::new(ctx.config.deck, backend, scope.child());
        Self {
            ctx,
            deck,
            state: FeedState::Loading,
            scope,
        }
    }

    pub fn query(&self) -> FeedQuery {
        FeedQuery {
            max_km: Some(self.ctx.config.feed_max_km),
            limit: self.ctx.config.feed_limit,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn deck(&self) -> &SwipeDeck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut SwipeDeck {
        &mut self.deck
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch a fresh batch. An empty batch shows the empty state and does
    /// not trigger another load.
    pub async fn load(&mut self) -> Result<&FeedState> {
        let token = self.ctx.require_token()?;
        self.state = FeedState::Loading;

        let query = self.query();
        let Some(result) = self.scope.guard(self.ctx.api.feed(&token, query)).await else {
            return Ok(&self.state);
        };

        let cards = match result {
            Ok(cards) => cards,
            Err(e) if e.is_server_error(ONBOARDING_REQUIRED) => {
                info!("Feed needs onboarding first");
                self.state = FeedState::Redirect(Route::Profile);
                return Ok(&self.state);
            }
            Err(e) => return Err(e),
        };

        info!("Feed batch of {}", cards.len());
        self.state = if cards.is_empty() {
            FeedState::Empty
        } else {
            FeedState::Cards
        };
        // Exhausted from an empty batch is covered by `FeedState::Empty`
        self.deck.load(cards).await;
        Ok(&self.state)
    }

    /// React to deck events: exhaustion of a non-empty batch pulls the next one.
    pub async fn handle(&mut self, events: &[DeckEvent]) -> Result<()> {
        if self.state == FeedState::Cards && events.contains(&DeckEvent::Exhausted) {
            debug!("Deck exhausted, reloading feed");
            self.load().await?;
        }
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use flame_types::models::{Candidate, Section};

use crate::config::DeckConfig;
use crate::context::AppContext;
use crate::deck::gesture::{Decision, DeckKey, DragOutcome, DragRelease, WheelGate, tilt_degrees};
use crate::deck::pages::{Page, build_pages};
use crate::error::Result;
use crate::scope::ViewScope;

/// Server calls the deck makes on its own.
#[async_trait]
pub trait DeckBackend: Send + Sync {
    async fn report_swipe(&self, candidate_id: &str, liked: bool) -> Result<()>;
    async fn fetch_sections(&self, candidate_id: &str) -> Result<Vec<Section>>;
}

/// Backend that talks to the real API with the current session token.
pub struct RemoteDeck {
    ctx: AppContext,
}

impl RemoteDeck {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl DeckBackend for RemoteDeck {
    async fn report_swipe(&self, candidate_id: &str, liked: bool) -> Result<()> {
        let token = self.ctx.require_token()?;
        self.ctx.api.swipe(&token, candidate_id, liked).await
    }

    async fn fetch_sections(&self, candidate_id: &str) -> Result<Vec<Section>> {
        let token = self.ctx.require_token()?;
        self.ctx.api.sections(&token, candidate_id).await
    }
}

/// Something the owner of the deck should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    Swiped {
        candidate_id: String,
        decision: Decision,
    },
    /// The last card of the batch has been decided.
    Exhausted,
    /// A drag was released without enough force and the card returned home.
    SnappedBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageDirection {
    #[default]
    Forward,
    Backward,
}

/// Card stack with per-card paging.
pub struct SwipeDeck {
    cfg: DeckConfig,
    backend: Arc<dyn DeckBackend>,
    scope: ViewScope,
    cards: Vec<Candidate>,
    position: usize,
    page: usize,
    direction: PageDirection,
    drag_offset: f32,
    sections: HashMap<String, Vec<Section>>,
    wheel: WheelGate,
    exhausted: bool,
}

impl SwipeDeck {
    pub fn new(cfg: DeckConfig, backend: Arc<dyn DeckBackend>, scope: ViewScope) -> Self {
        Self {
            wheel: WheelGate::new(&cfg),
            cfg,
            backend,
            scope,
            cards: Vec::new(),
            position: 0,
            page: 0,
            direction: PageDirection::Forward,
            drag_offset: 0.0,
            sections: HashMap::new(),
            exhausted: false,
        }
    }

    /// Replace the batch. An empty batch is exhausted straight away.
    pub async fn load(&mut self, cards: Vec<Candidate>) -> Vec<DeckEvent> {
        debug!("Deck loaded with {} cards", cards.len());
        self.cards = cards;
        self.position = 0;
        self.page = 0;
        self.direction = PageDirection::Forward;
        self.drag_offset = 0.0;
        self.exhausted = false;

        let mut events = Vec::new();
        self.check_exhausted(&mut events);
        self.ensure_sections().await;
        events
    }

    // -- Read side --

    pub fn current(&self) -> Option<&Candidate> {
        self.cards.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn direction(&self) -> PageDirection {
        self.direction
    }

    pub fn drag_offset(&self) -> f32 {
        self.drag_offset
    }

    pub fn tilt(&self) -> f32 {
        tilt_degrees(self.drag_offset, &self.cfg)
    }

    /// Cached sections for a candidate, sorted by order.
    pub fn sections_for(&self, candidate_id: &str) -> &[Section] {
        self.sections
            .get(candidate_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pages(&self) -> Vec<Page> {
        match self.current() {
            Some(c) => build_pages(c, self.sections_for(&c.id)),
            None => Vec::new(),
        }
    }

    pub fn current_page(&self) -> Option<Page> {
        self.pages().get(self.page).copied()
    }

    // -- Paging --

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Jump to a page, e.g. from a progress dot.
    pub fn select_page(&mut self, index: usize) {
        self.go_to_page(index);
    }

    pub fn wheel(&mut self, delta_y: f32, now: Instant) {
        match self.wheel.accept(delta_y, now) {
            Some(1) => self.next_page(),
            Some(_) => self.prev_page(),
            None => {}
        }
    }

    fn go_to_page(&mut self, target: usize) {
        let last = self.pages().len().saturating_sub(1);
        let target = target.min(last);
        if target != self.page {
            self.direction = if target > self.page {
                PageDirection::Forward
            } else {
                PageDirection::Backward
            };
            self.page = target;
        }
    }

    fn clamp_page(&mut self) {
        let last = self.pages().len().saturating_sub(1);
        self.page = self.page.min(last);
    }

    // -- Decisions --

    pub async fn key(&mut self, key: DeckKey) -> Vec<DeckEvent> {
        match key {
            DeckKey::Left => self.decide(Decision::Pass).await,
            DeckKey::Right => self.decide(Decision::Like).await,
            DeckKey::Up => {
                self.prev_page();
                Vec::new()
            }
            DeckKey::Down => {
                self.next_page();
                Vec::new()
            }
        }
    }

    pub fn drag_to(&mut self, offset_x: f32) {
        if self.current().is_some() {
            self.drag_offset = offset_x;
        }
    }

    pub async fn release_drag(&mut self, release: DragRelease) -> Vec<DeckEvent> {
        match release.classify(self.cfg.swipe_threshold) {
            DragOutcome::Decide(decision) => self.decide(decision).await,
            DragOutcome::SnapBack => {
                self.drag_offset = 0.0;
                vec![DeckEvent::SnappedBack]
            }
        }
    }

    /// Like or pass the current card and move to the next one. Reporting is
    /// best-effort: a failed report is logged and the deck moves on anyway.
    pub async fn decide(&mut self, decision: Decision) -> Vec<DeckEvent> {
        let Some(candidate_id) = self.current().map(|c| c.id.clone()) else {
            return Vec::new();
        };

        self.position += 1;
        self.page = 0;
        self.direction = PageDirection::Forward;
        self.drag_offset = 0.0;

        let mut events = vec![DeckEvent::Swiped {
            candidate_id: candidate_id.clone(),
            decision,
        }];
        self.check_exhausted(&mut events);

        let report = self.backend.report_swipe(&candidate_id, decision.liked());
        if let Some(Err(e)) = self.scope.guard(report).await {
            warn!("Swipe on {} not recorded: {}", candidate_id, e);
        }

        self.ensure_sections().await;
        events
    }

    fn check_exhausted(&mut self, events: &mut Vec<DeckEvent>) {
        if self.position >= self.cards.len() && !self.exhausted {
            self.exhausted = true;
            events.push(DeckEvent::Exhausted);
        }
    }

    // -- Sections --

    /// Fetch the current card's sections the first time it is shown.
    pub async fn ensure_sections(&mut self) {
        let Some(id) = self.current().map(|c| c.id.clone()) else {
            return;
        };
        if self.sections.contains_key(&id) {
            return;
        }

        let fetched = match self.scope.guard(self.backend.fetch_sections(&id)).await {
            Some(Ok(sections)) => sections,
            Some(Err(e)) => {
                warn!("Sections for {} unavailable: {}", id, e);
                Vec::new()
            }
            None => return,
        };
        self.store_sections(id, fetched);
    }

    pub fn store_sections(&mut self, candidate_id: String, mut sections: Vec<Section>) {
        sections.sort_by_key(|s| s.order);
        self.sections.insert(candidate_id, sections);
        self.clamp_page();
    }
}

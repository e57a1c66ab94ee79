use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use flame_types::models::{Counterpart, Me, Message, Photo};

use crate::context::AppContextInner;
use crate::error::Result;
use crate::profile::Notice;
use crate::realtime::{RealtimeConnection, realtime_url};
use crate::scope::ViewScope;

/// Ordered message history that never holds the same id twice.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    seen: HashSet<String>,
}

impl MessageLog {
    pub fn new(history: Vec<Message>) -> Self {
        let mut log = Self::default();
        for m in history {
            log.push(m);
        }
        log
    }

    /// Append unless a message with the same id is already present.
    pub fn push(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Avatars go on the last message of each run by the same sender.
    pub fn show_avatar(&self, index: usize) -> bool {
        let Some(current) = self.messages.get(index) else {
            return false;
        };
        match self.messages.get(index + 1) {
            Some(next) => next.sender_id != current.sender_id,
            None => true,
        }
    }
}

/// A single conversation, live while it is open.
pub struct ChatView {
    match_id: String,
    me: Me,
    counterpart: Option<Counterpart>,
    log: MessageLog,
    scroll_to_bottom: bool,
    notice: Option<Notice>,
    realtime: Option<RealtimeConnection>,
    scope: ViewScope,
}

impl ChatView {
    /// Load history, the counterpart and our own record together, then join
    /// the match room. A realtime failure leaves the chat usable over HTTP.
    pub async fn open(ctx: &AppContextInner, match_id: &str, scope: ViewScope) -> Result<Option<Self>> {
        let token = ctx.require_token()?;

        let load = async {
            tokio::try_join!(
                ctx.api.messages(&token, match_id),
                ctx.api.matches(&token),
                ctx.api.me(&token),
            )
        };
        let Some(loaded) = scope.guard(load).await else {
            return Ok(None);
        };
        let (history, matches, me) = loaded?;

        let counterpart = matches
            .into_iter()
            .find(|m| m.id == match_id)
            .and_then(|m| m.counterpart);

        let realtime = match realtime_url(&ctx.config) {
            Ok(url) => match scope
                .guard(RealtimeConnection::connect(&url, &token, match_id, &scope))
                .await
            {
                Some(Ok(conn)) => Some(conn),
                Some(Err(e)) => {
                    warn!("Realtime unavailable for {}: {}", match_id, e);
                    None
                }
                None => return Ok(None),
            },
            Err(e) => {
                warn!("No realtime endpoint: {}", e);
                None
            }
        };

        info!("Opened chat {} ({} messages)", match_id, history.len());
        Ok(Some(Self {
            match_id: match_id.to_string(),
            me,
            counterpart,
            log: MessageLog::new(history),
            scroll_to_bottom: true,
            notice: None,
            realtime,
            scope,
        }))
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn counterpart(&self) -> Option<&Counterpart> {
        self.counterpart.as_ref()
    }

    pub fn title(&self) -> String {
        self.counterpart
            .as_ref()
            .map(Counterpart::display_name)
            .unwrap_or_else(|| "Chat".to_string())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn is_live(&self) -> bool {
        self.realtime.is_some()
    }

    pub fn is_mine(&self, message: &Message) -> bool {
        message.sender_id == self.me.id
    }

    pub fn show_avatar(&self, index: usize) -> bool {
        self.log.show_avatar(index)
    }

    pub fn avatar_for(&self, message: &Message) -> Option<&Photo> {
        if self.is_mine(message) {
            self.me.primary_photo()
        } else {
            self.counterpart.as_ref().and_then(Counterpart::avatar)
        }
    }

    /// Pushed messages from the room. `None` when realtime is down or the
    /// receiver was already taken.
    pub fn take_incoming(&mut self) -> Option<UnboundedReceiver<Message>> {
        self.realtime.as_mut().and_then(RealtimeConnection::take_incoming)
    }

    /// Fold in a pushed message. Echoes of messages we already have are dropped.
    pub fn receive(&mut self, message: Message) -> bool {
        let added = self.log.push(message);
        if added {
            self.scroll_to_bottom = true;
        }
        added
    }

    /// Returns and clears a pending scroll-to-bottom request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    /// Post a message. Blank input is ignored and returns `Ok(false)`.
    pub async fn send(&mut self, ctx: &AppContextInner, content: &str) -> Result<bool> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(false);
        }
        let token = ctx.require_token()?;
        self.notice = None;

        let Some(result) = self
            .scope
            .guard(ctx.api.send_message(&token, &self.match_id, content))
            .await
        else {
            return Ok(false);
        };

        match result {
            Ok(sent) => {
                self.receive(sent);
                Ok(true)
            }
            Err(e) => {
                warn!("Send failed in {}: {}", self.match_id, e);
                self.notice = Some(Notice::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Leave the room and end the view.
    pub async fn close(mut self) {
        if let Some(conn) = self.realtime.take() {
            conn.close().await;
        }
        self.scope.teardown();
    }
}

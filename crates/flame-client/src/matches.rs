use flame_types::models::{Match, Message, Photo};

use crate::context::AppContextInner;
use crate::error::Result;
use crate::scope::ViewScope;

/// One row of the matches list.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub match_id: String,
    pub name: String,
    pub avatar: Option<Photo>,
    pub last_message: Option<Message>,
}

impl MatchSummary {
    pub fn from_match(m: &Match) -> Self {
        let (name, avatar) = match &m.counterpart {
            Some(c) => (c.display_name(), c.avatar().cloned()),
            None => ("Match".to_string(), None),
        };
        Self {
            match_id: m.id.clone(),
            name,
            avatar,
            last_message: m.messages.first().cloned(),
        }
    }

    /// Text for the preview line under the name.
    pub fn preview(&self) -> &str {
        self.last_message
            .as_ref()
            .map(|m| m.content.as_str())
            .unwrap_or("Say hi!")
    }
}

/// The list of matches, in the order the server returned them.
pub struct MatchesView {
    matches: Vec<Match>,
    scope: ViewScope,
}

impl MatchesView {
    pub async fn load(ctx: &AppContextInner, scope: ViewScope) -> Result<Option<Self>> {
        let token = ctx.require_token()?;
        let Some(matches) = scope.guard(ctx.api.matches(&token)).await else {
            return Ok(None);
        };
        Ok(Some(Self {
            matches: matches?,
            scope,
        }))
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn summaries(&self) -> Vec<MatchSummary> {
        self.matches.iter().map(MatchSummary::from_match).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_uses_counterpart_and_latest_message() {
        let m: Match = serde_json::from_value(json!({
            "id": "m1",
            "userAId": "u1",
            "userBId": "u2",
            "counterpart": {
                "id": "u2",
                "email": "bea@example.com",
                "photos": [
                    { "id": "p2", "url": "/b.jpg", "order": 2 },
                    { "id": "p1", "url": "/a.jpg", "order": 0 }
                ]
            },
            "messages": [
                { "id": "x2", "content": "newest", "createdAt": "2024-05-01T10:00:00Z", "senderId": "u2" },
                { "id": "x1", "content": "older", "createdAt": "2024-05-01T09:00:00Z", "senderId": "u1" }
            ]
        }))
        .unwrap();

        let s = MatchSummary::from_match(&m);
        assert_eq!(s.name, "bea");
        assert_eq!(s.avatar.as_ref().map(|p| p.url.as_str()), Some("/a.jpg"));
        assert_eq!(s.preview(), "newest");
    }

    #[test]
    fn summary_without_messages_or_counterpart() {
        let m: Match = serde_json::from_value(json!({ "id": "m2" })).unwrap();
        let s = MatchSummary::from_match(&m);
        assert_eq!(s.name, "Match");
        assert!(s.avatar.is_none());
        assert_eq!(s.preview(), "Say hi!");
    }
}

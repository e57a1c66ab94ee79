use tracing::{info, warn};

use crate::context::{AppContextInner, Route};
use crate::error::Result;
use crate::profile::{Notice, ProfileEditor, RequiredField};

/// Steps of the first-run wizard, one required field each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Photo,
    Institution,
    Bio,
    Interests,
}

impl OnboardingStep {
    pub const ORDER: [OnboardingStep; 4] = [
        OnboardingStep::Photo,
        OnboardingStep::Institution,
        OnboardingStep::Bio,
        OnboardingStep::Interests,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Photo => 0,
            Self::Institution => 1,
            Self::Bio => 2,
            Self::Interests => 3,
        }
    }

    pub fn field(self) -> RequiredField {
        match self {
            Self::Photo => RequiredField::Photo,
            Self::Institution => RequiredField::Institution,
            Self::Bio => RequiredField::Bio,
            Self::Interests => RequiredField::Interests,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Photo => "Add a photo",
            Self::Institution => "Where do you study or work?",
            Self::Bio => "About you",
            Self::Interests => "Your interests",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }
}

/// Result of pressing "Continue"/"Finish".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The current step's field is not filled in yet.
    Blocked,
    Moved(OnboardingStep),
    Finished(Route),
    /// The view was torn down while the call was in flight.
    Dismissed,
}

pub struct OnboardingFlow {
    editor: ProfileEditor,
    step: OnboardingStep,
}

impl OnboardingFlow {
    pub fn new(editor: ProfileEditor) -> Self {
        Self {
            editor,
            step: OnboardingStep::Photo,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ProfileEditor {
        &mut self.editor
    }

    pub fn can_advance(&self) -> bool {
        self.editor.completion().checks.get(self.step.field())
    }

    pub fn back(&mut self) -> OnboardingStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Persist progress, then move forward. The last step also marks
    /// onboarding complete and routes to the feed when the server agrees.
    pub async fn advance(&mut self, ctx: &AppContextInner) -> Result<Advance> {
        if !self.can_advance() {
            return Ok(Advance::Blocked);
        }

        if self.editor.save(ctx).await?.is_none() {
            return Ok(Advance::Dismissed);
        }

        if let Some(next) = self.step.next() {
            self.step = next;
            return Ok(Advance::Moved(next));
        }

        let token = ctx.require_token()?;
        let profile = self.editor.profile().clone();
        let Some(result) = self
            .editor
            .scope()
            .guard(ctx.api.complete_onboarding(&token, &profile))
            .await
        else {
            return Ok(Advance::Dismissed);
        };

        match result {
            Ok(done) if done.ok => {
                info!("Onboarding complete");
                Ok(Advance::Finished(Route::Feed))
            }
            Ok(_) => Ok(Advance::Blocked),
            Err(e) => {
                warn!("Could not complete onboarding: {}", e);
                Err(e)
            }
        }
    }

    /// Inline message for the current step, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.editor.notice()
    }
}

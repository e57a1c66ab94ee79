use tracing::{info, warn};

use flame_types::models::{Me, Photo, Profile, non_blank};

use crate::context::AppContextInner;
use crate::error::{ClientError, Result};
use crate::scope::ViewScope;

/// Interests offered before the user has typed any of their own.
pub const DEFAULT_INTERESTS: [&str; 12] = [
    "Music",
    "Movies",
    "Gaming",
    "Gym",
    "Cooking",
    "Reading",
    "Hiking",
    "Photography",
    "Travel",
    "Tech",
    "Art",
    "Pets",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Photo,
    Institution,
    Bio,
    Interests,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::Photo,
        RequiredField::Institution,
        RequiredField::Bio,
        RequiredField::Interests,
    ];

    /// Inline hint shown next to the field while it is unsatisfied.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Photo => "Add at least one photo",
            Self::Institution => "Tell people where you study or work",
            Self::Bio => "Write a short bio",
            Self::Interests => "Pick at least one interest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionChecks {
    pub photo: bool,
    pub institution: bool,
    pub bio: bool,
    pub interests: bool,
}

impl CompletionChecks {
    pub fn get(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::Photo => self.photo,
            RequiredField::Institution => self.institution,
            RequiredField::Bio => self.bio,
            RequiredField::Interests => self.interests,
        }
    }
}

/// How many required fields are filled in. Pure in (profile, photo count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub done: usize,
    pub total: usize,
    pub checks: CompletionChecks,
}

impl Completion {
    pub fn evaluate(profile: &Profile, photo_count: usize) -> Self {
        let checks = CompletionChecks {
            photo: photo_count > 0,
            institution: non_blank(profile.institution.as_deref()).is_some(),
            bio: non_blank(profile.bio.as_deref()).is_some(),
            interests: !profile.interests.is_empty(),
        };
        let done = RequiredField::ALL
            .iter()
            .filter(|f| checks.get(**f))
            .count();
        Self {
            done,
            total: RequiredField::ALL.len(),
            checks,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.done == self.total
    }

    pub fn missing(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|f| !self.checks.get(*f))
            .collect()
    }
}

/// Add `label` if absent, remove it if present. Blank labels are ignored.
/// Order of the remaining interests is preserved; additions go last.
pub fn toggle_interest(interests: &[String], label: &str) -> Vec<String> {
    let label = label.trim();
    if label.is_empty() {
        return interests.to_vec();
    }
    if interests.iter().any(|i| i == label) {
        interests.iter().filter(|i| *i != label).cloned().collect()
    } else {
        let mut next = interests.to_vec();
        next.push(label.to_string());
        next
    }
}

/// The user's own interests first, then the defaults they have not picked.
pub fn interest_choices(selected: &[String]) -> Vec<String> {
    let mut choices = selected.to_vec();
    for label in DEFAULT_INTERESTS {
        if !choices.iter().any(|c| c == label) {
            choices.push(label.to_string());
        }
    }
    choices
}

fn normalize(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Inline status next to a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Every required field is filled in; the caller should move on to the feed.
    ProceedToFeed,
}

/// Working copy of the signed-in user's profile and photos.
pub struct ProfileEditor {
    me: Me,
    notice: Option<Notice>,
    scope: ViewScope,
}

impl ProfileEditor {
    /// Fetch the current user and start editing.
    pub async fn load(ctx: &AppContextInner, scope: ViewScope) -> Result<Option<Self>> {
        let token = ctx.require_token()?;
        let Some(me) = scope.guard(ctx.api.me(&token)).await else {
            return Ok(None);
        };
        Ok(Some(Self::from_me(me?, scope)))
    }

    pub fn from_me(me: Me, scope: ViewScope) -> Self {
        Self {
            me,
            notice: None,
            scope,
        }
    }

    pub fn me(&self) -> &Me {
        &self.me
    }

    pub fn profile(&self) -> &Profile {
        &self.me.profile
    }

    pub fn photos(&self) -> &[Photo] {
        &self.me.photos
    }

    pub fn primary_photo(&self) -> Option<&Photo> {
        self.me.primary_photo()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn completion(&self) -> Completion {
        Completion::evaluate(&self.me.profile, self.me.photos.len())
    }

    // -- Field setters: each replaces exactly one field --

    pub fn set_age(&mut self, age: Option<u32>) {
        self.me.profile.age = age;
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.me.profile.gender = normalize(gender);
    }

    pub fn set_bio(&mut self, bio: &str) {
        self.me.profile.bio = normalize(bio);
    }

    pub fn set_institution(&mut self, institution: &str) {
        self.me.profile.institution = normalize(institution);
    }

    pub fn set_location(&mut self, lat: Option<f64>, lon: Option<f64>) {
        self.me.profile.lat = lat;
        self.me.profile.lon = lon;
    }

    pub fn toggle_interest(&mut self, label: &str) {
        self.me.profile.interests = toggle_interest(&self.me.profile.interests, label);
    }

    pub fn interest_choices(&self) -> Vec<String> {
        interest_choices(&self.me.profile.interests)
    }

    // -- Side effects --

    /// Send the whole profile. Missing fields never block the call; they only
    /// decide whether the caller moves on to the feed afterwards.
    pub async fn save(&mut self, ctx: &AppContextInner) -> Result<Option<SaveOutcome>> {
        let token = ctx.require_token()?;
        self.notice = None;

        let Some(result) = self
            .scope
            .guard(ctx.api.save_profile(&token, &self.me.profile))
            .await
        else {
            return Ok(None);
        };

        match result {
            Ok(()) => {
                self.notice = Some(Notice::Info("Saved".into()));
                let completion = self.completion();
                info!("Profile saved ({}/{})", completion.done, completion.total);
                Ok(Some(if completion.is_complete() {
                    SaveOutcome::ProceedToFeed
                } else {
                    SaveOutcome::Saved
                }))
            }
            Err(e) => {
                warn!("Profile save failed: {}", e);
                self.notice = Some(Notice::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Upload a photo, optionally make it primary, then reload the whole
    /// record so the photo list always matches the server.
    pub async fn upload_photo(
        &mut self,
        ctx: &AppContextInner,
        data: Vec<u8>,
        file_name: &str,
        make_primary: bool,
    ) -> Result<()> {
        let token = ctx.require_token()?;
        self.notice = None;

        // the record is reloaded whenever the photo itself was created
        let upload = async {
            let created = ctx.api.upload_photo(&token, data, file_name).await?;
            let primary = if make_primary && !created.id.is_empty() {
                ctx.api.set_primary_photo(&token, &created.id).await
            } else {
                Ok(())
            };
            let fresh = ctx.api.me(&token).await;
            Ok::<_, ClientError>((primary, fresh))
        };

        let Some(result) = self.scope.guard(upload).await else {
            return Ok(());
        };

        let outcome = match result {
            Ok((primary, Ok(fresh))) => {
                self.replace_keeping_edits(fresh);
                primary
            }
            Ok((_, Err(e))) | Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.notice = Some(Notice::Info("Photo uploaded".into()));
                Ok(())
            }
            Err(e) => {
                warn!("Photo upload failed: {}", e);
                self.notice = Some(Notice::Error(upload_error_message(&e)));
                Err(e)
            }
        }
    }

    /// Refetch the user record from the server.
    pub async fn reload(&mut self, ctx: &AppContextInner) -> Result<()> {
        let token = ctx.require_token()?;
        if let Some(me) = self.scope.guard(ctx.api.me(&token)).await {
            self.me = me?;
        }
        Ok(())
    }

    /// Take the server's photos and identity but keep unsaved profile edits.
    fn replace_keeping_edits(&mut self, fresh: Me) {
        let profile = std::mem::take(&mut self.me.profile);
        self.me = Me { profile, ..fresh };
    }
}

fn upload_error_message(e: &ClientError) -> String {
    match e {
        ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
        ClientError::Http { .. } => "Upload failed".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Profile {
        Profile {
            institution: Some("MIT".into()),
            bio: Some("Hello".into()),
            interests: vec!["Music".into()],
            ..Default::default()
        }
    }

    #[test]
    fn completion_counts_each_check() {
        let empty = Completion::evaluate(&Profile::default(), 0);
        assert_eq!((empty.done, empty.total), (0, 4));
        assert_eq!(empty.missing(), RequiredField::ALL.to_vec());

        let full = Completion::evaluate(&filled(), 2);
        assert_eq!(full.done, 4);
        assert!(full.is_complete());
        assert!(full.missing().is_empty());
    }

    #[test]
    fn completion_checks_are_independent() {
        let profile = filled();
        for field in RequiredField::ALL {
            let mut p = profile.clone();
            let mut photos = 1;
            match field {
                RequiredField::Photo => photos = 0,
                RequiredField::Institution => p.institution = Some("   ".into()),
                RequiredField::Bio => p.bio = None,
                RequiredField::Interests => p.interests.clear(),
            }
            let c = Completion::evaluate(&p, photos);
            assert_eq!(c.done, 3, "clearing {field:?}");
            assert_eq!(c.missing(), vec![field]);
        }
    }

    #[test]
    fn completion_grows_as_fields_fill_in() {
        let mut p = Profile::default();
        let mut last = Completion::evaluate(&p, 0).done;

        p.bio = Some("hi".into());
        let now = Completion::evaluate(&p, 0).done;
        assert!(now > last);
        last = now;

        p.interests.push("Art".into());
        let now = Completion::evaluate(&p, 0).done;
        assert!(now > last);
        last = now;

        let now = Completion::evaluate(&p, 1).done;
        assert!(now > last);
    }

    #[test]
    fn toggle_twice_restores_list() {
        let start = vec!["Music".to_string(), "Art".to_string()];
        let once = toggle_interest(&start, "Travel");
        assert_eq!(once, vec!["Music", "Art", "Travel"]);
        assert_eq!(toggle_interest(&once, "Travel"), start);

        let removed = toggle_interest(&start, "Music");
        assert_eq!(removed, vec!["Art"]);
        assert_eq!(toggle_interest(&removed, "Music"), vec!["Art", "Music"]);
    }

    #[test]
    fn toggle_never_duplicates_and_ignores_blank() {
        let start = vec!["Gym".to_string()];
        assert_eq!(toggle_interest(&start, "  "), start);
        let added = toggle_interest(&start, " Hiking ");
        assert_eq!(added, vec!["Gym", "Hiking"]);
        assert_eq!(toggle_interest(&added, "Hiking"), vec!["Gym"]);
    }

    #[test]
    fn choices_put_selected_first_without_duplicates() {
        let choices = interest_choices(&["Knitting".to_string(), "Music".to_string()]);
        assert_eq!(choices[0], "Knitting");
        assert_eq!(choices[1], "Music");
        assert_eq!(choices.iter().filter(|c| *c == "Music").count(), 1);
        assert_eq!(choices.len(), DEFAULT_INTERESTS.len() + 1);
    }

    #[test]
    fn setters_replace_single_fields() {
        let me = Me {
            id: "u1".into(),
            email: "ada@example.com".into(),
            name: None,
            profile: filled(),
            photos: vec![],
        };
        let mut editor = ProfileEditor::from_me(me, ViewScope::new());
        editor.set_bio("");
        assert_eq!(editor.profile().bio, None);
        assert_eq!(editor.profile().institution.as_deref(), Some("MIT"));

        editor.set_gender("Female");
        editor.set_age(Some(29));
        editor.toggle_interest("Music");
        assert_eq!(editor.profile().gender.as_deref(), Some("Female"));
        assert_eq!(editor.profile().age, Some(29));
        assert!(editor.profile().interests.is_empty());
        assert_eq!(editor.completion().done, 1);
    }
}

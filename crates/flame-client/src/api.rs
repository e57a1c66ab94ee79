//! Typed wrappers for every backend endpoint the client talks to.

use reqwest::multipart::{Form, Part};

use flame_types::api::{
    AuthResponse, FeedQuery, LoginRequest, OkResponse, OnboardingCompleteRequest,
    RegisterRequest, SendMessageRequest, SwipeRequest,
};
use flame_types::models::{Candidate, Match, Me, Message, Photo, Profile, Section};

use crate::error::Result;
use crate::request::{ApiClient, Call};

impl ApiClient {
    // -- Auth --

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        self.call(Call::post("/auth/register").json(req)?).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.call(Call::post("/auth/login").json(req)?).await
    }

    // -- Profile --

    pub async fn me(&self, token: &str) -> Result<Me> {
        self.call(Call::get("/users/me").token(token)).await
    }

    /// Full replacement of the profile, not a patch.
    pub async fn save_profile(&self, token: &str, profile: &Profile) -> Result<()> {
        self.call_raw(Call::put("/users/me/profile").token(token).json(profile)?)
            .await?;
        Ok(())
    }

    pub async fn upload_photo(&self, token: &str, data: Vec<u8>, file_name: &str) -> Result<Photo> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new().part("file", part);
        self.call_multipart("/photos", form, Some(token)).await
    }

    pub async fn set_primary_photo(&self, token: &str, photo_id: &str) -> Result<()> {
        let path = format!("/photos/{photo_id}/primary");
        self.call_raw(Call::put(&path).token(token)).await?;
        Ok(())
    }

    pub async fn complete_onboarding(&self, token: &str, profile: &Profile) -> Result<OkResponse> {
        let body = OnboardingCompleteRequest {
            profile: profile.clone(),
        };
        let resp: Option<OkResponse> = self
            .call(Call::put("/onboarding/complete").token(token).json(&body)?)
            .await?;
        Ok(resp.unwrap_or_default())
    }

    // -- Discovery --

    pub async fn feed(&self, token: &str, query: FeedQuery) -> Result<Vec<Candidate>> {
        let path = query.path();
        let list: Option<Vec<Candidate>> = self.call(Call::get(&path).token(token)).await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn swipe(&self, token: &str, target_id: &str, liked: bool) -> Result<()> {
        let body = SwipeRequest {
            target_id: target_id.to_string(),
            liked,
        };
        self.call_raw(Call::post("/swipes").token(token).json(&body)?)
            .await?;
        Ok(())
    }

    pub async fn sections(&self, token: &str, user_id: &str) -> Result<Vec<Section>> {
        let path = format!("/sections/{user_id}");
        let list: Option<Vec<Section>> = self.call(Call::get(&path).token(token)).await?;
        Ok(list.unwrap_or_default())
    }

    // -- Matches --

    pub async fn matches(&self, token: &str) -> Result<Vec<Match>> {
        let list: Option<Vec<Match>> = self.call(Call::get("/matches").token(token)).await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn messages(&self, token: &str, match_id: &str) -> Result<Vec<Message>> {
        let path = format!("/matches/{match_id}/messages");
        let list: Option<Vec<Message>> = self.call(Call::get(&path).token(token)).await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn send_message(&self, token: &str, match_id: &str, content: &str) -> Result<Message> {
        let path = format!("/matches/{match_id}/messages");
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        self.call(Call::post(&path).token(token).json(&body)?).await
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

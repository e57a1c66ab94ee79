use serde::{Deserialize, Serialize};

use crate::models::{Profile, UserBasic};

// -- Auth --

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response shared by `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserBasic,
    #[serde(default)]
    pub requires_onboarding: Option<bool>,
}

// -- Discovery --

/// Body of `POST /swipes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_id: String,
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedQuery {
    pub max_km: Option<u32>,
    pub limit: Option<u32>,
}

impl FeedQuery {
    /// Path with query string, e.g. `/feed?maxKm=200&limit=20`.
    pub fn path(&self) -> String {
        let mut params = Vec::new();
        if let Some(km) = self.max_km {
            params.push(format!("maxKm={km}"));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={limit}"));
        }
        if params.is_empty() {
            "/feed".to_string()
        } else {
            format!("/feed?{}", params.join("&"))
        }
    }
}

// -- Messages --

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

// -- Onboarding --

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingCompleteRequest {
    pub profile: Profile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

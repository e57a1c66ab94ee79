use tracing::info;

use flame_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::context::{AppContextInner, Route};
use crate::error::Result;

/// Create an account and sign in. New accounts that still need onboarding
/// land on the profile editor.
pub async fn register(ctx: &AppContextInner, req: &RegisterRequest) -> Result<Route> {
    let resp = ctx.api.register(req).await?;
    let route = if resp.requires_onboarding.unwrap_or(false) {
        Route::Profile
    } else {
        Route::Feed
    };
    store_session(ctx, resp)?;
    Ok(route)
}

pub async fn login(ctx: &AppContextInner, req: &LoginRequest) -> Result<Route> {
    let resp = ctx.api.login(req).await?;
    store_session(ctx, resp)?;
    Ok(Route::Feed)
}

pub fn logout(ctx: &AppContextInner) -> Result<Route> {
    ctx.auth.clear()?;
    info!("Signed out");
    Ok(Route::Welcome)
}

fn store_session(ctx: &AppContextInner, resp: AuthResponse) -> Result<()> {
    info!("Signed in as {}", resp.user.email);
    ctx.auth.set(resp.token, resp.user)?;
    Ok(())
}

use anyhow::{Result, bail};

use flame_client::{AppContextInner, Route, auth};
use flame_types::api::{LoginRequest, RegisterRequest};

use super::Input;
use crate::render;

pub fn landing(ctx: &AppContextInner) -> Result<()> {
    let route = ctx.landing();
    if let Some(user) = ctx.auth.user() {
        println!("Signed in as {}.", user.display_name());
    }
    println!("{}", render::route_hint(&route));
    Ok(())
}

async fn password(input: &mut Input) -> Result<String> {
    match input.ask("Password: ").await? {
        Some(p) if !p.is_empty() => Ok(p),
        _ => bail!("A password is required"),
    }
}

pub async fn register(ctx: &AppContextInner, name: String, email: String) -> Result<()> {
    let password = password(&mut Input::new()).await?;
    let route = auth::register(ctx, &RegisterRequest { name, email, password }).await?;
    println!("Welcome to Flame!");
    println!("{}", render::route_hint(&route));
    Ok(())
}

pub async fn login(ctx: &AppContextInner, email: String) -> Result<()> {
    let password = password(&mut Input::new()).await?;
    let route = auth::login(ctx, &LoginRequest { email, password }).await?;
    println!("{}", render::route_hint(&route));
    Ok(())
}

pub fn logout(ctx: &AppContextInner) -> Result<()> {
    let route = auth::logout(ctx)?;
    println!("Signed out.");
    println!("{}", render::route_hint(&route));
    Ok(())
}

pub fn whoami(ctx: &AppContextInner) -> Result<()> {
    match ctx.auth.user() {
        Some(user) => println!("{} <{}> ({})", user.display_name(), user.email, user.id),
        None => println!("{}", render::route_hint(&Route::Welcome)),
    }
    Ok(())
}

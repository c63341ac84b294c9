use anyhow::{Result, bail};
use log::debug;

use super::{Context, user_error};

#[tracing::instrument(skip(ctx, password))]
pub async fn register(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let ack = ctx
        .api
        .auth()
        .register(email, password)
        .await
        .map_err(|e| user_error(e, "Register failed"))?;

    match ack.message {
        Some(message) => println!("{}", message),
        None => println!("Registered {}. Check your email to verify the account.", email),
    }
    Ok(())
}

#[tracing::instrument(skip(ctx, token))]
pub async fn verify(ctx: &Context, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Missing token.");
    }

    ctx.api
        .auth()
        .verify(token)
        .await
        .map_err(|e| user_error(e, "Invalid or expired token."))?;

    println!("Email verified. You can log in now.");
    Ok(())
}

/// Logs in and keeps the access token for later requests.
#[tracing::instrument(skip(ctx, password))]
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let token = ctx
        .api
        .auth()
        .login(email, password)
        .await
        .map_err(|e| user_error(e, "Login failed"))?;

    ctx.session.store_token(&token.access_token)?;
    debug!("Stored access token for {}", email);

    println!("Logged in as {}", email);
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.session.clear()?;
    println!("Logged out.");
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn whoami(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated()? {
        println!("Not logged in.");
        return Ok(());
    }

    let me = ctx
        .api
        .auth()
        .me()
        .await
        .map_err(|e| user_error(e, "Failed to load account"))?;

    let mut flags = Vec::new();
    if me.is_admin {
        flags.push("admin");
    }
    if !me.is_verified {
        flags.push("unverified");
    }

    if flags.is_empty() {
        println!("{} (id {})", me.email, me.id);
    } else {
        println!("{} (id {}) [{}]", me.email, me.id, flags.join(", "));
    }
    Ok(())
}

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shopease_session::{
    AuthResponse, Identity, SessionBuilder, SessionManager, SessionState, ShopeaseSettings,
};
use std::sync::Arc;

/// Inspect and drive the ShopEase session stored on this machine
#[derive(Debug, Parser)]
#[command(name = "shopease-session", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the identity restored from the stored token
    Whoami,
    /// Record a successful login
    Login {
        /// Bearer token returned by the API
        #[arg(long, conflicts_with = "response", required_unless_present = "response")]
        token: Option<String>,
        /// Username to publish instead of the token's `sub` claim
        #[arg(long, requires = "role", conflicts_with = "response")]
        username: Option<String>,
        /// Role to publish instead of the token's `role` claim
        #[arg(long, requires = "username", conflicts_with = "response")]
        role: Option<String>,
        /// Raw JSON body returned by the login or registration endpoint
        #[arg(long, env = "SHOPEASE_AUTH_RESPONSE")]
        response: Option<String>,
    },
    /// Forget the stored token
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loads Settings.toml and environment overrides, and initializes the logger
    let settings = ShopeaseSettings::load().context("Failed to load settings")?;

    let session = SessionBuilder::from_settings(&settings)
        .with_navigator(Arc::new(|route: &str| println!("→ Continue at {route}")))
        .initialize();

    match cli.command {
        Command::Whoami => print_state(&session.state()),
        Command::Login {
            token,
            username,
            role,
            response,
        } => {
            let state = login(&session, token, username.zip(role), response)?;
            print_state(&state);
        }
        Command::Logout => {
            session.logout();
            println!("✓ Logged out");
        }
    }

    Ok(())
}

fn login(
    session: &SessionManager,
    token: Option<String>,
    identity: Option<(String, String)>,
    response: Option<String>,
) -> Result<SessionState> {
    if let Some(body) = response {
        let response = AuthResponse::from_json(&body).context("Invalid authentication response")?;
        return Ok(session.complete_auth_response(&response));
    }

    let Some(token) = token else {
        bail!("either --token or --response is required");
    };

    Ok(match identity {
        Some((username, role)) => {
            let identity = Identity::new(username, role);
            session.complete_login(&token, identity.clone());
            SessionState::Authenticated(identity)
        }
        None => session.complete_login_with_token(&token),
    })
}

fn print_state(state: &SessionState) {
    match state {
        SessionState::Authenticated(identity) => {
            println!("✓ Signed in as {identity}");
            if identity.is_admin() {
                println!("  Administrator access");
            }
        }
        SessionState::Anonymous => println!("ℹ Not signed in"),
    }
}

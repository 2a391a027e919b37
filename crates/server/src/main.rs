// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Duration;
use tracing::{error, info};
use vbms_api::{
    ApiFailure, ApiSuccess, AuthConfig, AuthError, AuthenticationService, AuthorizationChain,
    BcryptPasswordEncoder, RefreshTransport,
};
use vbms_domain::{PlayerId, Role, TeamId};
use vbms_persistence::{
    InMemoryRoster, InMemorySessionStore, InMemoryUserStore, PlayerDirectory, TeamDirectory,
    UserRecord,
};

mod session;

use session::{AdminUser, CommonUser, PlayerUser, RefreshUser, failure_response, refresh_cookie};

/// VBMS Auth Server - session authentication and authorization boundary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Treat the environment as production (refresh cookies are marked Secure)
    #[arg(long)]
    production: bool,

    /// Access token lifetime in minutes
    #[arg(long, default_value_t = 15)]
    access_token_minutes: i64,

    /// Refresh token lifetime in days
    #[arg(long, default_value_t = 30)]
    refresh_token_days: i64,

    /// Return refresh tokens in response bodies instead of cookies
    /// (for non-browser API clients)
    #[arg(long)]
    refresh_in_body: bool,

    /// Bootstrap an admin user with this login name
    #[arg(long, default_value = "admin")]
    admin_username: String,

    /// Bootstrap password for the admin user; no admin is seeded when absent
    #[arg(long)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
///
/// All collaborators are constructed once at startup and injected; the
/// chain itself holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    /// The authorization chain gating every protected route.
    pub chain: AuthorizationChain,
    /// Player lookup for handler payloads.
    pub players: Arc<dyn PlayerDirectory>,
    /// Team lookup for handler payloads.
    pub teams: Arc<dyn TeamDirectory>,
    /// Whether refresh cookies are marked Secure.
    pub production: bool,
}

/// Request body for signin.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SigninRequest {
    /// The login name.
    username: String,
    /// The raw password.
    password: String,
}

/// Request body for player updates.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdatePlayerRequest {
    /// Player identifier fallback when the route carries none.
    #[serde(rename = "playerId", skip_serializing_if = "Option::is_none")]
    player_id: Option<i64>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Simple message payload for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageData {
    /// A human-readable confirmation.
    message: String,
}

/// Sets the refresh cookie on a response when the cookie transport is
/// active; body transport mode leaves cookies alone.
fn attach_refresh_cookie(response: &mut Response, state: &AppState, refresh_token: &str) {
    let config = state.chain.auth().config();
    if config.refresh_transport != RefreshTransport::Cookie {
        return;
    }
    let cookie = refresh_cookie(
        refresh_token,
        config.refresh_token_lifetime.whole_seconds(),
        state.production,
    );
    if let Ok(header) = cookie.parse() {
        response.headers_mut().insert(SET_COOKIE, header);
    }
}

/// Handler for POST /vbms/auth/signin.
///
/// Password verification is deliberately expensive, so it runs on the
/// blocking pool and never stalls unrelated requests.
async fn handle_signin(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<SigninRequest>,
) -> Response {
    let auth = state.chain.auth().clone();
    let outcome = tokio::task::spawn_blocking(move || {
        auth.authenticate(&request.username, &request.password)
    })
    .await
    .unwrap_or_else(|e| Err(AuthError::Internal(format!("Authentication task failed: {e}"))));

    match outcome {
        Ok(auth_session) => {
            let data = state.chain.auth().signin_data(&auth_session);
            let mut response = (StatusCode::OK, Json(ApiSuccess::new(data))).into_response();
            attach_refresh_cookie(&mut response, &state, &auth_session.refresh_token);
            response
        }
        Err(e) => failure_response(&e, false, state.production),
    }
}

/// Handler for POST /vbms/auth/refresh.
///
/// Guarded by the refresh cookie; rotates the session and the cookie.
async fn handle_refresh(AxumState(state): AxumState<AppState>, user: RefreshUser) -> Response {
    match state.chain.auth().refresh(&user.refresh_token, &user.username) {
        Ok(auth_session) => {
            let data = state.chain.auth().signin_data(&auth_session);
            let mut response = (StatusCode::OK, Json(ApiSuccess::new(data))).into_response();
            attach_refresh_cookie(&mut response, &state, &auth_session.refresh_token);
            response
        }
        Err(e) => failure_response(&e, true, state.production),
    }
}

/// Handler for POST /vbms/auth/signout.
async fn handle_signout(
    AxumState(state): AxumState<AppState>,
    CommonUser(ctx): CommonUser,
) -> Response {
    if let Err(e) = state.chain.auth().logout(&ctx.principal, &ctx.token) {
        return failure_response(&e, false, state.production);
    }

    let data = MessageData {
        message: String::from("Signed out successfully"),
    };
    let mut response = (StatusCode::OK, Json(ApiSuccess::new(data))).into_response();
    if let Ok(header) = session::clear_refresh_cookie(state.production).parse() {
        response.headers_mut().insert(SET_COOKIE, header);
    }
    response
}

/// Handler for GET `/vbms/teams/{team_id}`.
///
/// Team-scoped: the caller's current player must be on the target team.
async fn handle_get_team(
    AxumState(state): AxumState<AppState>,
    CommonUser(mut ctx): CommonUser,
    Path(team_id): Path<i64>,
) -> Response {
    if let Err(e) = state
        .chain
        .authorize_same_team(&mut ctx, Some(TeamId(team_id)))
    {
        return failure_response(&e, false, state.production);
    }

    match state.teams.team_by_id(TeamId(team_id)) {
        Ok(Some(team)) => (StatusCode::OK, Json(ApiSuccess::new(team))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiFailure::new("TEAM_404", "Team not found")),
        )
            .into_response(),
        Err(e) => failure_response(&AuthError::from(e), false, state.production),
    }
}

/// Handler for PUT `/vbms/players/{player_id}`.
///
/// Player-scoped: only the player themselves (or an admin) may update.
async fn handle_update_player(
    AxumState(state): AxumState<AppState>,
    CommonUser(mut ctx): CommonUser,
    Path(player_id): Path<i64>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Response {
    if let Err(e) = state.chain.authorize_same_player(
        &mut ctx,
        Some(PlayerId(player_id)),
        request.player_id.map(PlayerId),
    ) {
        return failure_response(&e, false, state.production);
    }

    // Persisting profile fields belongs to the player service; the auth
    // core only proves the caller may do it.
    let data = MessageData {
        message: format!("Player {player_id} updated"),
    };
    (StatusCode::OK, Json(ApiSuccess::new(data))).into_response()
}

/// Handler for GET `/vbms/players/{player_id}/card`.
///
/// Teammate-scoped: players may view cards of players on their own team.
async fn handle_get_player_card(
    AxumState(state): AxumState<AppState>,
    PlayerUser(mut ctx): PlayerUser,
    Path(player_id): Path<i64>,
) -> Response {
    if let Err(e) = state
        .chain
        .authorize_current_player_team(&mut ctx, Some(PlayerId(player_id)))
    {
        return failure_response(&e, false, state.production);
    }

    match state.players.player_by_id(PlayerId(player_id)) {
        Ok(Some(player)) => (StatusCode::OK, Json(ApiSuccess::new(player))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiFailure::new("PLAYER_404", "Player not found")),
        )
            .into_response(),
        Err(e) => failure_response(&AuthError::from(e), false, state.production),
    }
}

/// Handler for GET /vbms/admin/roster-check.
///
/// Admin-only probe exercising the role stage without ownership.
async fn handle_roster_check(
    AxumState(_state): AxumState<AppState>,
    AdminUser(ctx): AdminUser,
) -> Response {
    let data = MessageData {
        message: format!("Roster verified by {}", ctx.principal.username),
    };
    (StatusCode::OK, Json(ApiSuccess::new(data))).into_response()
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/vbms/auth/signin", post(handle_signin))
        .route("/vbms/auth/refresh", post(handle_refresh))
        .route("/vbms/auth/signout", post(handle_signout))
        .route("/vbms/teams/{team_id}", get(handle_get_team))
        .route("/vbms/players/{player_id}", put(handle_update_player))
        .route("/vbms/players/{player_id}/card", get(handle_get_player_card))
        .route("/vbms/admin/roster-check", get(handle_roster_check))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing VBMS Auth Server");

    let sessions = Arc::new(InMemorySessionStore::new());
    let users = Arc::new(InMemoryUserStore::new());
    let roster = Arc::new(InMemoryRoster::new());

    if let Some(password) = &args.admin_password {
        let encoder = BcryptPasswordEncoder::new();
        users.insert(UserRecord {
            username: args.admin_username.clone(),
            password_hash: encoder.encode(password)?,
            role: Role::Admin,
        })?;
        info!(username = %args.admin_username, "Seeded admin user");
    }

    let config = AuthConfig {
        access_token_lifetime: Duration::minutes(args.access_token_minutes),
        refresh_token_lifetime: Duration::days(args.refresh_token_days),
        refresh_transport: if args.refresh_in_body {
            RefreshTransport::Body
        } else {
            RefreshTransport::Cookie
        },
    };

    let auth = AuthenticationService::new(sessions, users, config);
    let chain = AuthorizationChain::new(auth, roster.clone(), roster.clone());

    let app_state: AppState = AppState {
        chain,
        players: roster.clone(),
        teams: roster,
        production: args.production,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr = format!("0.0.0.0:{}", args.port);
    info!("Listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}

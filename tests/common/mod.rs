//! In-process stand-in for the Spotify accounts service and Web API.
#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use daylist_sync::{
    config::Config, management::TokenManager, spotify::SpotifyClient, types::ReplaceTracksRequest,
    types::UpdatePlaylistDetailsRequest, utils,
};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const VALID_CODE: &str = "valid-code";
pub const DESTINATION: &str = "my-playlist";
pub const DAYLIST_ID: &str = "daylist-src";

#[derive(Default)]
pub struct FakeState {
    /// Items of `GET /me/playlists`.
    pub playlists: Vec<Value>,
    /// Answers of `GET /playlists/{id}`, the last one repeats.
    pub playlist_fetches: VecDeque<Value>,
    pub tracks: Vec<String>,
    /// `(call, status)` pairs answered instead of the real handler, in order.
    pub failures: VecDeque<(String, u16)>,
    pub valid_token: String,
    pub refresh_token: String,
    pub issued: u32,
    pub rotate_refresh: bool,
    /// Lifetime reported for issued tokens, 3600 when unset.
    pub expires_in: Option<u64>,
    /// Time `GET /me/playlists` takes to answer.
    pub listing_delay: Duration,
    pub listings_in_flight: u32,
    pub max_listings_in_flight: u32,
    pub calls: Vec<String>,
    pub replaced: Vec<Vec<String>>,
    pub renamed: Vec<String>,
}

#[derive(Clone)]
pub struct FakeSpotify {
    pub addr: SocketAddr,
    state: Arc<Mutex<FakeState>>,
}

impl FakeSpotify {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(FakeState::default()));

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/playlists", get(me_playlists))
            .route("/v1/playlists/{id}", get(get_playlist).put(put_playlist))
            .route("/v1/playlists/{id}/tracks", get(get_tracks).put(put_tracks))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            redirect_uri: "http://localhost:6969/spotifycallback".to_string(),
            auth_url: format!("{}/authorize", self.base()),
            token_url: format!("{}/api/token", self.base()),
            api_url: format!("{}/v1", self.base()),
            destination_playlist_id: DESTINATION.to_string(),
            sync_interval: Duration::from_secs(3600),
            auth_poll_interval: Duration::from_millis(10),
            daylist_poll_attempts: 5,
            daylist_poll_delay: Duration::ZERO,
            max_sync_attempts: 5,
            rate_limit_backoff: Duration::ZERO,
            ..Config::default()
        }
    }

    /// Client wired to this fake, not yet authorized.
    pub fn client(&self) -> SpotifyClient {
        self.client_with(self.config())
    }

    pub fn client_with(&self, config: Config) -> SpotifyClient {
        let config = Arc::new(config);
        let http = reqwest::Client::new();
        let tokens = TokenManager::new(http.clone(), Arc::clone(&config));
        SpotifyClient::new(http, config, tokens)
    }

    /// Client holding a valid token; the handshake call is not recorded.
    pub async fn authorized_client(&self) -> SpotifyClient {
        let client = self.client();
        client.tokens().authorize(VALID_CODE).await.unwrap();
        self.with(|s| s.calls.clear());
        client
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn playlist_json(&self, id: &str, name: &str, owner: &str, listed: bool) -> Value {
        let mut playlist = json!({
            "id": id,
            "name": name,
            "owner": { "id": owner, "display_name": owner },
        });
        if listed {
            playlist["tracks"] = json!({
                "href": format!("{}/v1/playlists/{}/tracks", self.base(), id),
                "total": 3,
            });
        }
        playlist
    }

    /// A user library with one titled daylist holding `uris`.
    pub fn set_daylist(&self, name: &str, uris: &[&str]) {
        let playlists = vec![
            self.playlist_json("liked", "Road trip", "me", true),
            self.playlist_json("dw", "Discover Weekly", "spotify", true),
            self.playlist_json(DAYLIST_ID, name, "spotify", true),
        ];
        self.with(|s| {
            s.playlists = playlists;
            s.tracks = uris.iter().map(|u| u.to_string()).collect();
        });
    }

    pub fn fail_next(&self, call: &str, status: u16) {
        self.with(|s| s.failures.push_back((call.to_string(), status)));
    }

    /// Makes the access token the client holds stale.
    pub fn expire_access_token(&self) {
        self.with(|s| s.valid_token = "expired-elsewhere".to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn replaced(&self) -> Vec<Vec<String>> {
        self.with(|s| s.replaced.clone())
    }

    pub fn renamed(&self) -> Vec<String> {
        self.with(|s| s.renamed.clone())
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn record(s: &mut FakeState, call: &str) -> Option<Response> {
    s.calls.push(call.to_string());

    let scripted = s.failures.front().is_some_and(|(failing, _)| failing == call);
    if !scripted {
        return None;
    }

    let (_, status) = s.failures.pop_front()?;
    let status = StatusCode::from_u16(status).unwrap();
    let mut response =
        (status, Json(json!({ "error": { "status": status.as_u16() } }))).into_response();
    if status == StatusCode::TOO_MANY_REQUESTS {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, "0".parse().unwrap());
    }
    Some(response)
}

fn bearer_ok(s: &FakeState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", s.valid_token);
    !s.valid_token.is_empty()
        && headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
    )
        .into_response()
}

fn issue(s: &mut FakeState, rotate: bool) -> Value {
    s.issued += 1;
    s.valid_token = format!("access-{}", s.issued);
    let mut body = json!({
        "access_token": s.valid_token,
        "token_type": "Bearer",
        "scope": "playlist-read-private playlist-modify-private",
        "expires_in": s.expires_in.unwrap_or(3600),
    });
    if rotate {
        s.refresh_token = format!("refresh-{}", s.issued);
        body["refresh_token"] = json!(s.refresh_token);
    }
    body
}

async fn token(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    let grant = form.get("grant_type").cloned().unwrap_or_default();
    if let Some(failure) = record(&mut s, &format!("POST /api/token {}", grant)) {
        return failure;
    }

    let expected = utils::basic_auth_value(CLIENT_ID, CLIENT_SECRET);
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_client" }))).into_response();
    }

    match grant.as_str() {
        "authorization_code" if form.get("code").map(String::as_str) == Some(VALID_CODE) => {
            Json(issue(&mut s, true)).into_response()
        }
        "refresh_token" if form.get("refresh_token") == Some(&s.refresh_token) => {
            let rotate = s.rotate_refresh;
            Json(issue(&mut s, rotate)).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response(),
    }
}

async fn me_playlists(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let delay = {
        let mut s = state.lock().unwrap();
        if let Some(failure) = record(&mut s, "GET /me/playlists") {
            return failure;
        }
        if !bearer_ok(&s, &headers) {
            return unauthorized();
        }
        s.listings_in_flight += 1;
        s.max_listings_in_flight = s.max_listings_in_flight.max(s.listings_in_flight);
        s.listing_delay
    };

    tokio::time::sleep(delay).await;

    let mut s = state.lock().unwrap();
    s.listings_in_flight -= 1;
    Json(json!({ "items": s.playlists, "next": null })).into_response()
}

async fn get_playlist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Some(failure) = record(&mut s, &format!("GET /playlists/{}", id)) {
        return failure;
    }
    if !bearer_ok(&s, &headers) {
        return unauthorized();
    }
    let answer = if s.playlist_fetches.len() > 1 {
        s.playlist_fetches.pop_front()
    } else {
        s.playlist_fetches.front().cloned()
    };
    match answer {
        Some(playlist) => Json(playlist).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_playlist(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdatePlaylistDetailsRequest>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Some(failure) = record(&mut s, &format!("PUT /playlists/{}", id)) {
        return failure;
    }
    if !bearer_ok(&s, &headers) {
        return unauthorized();
    }
    s.renamed.push(body.name);
    StatusCode::OK.into_response()
}

async fn get_tracks(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Some(failure) = record(&mut s, &format!("GET /playlists/{}/tracks", id)) {
        return failure;
    }
    if !bearer_ok(&s, &headers) {
        return unauthorized();
    }
    let mut items: Vec<Value> = s
        .tracks
        .iter()
        .map(|uri| json!({ "track": { "uri": uri, "name": uri } }))
        .collect();
    // Spotify answers `null` for tracks pulled from the catalogue.
    items.push(json!({ "track": null }));
    Json(json!({ "items": items, "next": null })).into_response()
}

async fn put_tracks(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ReplaceTracksRequest>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Some(failure) = record(&mut s, &format!("PUT /playlists/{}/tracks", id)) {
        return failure;
    }
    if !bearer_ok(&s, &headers) {
        return unauthorized();
    }
    s.replaced.push(body.uris);
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" }))).into_response()
}

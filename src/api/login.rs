use axum::{extract::State, response::Redirect};
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration},
};

use crate::{server::AppState, spotify, utils};

/// Cookie holding the anti-forgery `state` between `/login` and the callback.
pub const STATE_COOKIE: &str = "spotify_auth_state";

pub async fn login(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    let csrf_state = utils::generate_state();

    let mut cookie = Cookie::new(STATE_COOKIE, csrf_state.clone());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::minutes(10));
    cookies.add(cookie);

    Redirect::temporary(&spotify::auth::authorize_url(&state.config, &csrf_state))
}

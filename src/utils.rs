use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Local;
use rand::{Rng, distr::Alphanumeric};

/// Length of the anti-forgery `state` value sent through the authorize redirect.
pub const STATE_LENGTH: usize = 16;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Value for the `Authorization` header of token endpoint requests.
pub fn basic_auth_value(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}

pub fn bearer_value(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Compares the echoed `state` query value against the stored cookie value.
///
/// A missing value on either side never matches.
pub fn state_matches(echoed: Option<&str>, stored: Option<&str>) -> bool {
    match (echoed, stored) {
        (Some(echoed), Some(stored)) => !echoed.is_empty() && echoed == stored,
        _ => false,
    }
}

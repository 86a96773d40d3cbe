use jiff::Timestamp;
use tracing::debug;

use super::claims::{TokenClaims, decode_claims};

/// Returns true iff the token decodes, carries an `exp` claim, and now is strictly before it.
pub fn is_valid(token: Option<&str>) -> bool {
    is_valid_at(token, Timestamp::now())
}

pub fn is_valid_at(token: Option<&str>, now: Timestamp) -> bool {
    let Some(claims) = claims_of(token) else {
        return false;
    };
    match claims.exp {
        Some(exp) => epoch_seconds(now) < exp,
        None => {
            debug!("token has no exp claim");
            false
        }
    }
}

/// Display-only; never use for authorization decisions.
pub fn username_of(token: Option<&str>) -> Option<String> {
    claims_of(token)?.username
}

/// Display-only; never use for authorization decisions.
pub fn subject_of(token: Option<&str>) -> Option<String> {
    claims_of(token)?.sub
}

fn claims_of(token: Option<&str>) -> Option<TokenClaims> {
    let token = token?;
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!(error = %err, token_len = token.len(), "token decode failed");
            None
        }
    }
}

fn epoch_seconds(now: Timestamp) -> f64 {
    now.as_millisecond() as f64 / 1000.0
}

use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Deserializer};

/// Claims read from an access token's payload segment.
///
/// Never persisted: always recomputed from the stored token.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sub: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
}

/// Decodes the payload without checking the signature. The server verifies
/// signatures; the client only inspects claims to gate requests and display.
///
/// The header is still parsed: a token whose `alg` is `none` or not a
/// known algorithm fails to decode and so counts as invalid.
pub fn decode_claims(token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    let data = jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

// `sub` is a string per RFC 7519 but some issuers emit numeric ids.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

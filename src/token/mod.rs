mod claims;
mod validator;

pub use claims::{TokenClaims, decode_claims};
pub use validator::{is_valid, is_valid_at, subject_of, username_of};

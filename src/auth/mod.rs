//! Identity: signed tokens, password hashing and the ownership rule.

pub mod ownership;
pub mod password;
pub mod token;

pub use ownership::{authorize, require_owner, Access};
pub use token::{ProfileClaims, TokenCodec, TokenError, TokenKind, TokenPair, VerifiedToken};

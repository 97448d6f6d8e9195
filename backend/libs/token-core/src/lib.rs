//! Access/refresh token primitives shared by SSO services
//!
//! ## Modules
//!
//! - `claims`: Per-kind claim sets, token pairs and TTLs
//! - `secrets`: Per-kind signing secret lookup
//! - `codec`: HS256 encode/decode of claim sets
//! - `lifecycle`: Pair minting and the validate-and-rotate decision
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use token_core::{TokenManager, TokenSecrets, TokenTtls};
//!
//! let secrets = TokenSecrets::new("access-secret", "refresh-secret").unwrap();
//! let manager = TokenManager::new(secrets);
//! let ttls = TokenTtls::new(Duration::from_secs(900), Duration::from_secs(86_400)).unwrap();
//!
//! let pair = manager
//!     .new_pair("user-1", Some("user@example.com"), "app-1", &ttls)
//!     .unwrap();
//! let check = manager
//!     .check_pair(&pair.access_token, &pair.refresh_token, &ttls)
//!     .unwrap();
//! assert!(!check.is_rotated());
//! ```
pub mod claims;
pub mod codec;
pub mod error;
pub mod lifecycle;
pub mod secrets;

pub use claims::{
    AccessClaims, RefreshClaims, TokenClaims, TokenKind, TokenPair, TokenTtls, MAX_TTL,
};
pub use codec::{decode_claims, encode_claims, TokenCodec};
pub use error::{Result, TokenError};
pub use lifecycle::{PairCheck, TokenManager};
pub use secrets::{SecretResolver, TokenSecrets};

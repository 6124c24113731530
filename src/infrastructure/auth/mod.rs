//! Authentication infrastructure module
//!
//! JWT signing, the password-login token issuer and the bearer-token guard.

mod guard;
mod issuer;
mod jwt;

pub use guard::{extract_bearer_token, IdentityGuard, Principal};
pub use issuer::{IssuedToken, TokenIssuer, DEFAULT_LOGIN_TTL_MINUTES};
pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, DEFAULT_TOKEN_TTL_MINUTES};

pub mod identity;
pub mod jwt;
pub mod middleware;

pub use identity::{IdentityService, SessionTokens};
pub use jwt::{Claims, JwtVerifier};

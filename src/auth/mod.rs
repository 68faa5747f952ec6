mod claims;
mod context;
mod middleware;
mod verifier;

pub use claims::Claims;
pub use context::AuthContext;
pub use middleware::RequireAuth;
pub use verifier::JwtVerifier;

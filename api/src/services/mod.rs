pub mod auth;
pub mod middleware;
pub mod passwords;
pub mod tokens;

pub use auth::AuthService;
pub use middleware::{auth_context, bearer_token, AuthGuard};
pub use passwords::PasswordHasher;
pub use tokens::TokenService;

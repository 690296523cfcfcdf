// Authentication module
// Provides JWT-based authentication with user registration, login, and token refresh

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_form_handler, login_handler, me_handler, refresh_handler, register_handler};
pub use middleware::{require_admin, require_auth, AdminUser, CurrentUser};
pub use models::{User, UserResponse};
pub use repository::{UserRepository, UserStore};
pub use service::AuthService;
pub use token::TokenService;

mod flow;
mod errors;
mod principal;

pub use flow::{login, logout, resolve_principal, take_redirect_after_login};
pub use errors::AuthError;
pub use principal::Principal;

/// Session key holding the id of the logged-in user
pub const AUTHENTICATED_USER_ID_KEY: &str = "authenticatedUserID";

/// Session key holding the path an anonymous visitor was bounced from
pub const REDIRECT_AFTER_LOGIN_KEY: &str = "redirectPathAfterLogin";

use crate::models::{UserId, UserRepository};
use crate::session::Session;

use super::errors::AuthError;
use super::principal::Principal;
use super::{AUTHENTICATED_USER_ID_KEY, REDIRECT_AFTER_LOGIN_KEY};

/// Derive the request's principal from the session.
///
/// A stored id is confirmed against the user repository on every call. An id
/// whose account is gone is dropped from the session and the request proceeds
/// anonymously; a repository failure is returned to the caller.
pub async fn resolve_principal(
    session: &Session,
    users: &dyn UserRepository,
) -> Result<Principal, AuthError> {
    let Some(id) = session.get::<UserId>(AUTHENTICATED_USER_ID_KEY) else {
        return Ok(Principal::Anonymous);
    };

    if users.exists(id).await? {
        Ok(Principal::Authenticated(id))
    } else {
        tracing::debug!("Session refers to missing user {}; dropping it", id);
        session.remove(AUTHENTICATED_USER_ID_KEY);
        Ok(Principal::Anonymous)
    }
}

/// Verify credentials and bind the user to the session under a fresh token.
pub async fn login(
    session: &Session,
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<UserId, AuthError> {
    let id = users.authenticate(email, password).await?;

    session.renew_token();
    session.insert(AUTHENTICATED_USER_ID_KEY, id)?;
    tracing::info!("User {} logged in", id);
    Ok(id)
}

/// Forget the logged-in user and move the remaining data to a fresh token.
pub fn logout(session: &Session) {
    session.renew_token();
    session.remove(AUTHENTICATED_USER_ID_KEY);
}

/// Take the remembered post-login destination. Only local absolute paths are honoured.
pub fn take_redirect_after_login(session: &Session) -> Option<String> {
    session
        .pop::<String>(REDIRECT_AFTER_LOGIN_KEY)
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
}

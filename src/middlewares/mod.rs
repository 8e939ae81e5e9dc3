use reqwest::{RequestBuilder, Response, StatusCode};

use crate::{
    api::{error, success::ErrorBody},
    modules::{
        auth::session::SessionStore,
        user::schema::{UserEntity, UserRole},
    },
};

/// Attaches the current bearer token, if any, at send time.
pub fn authentication(req: RequestBuilder, session: &SessionStore) -> RequestBuilder {
    match session.token() {
        Some(token) => req.bearer_auth(token),
        None => req,
    }
}

/// Passes successful responses through and turns everything else into an error.
/// A 401 on any call signs the user out.
pub async fn intercept(
    res: Response,
    session: &SessionStore,
) -> Result<Response, error::SystemError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.bytes().await.unwrap_or_default();
    Err(reject(status, &body, session))
}

pub fn reject(status: StatusCode, body: &[u8], session: &SessionStore) -> error::SystemError {
    let message = serde_json::from_slice::<ErrorBody>(body).ok().and_then(ErrorBody::into_message);

    if status == StatusCode::UNAUTHORIZED {
        session.evict();
        return error::SystemError::unauthorized(
            message.unwrap_or_else(|| "Session expired, please sign in again".to_string()),
        );
    }

    log::debug!("request failed with {status}: {message:?}");
    error::SystemError::http(status, message.unwrap_or_default())
}

/// Client-side role guard, checked before any admin call goes out.
pub fn authorization(
    session: &SessionStore,
    allowed_roles: &[UserRole],
) -> Result<UserEntity, error::SystemError> {
    let user = session.user().ok_or_else(|| error::SystemError::unauthorized("Not signed in"))?;

    if !allowed_roles.contains(&user.role) {
        return Err(error::SystemError::forbidden("No permission"));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::LocalStorage;

    fn store_with(role: UserRole) -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::empty(LocalStorage::new(dir.path().join("s.json")));
        let user = UserEntity {
            id: 1,
            username: "u".into(),
            email: "u@example.com".into(),
            role,
            inviter_id: None,
            created_at: None,
            updated_at: None,
        };
        store.establish("abc123".into(), user).unwrap();
        (dir, store)
    }

    #[test]
    fn test_unauthorized_response_evicts_session() {
        let (_dir, store) = store_with(UserRole::Admin);
        let err = reject(StatusCode::UNAUTHORIZED, br#"{"error":"token expired"}"#, &store);

        assert!(matches!(err, error::SystemError::Unauthorized(ref m) if m == "token expired"));
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn test_unauthorized_without_session_stays_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::empty(LocalStorage::new(dir.path().join("s.json")));
        let err = reject(StatusCode::UNAUTHORIZED, b"", &store);
        assert!(matches!(err, error::SystemError::Unauthorized(_)));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_other_errors_keep_session() {
        let (_dir, store) = store_with(UserRole::User);
        let err = reject(StatusCode::BAD_REQUEST, br#"{"error":"bad"}"#, &store);
        assert!(matches!(
            err,
            error::SystemError::Http { status, .. } if status == StatusCode::BAD_REQUEST
        ));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_bearer_is_attached_only_while_signed_in() {
        let (_dir, store) = store_with(UserRole::User);
        let client = reqwest::Client::new();

        let req = authentication(client.get("http://localhost/api/v1/profile"), &store)
            .build()
            .unwrap();
        assert_eq!(req.headers().get("authorization").unwrap(), "Bearer abc123");

        store.logout().unwrap();
        let req = authentication(client.get("http://localhost/api/v1/profile"), &store)
            .build()
            .unwrap();
        assert!(req.headers().get("authorization").is_none());
    }

    #[test]
    fn test_authorization_checks_role() {
        let (_dir, store) = store_with(UserRole::User);
        assert!(matches!(
            authorization(&store, &[UserRole::Admin]),
            Err(error::SystemError::Forbidden(_))
        ));
        assert!(authorization(&store, &[UserRole::Admin, UserRole::User]).is_ok());

        store.logout().unwrap();
        assert!(matches!(
            authorization(&store, &[UserRole::Admin]),
            Err(error::SystemError::Unauthorized(_))
        ));
    }
}

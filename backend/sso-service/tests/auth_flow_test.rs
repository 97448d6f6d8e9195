/// Integration tests for the auth orchestrator over the in-memory store
///
/// Test Coverage:
/// - Register then login, claims bound to user and app
/// - Duplicate registration
/// - Wrong password and unknown app
/// - Admin flag lookup
/// - Login, wait past the access TTL, then refresh
mod common;

use common::{harness, harness_with_ttls, APP_NAME};
use sso_service::IdentityError;
use std::time::Duration;
use token_core::{AccessClaims, PairCheck, RefreshClaims};
use uuid::Uuid;

#[tokio::test]
async fn test_register_then_login_binds_user_and_app() {
    let h = harness();
    let user_id = h.auth.register("a@x.com", "rightpw").await.unwrap();

    let pair = h.auth.login("a@x.com", "rightpw", APP_NAME).await.unwrap();

    let access: AccessClaims = h.tokens.codec().decode(&pair.access_token).unwrap();
    let refresh: RefreshClaims = h.tokens.codec().decode(&pair.refresh_token).unwrap();
    assert_eq!(access.sub, user_id.to_string());
    assert_eq!(access.aud, h.app.id.to_string());
    assert_eq!(access.email.as_deref(), Some("a@x.com"));
    assert_eq!(refresh.sub, user_id.to_string());
    assert_eq!(refresh.aud, h.app.id.to_string());
}

#[tokio::test]
async fn test_login_accepts_app_uuid() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();

    let pair = h
        .auth
        .login("a@x.com", "rightpw", &h.app.id.to_string())
        .await
        .unwrap();

    let access: AccessClaims = h.tokens.codec().decode(&pair.access_token).unwrap();
    assert_eq!(access.aud, h.app.id.to_string());
}

#[tokio::test]
async fn test_double_registration_keeps_one_record() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();

    let second = h.auth.register("a@x.com", "otherpw").await;

    assert!(matches!(second, Err(IdentityError::UserExists)));
    assert_eq!(h.store.user_count(), 1);

    // The original password still wins
    assert!(h.auth.login("a@x.com", "rightpw", APP_NAME).await.is_ok());
}

#[tokio::test]
async fn test_wrong_password_issues_nothing() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();

    let result = h.auth.login("a@x.com", "wrongpw", APP_NAME).await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));

    let unknown = h.auth.login("b@x.com", "rightpw", APP_NAME).await;
    assert!(matches!(unknown, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn test_unknown_app_is_invalid_app_id() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();

    let result = h.auth.login("a@x.com", "rightpw", "no-such-app").await;
    assert!(matches!(result, Err(IdentityError::InvalidAppId)));
}

#[tokio::test]
async fn test_is_admin() {
    let h = harness();
    let user_id = h.auth.register("root@x.com", "rightpw").await.unwrap();

    assert!(!h.auth.is_admin(user_id).await.unwrap());

    h.store.set_admin(user_id, true);
    assert!(h.auth.is_admin(user_id).await.unwrap());

    let missing = h.auth.is_admin(Uuid::new_v4()).await;
    assert!(matches!(missing, Err(IdentityError::UserNotFound)));
}

#[tokio::test]
async fn test_fresh_pair_is_returned_unchanged() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();
    let pair = h.auth.login("a@x.com", "rightpw", APP_NAME).await.unwrap();

    let check = h
        .auth
        .check_and_refresh_tokens(&pair.access_token, &pair.refresh_token)
        .await
        .unwrap();

    assert_eq!(check, PairCheck::Valid(pair));
}

#[tokio::test]
async fn test_login_wait_past_access_ttl_then_refresh() {
    // GIVEN: a one-second access token
    let h = harness_with_ttls(Duration::from_secs(1), Duration::from_secs(3600));
    let user_id = h.auth.register("a@x.com", "rightpw").await.unwrap();
    let pair = h.auth.login("a@x.com", "rightpw", APP_NAME).await.unwrap();

    let original: AccessClaims = h.tokens.codec().decode(&pair.access_token).unwrap();
    assert_eq!(original.sub, user_id.to_string());
    assert_eq!(original.aud, h.app.id.to_string());

    // WHEN: the access token has expired
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let check = h
        .auth
        .check_and_refresh_tokens(&pair.access_token, &pair.refresh_token)
        .await
        .unwrap();

    // THEN: still authenticated, with a later-expiring access token
    assert!(check.is_rotated());
    let rotated = check.into_pair();
    let renewed: AccessClaims = h.tokens.codec().decode(&rotated.access_token).unwrap();
    assert!(renewed.exp > original.exp);
    assert_eq!(renewed.sub, user_id.to_string());
    assert_eq!(renewed.aud, h.app.id.to_string());
    assert_ne!(rotated.refresh_token, pair.refresh_token);
}

#[tokio::test]
async fn test_untrusted_refresh_token_is_denied() {
    let h = harness();
    h.auth.register("a@x.com", "rightpw").await.unwrap();
    let pair = h.auth.login("a@x.com", "rightpw", APP_NAME).await.unwrap();

    let tampered = format!("{}x", pair.refresh_token);
    for refresh in [tampered.as_str(), "not-a-token", pair.access_token.as_str()] {
        let result = h
            .auth
            .check_and_refresh_tokens(&pair.access_token, refresh)
            .await;
        assert!(matches!(result, Err(IdentityError::AccessDenied)));
    }
}

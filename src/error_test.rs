use super::*;
use crate::session::{LOGIN_PATH, LOGIN_REQUIRED_MESSAGE, SESSION_EXPIRED_MESSAGE};

#[test]
fn remote_auth_and_missing_map_directly() {
    assert_eq!(EngagementError::from(RemoteError::Unauthorized), EngagementError::Unauthorized);
    assert_eq!(EngagementError::from(RemoteError::NotFound), EngagementError::NotFound);
}

#[test]
fn remote_transient_failures_collapse() {
    let err = EngagementError::from(RemoteError::Server { status: 502, message: "bad gateway".into() });
    assert!(matches!(&err, EngagementError::NetworkOrServer(msg) if msg.contains("502")));
    assert!(err.retryable());

    let err = EngagementError::from(RemoteError::Network("connection refused".into()));
    assert!(matches!(&err, EngagementError::NetworkOrServer(msg) if msg.contains("connection refused")));
}

#[test]
fn auth_errors_redirect_to_login() {
    let redirect = EngagementError::Unauthenticated.login_redirect("/events/e1").unwrap();
    assert_eq!(redirect.path, LOGIN_PATH);
    assert_eq!(redirect.from, "/events/e1");
    assert_eq!(redirect.message, LOGIN_REQUIRED_MESSAGE);

    let redirect = EngagementError::Unauthorized.login_redirect("/").unwrap();
    assert_eq!(redirect.message, SESSION_EXPIRED_MESSAGE);
}

#[test]
fn other_errors_do_not_redirect() {
    assert!(EngagementError::NotFound.login_redirect("/").is_none());
    assert!(EngagementError::NetworkOrServer("x".into()).login_redirect("/").is_none());
    assert!(EngagementError::Disposed.login_redirect("/").is_none());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(EngagementError::Unauthenticated.error_code(), "E_UNAUTHENTICATED");
    assert_eq!(EngagementError::Unauthorized.error_code(), "E_UNAUTHORIZED");
    assert_eq!(EngagementError::NotFound.error_code(), "E_NOT_FOUND");
    assert_eq!(EngagementError::Disposed.error_code(), "E_DISPOSED");
    assert_eq!(EngagementError::NoRuntime.error_code(), "E_NO_RUNTIME");
    assert!(!EngagementError::Unauthorized.retryable());
}

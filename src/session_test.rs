use super::*;

#[test]
fn blank_token_is_logged_out() {
    assert!(Credential::from_token("").is_none());
    assert!(Credential::from_token("   ").is_none());
}

#[test]
fn token_is_trimmed() {
    let cred = Credential::from_token(" abc.def ").unwrap();
    assert_eq!(cred.token(), "abc.def");
    assert_eq!(cred.bearer(), "Bearer abc.def");
}

#[test]
fn debug_does_not_leak_token() {
    let cred = Credential::from_token("secret-token").unwrap();
    let printed = format!("{cred:?}");
    assert!(!printed.contains("secret-token"));
}

#[test]
fn login_redirect_keeps_return_path() {
    let redirect = LoginRedirect::login_required("/events/e1");
    assert_eq!(redirect.path, LOGIN_PATH);
    assert_eq!(redirect.from, "/events/e1");
    assert_eq!(redirect.message, LOGIN_REQUIRED_MESSAGE);
}

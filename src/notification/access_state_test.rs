use crate::AccessState;
use crate::Error;
use crate::PushAccessState;
use crate::RegistrationError;

/// Case 1: token is present iff the state is Available
#[test]
fn test_token_iff_available() {
    let available = PushAccessState::available("tok");
    assert_eq!(available.state(), AccessState::Available);
    assert_eq!(available.token(), Some("tok"));

    for state in [
        AccessState::Denied,
        AccessState::Disabled,
        AccessState::NotSupported,
        AccessState::NotDetermined,
    ] {
        let result = PushAccessState::unavailable(state);
        assert_eq!(result.state(), state);
        assert!(result.token().is_none());
    }
}

/// Case 2: require_available maps each non-available state to its typed error
#[test]
fn test_require_available() {
    let token = PushAccessState::available("tok")
        .require_available()
        .expect("available state carries a token");
    assert_eq!(token, "tok");

    let denied = PushAccessState::unavailable(AccessState::Denied).require_available();
    assert!(matches!(
        denied,
        Err(Error::Registration(RegistrationError::PermissionDenied))
    ));

    let disabled = PushAccessState::unavailable(AccessState::Disabled).require_available();
    assert!(matches!(
        disabled,
        Err(Error::Registration(RegistrationError::PermissionUnavailable(_)))
    ));
}

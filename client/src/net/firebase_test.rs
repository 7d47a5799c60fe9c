use super::*;
use session::AccountDetails;

#[test]
fn backend_error_keeps_sdk_code_and_message() {
    let err = backend_error(Some("auth/wrong-password".to_owned()), Some("bad".to_owned()));
    assert_eq!(err.code, "auth/wrong-password");
    assert_eq!(err.message, "bad");
}

#[test]
fn backend_error_defaults_missing_code() {
    let err = backend_error(None, None);
    assert_eq!(err.code, "unknown");
    assert_eq!(err.message, "");

    let err = backend_error(Some(String::new()), Some("boom".to_owned()));
    assert_eq!(err.code, "unknown");
}

#[test]
fn parse_session_null_is_signed_out() {
    assert_eq!(parse_session(None).unwrap(), None);
}

#[test]
fn parse_session_reads_bridge_payload() {
    let session = parse_session(Some(r#"{"uid":"u1","email":"ana@lawme.com","displayName":null}"#))
        .unwrap()
        .unwrap();
    assert_eq!(session.uid, "u1");
    assert_eq!(session.email.as_deref(), Some("ana@lawme.com"));
    assert_eq!(session.display_name, None);
}

#[test]
fn parse_session_rejects_malformed_payload() {
    let err = parse_session(Some("{not json")).unwrap_err();
    assert_eq!(err.code, "invalid-response");
}

#[test]
fn parse_profile_missing_document() {
    assert_eq!(parse_profile(None).unwrap(), None);
}

#[test]
fn parse_profile_reads_flat_document() {
    let profile = parse_profile(Some(
        r#"{"userType":"client","fullName":"Ana","phone":"11 9999","cpf":"123","completedRegistration":true,"interests":["Civil"]}"#,
    ))
    .unwrap()
    .unwrap();
    assert!(profile.completed_registration);
    assert_eq!(profile.account, AccountDetails::Client { interests: vec!["Civil".to_owned()] });
}

#[test]
fn encode_profile_writes_flat_document() {
    let profile = Profile {
        full_name: "Bia".to_owned(),
        phone: "21 8888".to_owned(),
        national_id: "456".to_owned(),
        completed_registration: true,
        account: AccountDetails::Lawyer {
            license_number: "99".to_owned(),
            license_state: "RJ".to_owned(),
            specializations: vec!["Penal".to_owned()],
        },
    };
    let json: serde_json::Value = serde_json::from_str(&encode_profile(&profile).unwrap()).unwrap();
    assert_eq!(json["userType"], "lawyer");
    assert_eq!(json["oabNumber"], "99");
    assert_eq!(json["oabState"], "RJ");
    assert_eq!(json["cpf"], "456");
}

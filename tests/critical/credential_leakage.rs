//! Assert credentials and cookie values never reach Debug output or error messages.

use auth_cookie_codec::{
    CredentialCookieConfig, ExtraStorageConfig, RequestCookies, SessionCookie, SessionCredential,
    build_auth_header, store_credential,
};

const SECRET: &str = "Bearer super-secret-token-value";

fn split_config() -> CredentialCookieConfig {
    CredentialCookieConfig {
        primary_budget: 8,
        extra_storage: ExtraStorageConfig::new("testcookie", 5).with_chunk_size(16),
        ..CredentialCookieConfig::default()
    }
}

#[test]
fn p0_debug_output_redacts_inline_credential() {
    let credential = SessionCredential::Inline(SECRET.to_string());
    let session = SessionCookie::new(credential.clone());
    for rendered in [format!("{credential:?}"), format!("{session:?}")] {
        assert!(
            !rendered.contains("super-secret"),
            "Debug output must not contain credential: {rendered}"
        );
    }
}

#[test]
fn p0_debug_output_redacts_chunk_values() {
    let stored = store_credential(SECRET, &RequestCookies::new(), &split_config()).unwrap();
    assert!(stored.credential.is_split());

    let mut jar = RequestCookies::new();
    jar.apply(&stored.writes);

    let rendered = format!("{stored:?} {jar:?}");
    // Short tail chunks could match unrelated Debug text.
    for write in stored.writes.iter().filter(|w| w.value().unwrap().len() >= 8) {
        let value = write.value().unwrap();
        assert!(
            !rendered.contains(value),
            "Debug output must not contain chunk value for {}",
            write.name
        );
    }
}

#[test]
fn p0_error_messages_do_not_contain_chunk_values() {
    let stored = store_credential(SECRET, &RequestCookies::new(), &split_config()).unwrap();
    let first = stored.writes[0].value().unwrap().to_string();

    // Only the first chunk survives.
    let jar = RequestCookies::parse(&format!("testcookie1={first}"));
    let err = build_auth_header(&stored.credential, &jar, &split_config().extra_storage)
        .unwrap_err();

    let msg = err.to_string();
    assert!(!msg.contains(&first), "error must not contain chunk value: {msg}");
    assert!(!msg.contains("super-secret"), "error must not contain credential: {msg}");
}

#[test]
fn p0_auth_header_debug_is_redacted() {
    let stored = store_credential(SECRET, &RequestCookies::new(), &split_config()).unwrap();
    let mut jar = RequestCookies::new();
    jar.apply(&stored.writes);

    let header = build_auth_header(&stored.credential, &jar, &split_config().extra_storage)
        .unwrap();
    assert_eq!(header.value(), SECRET);
    assert!(!format!("{header:?}").contains("super-secret"));
}

//! Tampered, reordered and oversized secondary cookies must never yield a header.

use auth_cookie_codec::{
    CodecError, CredentialError, ExtraStorageConfig, RequestCookies, SessionCredential,
    build_auth_header, compress, encode_blob,
};

fn config(additional_cookies: usize) -> ExtraStorageConfig {
    ExtraStorageConfig::new("testcookie", additional_cookies)
}

fn chunked_jar(encoded: &str, chunk_size: usize) -> RequestCookies {
    encoded
        .as_bytes()
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| {
            (
                format!("testcookie{}", index + 1),
                String::from_utf8_lossy(chunk).into_owned(),
            )
        })
        .collect()
}

#[test]
fn p0_reordered_chunks_do_not_rebuild_credential() {
    let credential = "Bearer eyCombinedToken-reordered-chunks-check";
    let encoded = encode_blob(&compress(credential).unwrap());
    let half = encoded.len() / 2;
    let jar = RequestCookies::parse(&format!(
        "testcookie1={}; testcookie2={}",
        &encoded[half..],
        &encoded[..half]
    ));

    let result = build_auth_header(&SessionCredential::Split, &jar, &config(5));
    if let Ok(header) = result {
        assert_ne!(header.value(), credential, "reordered chunks must not rebuild");
    }
}

#[test]
fn p0_flipped_character_is_rejected() {
    let encoded = encode_blob(&compress("Bearer eyCombinedToken").unwrap());
    let mut tampered: Vec<u8> = encoded.into_bytes();
    let middle = tampered.len() / 2;
    tampered[middle] = if tampered[middle] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let jar = chunked_jar(&tampered, 4000);
    let result = build_auth_header(&SessionCredential::Split, &jar, &config(5));
    match result {
        Ok(header) => assert_ne!(header.value(), "Bearer eyCombinedToken"),
        Err(err) => assert!(err.is_credential_unavailable()),
    }
}

#[test]
fn p0_decompression_bomb_is_rejected() {
    let bomb = "A".repeat(1024 * 1024);
    let encoded = encode_blob(&compress(&bomb).unwrap());
    let jar = chunked_jar(&encoded, 4000);

    let err = build_auth_header(&SessionCredential::Split, &jar, &config(5)).unwrap_err();
    assert!(
        matches!(err, CredentialError::Codec(CodecError::TooLarge { .. })),
        "expected TooLarge, got: {err:?}"
    );
    assert!(err.is_credential_unavailable());
}

#[test]
fn p0_non_base64_chunk_is_rejected() {
    let jar = RequestCookies::parse("testcookie1=%%%%not-base64%%%%");
    let err = build_auth_header(&SessionCredential::Split, &jar, &config(5)).unwrap_err();
    assert!(err.is_credential_unavailable());
}

#[test]
fn p0_empty_secondary_cookie_counts_as_missing() {
    let jar = RequestCookies::parse("testcookie1=; testcookie2=abcd");
    let err = build_auth_header(&SessionCredential::Split, &jar, &config(5)).unwrap_err();
    assert!(err.to_string().contains("chunk 1"), "unexpected error: {err}");
}

//! Signature validation through the full resolver.

use http::StatusCode;

use image_request_resolver::{
    sign_path, ImageRequestEvent, ResolveError, StaticSecretProvider, StoredObject,
};

use super::test_utils::*;

const PATH: &str = "/image/abc/large";

fn store() -> MockObjectStore {
    store_with("abc", StoredObject::new(PNG_HEADER).with_content_type("image/png"))
}

#[tokio::test]
async fn test_valid_signature_resolves() {
    let secrets = CountingSecretProvider::with_signing_key();
    let resolver = signed_resolver(store(), secrets.clone());

    let signature = sign_path(SIGNING_KEY, PATH).unwrap();
    let event = ImageRequestEvent::new(PATH).with_query("signature", signature);

    let request = resolver.resolve(&event).await.unwrap();
    assert_eq!(request.key, "content/abc");
    assert_eq!(secrets.calls(), 1);
}

#[tokio::test]
async fn test_signature_from_uri() {
    let resolver = signed_resolver(store(), CountingSecretProvider::with_signing_key());

    let signature = sign_path(SIGNING_KEY, PATH).unwrap();
    let event = ImageRequestEvent::from_uri(&format!("{}?signature={}", PATH, signature));

    assert!(resolver.resolve(&event).await.is_ok());
}

#[tokio::test]
async fn test_missing_signature_skips_secret_lookup() {
    let secrets = CountingSecretProvider::with_signing_key();
    let store = store();
    let resolver = signed_resolver(store.clone(), secrets.clone());

    let err = resolver
        .resolve(&ImageRequestEvent::new(PATH))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::MissingSignature));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(secrets.calls(), 0);
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_wrong_signature_is_forbidden() {
    let store = store();
    let resolver = signed_resolver(store.clone(), CountingSecretProvider::with_signing_key());

    let signature = sign_path("some-other-key", PATH).unwrap();
    let event = ImageRequestEvent::new(PATH).with_query("signature", signature);

    let err = resolver.resolve(&event).await.unwrap_err();
    assert!(matches!(err, ResolveError::SignatureMismatch));
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.code(), "SignatureDoesNotMatch");
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_signature_for_other_path_is_forbidden() {
    let resolver = signed_resolver(store(), CountingSecretProvider::with_signing_key());

    let signature = sign_path(SIGNING_KEY, "/image/abc/small").unwrap();
    let event = ImageRequestEvent::new(PATH).with_query("signature", signature);

    let err = resolver.resolve(&event).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unavailable_secret_is_internal_error() {
    let secrets = CountingSecretProvider::new(StaticSecretProvider::new());
    let resolver = signed_resolver(store(), secrets.clone());

    let event = ImageRequestEvent::new(PATH).with_query("signature", "deadbeef");
    let err = resolver.resolve(&event).await.unwrap_err();

    assert!(matches!(err, ResolveError::SignatureValidation { .. }));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(secrets.calls(), 1);
}

#[tokio::test]
async fn test_malformed_secret_is_internal_error() {
    let secrets = CountingSecretProvider::new(
        StaticSecretProvider::new().with_secret(SECRET_ID, r#"{"wrong-field":"x"}"#),
    );
    let resolver = signed_resolver(store(), secrets);

    let event = ImageRequestEvent::new(PATH).with_query("signature", "deadbeef");
    let err = resolver.resolve(&event).await.unwrap_err();

    assert_eq!(err.code(), "SignatureValidationFailure");
}

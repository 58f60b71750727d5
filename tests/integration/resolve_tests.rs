//! End-to-end resolution tests.

use bytes::Bytes;
use http::StatusCode;

use image_request_resolver::{
    Edit, Fit, ImageRequestEvent, OutputFormat, ResolveError, ResolverConfig, SizeProfile,
    StoredObject,
};

use super::test_utils::*;

#[tokio::test]
async fn test_large_profile_without_metadata() {
    let store = store_with("abc", StoredObject::new(&b"hello\n"[..]));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store.clone());

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/large"))
        .await
        .unwrap();

    assert_eq!(request.bucket, BUCKET);
    assert_eq!(request.key, "content/abc");
    assert_eq!(request.content_type, "image");
    assert_eq!(request.original_image, Bytes::from_static(b"hello\n"));
    assert_eq!(request.output_format, None);

    let resize = request.edits.resize().unwrap();
    assert_eq!(resize.width, Some(1000));
    assert_eq!(resize.height, Some(1000));
    assert_eq!(resize.fit, Fit::Inside);
    assert_eq!(request.edits.quality(OutputFormat::Webp), Some(95));
    assert_eq!(request.edits.quality(OutputFormat::Jpeg), Some(95));
    assert!(!request.edits.contains_key("blur"));

    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn test_every_profile_resolves_from_table() {
    for profile in SizeProfile::ALL {
        let store = store_with("abc", StoredObject::new(JPEG_HEADER).with_content_type("image/jpeg"));
        let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

        let path = format!("/image/abc/{}", profile.name());
        let request = resolver.resolve(&ImageRequestEvent::new(path)).await.unwrap();

        let resize = request.edits.resize().unwrap();
        assert_eq!(resize.width, Some(profile.dimension()));
        assert_eq!(resize.height, Some(profile.dimension()));
        assert_eq!(
            request.edits.quality(OutputFormat::Webp),
            Some(profile.quality())
        );
        assert_eq!(
            request.edits.quality(OutputFormat::Jpeg),
            Some(profile.quality())
        );
        assert_eq!(
            request.edits.contains_key("blur"),
            profile == SizeProfile::Placeholder,
            "{}",
            profile
        );
    }
}

#[tokio::test]
async fn test_placeholder_adds_blur() {
    let store = store_with("abc", StoredObject::new(PNG_HEADER).with_content_type("image/png"));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/placeholder"))
        .await
        .unwrap();

    assert!(matches!(request.edits.get("blur"), Some(Edit::Blur(_))));
}

#[tokio::test]
async fn test_unknown_profile_resolves_without_size() {
    let store = store_with("abc", StoredObject::new(PNG_HEADER).with_content_type("image/png"));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/enormous"))
        .await
        .unwrap();

    let resize = request.edits.resize().unwrap();
    assert_eq!(resize.width, None);
    assert_eq!(resize.height, None);
    assert_eq!(request.edits.quality(OutputFormat::Webp), None);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["edits"]["resize"], serde_json::json!({"fit": "inside"}));
}

#[tokio::test]
async fn test_generic_content_type_is_sniffed() {
    let store = store_with(
        "abc",
        StoredObject::new(PNG_HEADER).with_content_type("binary/octet-stream"),
    );
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/small"))
        .await
        .unwrap();

    assert_eq!(request.content_type, "image/png");
}

#[tokio::test]
async fn test_generic_content_type_with_unknown_bytes_fails() {
    let store = store_with(
        "abc",
        StoredObject::new(vec![0u8; 32]).with_content_type("binary/octet-stream"),
    );
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let err = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/small"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::UnsupportedImageType));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "RequestTypeError");
}

#[tokio::test]
async fn test_reported_content_type_trusted_verbatim() {
    let store = store_with(
        "abc",
        StoredObject::new(&b"not really a gif"[..]).with_content_type("image/gif"),
    );
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/small"))
        .await
        .unwrap();

    assert_eq!(request.content_type, "image/gif");
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let store = store_with("abc", StoredObject::new(PNG_HEADER));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let err = resolver
        .resolve(&ImageRequestEvent::new("/image/missing/small"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ObjectNotFound { ref key, .. } if key == "content/missing"));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_internal() {
    let resolver = unsigned_resolver(
        ResolverConfig::new(BUCKET),
        MockObjectStore::failing("AccessDenied"),
    );

    let err = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/small"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Storage { .. }));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_invalid_override_rejected_before_fetch() {
    let store = store_with("abc", StoredObject::new(PNG_HEADER));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store.clone());

    let event = ImageRequestEvent::from_uri("/image/abc/small?format=bmp");
    let err = resolver.resolve(&event).await.unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_headers_passed_through() {
    let store = store_with("abc", StoredObject::new(PNG_HEADER).with_content_type("image/png"));
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), store);

    let event = ImageRequestEvent::new("/image/abc/small")
        .with_query("headers", r#"{"Cache-Control":"max-age=60"}"#);
    let request = resolver.resolve(&event).await.unwrap();

    let headers = request.headers.unwrap();
    assert_eq!(
        headers.get("Cache-Control").map(String::as_str),
        Some("max-age=60")
    );
}

#[tokio::test]
async fn test_allowed_source_buckets() {
    let config = ResolverConfig::new(BUCKET).with_source_buckets(" image-bucket , other ");
    let resolver = unsigned_resolver(config, MockObjectStore::new());
    assert_eq!(
        resolver.allowed_source_buckets().unwrap(),
        vec!["image-bucket", "other"]
    );

    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), MockObjectStore::new());
    let err = resolver.allowed_source_buckets().unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

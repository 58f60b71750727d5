//! Output format negotiation through the full resolver.

use image_request_resolver::{ImageRequestEvent, OutputFormat, ResolverConfig, StoredObject};

use super::test_utils::*;

fn jpeg_store() -> MockObjectStore {
    store_with("abc", StoredObject::new(JPEG_HEADER).with_content_type("image/jpeg"))
}

fn svg_store() -> MockObjectStore {
    store_with("abc", StoredObject::new(SVG_BODY).with_content_type("image/svg+xml"))
}

#[tokio::test]
async fn test_auto_webp_with_accept_header() {
    let config = ResolverConfig::new(BUCKET).with_auto_webp(true);
    let resolver = unsigned_resolver(config, jpeg_store());

    let event = ImageRequestEvent::new("/image/abc/large")
        .with_header("Accept", "image/avif,image/webp,image/*,*/*;q=0.8");
    let request = resolver.resolve(&event).await.unwrap();

    assert_eq!(request.output_format, Some(OutputFormat::Webp));
    assert_eq!(request.content_type, "image/webp");
    // The competing jpeg quality key is folded into webp
    assert!(!request.edits.contains_key("jpeg"));
    assert_eq!(request.edits.quality(OutputFormat::Webp), Some(95));
}

#[tokio::test]
async fn test_auto_webp_disabled_ignores_accept() {
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), jpeg_store());

    let event = ImageRequestEvent::new("/image/abc/large").with_header("Accept", "image/webp");
    let request = resolver.resolve(&event).await.unwrap();

    assert_eq!(request.output_format, None);
    assert_eq!(request.content_type, "image/jpeg");
    assert!(request.edits.contains_key("jpeg"));
    assert!(request.edits.contains_key("webp"));
}

#[tokio::test]
async fn test_auto_webp_without_webp_accept_uses_requested_format() {
    let config = ResolverConfig::new(BUCKET).with_auto_webp(true);
    let resolver = unsigned_resolver(config, jpeg_store());

    let event = ImageRequestEvent::from_uri("/image/abc/medium?format=jpeg")
        .with_header("Accept", "image/png");
    let request = resolver.resolve(&event).await.unwrap();

    assert_eq!(request.output_format, Some(OutputFormat::Jpeg));
    assert_eq!(request.content_type, "image/jpeg");
    assert!(!request.edits.contains_key("webp"));
    assert_eq!(request.edits.quality(OutputFormat::Jpeg), Some(90));
}

#[tokio::test]
async fn test_requested_png_keeps_ambiguous_quality_keys() {
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), jpeg_store());

    let event = ImageRequestEvent::from_uri("/image/abc/small?format=png");
    let request = resolver.resolve(&event).await.unwrap();

    assert_eq!(request.output_format, Some(OutputFormat::Png));
    assert_eq!(request.content_type, "image/png");
    assert_eq!(request.edits.quality(OutputFormat::Webp), Some(80));
    assert_eq!(request.edits.quality(OutputFormat::Jpeg), Some(80));
    assert!(!request.edits.contains_key("png"));
}

#[tokio::test]
async fn test_reduction_effort_for_webp() {
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), jpeg_store());

    let event = ImageRequestEvent::from_uri("/image/abc/large?format=webp&effort=5.9");
    let request = resolver.resolve(&event).await.unwrap();
    assert_eq!(request.reduction_effort, Some(5));

    let event = ImageRequestEvent::from_uri("/image/abc/large?format=webp&effort=high");
    let request = resolver.resolve(&event).await.unwrap();
    assert_eq!(request.reduction_effort, Some(4));

    let event = ImageRequestEvent::from_uri("/image/abc/large?format=webp");
    let request = resolver.resolve(&event).await.unwrap();
    assert_eq!(request.reduction_effort, None);
}

#[tokio::test]
async fn test_svg_with_profile_edits_becomes_png() {
    let resolver = unsigned_resolver(ResolverConfig::new(BUCKET), svg_store());

    let request = resolver
        .resolve(&ImageRequestEvent::new("/image/abc/small"))
        .await
        .unwrap();

    assert_eq!(request.output_format, Some(OutputFormat::Png));
    assert_eq!(request.content_type, "image/png");
}

#[tokio::test]
async fn test_svg_with_auto_webp_becomes_webp() {
    let config = ResolverConfig::new(BUCKET).with_auto_webp(true);
    let resolver = unsigned_resolver(config, svg_store());

    let event = ImageRequestEvent::new("/image/abc/small").with_header("Accept", "image/webp");
    let request = resolver.resolve(&event).await.unwrap();

    assert_eq!(request.output_format, Some(OutputFormat::Webp));
    assert_eq!(request.content_type, "image/webp");
}

#[tokio::test]
async fn test_resolution_is_deterministic() {
    let config = ResolverConfig::new(BUCKET).with_auto_webp(true);
    let resolver = unsigned_resolver(config, jpeg_store());
    let event = ImageRequestEvent::new("/image/abc/large").with_header("Accept", "image/webp");

    let first = serde_json::to_value(resolver.resolve(&event).await.unwrap()).unwrap();
    let second = serde_json::to_value(resolver.resolve(&event).await.unwrap()).unwrap();
    assert_eq!(first, second);
}

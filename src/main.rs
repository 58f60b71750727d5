//! Image request resolver CLI.
//!
//! Resolves request URIs against S3, signs request paths and sniffs local
//! image files.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_request_resolver::{
    config::{Cli, Command, ResolveArgs, SignArgs, SniffArgs, DEFAULT_SECRET_CACHE_CAPACITY},
    create_s3_client, infer_content_type, sign_path, signed_url, CachedSecretProvider,
    FileSecretProvider, ImageRequestEvent, ImageRequestResolver, ResolveError, S3ObjectStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::Sign(args) => run_sign(args),
        Command::Sniff(args) => run_sniff(args).await,
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

async fn run_resolve(args: ResolveArgs) -> ExitCode {
    if let Err(e) = args.resolver.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("  Default bucket: {}", args.resolver.default_bucket);
    match args.resolver.allowed_source_buckets() {
        Ok(buckets) => info!("  Source buckets: {}", buckets.join(", ")),
        Err(_) => info!("  Source buckets: not configured"),
    }
    if args.resolver.enable_signature {
        info!("  Signatures: required");
    } else {
        warn!("  Signatures: DISABLED - unsigned requests are accepted");
    }
    info!(
        "  Auto-WebP: {}",
        if args.resolver.auto_webp { "on" } else { "off" }
    );

    let client = create_s3_client(args.s3_endpoint.as_deref(), &args.s3_region).await;
    let secrets = CachedSecretProvider::new(
        FileSecretProvider::new(&args.secrets_dir),
        DEFAULT_SECRET_CACHE_CAPACITY,
    );
    let resolver = ImageRequestResolver::new(args.resolver, S3ObjectStore::new(client), secrets);

    let mut event = ImageRequestEvent::from_uri(&args.uri);
    if let Some(accept) = &args.accept {
        event = event.with_header("Accept", accept);
    }
    for (name, value) in &args.headers {
        event = event.with_header(name, value);
    }

    match resolver.resolve(&event).await {
        Ok(request) => {
            let mut json = match serde_json::to_value(&request) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize resolved request: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(object) = json.as_object_mut() {
                object.insert(
                    "originalImageSize".to_string(),
                    request.original_image.len().into(),
                );
            }
            print_json(&json);
            ExitCode::SUCCESS
        }
        Err(err) => print_error(&err),
    }
}

// =============================================================================
// Sign Command
// =============================================================================

fn run_sign(args: SignArgs) -> ExitCode {
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let signature = match sign_path(&args.secret, &args.path) {
        Ok(signature) => signature,
        Err(err) => return print_error(&err),
    };
    println!("{}", signature);

    if let Some(base_url) = &args.base_url {
        match signed_url(base_url, &args.secret, &args.path) {
            Ok(url) => println!("{}", url),
            Err(err) => return print_error(&err),
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Sniff Command
// =============================================================================

async fn run_sniff(args: SniffArgs) -> ExitCode {
    let bytes = match tokio::fs::read(&args.file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", args.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match infer_content_type(&bytes) {
        Ok(content_type) => {
            println!("{}", content_type);
            ExitCode::SUCCESS
        }
        Err(err) => print_error(&err),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to render JSON: {}", e),
    }
}

fn print_error(err: &ResolveError) -> ExitCode {
    match serde_json::to_value(err.to_response()) {
        Ok(json) => print_json(&json),
        Err(_) => eprintln!("Error: {}", err),
    }
    ExitCode::FAILURE
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_request_resolver=debug"
    } else {
        "image_request_resolver=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

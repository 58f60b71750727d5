//! Request signature validation and the secret providers it relies on.

mod secrets;
mod signature;

pub use secrets::{CachedSecretProvider, FileSecretProvider, SecretProvider, StaticSecretProvider};
pub use signature::{
    extract_secret_field, sign_path, signed_url, SignatureValidator, SIGNATURE_PARAM,
};

use crate::{
    api,
    auth::{AuthConfig, AuthService},
    store::JsonFileStore,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub data_file: PathBuf,
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_url: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the user store cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let store = JsonFileStore::open(&args.data_file)
        .await
        .with_context(|| format!("Failed to open user store: {}", args.data_file.display()))?;

    debug!("User store: {}", store.path().display());

    let config = AuthConfig::new(args.jwt_secret).with_token_ttl_seconds(args.token_ttl_seconds);

    if config.uses_default_secret() {
        warn!("Using the built-in development JWT secret; set COACHIQ_JWT_SECRET in production");
    }

    let auth = Arc::new(AuthService::new(Arc::new(store), config));

    api::new(args.port, auth, args.frontend_url).await
}

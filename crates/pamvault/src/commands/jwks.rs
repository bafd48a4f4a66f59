//! Show the vault encryption key

use anyhow::Result;

use super::{client_from_env, login_with_key};
use crate::cli::JwksArgs;
use crate::output;

pub async fn run(args: JwksArgs) -> Result<()> {
    let client = client_from_env()?;
    let (_token, key) = login_with_key(&client).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&key)?);
        return Ok(());
    }

    output::header("Vault encryption key");
    output::kv("Key id", key.kid.as_deref().unwrap_or("-"));
    output::kv("Algorithm", key.alg.as_deref().unwrap_or("-"));
    output::kv("Key type", &key.kty);
    if let Some(key_use) = &key.key_use {
        output::kv("Use", key_use);
    }
    Ok(())
}

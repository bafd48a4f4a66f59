//! Secret create, update and reveal commands

use anyhow::Result;
use pamvault_secrets::SecretMetadata;

use super::{client_from_env, login, login_with_key, parse_payload, render_plaintext};
use crate::cli::{CreateArgs, RevealArgs, UpdateArgs};
use crate::output;

pub async fn create(args: CreateArgs) -> Result<()> {
    let payload = parse_payload(&args.payload)?;
    let client = client_from_env()?;
    let config = client.config();

    let folder = args.folder.unwrap_or_else(|| config.parent_folder_id.clone());
    let metadata = match args.name {
        Some(name) => SecretMetadata::new(name, folder),
        None => SecretMetadata::generated(folder),
    }
    .with_description(args.description.or_else(|| config.secret_description.clone()));

    let (token, key) = login_with_key(&client).await?;
    let spinner = output::spinner("Creating secret...");
    let created = client.create_secret(&token, &key, &metadata, &payload).await;
    spinner.finish_and_clear();
    let secret_id = created?;

    output::success(&format!("Created secret {}", metadata.name));
    println!("{}", secret_id);
    Ok(())
}

pub async fn update(args: UpdateArgs) -> Result<()> {
    let payload = parse_payload(&args.payload)?;
    let client = client_from_env()?;
    let config = client.config();

    let folder = args.folder.unwrap_or_else(|| config.parent_folder_id.clone());
    let metadata = SecretMetadata::new(args.name, folder)
        .with_description(args.description.or_else(|| config.secret_description.clone()));

    let (token, key) = login_with_key(&client).await?;
    let spinner = output::spinner("Updating secret...");
    let updated = client
        .update_secret(&token, &key, &args.secret_id, &metadata, &payload)
        .await;
    spinner.finish_and_clear();
    let secret_id = updated?;

    output::success(&format!("Updated secret {}", metadata.name));
    println!("{}", secret_id);
    Ok(())
}

pub async fn reveal(args: RevealArgs) -> Result<()> {
    let client = client_from_env()?;
    let token = login(&client).await?;

    let spinner = output::spinner("Revealing secret...");
    let revealed = client.reveal_secret(&token, &args.secret_id).await;
    spinner.finish_and_clear();
    let revealed = revealed?;

    if args.raw {
        use std::io::Write;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(revealed.as_bytes())?;
        stdout.flush()?;
    } else {
        println!("{}", render_plaintext(revealed.as_str()?, false));
    }
    Ok(())
}

//! Full store-and-reveal flow

use anyhow::Result;
use pamvault_secrets::SecretMetadata;

use super::{client_from_env, login_with_key, parse_payload, render_plaintext};
use crate::cli::DemoArgs;
use crate::output;

pub async fn run(args: DemoArgs) -> Result<()> {
    let payload = parse_payload(&args.payload)?;
    let client = client_from_env()?;

    output::header("Storing and revealing a secret");
    let (token, key) = login_with_key(&client).await?;
    output::success(&format!(
        "Logged in, using key {}",
        key.kid.as_deref().unwrap_or("(no kid)")
    ));

    let metadata = SecretMetadata::generated(&client.config().parent_folder_id)
        .with_description(client.config().secret_description.clone());
    let spinner = output::spinner("Creating secret...");
    let created = client.create_secret(&token, &key, &metadata, &payload).await;
    spinner.finish_and_clear();
    let secret_id = created?;
    output::success("Created secret");
    output::kv("Name", &metadata.name);
    output::kv("Id", &secret_id);

    let spinner = output::spinner("Revealing secret...");
    let revealed = client.reveal_secret(&token, &secret_id).await;
    spinner.finish_and_clear();
    let revealed = revealed?;
    output::success("Revealed secret");
    println!("{}", render_plaintext(revealed.as_str()?, false));

    Ok(())
}

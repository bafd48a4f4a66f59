//! Secret folder creation

use anyhow::Result;
use pamvault_secrets::SecretMetadata;

use super::{client_from_env, login};
use crate::cli::FolderArgs;
use crate::output;

pub async fn run(args: FolderArgs) -> Result<()> {
    let client = client_from_env()?;
    let config = client.config();

    let parent = args.parent.unwrap_or_else(|| config.parent_folder_id.clone());
    let metadata = SecretMetadata::new(args.name, parent)
        .with_description(args.description.or_else(|| config.secret_description.clone()));

    let token = login(&client).await?;
    let folder_id = client.create_folder(&token, &metadata).await?;

    output::success(&format!("Created folder {}", metadata.name));
    println!("{}", folder_id);
    Ok(())
}

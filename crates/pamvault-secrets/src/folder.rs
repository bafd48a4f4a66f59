//! Secret folder creation

use crate::client::{expect_status, read_json, BearerToken, PamClient};
use crate::types::SecretMetadata;
use crate::writer::object_id;
use pamvault_core::types::FolderRequest;
use pamvault_core::{AuditLog, Error, Result};
use reqwest::StatusCode;
use tracing::info;

impl PamClient {
    /// Create a folder and return its id
    ///
    /// Anything but `201 Created` fails with [`Error::Folder`].
    pub async fn create_folder(
        &self,
        token: &BearerToken,
        metadata: &SecretMetadata,
    ) -> Result<String> {
        let result: Result<String> = async {
            let url = self.config.secret_folders_url();
            let body = FolderRequest {
                name: &metadata.name,
                parent_folder_id: &metadata.parent_folder_id,
                description: metadata.description.as_deref(),
            };
            let response = self
                .authorized(self.http.post(&url), token)
                .json(&body)
                .send()
                .await?;
            let response = expect_status(response, StatusCode::CREATED, |status, body| {
                Error::Folder { status, body }
            })
            .await?;

            let id = object_id(read_json(response, "folder creation").await?)?;
            info!(name = %metadata.name, id = %id, "Created secret folder");
            Ok(id)
        }
        .await;
        AuditLog::record("create_folder", &metadata.name, result)
    }
}

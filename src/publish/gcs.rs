use super::ObjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_storage::{
    client::{Client, ClientConfig},
    http::objects::upload::{Media, UploadObjectRequest, UploadType},
};
use tracing::{debug, info};

/// Google Cloud Storage, authenticated through Application Default Credentials.
pub struct GcsStore {
    client: Client,
}

impl GcsStore {
    pub async fn connect(project_id: &str) -> Result<Self> {
        let mut config = ClientConfig::default()
            .with_auth()
            .await
            .context("authenticating to GCS")?;
        config.project_id = Some(project_id.to_string());
        info!(project_id, "GCS client ready");

        Ok(Self {
            client: Client::new(config),
        })
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let mut media = Media::new(key.to_string());
        media.content_type = content_type.to_string().into();
        media.content_length = Some(body.len() as u64);

        let request = UploadObjectRequest {
            bucket: bucket.to_string(),
            ..Default::default()
        };

        let object = self
            .client
            .upload_object(&request, body, &UploadType::Simple(media))
            .await
            .with_context(|| format!("uploading {} to GCS bucket {}", key, bucket))?;

        debug!(object = %object.name, size = object.size, "stored");
        Ok(())
    }
}

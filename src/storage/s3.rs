use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error, info};

use crate::storage::BlobStore;

pub struct S3BlobStore {
    client: Client,
    bucket_name: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket_name: impl Into<String>) -> Self {
        Self {
            client,
            bucket_name: bucket_name.into(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        debug!(
            "Writing to S3 bucket {} with key: {}",
            self.bucket_name, key
        );

        if let Err(e) = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
        {
            error!(
                "S3 PUT failed - Bucket: {}, Key: {}, Size: {} bytes",
                self.bucket_name,
                key,
                data.len()
            );
            return Err(anyhow!(
                "Failed to write to S3: {}",
                DisplayErrorContext(&e)
            ));
        }

        info!(
            "Stored {} bytes in s3://{}/{}",
            data.len(),
            self.bucket_name,
            key
        );
        Ok(())
    }
}

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AWS_REGION: &str = "ap-southeast-2";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v1";
pub const DEFAULT_BUCKET: &str = "ai-image-generator-store";
pub const DEFAULT_PROMPTS_TABLE: &str = "ImagePrompts";
pub const DEFAULT_IMAGES_TABLE: &str = "GeneratedImages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Aws,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(StorageBackend::Aws),
            "local" => Ok(StorageBackend::Local),
            other => Err(anyhow!(
                "unknown STORAGE_BACKEND `{other}`, expected `aws` or `local`"
            )),
        }
    }
}

/// Read-only settings shared by every invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub aws_region: String,
    pub bedrock_region: String,
    pub model_id: String,
    pub storage_backend: StorageBackend,
    pub bucket: String,
    pub prompts_table: String,
    pub images_table: String,
    pub storage_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let port = var("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Aws,
        };
        let storage_dir = var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_dir);

        Ok(Self {
            port,
            aws_region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            bedrock_region: var("BEDROCK_REGION")
                .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string()),
            model_id: var("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            storage_backend,
            bucket: var("IMAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            prompts_table: var("PROMPTS_TABLE")
                .unwrap_or_else(|| DEFAULT_PROMPTS_TABLE.to_string()),
            images_table: var("IMAGES_TABLE").unwrap_or_else(|| DEFAULT_IMAGES_TABLE.to_string()),
            storage_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn default_storage_dir() -> PathBuf {
    let mut base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("titan-image-generator");
    base
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.aws_region, "ap-southeast-2");
        assert_eq!(config.bedrock_region, "us-east-1");
        assert_eq!(config.model_id, "amazon.titan-image-generator-v1");
        assert_eq!(config.storage_backend, StorageBackend::Aws);
        assert_eq!(config.bucket, "ai-image-generator-store");
        assert_eq!(config.prompts_table, "ImagePrompts");
        assert_eq!(config.images_table, "GeneratedImages");
        assert!(config.storage_dir.ends_with("titan-image-generator"));
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("AWS_REGION", "eu-west-1"),
            ("STORAGE_BACKEND", "Local"),
            ("STORAGE_DIR", "/tmp/images"),
            ("IMAGE_BUCKET", "bucket"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/images"));
        assert_eq!(config.bucket, "bucket");
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config =
            Config::from_lookup(lookup(&[("PORT", "not-a-port"), ("AWS_REGION", "  ")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.aws_region, "ap-southeast-2");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = Config::from_lookup(lookup(&[("STORAGE_BACKEND", "gcs")])).unwrap_err();
        assert!(err.to_string().contains("gcs"));
    }
}

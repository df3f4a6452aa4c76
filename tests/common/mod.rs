#![allow(dead_code)]
//! In-memory stand-ins for the inference service and the two stores.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use titan_image_generator::bedrock::ImageGenerator;
use titan_image_generator::error::GenerationError;
use titan_image_generator::handler::Handler;
use titan_image_generator::storage::{BlobStore, ImageRecord, PromptRecord, RecordStore};

pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

pub fn png_base64() -> String {
    STANDARD.encode(PNG_BYTES)
}

#[derive(Clone)]
pub enum Outcome {
    Image(String),
    Blocked,
    Fault,
}

pub struct FakeGenerator {
    outcome: Outcome,
    pub calls: Mutex<Vec<(String, u32, u32)>>,
}

impl FakeGenerator {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), width, height));
        match &self.outcome {
            Outcome::Image(image) => Ok(image.clone()),
            Outcome::Blocked => Err(GenerationError::Blocked),
            Outcome::Fault => Err(GenerationError::Service(anyhow!("throttled"))),
        }
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    pub fail: bool,
    pub blobs: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl MemoryBlobStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn blobs(&self) -> Vec<(String, Vec<u8>, String)> {
        self.blobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("bucket unavailable"));
        }
        self.blobs
            .lock()
            .unwrap()
            .push((key.to_string(), data.to_vec(), content_type.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    pub fail_images: bool,
    pub prompts: Mutex<Vec<PromptRecord>>,
    pub images: Mutex<Vec<ImageRecord>>,
}

impl MemoryRecordStore {
    pub fn failing_images() -> Self {
        Self {
            fail_images: true,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<PromptRecord> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<ImageRecord> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put_prompt(&self, record: &PromptRecord) -> Result<()> {
        self.prompts.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn put_image(&self, record: &ImageRecord) -> Result<()> {
        if self.fail_images {
            return Err(anyhow!("table unavailable"));
        }
        self.images.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct Harness {
    pub generator: Arc<FakeGenerator>,
    pub blobs: Arc<MemoryBlobStore>,
    pub records: Arc<MemoryRecordStore>,
    pub handler: Handler,
}

impl Harness {
    pub fn new(outcome: Outcome) -> Self {
        Self::with_blobs(outcome, MemoryBlobStore::default())
    }

    pub fn with_blobs(outcome: Outcome, blobs: MemoryBlobStore) -> Self {
        Self::with_stores(outcome, blobs, MemoryRecordStore::default())
    }

    pub fn with_stores(
        outcome: Outcome,
        blobs: MemoryBlobStore,
        records: MemoryRecordStore,
    ) -> Self {
        let generator = Arc::new(FakeGenerator::new(outcome));
        let blobs = Arc::new(blobs);
        let records = Arc::new(records);
        let handler = Handler::new(generator.clone(), blobs.clone(), records.clone());
        Self {
            generator,
            blobs,
            records,
            handler,
        }
    }
}

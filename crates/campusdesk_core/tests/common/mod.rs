#![allow(dead_code)]

use campusdesk_core::media::MediaResult;
use campusdesk_core::store::{Document, Fields, StoreResult};
use campusdesk_core::{
    DestroyOutcome, DocumentQuery, DocumentStore, MediaError, MediaFile, MediaHost, ResourceKind,
    SqliteDocumentStore, StoreError, UploadedAsset,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    UploadUnsigned { file_name: String, folder: Option<String> },
    UploadSigned { file_name: String, kind: ResourceKind, folder: Option<String> },
    Destroy { public_id: String, kind: ResourceKind },
}

/// Media host double that records calls and hands out predictable assets.
#[derive(Default)]
pub struct FakeMedia {
    calls: Mutex<Vec<MediaCall>>,
    counter: AtomicUsize,
    pub fail_uploads: AtomicBool,
    pub fail_destroys: AtomicBool,
}

impl FakeMedia {
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MediaCall::Destroy { public_id, .. } => Some(public_id),
                _ => None,
            })
            .collect()
    }

    fn next_asset(&self, kind: ResourceKind, folder: Option<&str>, file: &MediaFile) -> UploadedAsset {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let folder = folder.unwrap_or("root");
        let (public_id, url) = match kind {
            ResourceKind::Image => (
                format!("{folder}/asset{n}"),
                format!("https://res.cloudinary.com/demo/image/upload/v100{n}/{folder}/asset{n}.jpg"),
            ),
            ResourceKind::Raw => (
                format!("{folder}/asset{n}.pdf"),
                format!("https://res.cloudinary.com/demo/raw/upload/v100{n}/{folder}/asset{n}.pdf"),
            ),
        };
        UploadedAsset {
            public_id,
            secure_url: url,
            resource_type: kind.as_str().to_string(),
            format: None,
            bytes: file.bytes.len() as u64,
        }
    }

    fn upload_failure(&self) -> MediaResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Status {
                status: 400,
                body: "upload rejected".to_string(),
            });
        }
        Ok(())
    }
}

impl MediaHost for FakeMedia {
    fn upload_unsigned(&self, file: &MediaFile, folder: Option<&str>) -> MediaResult<UploadedAsset> {
        self.calls.lock().unwrap().push(MediaCall::UploadUnsigned {
            file_name: file.file_name.clone(),
            folder: folder.map(str::to_string),
        });
        self.upload_failure()?;
        Ok(self.next_asset(ResourceKind::Image, folder, file))
    }

    fn upload_signed(
        &self,
        file: &MediaFile,
        kind: ResourceKind,
        folder: Option<&str>,
    ) -> MediaResult<UploadedAsset> {
        self.calls.lock().unwrap().push(MediaCall::UploadSigned {
            file_name: file.file_name.clone(),
            kind,
            folder: folder.map(str::to_string),
        });
        self.upload_failure()?;
        Ok(self.next_asset(kind, folder, file))
    }

    fn destroy(&self, public_id: &str, kind: ResourceKind) -> MediaResult<DestroyOutcome> {
        self.calls.lock().unwrap().push(MediaCall::Destroy {
            public_id: public_id.to_string(),
            kind,
        });
        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(MediaError::Status {
                status: 500,
                body: "destroy failed".to_string(),
            });
        }
        Ok(DestroyOutcome::Deleted)
    }
}

/// SQLite store whose writes can be switched to fail.
pub struct FlakyStore {
    pub inner: SqliteDocumentStore,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteDocumentStore::open_in_memory().unwrap(),
            fail_writes: AtomicBool::new(false),
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl DocumentStore for FlakyStore {
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        self.check()?;
        self.inner.add(collection, fields)
    }

    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        self.check()?;
        self.inner.set(collection, id, fields)
    }

    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        self.check()?;
        self.inner.update(collection, id, fields)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.delete(collection, id)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id)
    }

    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        self.inner.query(collection, query)
    }
}

pub fn image(name: &str) -> MediaFile {
    MediaFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn pdf(name: &str) -> MediaFile {
    MediaFile::new(name, "application/pdf", b"%PDF-1.4".to_vec())
}

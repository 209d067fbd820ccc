use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::api::transport::{RequestOptions, Transport};
use crate::error::{ClientError, ClientResult};

const UPLOAD_PATH: &str = "/upload";
const FILE_FIELD: &str = "file";

/// A local file held in memory for a single-shot upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime_type(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    fn into_form(self) -> ClientResult<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| ClientError::Decode(format!("invalid mime type: {}", e)))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    public_url: String,
}

/// Posts files to the upload endpoint and resolves the stored object's
/// public URL.
pub struct Uploader {
    transport: Arc<Transport>,
    public_base: String,
}

impl Uploader {
    pub fn new(transport: Arc<Transport>, public_base: impl Into<String>) -> Self {
        Self {
            transport,
            public_base: public_base.into(),
        }
    }

    /// Upload one file and return its fully qualified public URL
    pub async fn upload(&self, file: UploadFile) -> ClientResult<String> {
        let file_name = file.file_name.clone();
        let size = file.bytes.len();
        let form = file.into_form()?;

        let response: UploadResponse = self
            .transport
            .request_as(UPLOAD_PATH, RequestOptions::multipart(form))
            .await?;

        let url = join_public_url(&self.public_base, &response.public_url);
        info!("Uploaded {} ({} bytes) to {}", file_name, size, url);
        Ok(url)
    }

    pub async fn upload_path(&self, path: impl AsRef<Path>) -> ClientResult<String> {
        let file = UploadFile::from_path(path).await?;
        self.upload(file).await
    }
}

/// The one place that knows how a stored object's relative path becomes a
/// browsable URL.
pub fn join_public_url(prefix: &str, relative: &str) -> String {
    if relative.starts_with("http://") || relative.starts_with("https://") {
        return relative.to_string();
    }
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

//! Contract documents and the storage collaborator trait.
//!
//! Documents live in an external file store. Only their metadata row is
//! modelled here; the bytes are fetched on demand.

use std::future::Future;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Metadata for one stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub id:           Uuid,
  pub contract_id:  String,
  pub name:         String,
  pub mime_type:    String,
  pub size_bytes:   u64,
  pub uploaded_at:  DateTime<Utc>,
  /// Object key inside the storage bucket.
  pub storage_path: String,
  /// SHA-256 hex digest of the content.
  #[serde(default)]
  pub content_hash: String,
}

impl Document {
  /// Build the metadata row for a file about to be uploaded.
  ///
  /// The storage path depends only on the contract, the content and the file
  /// name, so uploading the same file twice targets the same object.
  pub fn prepare(contract_id: &str, file_name: &str, content: &[u8]) -> Self {
    let hash = content_hash(content);
    Self {
      id:           Uuid::new_v4(),
      contract_id:  contract_id.to_owned(),
      name:         file_name.to_owned(),
      mime_type:    guess_mime_type(file_name).to_owned(),
      size_bytes:   content.len() as u64,
      uploaded_at:  Utc::now(),
      storage_path: storage_path(contract_id, file_name, &hash),
      content_hash: hash,
    }
  }
}

/// SHA-256 hex digest of `content`.
pub fn content_hash(content: &[u8]) -> String { hex::encode(Sha256::digest(content)) }

/// `{contract_id}/{first 12 hash chars}-{sanitised name}`.
pub fn storage_path(contract_id: &str, file_name: &str, hash: &str) -> String {
  let prefix: String = hash.chars().take(12).collect();
  format!("{}/{prefix}-{}", sanitise(contract_id), sanitise(file_name))
}

fn sanitise(segment: &str) -> String {
  segment
    .chars()
    .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
    .collect()
}

/// MIME type from the file extension; unknown extensions are opaque bytes.
pub fn guess_mime_type(file_name: &str) -> &'static str {
  let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
  match ext.as_str() {
    "pdf" => "application/pdf",
    "doc" => "application/msword",
    "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "xls" => "application/vnd.ms-excel",
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "txt" => "text/plain",
    "md" => "text/markdown",
    _ => "application/octet-stream",
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the document storage collaborator.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Metadata for every document attached to `contract_id`, newest first.
  fn list_documents<'a>(
    &'a self,
    contract_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Fetch the content of `document`.
  fn download_document<'a>(
    &'a self,
    document: &'a Document,
  ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send + 'a;

  /// Store `content` under `contract_id` and return the recorded metadata.
  fn upload_document<'a>(
    &'a self,
    contract_id: &'a str,
    file_name: &'a str,
    content: Bytes,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + 'a;
}

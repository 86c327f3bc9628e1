//! HTTP clients for the two external collaborators: document storage and
//! deep-search analysis.

use std::time::Duration;

use bytes::Bytes;
use doris_core::{
  analysis::Analyzer,
  document::{Document, DocumentStore},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SYSTEM_PROMPT: &str = "Jsi asistent pro analýzu veřejných zakázek. Pomáháš úředníkům \
                             vyhodnotit rizika spojená se subjekty zadávajícími zakázky.";

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("server returned {status}: {body}")]
  Server { status: u16, body: String },

  #[error("chybí API klíč")]
  MissingKey,

  #[error("odpověď neobsahuje žádný text")]
  EmptyCompletion,
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

fn http_client() -> Result<Client> {
  Ok(Client::builder().timeout(Duration::from_secs(60)).build()?)
}

/// Turn a non-2xx response into [`ClientError::Server`].
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(ClientError::Server { status: status.as_u16(), body })
}

// ─── Document storage ────────────────────────────────────────────────────────

/// Connection settings for the document backend.
#[derive(Debug, Clone)]
pub struct StorageConfig {
  pub base_url: String,
  pub api_key:  String,
  pub bucket:   String,
}

/// Client for a REST + object-storage backend holding contract documents.
///
/// Metadata rows live in a `documents` table; content lives in a bucket
/// under [`Document::storage_path`].
#[derive(Clone)]
pub struct DocumentClient {
  client: Client,
  config: StorageConfig,
}

impl DocumentClient {
  pub fn new(config: StorageConfig) -> Result<Self> {
    Ok(Self { client: http_client()?, config })
  }

  fn base(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn table_url(&self) -> String { format!("{}/rest/v1/documents", self.base()) }

  fn object_url(&self, storage_path: &str) -> String {
    format!("{}/storage/v1/object/{}/{storage_path}", self.base(), self.config.bucket)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }

  /// Insert the metadata row for an already stored object.
  async fn insert_row(&self, document: &Document) -> Result<Vec<Document>> {
    let resp = self
      .auth(self.client.post(self.table_url()))
      .header("Prefer", "return=representation")
      .json(document)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }
}

impl DocumentStore for DocumentClient {
  type Error = ClientError;

  async fn list_documents(&self, contract_id: &str) -> Result<Vec<Document>> {
    let resp = self
      .auth(self.client.get(self.table_url()))
      .query(&[
        ("select", "*".to_owned()),
        ("contract_id", format!("eq.{contract_id}")),
        ("order", "uploaded_at.desc".to_owned()),
      ])
      .send()
      .await?;
    let documents: Vec<Document> = check(resp).await?.json().await?;
    tracing::debug!(contract_id, count = documents.len(), "listed documents");
    Ok(documents)
  }

  async fn download_document(&self, document: &Document) -> Result<Bytes> {
    let resp = self
      .auth(self.client.get(self.object_url(&document.storage_path)))
      .send()
      .await?;
    let content = check(resp).await?.bytes().await?;
    tracing::info!(path = %document.storage_path, size = content.len(), "downloaded document");
    Ok(content)
  }

  async fn upload_document(
    &self,
    contract_id: &str,
    file_name: &str,
    content: Bytes,
  ) -> Result<Document> {
    let document = Document::prepare(contract_id, file_name, &content);

    let resp = self
      .auth(self.client.post(self.object_url(&document.storage_path)))
      .header("x-upsert", "true")
      .header(reqwest::header::CONTENT_TYPE, &document.mime_type)
      .body(content)
      .send()
      .await?;
    check(resp).await?;

    let mut rows = self.insert_row(&document).await.inspect_err(|err| {
      tracing::warn!(
        contract_id,
        path = %document.storage_path,
        error = %err,
        "document stored but metadata insert failed; object is orphaned"
      );
    })?;

    tracing::info!(
      contract_id,
      path = %document.storage_path,
      size = document.size_bytes,
      "uploaded document"
    );
    Ok(if rows.is_empty() { document } else { rows.swap_remove(0) })
  }
}

// ─── Analysis ────────────────────────────────────────────────────────────────

/// Connection settings for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
  pub url:     String,
  pub api_key: String,
  pub model:   String,
}

/// Deep-search client backed by an OpenAI-compatible chat-completion API.
#[derive(Clone)]
pub struct AnalysisClient {
  client: Client,
  config: AnalysisConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:    &'a str,
  messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
  #[serde(default)]
  content: Option<String>,
}

impl AnalysisClient {
  pub fn new(config: AnalysisConfig) -> Result<Self> {
    Ok(Self { client: http_client()?, config })
  }
}

fn user_prompt(subject_name: &str) -> String {
  format!(
    "Prověř subjekt s názvem: \"{subject_name}\". Dej mi přehledné shrnutí o jeho \
     důvěryhodnosti, historických aktivitách ve veřejných zakázkách a případných rizicích."
  )
}

impl Analyzer for AnalysisClient {
  type Error = ClientError;

  async fn analyze(&self, subject_name: &str) -> Result<String> {
    if self.config.api_key.trim().is_empty() {
      return Err(ClientError::MissingKey);
    }

    let prompt = user_prompt(subject_name);
    let request = ChatRequest {
      model:    &self.config.model,
      messages: [
        ChatMessage { role: "system", content: SYSTEM_PROMPT },
        ChatMessage { role: "user", content: &prompt },
      ],
    };

    tracing::info!(subject = subject_name, model = %self.config.model, "deep search started");
    let resp = self
      .client
      .post(&self.config.url)
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await?;
    let reply: ChatResponse = check(resp).await?.json().await?;

    reply
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .filter(|content| !content.trim().is_empty())
      .ok_or(ClientError::EmptyCompletion)
  }
}

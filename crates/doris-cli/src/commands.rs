//! Non-interactive subcommands: print pipeline output and talk to the
//! collaborators from the shell.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use bytes::Bytes;
use doris_core::{
  analysis::analyze_or_placeholder,
  contract::{Contract, ContractStatus},
  document::DocumentStore,
  query::{FilterState, SortBy, apply},
  similarity::similar_contracts,
  store::ContractStore,
};
use doris_store::MemoryStore;

use crate::{
  app::download_path,
  client::{AnalysisClient, AnalysisConfig, DocumentClient, StorageConfig},
  settings::Settings,
  ui::format,
};

/// Arguments of `doris list`.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
  /// Exact sector name.
  #[arg(long)]
  pub sector: Option<String>,

  /// Exact region name.
  #[arg(long)]
  pub region: Option<String>,

  /// Minimum contract value in CZK.
  #[arg(long)]
  pub min: Option<f64>,

  /// Maximum contract value in CZK.
  #[arg(long)]
  pub max: Option<f64>,

  /// risk_low, risk_high, value_low or value_high.
  #[arg(long, default_value = "")]
  pub sort: String,

  /// Which status bucket to print.
  #[arg(long, default_value = "active")]
  pub status: String,

  /// Print JSON instead of a table.
  #[arg(long)]
  pub json: bool,
}

impl ListArgs {
  fn filters(&self) -> FilterState {
    let mut filters = FilterState::default();
    filters.sector = self.sector.clone().unwrap_or_default();
    filters.region = self.region.clone().unwrap_or_default();
    filters.sort_by = SortBy::parse_lossy(&self.sort);
    filters.with_value_range(self.min, self.max)
  }
}

// ─── Wiring ───────────────────────────────────────────────────────────────────

/// The seed file if configured, otherwise the built-in demo contracts.
pub async fn open_store(settings: &Settings) -> anyhow::Result<MemoryStore> {
  match &settings.seed_path {
    Some(path) => MemoryStore::open(path)
      .await
      .with_context(|| format!("failed to load contracts from {}", path.display())),
    None => MemoryStore::builtin().context("failed to load built-in contracts"),
  }
}

pub fn document_client(settings: &Settings) -> anyhow::Result<Option<DocumentClient>> {
  let Some(base_url) = settings.storage_url.clone().filter(|_| settings.storage_configured())
  else {
    return Ok(None);
  };
  let client = DocumentClient::new(StorageConfig {
    base_url,
    api_key: settings.storage_key.clone(),
    bucket: settings.storage_bucket.clone(),
  })
  .context("failed to build document client")?;
  Ok(Some(client))
}

pub fn analysis_client(settings: &Settings) -> anyhow::Result<AnalysisClient> {
  AnalysisClient::new(AnalysisConfig {
    url:     settings.analysis_url.clone(),
    api_key: settings.analysis_key.clone(),
    model:   settings.analysis_model.clone(),
  })
  .context("failed to build analysis client")
}

fn require_documents(settings: &Settings) -> anyhow::Result<DocumentClient> {
  document_client(settings)?.context("document storage is not configured (set storage_url)")
}

async fn require_contract(store: &MemoryStore, id: &str) -> anyhow::Result<Contract> {
  store.get(id).await?.with_context(|| format!("contract not found: {id}"))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

pub async fn list(settings: &Settings, args: &ListArgs) -> anyhow::Result<()> {
  let status = ContractStatus::parse(&args.status)?;
  let contracts = open_store(settings).await?.list().await?;
  let partitions = apply(&contracts, &args.filters());
  let rows = partitions.get(status);

  if args.json {
    println!("{}", serde_json::to_string_pretty(rows)?);
    return Ok(());
  }

  println!("{} ({})", status.label(), rows.len());
  for contract in rows {
    println!("{}", row(contract));
  }
  Ok(())
}

pub async fn similar(settings: &Settings, id: &str, limit: usize) -> anyhow::Result<()> {
  let store = open_store(settings).await?;
  let reference = require_contract(&store, id).await?;
  let contracts = store.list().await?;

  let similar = similar_contracts(&reference, &contracts, Some(limit));
  if similar.is_empty() {
    println!("Žádné zakázky ve stejném sektoru ({}).", reference.sector);
  }
  for entry in similar {
    println!(
      "{}  sektor {:>3}  cena {:>3.0}  závažnost {:>3}",
      row(entry.contract),
      entry.score.sector,
      entry.score.price,
      entry.score.severity,
    );
  }
  Ok(())
}

pub async fn docs(settings: &Settings, id: &str) -> anyhow::Result<()> {
  let client = require_documents(settings)?;
  let documents = client.list_documents(id).await?;
  if documents.is_empty() {
    println!("Žádné dokumenty.");
  }
  for doc in documents {
    println!(
      "{:<40} {:>10}  {}  {}",
      doc.name,
      format::file_size(doc.size_bytes),
      doc.uploaded_at.format("%Y-%m-%d %H:%M"),
      doc.mime_type,
    );
  }
  Ok(())
}

pub async fn upload(settings: &Settings, id: &str, file: &Path) -> anyhow::Result<()> {
  let store = open_store(settings).await?;
  require_contract(&store, id).await?;
  let client = require_documents(settings)?;

  let file_name = file
    .file_name()
    .and_then(|n| n.to_str())
    .with_context(|| format!("not a file name: {}", file.display()))?;
  let content = tokio::fs::read(file)
    .await
    .with_context(|| format!("reading {}", file.display()))?;

  let document = client.upload_document(id, file_name, Bytes::from(content)).await?;
  println!(
    "{} ({}) -> {}",
    document.name,
    format::file_size(document.size_bytes),
    document.storage_path
  );
  Ok(())
}

pub async fn download(
  settings: &Settings,
  id: &str,
  name: &str,
  out: Option<PathBuf>,
) -> anyhow::Result<()> {
  let client = require_documents(settings)?;
  let documents = client.list_documents(id).await?;
  let Some(document) = documents.iter().find(|d| d.name == name) else {
    bail!("document {name:?} not found for contract {id}");
  };

  let content = client.download_document(document).await?;
  let dir = out.unwrap_or_else(|| settings.download_dir.clone());
  let dest = download_path(&dir, &document.name);
  tokio::fs::write(&dest, &content)
    .await
    .with_context(|| format!("writing {}", dest.display()))?;
  println!("{}", dest.display());
  Ok(())
}

pub async fn analyze(settings: &Settings, subject: &str) -> anyhow::Result<()> {
  let client = analysis_client(settings)?;
  println!("{}", analyze_or_placeholder(&client, subject).await);
  Ok(())
}

fn row(contract: &Contract) -> String {
  let risk = contract.risk_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
  format!(
    "{:>4}  {:>3}  {:>14}  {:<60}",
    contract.id,
    risk,
    format::money(contract.value),
    format::ellipsize(&contract.title, 60),
  )
}

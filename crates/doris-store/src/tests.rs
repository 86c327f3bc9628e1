//! Tests for `MemoryStore` against the built-in seed and small inline seeds.

use doris_core::{
  analysis::AnalysisTarget,
  contract::ContractStatus,
  store::{ContractStore, MoveDirection},
};

use crate::{Error, MemoryStore, parse_seed};

async fn store() -> MemoryStore { MemoryStore::builtin().expect("built-in seed") }

async fn ids(store: &MemoryStore) -> Vec<String> {
  store.list().await.unwrap().into_iter().map(|c| c.id).collect()
}

fn record(id: &str, status: &str) -> String {
  format!(
    r#"{{
      "id": "{id}",
      "title": "Zakázka {id}",
      "sector": "ICT",
      "region": "Zlínský kraj",
      "contracting_authority": "Obec",
      "value": 1000,
      "deadline": "2024-07-01",
      "created_at": "2024-06-01",
      "status": "{status}"
    }}"#
  )
}

fn seed(records: &[String]) -> String { format!("[{}]", records.join(",")) }

// ─── Seed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn builtin_seed_loads_in_order() {
  let s = store().await;
  assert_eq!(s.len().await, 8);
  assert!(!s.is_empty().await);
  assert_eq!(ids(&s).await, ["1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[tokio::test]
async fn builtin_seed_covers_every_status() {
  let contracts = store().await.list().await.unwrap();
  for status in [
    ContractStatus::Active,
    ContractStatus::Bookmarked,
    ContractStatus::Hidden,
    ContractStatus::Completed,
  ] {
    assert!(contracts.iter().any(|c| c.status == status), "no {status} contract in seed");
  }
}

#[test]
fn duplicate_ids_are_rejected() {
  let json = seed(&[record("1", "active"), record("1", "hidden")]);
  let err = MemoryStore::from_json(&json).unwrap_err();
  assert!(matches!(err, Error::Core(doris_core::Error::DuplicateContract(ref id)) if id == "1"));
}

#[test]
fn unknown_status_is_rejected() {
  let json = seed(&[record("1", "archived")]);
  assert!(matches!(parse_seed(&json), Err(Error::Json(_))));
}

#[test]
fn malformed_seed_is_rejected() {
  assert!(matches!(MemoryStore::from_json("{ not json"), Err(Error::Json(_))));
}

#[tokio::test]
async fn open_reads_seed_file() {
  let dir = tempfile::TempDir::new().unwrap();
  let path = dir.path().join("contracts.json");
  tokio::fs::write(&path, seed(&[record("a", "active"), record("b", "completed")]))
    .await
    .unwrap();

  let s = MemoryStore::open(&path).await.unwrap();
  assert_eq!(ids(&s).await, ["a", "b"]);
}

#[tokio::test]
async fn open_missing_file_is_io_error() {
  let result = MemoryStore::open("/nonexistent/doris/contracts.json").await;
  assert!(matches!(result, Err(Error::Io(_))));
}

// ─── Insert / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_appends_and_rejects_duplicates() {
  let s = MemoryStore::default();
  assert!(s.is_empty().await);

  let contracts = parse_seed(&seed(&[record("x", "active"), record("y", "active")])).unwrap();
  for contract in contracts.clone() {
    s.insert(contract).await.unwrap();
  }
  assert_eq!(ids(&s).await, ["x", "y"]);

  let err = s.insert(contracts[0].clone()).await.unwrap_err();
  assert!(matches!(err, Error::Core(doris_core::Error::DuplicateContract(_))));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("nope").await.unwrap().is_none());
  assert_eq!(s.get("4").await.unwrap().unwrap().status, ContractStatus::Bookmarked);
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_status_keeps_canonical_position() {
  let s = store().await;
  let before = ids(&s).await;

  let updated = s.set_status("3", ContractStatus::Hidden).await.unwrap();
  assert_eq!(updated.status, ContractStatus::Hidden);

  assert_eq!(ids(&s).await, before);
  assert_eq!(s.get("3").await.unwrap().unwrap().status, ContractStatus::Hidden);
}

#[tokio::test]
async fn set_status_unknown_id_is_not_found() {
  let s = store().await;
  let before = s.list().await.unwrap();

  let err = s.set_status("999", ContractStatus::Completed).await.unwrap_err();
  assert!(matches!(err, Error::Core(doris_core::Error::ContractNotFound(ref id)) if id == "999"));
  assert_eq!(s.list().await.unwrap(), before);
}

#[tokio::test]
async fn toggling_twice_returns_to_active() {
  let s = store().await;
  let current = s.get("1").await.unwrap().unwrap().status;

  let next = current.toggled(ContractStatus::Bookmarked);
  s.set_status("1", next).await.unwrap();
  let again = s.get("1").await.unwrap().unwrap().status.toggled(ContractStatus::Bookmarked);
  let contract = s.set_status("1", again).await.unwrap();

  assert_eq!(contract.status, ContractStatus::Active);
}

// ─── Move ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn move_swaps_with_neighbour() {
  let s = store().await;

  s.move_contract("3", MoveDirection::Up).await.unwrap();
  assert_eq!(ids(&s).await, ["1", "3", "2", "4", "5", "6", "7", "8"]);

  s.move_contract("3", MoveDirection::Down).await.unwrap();
  assert_eq!(ids(&s).await, ["1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[tokio::test]
async fn move_past_either_end_is_noop() {
  let s = store().await;
  let before = ids(&s).await;

  s.move_contract("1", MoveDirection::Up).await.unwrap();
  s.move_contract("8", MoveDirection::Down).await.unwrap();

  assert_eq!(ids(&s).await, before);
}

#[tokio::test]
async fn move_unknown_id_is_not_found() {
  let s = store().await;
  let err = s.move_contract("missing", MoveDirection::Down).await.unwrap_err();
  assert!(matches!(err, Error::Core(doris_core::Error::ContractNotFound(_))));
}

#[tokio::test]
async fn move_ignores_status_buckets() {
  let s = store().await;
  // "4" is bookmarked and "5" active; the canonical order is shared.
  s.move_contract("5", MoveDirection::Up).await.unwrap();
  assert_eq!(ids(&s).await, ["1", "2", "3", "5", "4", "6", "7", "8"]);
}

// ─── Analysis ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_analysis_fills_matching_field() {
  let s = store().await;

  let updated = s
    .set_analysis("3", AnalysisTarget::Supplier, "## Shrnutí\nBez nálezů.".into())
    .await
    .unwrap();
  assert_eq!(updated.supplier_analysis.as_deref(), Some("## Shrnutí\nBez nálezů."));
  assert_eq!(updated.analysis, None);

  let stored = s.get("3").await.unwrap().unwrap();
  assert_eq!(stored, updated);
}

#[tokio::test]
async fn set_analysis_overwrites_previous_report() {
  let s = store().await;
  s.set_analysis("2", AnalysisTarget::Authority, "nová zpráva".into()).await.unwrap();
  let stored = s.get("2").await.unwrap().unwrap();
  assert_eq!(stored.analysis.as_deref(), Some("nová zpráva"));
}

#[tokio::test]
async fn clones_share_state() {
  let a = store().await;
  let b = a.clone();
  a.set_status("7", ContractStatus::Completed).await.unwrap();
  assert_eq!(b.get("7").await.unwrap().unwrap().status, ContractStatus::Completed);
}

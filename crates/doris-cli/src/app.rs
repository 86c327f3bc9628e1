//! Dashboard state machine and event dispatcher.

use std::{
  collections::{BTreeSet, HashSet},
  path::{Path, PathBuf},
  sync::Arc,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use doris_core::{
  analysis::{AnalysisTarget, analyze_or_placeholder},
  contract::{Contract, ContractStatus, ValueCategory},
  document::{Document, DocumentStore},
  query::{FilterState, Partitions, SortBy, apply},
  similarity::{SimilarContract, similar_contracts},
  store::{ContractStore, MoveDirection},
};
use doris_store::MemoryStore;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use crate::client::{AnalysisClient, DocumentClient};

/// How many similar contracts the detail pane lists.
pub const SIMILAR_LIMIT: usize = 5;

// ─── Focus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// Keyboard drives the contract list.
  List,
  /// Keyboard drives the detail pane of the selected contract.
  Detail,
}

// ─── Background results ───────────────────────────────────────────────────────

/// Results of background collaborator calls, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
  Analysis {
    contract_id: String,
    target:      AnalysisTarget,
    report:      String,
  },
  Documents {
    contract_id: String,
    result:      Result<Vec<Document>, String>,
  },
  Downloaded {
    result: Result<PathBuf, String>,
  },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub focus: Focus,

  /// Status bucket shown in the list pane.
  pub tab: ContractStatus,

  /// Snapshot of the store in canonical order; refreshed after mutations.
  pub contracts: Vec<Contract>,

  pub filters: FilterState,

  /// Quick-find query, applied on top of the pipeline output.
  pub query: String,

  /// Whether the user is typing a quick-find query.
  pub query_active: bool,

  /// Cursor position within [`App::visible`].
  pub list_cursor: usize,

  pub detail_scroll: u16,

  /// Id of the contract shown in the detail pane.
  pub selected_id: Option<String>,

  /// Documents of `documents_for`, newest first.
  pub documents: Vec<Document>,
  pub documents_for: Option<String>,
  pub documents_loading: bool,
  pub document_cursor: usize,

  /// Deep searches in flight, by contract and party.
  pub analysing: HashSet<(String, AnalysisTarget)>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  store:        MemoryStore,
  doc_client:   Option<Arc<DocumentClient>>,
  analyzer:     Arc<AnalysisClient>,
  download_dir: PathBuf,
  events_tx:    mpsc::UnboundedSender<AppEvent>,
  events_rx:    mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
  pub fn new(
    store: MemoryStore,
    doc_client: Option<DocumentClient>,
    analyzer: AnalysisClient,
    download_dir: PathBuf,
  ) -> Self {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    Self {
      focus: Focus::List,
      tab: ContractStatus::Active,
      contracts: Vec::new(),
      filters: FilterState::default(),
      query: String::new(),
      query_active: false,
      list_cursor: 0,
      detail_scroll: 0,
      selected_id: None,
      documents: Vec::new(),
      documents_for: None,
      documents_loading: false,
      document_cursor: 0,
      analysing: HashSet::new(),
      status_msg: String::new(),
      store,
      doc_client: doc_client.map(Arc::new),
      analyzer: Arc::new(analyzer),
      download_dir,
      events_tx,
      events_rx,
    }
  }

  // ── Data ──────────────────────────────────────────────────────────────────

  /// Reload the contract snapshot from the store.
  pub async fn load_contracts(&mut self) -> anyhow::Result<()> {
    self.contracts = self.store.list().await?;
    self.clamp_cursor();
    Ok(())
  }

  /// Pipeline output for every tab under the current filters.
  pub fn partitions(&self) -> Partitions<'_> { apply(&self.contracts, &self.filters) }

  /// Contracts listed in the current tab, after quick-find narrowing.
  pub fn visible(&self) -> Vec<&Contract> {
    let partitions = self.partitions();
    let tab = partitions.get(self.tab);
    if self.query.is_empty() {
      return tab.to_vec();
    }
    let matcher = SkimMatcherV2::default();
    tab
      .iter()
      .copied()
      .filter(|c| {
        matcher.fuzzy_match(&c.title, &self.query).is_some()
          || matcher.fuzzy_match(&c.contracting_authority, &self.query).is_some()
      })
      .collect()
  }

  pub fn cursor_contract(&self) -> Option<&Contract> {
    self.visible().get(self.list_cursor).copied()
  }

  pub fn selected(&self) -> Option<&Contract> {
    let id = self.selected_id.as_deref()?;
    self.contracts.iter().find(|c| c.id == id)
  }

  /// Same-sector contracts for the detail pane, best price match first.
  pub fn similar(&self) -> Vec<SimilarContract<'_>> {
    match self.selected() {
      Some(reference) => similar_contracts(reference, &self.contracts, Some(SIMILAR_LIMIT)),
      None => Vec::new(),
    }
  }

  pub fn documents_configured(&self) -> bool { self.doc_client.is_some() }

  pub fn is_analysing(&self, contract_id: &str, target: AnalysisTarget) -> bool {
    self.analysing.contains(&(contract_id.to_owned(), target))
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  /// The contract keyboard actions apply to: the open detail, else the cursor row.
  fn target_id(&self) -> Option<String> {
    match self.focus {
      Focus::Detail => self.selected_id.clone(),
      Focus::List => self.cursor_contract().map(|c| c.id.clone()),
    }
  }

  // ── Background events ─────────────────────────────────────────────────────

  /// Apply every finished background call without blocking.
  pub async fn drain_events(&mut self) -> anyhow::Result<()> {
    while let Ok(event) = self.events_rx.try_recv() {
      self.handle_event(event).await?;
    }
    Ok(())
  }

  pub async fn handle_event(&mut self, event: AppEvent) -> anyhow::Result<()> {
    match event {
      AppEvent::Analysis { contract_id, target, report } => {
        self.analysing.remove(&(contract_id.clone(), target));
        self.store.set_analysis(&contract_id, target, report).await?;
        self.load_contracts().await?;
        self.status_msg = format!("Hloubková analýza dokončena: {}", target.label());
      }
      AppEvent::Documents { contract_id, result } => {
        if self.documents_for.as_deref() != Some(contract_id.as_str()) {
          return Ok(());
        }
        self.documents_loading = false;
        self.document_cursor = 0;
        match result {
          Ok(documents) => {
            self.status_msg = format!("Načteno dokumentů: {}", documents.len());
            self.documents = documents;
          }
          Err(e) => {
            self.documents.clear();
            self.status_msg = format!("Chyba při načítání dokumentů: {e}");
          }
        }
      }
      AppEvent::Downloaded { result } => {
        self.status_msg = match result {
          Ok(path) => format!("Staženo do {}", path.display()),
          Err(e) => format!("Stažení selhalo: {e}"),
        };
      }
    }
    Ok(())
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Press the `target` status button on the acted-on contract.
  async fn toggle_status(&mut self, target: ContractStatus) -> anyhow::Result<()> {
    let Some(id) = self.target_id() else { return Ok(()) };
    let Some(current) = self.contracts.iter().find(|c| c.id == id).map(|c| c.status) else {
      return Ok(());
    };
    let next = current.toggled(target);
    self.store.set_status(&id, next).await?;
    self.load_contracts().await?;
    self.status_msg = format!("Přesunuto do: {}", next.label());
    Ok(())
  }

  async fn move_cursor_contract(&mut self, direction: MoveDirection) -> anyhow::Result<()> {
    let Some(id) = self.cursor_contract().map(|c| c.id.clone()) else { return Ok(()) };
    self.store.move_contract(&id, direction).await?;
    self.load_contracts().await?;
    // Keep the cursor on the moved contract.
    if let Some(pos) = self.visible().iter().position(|c| c.id == id) {
      self.list_cursor = pos;
    }
    Ok(())
  }

  fn start_analysis(&mut self, target: AnalysisTarget) {
    let Some(contract) = self.selected() else { return };
    let contract_id = contract.id.clone();
    let name = target.subject_name(contract).map(str::to_owned);
    let Some(name) = name else {
      self.status_msg = format!("Smlouva nemá uvedený subjekt: {}", target.label());
      return;
    };
    if !self.analysing.insert((contract_id.clone(), target)) {
      return;
    }
    self.status_msg = format!("Probíhá hloubková analýza: {name}");

    let analyzer = Arc::clone(&self.analyzer);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let report = analyze_or_placeholder(analyzer.as_ref(), &name).await;
      tx.send(AppEvent::Analysis { contract_id, target, report }).ok();
    });
  }

  fn load_documents(&mut self) {
    let Some(contract_id) = self.selected_id.clone() else { return };
    let Some(client) = self.doc_client.clone() else {
      self.status_msg = "Úložiště dokumentů není nakonfigurováno".into();
      return;
    };
    self.documents.clear();
    self.documents_for = Some(contract_id.clone());
    self.documents_loading = true;
    self.status_msg = "Načítám dokumenty…".into();

    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = client.list_documents(&contract_id).await.map_err(|e| e.to_string());
      tx.send(AppEvent::Documents { contract_id, result }).ok();
    });
  }

  fn download_selected_document(&mut self) {
    let Some(document) = self.documents.get(self.document_cursor).cloned() else { return };
    let Some(client) = self.doc_client.clone() else { return };
    let dest = download_path(&self.download_dir, &document.name);
    self.status_msg = format!("Stahuji {}…", document.name);

    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result: Result<PathBuf, String> = async {
        let content = client.download_document(&document).await.map_err(|e| e.to_string())?;
        tokio::fs::write(&dest, &content).await.map_err(|e| e.to_string())?;
        Ok(dest)
      }
      .await;
      tx.send(AppEvent::Downloaded { result }).ok();
    });
  }

  fn cycle_sector(&mut self) {
    let sectors: BTreeSet<&str> = self.contracts.iter().map(|c| c.sector.as_str()).collect();
    self.filters.sector = cycle_names(&sectors, &self.filters.sector);
  }

  fn cycle_region(&mut self) {
    let regions: BTreeSet<&str> = self.contracts.iter().map(|c| c.region.as_str()).collect();
    self.filters.region = cycle_names(&regions, &self.filters.region);
  }

  fn cycle_value_category(&mut self) {
    let next = match self.filters.value_category() {
      None => ValueCategory::iter().next(),
      Some(current) => ValueCategory::iter().skip_while(|c| *c != current).nth(1),
    };
    self.filters.set_value_category(next);
  }

  fn cycle_sort(&mut self) {
    let next = SortBy::iter()
      .cycle()
      .skip_while(|s| *s != self.filters.sort_by)
      .nth(1)
      .unwrap_or_default();
    self.filters.sort_by = next;
  }

  fn switch_tab(&mut self, forward: bool) {
    let tabs: Vec<ContractStatus> = ContractStatus::iter().collect();
    let pos = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
    let next = if forward { pos + 1 } else { pos + tabs.len() - 1 };
    self.tab = tabs[next % tabs.len()];
    self.list_cursor = 0;
  }

  fn open_detail(&mut self, id: String) {
    if self.selected_id.as_deref() != Some(id.as_str()) {
      self.documents.clear();
      self.documents_for = None;
      self.documents_loading = false;
      self.document_cursor = 0;
    }
    self.selected_id = Some(id);
    self.detail_scroll = 0;
    self.focus = Focus::Detail;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.query_active {
      self.handle_query_key(key);
      return Ok(true);
    }

    // Keys shared by both panes.
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('b') => self.toggle_status(ContractStatus::Bookmarked).await?,
      KeyCode::Char('h') => self.toggle_status(ContractStatus::Hidden).await?,
      KeyCode::Char('c') => self.toggle_status(ContractStatus::Completed).await?,
      _ => match self.focus {
        Focus::List => self.handle_list_key(key).await?,
        Focus::Detail => self.handle_detail_key(key),
      },
    }
    Ok(true)
  }

  fn handle_query_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.query_active = false;
        self.query.clear();
      }
      KeyCode::Enter => {
        self.query_active = false;
        // Open the detail directly when the query leaves a single match.
        let visible = self.visible();
        if let [only] = visible.as_slice() {
          let id = only.id.clone();
          self.open_detail(id);
        }
      }
      KeyCode::Backspace => {
        self.query.pop();
      }
      KeyCode::Char(c) => self.query.push(c),
      _ => {}
    }
    self.list_cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.visible().len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_contract().map(|c| c.id.clone()) {
          self.open_detail(id);
        }
      }

      KeyCode::Tab => self.switch_tab(true),
      KeyCode::BackTab => self.switch_tab(false),

      KeyCode::Char('s') => self.cycle_sector(),
      KeyCode::Char('r') => self.cycle_region(),
      KeyCode::Char('v') => self.cycle_value_category(),
      KeyCode::Char('o') => self.cycle_sort(),
      KeyCode::Char('x') => {
        self.filters.clear();
        self.query.clear();
      }
      KeyCode::Char('/') => {
        self.query_active = true;
        self.query.clear();
      }

      KeyCode::Char('K') => self.move_cursor_contract(MoveDirection::Up).await?,
      KeyCode::Char('J') => self.move_cursor_contract(MoveDirection::Down).await?,

      _ => return Ok(()),
    }
    self.clamp_cursor();
    Ok(())
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc | KeyCode::Left => {
        self.focus = Focus::List;
        self.selected_id = None;
      }
      KeyCode::Down | KeyCode::Char('j') => self.detail_scroll = self.detail_scroll.saturating_add(1),
      KeyCode::Up | KeyCode::Char('k') => self.detail_scroll = self.detail_scroll.saturating_sub(1),

      KeyCode::Char('1') => self.start_analysis(AnalysisTarget::Authority),
      KeyCode::Char('2') => self.start_analysis(AnalysisTarget::Supplier),
      KeyCode::Char('3') => self.start_analysis(AnalysisTarget::Administrator),

      KeyCode::Char('d') => self.load_documents(),
      KeyCode::Char(']') => {
        if self.document_cursor + 1 < self.documents.len() {
          self.document_cursor += 1;
        }
      }
      KeyCode::Char('[') => self.document_cursor = self.document_cursor.saturating_sub(1),
      KeyCode::Char('w') => self.download_selected_document(),

      _ => {}
    }
  }
}

/// Next entry after `current` in `names`; the empty string (no filter)
/// comes after the last entry and before the first.
fn cycle_names(names: &BTreeSet<&str>, current: &str) -> String {
  let next = if current.is_empty() {
    names.first()
  } else {
    names.iter().find(|name| **name > current)
  };
  next.map(|name| (*name).to_owned()).unwrap_or_default()
}

/// Where a downloaded document lands; only the final path component of the
/// stored name is used.
pub(crate) fn download_path(dir: &Path, name: &str) -> PathBuf {
  let file_name = Path::new(name)
    .file_name()
    .map(|n| n.to_os_string())
    .unwrap_or_else(|| "document".into());
  dir.join(file_name)
}

#[cfg(test)]
mod tests {
  use doris_core::analysis::is_placeholder;

  use super::*;
  use crate::client::AnalysisConfig;

  async fn app() -> App {
    let analyzer = AnalysisClient::new(AnalysisConfig {
      url:     "http://127.0.0.1:9/unused".into(),
      api_key: String::new(),
      model:   "gpt-4".into(),
    })
    .unwrap();
    let mut app = App::new(MemoryStore::builtin().unwrap(), None, analyzer, PathBuf::from("."));
    app.load_contracts().await.unwrap();
    app
  }

  async fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).await.unwrap()
  }

  fn visible_ids(app: &App) -> Vec<String> { app.visible().iter().map(|c| c.id.clone()).collect() }

  #[tokio::test]
  async fn starts_on_active_tab() {
    let app = app().await;
    assert_eq!(visible_ids(&app), ["1", "2", "3", "5", "7"]);
    let partitions = app.partitions();
    assert_eq!(partitions.count(ContractStatus::Bookmarked), 1);
    assert_eq!(partitions.count(ContractStatus::Hidden), 1);
    assert_eq!(partitions.count(ContractStatus::Completed), 1);
  }

  #[tokio::test]
  async fn tab_cycles_both_ways() {
    let mut app = app().await;
    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.tab, ContractStatus::Bookmarked);
    assert_eq!(visible_ids(&app), ["4"]);
    press(&mut app, KeyCode::BackTab).await;
    press(&mut app, KeyCode::BackTab).await;
    assert_eq!(app.tab, ContractStatus::Completed);
  }

  #[tokio::test]
  async fn bookmark_toggle_moves_between_tabs() {
    let mut app = app().await;
    // Cursor on "1".
    press(&mut app, KeyCode::Char('b')).await;
    assert!(!visible_ids(&app).contains(&"1".to_owned()));

    press(&mut app, KeyCode::Tab).await;
    assert_eq!(visible_ids(&app), ["1", "4"]);

    // Pressing bookmark again on a bookmarked contract returns it to active.
    press(&mut app, KeyCode::Char('b')).await;
    assert_eq!(visible_ids(&app), ["4"]);
    assert_eq!(app.selected(), None);
    let one = app.contracts.iter().find(|c| c.id == "1").unwrap();
    assert_eq!(one.status, ContractStatus::Active);
  }

  #[tokio::test]
  async fn cursor_stays_in_bounds_after_hiding_last_row() {
    let mut app = app().await;
    for _ in 0..10 {
      press(&mut app, KeyCode::Char('j')).await;
    }
    assert_eq!(app.list_cursor, 4);
    press(&mut app, KeyCode::Char('h')).await;
    assert_eq!(visible_ids(&app), ["1", "2", "3", "5"]);
    assert_eq!(app.list_cursor, 3);
  }

  #[tokio::test]
  async fn sector_filter_cycles_through_sorted_sectors() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('s')).await;
    assert_eq!(app.filters.sector, "Doprava");
    assert_eq!(visible_ids(&app), ["3"]);

    press(&mut app, KeyCode::Char('x')).await;
    assert!(app.filters.is_unconstrained());
    assert_eq!(visible_ids(&app).len(), 5);
  }

  #[test]
  fn cycle_names_wraps_to_empty() {
    let names: BTreeSet<&str> = ["A", "B"].into_iter().collect();
    assert_eq!(cycle_names(&names, ""), "A");
    assert_eq!(cycle_names(&names, "A"), "B");
    assert_eq!(cycle_names(&names, "B"), "");
  }

  #[tokio::test]
  async fn value_presets_cycle_and_filter() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(app.filters.value_category(), Some(ValueCategory::Low));
    assert_eq!(visible_ids(&app), ["3"]);

    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(app.filters.value_category(), Some(ValueCategory::Medium));
    assert_eq!(visible_ids(&app), ["1", "2", "5"]);

    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(visible_ids(&app), ["7"]);

    press(&mut app, KeyCode::Char('v')).await;
    assert_eq!(app.filters.value_category(), None);
  }

  #[tokio::test]
  async fn sort_cycles_and_reorders() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('o')).await;
    assert_eq!(app.filters.sort_by, SortBy::RiskLow);
    assert_eq!(visible_ids(&app), ["3", "5", "2", "1", "7"]);

    press(&mut app, KeyCode::Char('o')).await;
    assert_eq!(visible_ids(&app), ["7", "1", "2", "5", "3"]);

    for _ in 0..3 {
      press(&mut app, KeyCode::Char('o')).await;
    }
    assert_eq!(app.filters.sort_by, SortBy::None);
  }

  #[tokio::test]
  async fn move_keeps_cursor_on_contract() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('K')).await;
    assert_eq!(visible_ids(&app), ["2", "1", "3", "5", "7"]);
    assert_eq!(app.cursor_contract().unwrap().id, "2");

    // Top of the list: nothing to swap with.
    press(&mut app, KeyCode::Char('K')).await;
    assert_eq!(visible_ids(&app), ["2", "1", "3", "5", "7"]);
  }

  #[tokio::test]
  async fn quick_find_single_match_opens_detail() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('/')).await;
    for c in "autobus".chars() {
      press(&mut app, KeyCode::Char(c)).await;
    }
    assert_eq!(visible_ids(&app), ["3"]);
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.focus, Focus::Detail);
    assert_eq!(app.selected().unwrap().id, "3");
    // The query narrows the list until cleared.
    assert!(!app.query_active);
    assert_eq!(visible_ids(&app), ["3"]);
  }

  #[tokio::test]
  async fn quick_find_escape_restores_list() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('/')).await;
    for _ in 0..3 {
      press(&mut app, KeyCode::Char('q')).await;
    }
    assert!(visible_ids(&app).is_empty());
    press(&mut app, KeyCode::Esc).await;
    assert_eq!(visible_ids(&app).len(), 5);
  }

  #[tokio::test]
  async fn quit_key_stops_loop() {
    let mut app = app().await;
    assert!(!press(&mut app, KeyCode::Char('q')).await);
  }

  #[tokio::test]
  async fn similar_lists_same_sector_only() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Enter).await;
    let similar = app.similar();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].contract.id, "8");
    assert_eq!(similar[0].score.sector, 100);
  }

  #[tokio::test]
  async fn failed_deep_search_stores_placeholder() {
    let mut app = app().await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('2')).await;
    assert!(app.is_analysing("1", AnalysisTarget::Supplier));

    // A second press while loading does not start another search.
    press(&mut app, KeyCode::Char('2')).await;
    assert_eq!(app.analysing.len(), 1);

    let event = app.events_rx.recv().await.unwrap();
    app.handle_event(event).await.unwrap();

    assert!(!app.is_analysing("1", AnalysisTarget::Supplier));
    let report = app.selected().unwrap().supplier_analysis.clone().unwrap();
    assert!(is_placeholder(&report));
  }

  #[tokio::test]
  async fn deep_search_without_subject_is_skipped() {
    let mut app = app().await;
    // Contract "2" has no administrator.
    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('3')).await;
    assert!(app.analysing.is_empty());
    assert!(app.status_msg.contains("Administrátor"));
  }

  #[tokio::test]
  async fn documents_need_configured_storage() {
    let mut app = app().await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('d')).await;
    assert!(!app.documents_loading);
    assert!(!app.documents_configured());
  }

  #[tokio::test]
  async fn stale_document_results_are_ignored() {
    let mut app = app().await;
    app.documents_for = Some("1".into());
    app.documents_loading = true;
    app
      .handle_event(AppEvent::Documents { contract_id: "2".into(), result: Ok(Vec::new()) })
      .await
      .unwrap();
    assert!(app.documents_loading);
  }

  #[test]
  fn download_path_drops_directories() {
    let dir = Path::new("/tmp/doris");
    assert_eq!(download_path(dir, "../../etc/passwd"), dir.join("passwd"));
    assert_eq!(download_path(dir, "smlouva.pdf"), dir.join("smlouva.pdf"));
    assert_eq!(download_path(dir, ".."), dir.join("document"));
  }
}

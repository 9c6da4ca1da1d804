use crate::data::fetch::{FetchCache, ReqwestClient, CACHE_TTL, CSV_URL};
use crate::data::filter::{apply, FilterSpec};
use crate::data::model::Dataset;
use crate::data::resolve::Role;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Data source; fixed at build time.
    pub source_url: String,

    /// Per-URL payload cache with time-based expiry.
    cache: FetchCache,

    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Dataset>,

    /// Active query and per-role selections.
    pub filters: FilterSpec,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source_url: CSV_URL.to_string(),
            cache: FetchCache::new(CACHE_TTL),
            dataset: None,
            filters: FilterSpec::default(),
            visible_indices: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Run the load pipeline. On success the new dataset replaces the old
    /// one and all filters reset; on failure the previous dataset stays on
    /// screen and the error lands in `status_message`.
    pub fn load(&mut self) {
        match crate::data::load_dataset(&mut self.cache, &ReqwestClient, &self.source_url) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} rows, {} columns from {}",
                    dataset.table.len(),
                    dataset.table.headers.len(),
                    self.source_url
                );
                self.install_dataset(dataset);
            }
            Err(e) => {
                log::error!("load failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a freshly loaded dataset and reset the filter state.
    fn install_dataset(&mut self, dataset: Dataset) {
        self.visible_indices = (0..dataset.len()).collect();
        self.filters = FilterSpec::default();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = apply(&ds.table, &ds.bindings, &self.filters);
        }
    }

    /// Toggle a single value in a role's accepted set.
    pub fn toggle_filter_value(&mut self, role: Role, value: &str) {
        self.filters.toggle(role, value);
        self.refilter();
    }

    /// Drop a role's constraint entirely.
    pub fn clear_role(&mut self, role: Role) {
        self.filters.clear_role(role);
        self.refilter();
    }
}

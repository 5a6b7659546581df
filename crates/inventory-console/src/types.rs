//! Resource type catalog
//!
//! Holds the full list of resource types and a filtered view derived from it.
//! The filtered view is recomputed from the full list every time; it is never
//! narrowed incrementally.

use tracing::debug;

use crate::client::InventoryApi;
use crate::error::Result;
use crate::generation::{Applied, Generation};
use crate::model::ResourceType;
use crate::notify::{Notifier, report_error};

/// Substring filter over type identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    pub name: Option<String>,
    pub ignore_case: bool,
}

impl TypeFilter {
    pub fn new(name: Option<&str>, ignore_case: bool) -> Self {
        Self {
            name: name.map(String::from),
            ignore_case,
        }
    }

    /// Empty or absent filter text matches everything
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
    }

    pub fn matches(&self, type_id: &str) -> bool {
        match self.name.as_deref() {
            None | Some("") => true,
            Some(needle) if self.ignore_case => {
                type_id.to_lowercase().contains(&needle.to_lowercase())
            }
            Some(needle) => type_id.contains(needle),
        }
    }
}

/// Types whose identifier contains `substring`, in the order of `types`
pub fn filter_types(
    types: &[ResourceType],
    substring: Option<&str>,
    ignore_case: bool,
) -> Vec<ResourceType> {
    let filter = TypeFilter::new(substring, ignore_case);
    types
        .iter()
        .filter(|t| filter.matches(&t.id))
        .cloned()
        .collect()
}

/// Ticket for an in-flight type list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesTicket {
    generation: u64,
}

/// State of the Types view
#[derive(Debug, Default)]
pub struct TypeCatalog {
    all: Vec<ResourceType>,
    filtered: Vec<ResourceType>,
    filter: TypeFilter,
    generation: Generation,
    loading: bool,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known type, sorted by identifier
    pub fn all(&self) -> &[ResourceType] {
        &self.all
    }

    /// Types passing the current filter
    pub fn filtered(&self) -> &[ResourceType] {
        &self.filtered
    }

    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn find(&self, type_id: &str) -> Option<&ResourceType> {
        self.all.iter().find(|t| t.id == type_id)
    }

    /// Start a reload. Any reload issued before this call becomes stale.
    pub fn begin_load(&mut self) -> TypesTicket {
        self.loading = true;
        TypesTicket {
            generation: self.generation.advance(),
        }
    }

    /// Apply a type list result. The current filter is re-applied to the
    /// new list.
    pub fn apply_types(
        &mut self,
        ticket: TypesTicket,
        result: Result<Vec<ResourceType>>,
        notifier: &dyn Notifier,
    ) -> Result<Applied> {
        if !self.generation.is_current(ticket.generation) {
            debug!(
                "[Types] discarding types for stale generation {}",
                ticket.generation
            );
            return Ok(Applied::Stale);
        }
        self.loading = false;

        match result {
            Ok(mut types) => {
                types.sort_by(|a, b| a.id.cmp(&b.id));
                self.all = types;
                self.refilter();
                debug!("[Types] Types query returned [{}] types", self.all.len());
                debug!(
                    "[Types] Types query returned [{}] filtered types",
                    self.filtered.len()
                );
                Ok(Applied::Updated)
            }
            Err(e) => {
                report_error(notifier, "Types", &e);
                Err(e)
            }
        }
    }

    /// Fetch every resource type, sorted by identifier
    pub async fn load_types(
        &mut self,
        api: &dyn InventoryApi,
        notifier: &dyn Notifier,
    ) -> Result<&[ResourceType]> {
        let ticket = self.begin_load();
        let result = api.resource_types().await;
        self.apply_types(ticket, result, notifier)?;
        Ok(&self.all)
    }

    /// Filter the full list by identifier substring and remember the filter
    pub fn apply_filter(&mut self, substring: Option<&str>, ignore_case: bool) -> &[ResourceType] {
        debug!("[Types] Filter={:?} ignoreCase={}", substring, ignore_case);
        self.filter = TypeFilter::new(substring, ignore_case);
        self.refilter();
        &self.filtered
    }

    fn refilter(&mut self) {
        self.filtered = if self.filter.is_empty() {
            self.all.clone()
        } else {
            self.all
                .iter()
                .filter(|t| self.filter.matches(&t.id))
                .cloned()
                .collect()
        };
    }

    /// Delete a type on the service, then reload the full list
    pub async fn delete_type(
        &mut self,
        type_id: &str,
        api: &dyn InventoryApi,
        notifier: &dyn Notifier,
    ) -> Result<&[ResourceType]> {
        if let Err(e) = api.delete_resource_type(type_id).await {
            report_error(notifier, "Types", &e);
            return Err(e);
        }
        debug!("[Types] deleted type [{}]", type_id);
        self.load_types(api, notifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use crate::notify::RecordingNotifier;
    use crate::testing::MockInventory;

    fn sample_types() -> Vec<ResourceType> {
        ["WildFly Server", "Datasource", "JMS Queue", "datasource XA"]
            .into_iter()
            .map(ResourceType::new)
            .collect()
    }

    fn ids(types: &[ResourceType]) -> Vec<&str> {
        types.iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_types_sorted() {
        let api = MockInventory::new().with_types(sample_types());
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();

        let types = catalog.load_types(&api, &notifier).await.expect("types");
        assert_eq!(
            ids(types),
            vec!["Datasource", "JMS Queue", "WildFly Server", "datasource XA"]
        );
        assert_eq!(catalog.filtered().len(), 4);
        assert!(!catalog.is_loading());
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let types = sample_types();
        assert_eq!(filter_types(&types, Some(""), true), types);
        assert_eq!(filter_types(&types, None, false), types);
    }

    #[test]
    fn test_case_sensitive_filter() {
        let types = sample_types();
        assert_eq!(ids(&filter_types(&types, Some("Data"), false)), vec!["Datasource"]);
    }

    #[test]
    fn test_case_insensitive_filter() {
        let types = sample_types();
        assert_eq!(
            ids(&filter_types(&types, Some("DATA"), true)),
            vec!["Datasource", "datasource XA"]
        );
    }

    #[tokio::test]
    async fn test_filter_recomputed_from_full_list() {
        let api = MockInventory::new().with_types(sample_types());
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();
        catalog.load_types(&api, &notifier).await.expect("types");

        assert_eq!(catalog.apply_filter(Some("Server"), false).len(), 1);
        assert_eq!(catalog.apply_filter(Some("s"), true).len(), 4);
        assert_eq!(catalog.apply_filter(None, false).len(), 4);
    }

    #[tokio::test]
    async fn test_delete_type_refreshes_and_keeps_filter() {
        let api = MockInventory::new().with_types(sample_types());
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();
        catalog.load_types(&api, &notifier).await.expect("types");
        catalog.apply_filter(Some("data"), true);

        catalog
            .delete_type("Datasource", &api, &notifier)
            .await
            .expect("deleted");

        assert_eq!(api.call_count("GET types"), 2);
        assert_eq!(api.call_count("DELETE type Datasource"), 1);
        assert_eq!(ids(catalog.all()).len(), 3);
        assert_eq!(ids(catalog.filtered()), vec!["datasource XA"]);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_skips_refresh() {
        let api = MockInventory::new().with_types(sample_types());
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();
        catalog.load_types(&api, &notifier).await.expect("types");

        api.fail_with_status(403, "Forbidden");
        let result = catalog.delete_type("Datasource", &api, &notifier).await;
        assert!(matches!(result, Err(ConsoleError::Status { code: 403, .. })));
        assert_eq!(api.call_count("GET types"), 1);
        assert_eq!(catalog.all().len(), 4);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_stale_type_reload_discarded() {
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();

        let old = catalog.begin_load();
        let new = catalog.begin_load();
        catalog
            .apply_types(new, Ok(vec![ResourceType::new("New")]), &notifier)
            .expect("applied");
        let applied = catalog
            .apply_types(old, Ok(vec![ResourceType::new("Old")]), &notifier)
            .expect("stale");

        assert_eq!(applied, Applied::Stale);
        assert_eq!(ids(catalog.all()), vec!["New"]);
    }

    #[test]
    fn test_filter_reapplied_after_reload() {
        let notifier = RecordingNotifier::new();
        let mut catalog = TypeCatalog::new();
        catalog.apply_filter(Some("Queue"), false);

        let ticket = catalog.begin_load();
        catalog
            .apply_types(ticket, Ok(sample_types()), &notifier)
            .expect("applied");
        assert_eq!(ids(catalog.filtered()), vec!["JMS Queue"]);
        assert_eq!(catalog.find("JMS Queue").map(|t| t.id.as_str()), Some("JMS Queue"));
    }
}

//! A list screen: the loaded collection narrowed by attribute filters, then
//! by free-text search, then cut into pages.

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;

use crate::data::{EntityData, Identity, Record};
use crate::gateway::Gateway;
use crate::list::{AttributeFilterSet, CollectionLoader, Fielded, PageWindow, Revision, TextSearch};

/// What a list screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Rows matching the current filters and query, across all pages.
    pub total_items: usize,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ListScreen<T> {
    loader: CollectionLoader<T>,
    filters: AttributeFilterSet,
    search: TextSearch,
    window: PageWindow,
    view_revision: u64,
    /// Indices of rows passing filters and search, with the revision they
    /// were computed for.
    visible: Option<(Revision, Vec<usize>)>,
}

impl<T: Fielded + Clone + Send + 'static> ListScreen<T> {
    pub async fn mount<F, Fut, E, S, K, V>(
        producer: F,
        search_fields: impl IntoIterator<Item = S>,
        filters: impl IntoIterator<Item = (K, V)>,
        page_size: usize,
    ) -> ListScreen<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Vec<T>>, E>> + Send + 'static,
        E: Display + 'static,
        S: ToString,
        K: ToString,
        V: ToString,
    {
        ListScreen {
            loader: CollectionLoader::mount(producer).await,
            filters: AttributeFilterSet::new(filters),
            search: TextSearch::new(search_fields),
            window: PageWindow::new(page_size),
            view_revision: 0,
            visible: None,
        }
    }

    pub fn loader(&self) -> &CollectionLoader<T> {
        &self.loader
    }

    pub fn filters(&self) -> &AttributeFilterSet {
        &self.filters
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn revision(&self) -> Revision {
        Revision::new(self.loader.revision(), self.view_revision)
    }

    pub fn set_query(&mut self, query: impl ToString) {
        if self.search.set_query(query) {
            self.view_revision += 1;
        }
    }

    /// Sets an offered filter; empty `value` clears it.
    pub fn set_filter(&mut self, key: &str, value: impl ToString) {
        if self.filters.set(key, value) {
            self.view_revision += 1;
        }
    }

    pub fn clear_filters(&mut self) {
        if self.filters.clear() {
            self.view_revision += 1;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.refresh();
        self.window.go_to_page(page);
    }

    pub async fn reload(&self) {
        self.loader.reload().await
    }

    pub fn unmount(&self) {
        self.loader.unmount()
    }

    fn refresh(&mut self) -> Revision {
        let revision = self.revision();
        let stale = !matches!(&self.visible, Some((seen, _)) if *seen == revision);

        if stale {
            let filters = &self.filters;
            let search = &self.search;
            let visible: Vec<usize> = self.loader.with_data(|rows| {
                rows.iter()
                    .enumerate()
                    .filter(|(_, row)| filters.matches(*row) && search.matches(*row))
                    .map(|(index, _)| index)
                    .collect()
            });
            self.visible = Some((revision, visible));
        }

        let len = self.visible.as_ref().map(|(_, it)| it.len()).unwrap_or(0);
        self.window.observe(len, revision);
        revision
    }

    pub fn view(&mut self) -> PageView<T> {
        self.refresh();
        let range = self.window.range();
        let indices = self
            .visible
            .as_ref()
            .map(|(_, it)| &it[range])
            .unwrap_or(&[]);

        let items = self
            .loader
            .with_data(|rows| indices.iter().filter_map(|i| rows.get(*i).cloned()).collect());
        let snapshot_error = self.loader.error();

        PageView {
            items,
            page: self.window.current_page(),
            page_size: self.window.page_size(),
            total_pages: self.window.total_pages(),
            total_items: self.window.len(),
            loading: self.loader.is_loading(),
            error: snapshot_error,
        }
    }
}

impl<D: EntityData> ListScreen<Record<D>> {
    /// Screen over every record of `gateway`, searched and filtered the way
    /// the entity's screen does it.
    pub async fn for_gateway(gateway: Gateway<D>, page_size: usize) -> ListScreen<Record<D>> {
        ListScreen::mount(
            move || {
                let gateway = gateway.clone();
                async move { gateway.get_all().await.map(Some) }
            },
            D::SEARCH_FIELDS.iter().copied(),
            D::FILTERS.iter().copied(),
            page_size,
        )
        .await
    }

    /// Reflects a saved record without reloading.
    pub fn upsert(&self, record: Record<D>) {
        self.loader.set_data(|rows| match rows.iter_mut().find(|it| it.id == record.id) {
            Some(slot) => *slot = record,
            None => rows.push(record),
        });
    }

    /// Reflects a deleted record without reloading.
    pub fn remove(&self, id: Identity) {
        self.loader.set_data(|rows| rows.retain(|it| it.id != id));
    }
}

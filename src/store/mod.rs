use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use reqwest::Url;
use serde::Serialize;

use crate::data::Directory;
use crate::filter::{Action, FilterState, History, Navigation};
use crate::prober::{self, DocumentCategory, DocumentLink, ProbeOptions, Prober};
use crate::query;
use crate::render::{self, PageContext, ViewBindings, Viewer};

/// One rendered card together with what went into it.
#[derive(Clone, Debug, Serialize)]
pub struct CardView {
    pub code: String,
    pub name: String,
    pub role: String,
    pub documents: Vec<DocumentLink>,
    #[serde(skip)]
    pub html: String,
}

/// The finished content region for one filter state.
#[derive(Clone, Debug)]
pub struct RenderedView {
    pub generation: u64,
    pub state: FilterState,
    pub cards: Vec<CardView>,
    pub content: String,
    pub total: usize,
}

impl RenderedView {
    pub fn visible(&self) -> usize {
        self.cards.len()
    }
}

/// A render started for a snapshot of the filter state.
#[derive(Clone, Debug)]
pub struct RenderTicket {
    pub generation: u64,
    pub state: FilterState,
    directory: Arc<Directory>,
}

impl RenderTicket {
    /// Filters, probes documents for every visible record, then builds
    /// the cards. Nothing is produced until every probe has resolved.
    pub async fn run(
        self,
        prober: &dyn Prober,
        categories: &[DocumentCategory],
        options: &ProbeOptions,
        pb: Option<&ProgressBar>,
    ) -> RenderedView {
        let directory = self.directory.as_ref();
        let visible = query::visible(directory.employees(), &self.state);
        log::debug!(
            "render #{}: {} of {} records visible",
            self.generation,
            visible.len(),
            directory.len()
        );
        if let Some(pb) = pb {
            pb.set_length(visible.len() as u64);
        }
        let documents = prober::probe_all(prober, categories, &visible, options, pb).await;

        let cards: Vec<CardView> = visible
            .iter()
            .zip(documents)
            .map(|(employee, docs)| CardView {
                code: employee.code.clone(),
                name: employee.name.clone(),
                role: employee.role.clone(),
                html: render::render_card(employee, &docs, directory, self.state.expanded),
                documents: docs,
            })
            .collect();
        let html: Vec<String> = cards.iter().map(|c| c.html.clone()).collect();
        RenderedView {
            generation: self.generation,
            state: self.state,
            content: render::render_cards(&html),
            cards,
            total: directory.len(),
        }
    }
}

/// Owns the loaded directory, the filter state and its URL history.
#[derive(Debug)]
pub struct Store {
    directory: Arc<Directory>,
    state: FilterState,
    history: History,
    viewer: Viewer,
    generation: AtomicU64,
    current: Option<RenderedView>,
}

impl Store {
    pub fn new(directory: Directory, location: Url) -> Self {
        let state = FilterState::from_url(&location);
        Self {
            directory: Arc::new(directory),
            state,
            history: History::new(location),
            viewer: Viewer::default(),
            generation: AtomicU64::new(0),
            current: None,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn location(&self) -> &Url {
        self.history.current()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Shows an image preview; refused while a document is open.
    pub fn open_image(&mut self, src: &str) -> bool {
        self.viewer.open_image(src)
    }

    pub fn open_document(&mut self, link: &DocumentLink) {
        self.viewer.open_document(&link.title, &link.href);
    }

    pub fn close_viewer(&mut self) {
        self.viewer.close();
    }

    /// Applies a user action and records the new URL.
    pub fn dispatch(&mut self, action: Action) -> Navigation {
        self.state.apply(&action);
        let navigation = action.navigation();
        self.history.record(&self.state, navigation);
        navigation
    }

    /// Browser back: restores the state encoded in the previous entry.
    pub fn back(&mut self) -> bool {
        match self.history.back() {
            Some(url) => {
                self.state = FilterState::from_url(url);
                true
            }
            None => false,
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.history.forward() {
            Some(url) => {
                self.state = FilterState::from_url(url);
                true
            }
            None => false,
        }
    }

    pub fn begin_render(&self) -> RenderTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket {
            generation,
            state: self.state.clone(),
            directory: Arc::clone(&self.directory),
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Installs a finished render unless a newer one has started since.
    pub fn commit(&mut self, view: RenderedView) -> bool {
        if view.generation != self.latest_generation() {
            log::debug!(
                "discarding stale render #{} (latest #{})",
                view.generation,
                self.latest_generation()
            );
            return false;
        }
        self.current = Some(view);
        true
    }

    pub fn current(&self) -> Option<&RenderedView> {
        self.current.as_ref()
    }

    /// Full page for the committed view.
    pub fn page(&self, title: &str, bindings: &ViewBindings) -> Option<String> {
        let view = self.current.as_ref()?;
        Some(render::render_page(&PageContext {
            title,
            bindings,
            facets: self.directory.facets(),
            state: &view.state,
            location: self.location(),
            content: &view.content,
            visible: view.visible(),
            total: view.total,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Employee;
    use crate::prober::tests::FixedProber;
    use crate::prober::default_categories;

    fn directory() -> Directory {
        Directory::from_records(vec![
            Employee {
                code: "E2".to_string(),
                name: "Bilal".to_string(),
                role: "OPERATOR".to_string(),
                customers: vec!["Acme".to_string()],
                ..Default::default()
            },
            Employee {
                code: "E1".to_string(),
                name: "Asha".to_string(),
                role: "OFFICER".to_string(),
                customers: vec!["Beta".to_string()],
                ..Default::default()
            },
        ])
    }

    fn store(location: &str) -> Store {
        Store::new(directory(), Url::parse(location).unwrap())
    }

    #[test]
    fn state_is_restored_from_initial_location() {
        let store = store("https://intranet.local/?role=OFFICER&view=expanded");
        assert_eq!(store.state().role.as_deref(), Some("OFFICER"));
        assert!(store.state().expanded);
    }

    #[test]
    fn dispatch_updates_url_and_history() {
        let mut store = store("https://intranet.local/");
        assert_eq!(
            store.dispatch(Action::ToggleCustomer("Acme".to_string())),
            Navigation::Push
        );
        assert_eq!(
            store.dispatch(Action::SetQuery("bil".to_string())),
            Navigation::Replace
        );
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.location().query(), Some("q=bil&cust=Acme"));

        assert!(store.back());
        assert_eq!(store.state(), &FilterState::default());
        assert!(store.forward());
        assert_eq!(store.state().customers, vec!["Acme"]);
        assert_eq!(store.state().query, "bil");
    }

    #[tokio::test]
    async fn stale_render_is_discarded() {
        let mut store = store("https://intranet.local/");
        let prober = FixedProber::new(&["R&R/e1.pdf"]);
        let categories = default_categories();
        let options = ProbeOptions::default();

        let first = store.begin_render();
        store.dispatch(Action::SelectRole("OFFICER".to_string()));
        let second = store.begin_render();

        let second_view = second.run(&prober, &categories, &options, None).await;
        let first_view = first.run(&prober, &categories, &options, None).await;

        assert!(store.commit(second_view));
        assert!(!store.commit(first_view));
        let current = store.current().unwrap();
        assert_eq!(current.visible(), 1);
        assert_eq!(current.cards[0].code, "E1");
        assert_eq!(current.cards[0].documents.len(), 1);
    }

    #[tokio::test]
    async fn cards_follow_sorted_order_and_page_renders() {
        let mut store = store("https://intranet.local/");
        let prober = FixedProber::new(&[]);
        let view = store
            .begin_render()
            .run(&prober, &default_categories(), &ProbeOptions::default(), None)
            .await;
        let codes: Vec<_> = view.cards.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["E1", "E2"]);
        assert!(store.commit(view));
        let html = store.page("Directory", &ViewBindings::default()).unwrap();
        assert!(html.contains("Showing 2 of 2 employees"));
        assert!(!html.contains("action-document-btn\""));
    }

    #[tokio::test]
    async fn page_links_keep_foreign_parameters() {
        let mut store = store("https://intranet.local/?lang=en&role=OFFICER");
        let prober = FixedProber::new(&[]);
        let view = store
            .begin_render()
            .run(&prober, &default_categories(), &ProbeOptions::default(), None)
            .await;
        assert!(store.commit(view));
        let html = store.page("Directory", &ViewBindings::default()).unwrap();
        assert!(html.contains(r#"href="?lang=en&amp;role=OFFICER&amp;view=expanded">Basic</a>"#));
        assert!(html.contains(r#"href="?lang=en&amp;role=OPERATOR">OPERATOR</a>"#));
    }

    #[tokio::test]
    async fn document_links_open_in_the_viewer() {
        let mut store = store("https://intranet.local/?role=OFFICER");
        let prober = FixedProber::new(&["KPI/e1.pdf"]);
        let view = store
            .begin_render()
            .run(&prober, &default_categories(), &ProbeOptions::default(), None)
            .await;
        let link = view.cards[0].documents[0].clone();
        assert!(store.commit(view));

        assert!(store.open_image("img/e1.jpg"));
        store.open_document(&link);
        assert_eq!(
            store.viewer(),
            &Viewer::Document {
                title: "KPI Activities: Asha (E1)".to_string(),
                href: "KPI/e1.pdf".to_string(),
            }
        );
        assert!(!store.open_image("img/e1.jpg"));
        store.close_viewer();
        assert_eq!(store.viewer(), &Viewer::Closed);
    }

    #[tokio::test]
    async fn no_matches_render_placeholder() {
        let mut store = store("https://intranet.local/?q=nobody");
        let prober = FixedProber::new(&[]);
        let view = store
            .begin_render()
            .run(&prober, &default_categories(), &ProbeOptions::default(), None)
            .await;
        assert!(view.content.contains(render::NO_RESULTS));
        assert!(store.commit(view));
    }
}

//! Page composition controller.
//!
//! Owns the per-route lifecycle: fetch page data, load exactly the
//! distinct set of referenced component types, compose the page in
//! declared order, and contain per-unit render failures behind the
//! fault-isolation boundary.
//!
//! Navigation is supersession-safe: every `navigate` bumps a generation
//! counter, and a fetch that settles after a newer navigation started is
//! discarded without touching state.

use super::boundary::{self, ErrorPresentation, Translator};
use super::types::{ComponentReference, PageDocument};
use crate::config::{BuildMode, RendererConfig};
use crate::error::{ErrorKind, StructuredError};
use crate::registry::ComponentRegistry;
use crate::render::Renderable;
use crate::store::DataSourceManager;
use crate::{log, warn};
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A page whose data has arrived and whose referenced units have settled.
/// Types that failed to load are present with an empty slot; the render
/// policy for those depends on build mode.
pub struct ComposedPage {
    pub document: PageDocument,
    units: HashMap<String, Option<Arc<dyn Renderable>>>,
}

impl ComposedPage {
    /// Names of units that actually loaded, sorted. Shown in development
    /// placeholders.
    fn loaded_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .units
            .iter()
            .filter_map(|(name, unit)| unit.as_ref().map(|_| name.as_str()))
            .collect();
        names.sort_unstable();
        names
    }
}

/// Controller lifecycle per route navigation.
enum Phase {
    Idle,
    /// Page data in flight. Renders nothing - not a spinner - so fast
    /// networks never flash a placeholder.
    FetchingData,
    /// Data arrived; component loads in flight. This phase shows the
    /// spinner.
    LoadingComponents,
    Ready(ComposedPage),
    Failed(StructuredError),
}

struct ControllerState {
    path: Option<String>,
    phase: Phase,
}

/// What the host should draw right now.
#[derive(Debug)]
pub enum PageView {
    /// Render nothing (idle, or data fetch in flight).
    Nothing,
    /// Component-loading phase: show a loading indicator.
    Spinner,
    /// Composed page output.
    Page(String),
    /// Whole-page error presentation.
    Error(ErrorPresentation),
}

/// Environment-derived rendering policy.
#[derive(Clone)]
pub struct RenderOptions {
    pub mode: BuildMode,
    /// Reserved route prefix; hard 404 in production before any fetch.
    pub debug_prefix: String,
    pub translator: Translator,
}

impl RenderOptions {
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            mode: config.render.mode(),
            debug_prefix: config.render.debug_prefix.clone(),
            translator: boundary::identity_translator(),
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }
}

pub struct PageController {
    sources: Arc<DataSourceManager>,
    registry: Arc<ComponentRegistry>,
    options: RenderOptions,
    state: RwLock<ControllerState>,
    generation: AtomicU64,
}

impl PageController {
    pub fn new(
        sources: Arc<DataSourceManager>,
        registry: Arc<ComponentRegistry>,
        options: RenderOptions,
    ) -> Self {
        Self {
            sources,
            registry,
            options,
            state: RwLock::new(ControllerState {
                path: None,
                phase: Phase::Idle,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current_path(&self) -> Option<String> {
        self.state.read().path.clone()
    }

    /// Navigate to a route: supersede any in-flight navigation, clear all
    /// prior page state, fetch and compose. Returns the view to draw once
    /// this navigation settles (or the current view, if it was superseded).
    pub async fn navigate(&self, path: &str) -> PageView {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.path = Some(path.to_string());
            state.phase = Phase::FetchingData;
        }
        log!("page"; "loading page data for: {path}");

        let document = match self.fetch_document(path).await {
            Ok(document) => document,
            Err(err) => return self.settle(generation, Phase::Failed(err)),
        };

        // Data is in; the component-loading phase is the one that shows a
        // spinner. A superseded navigation stops here.
        if !self.advance(generation, Phase::LoadingComponents) {
            return self.view();
        }

        let units = self.load_units(&document).await;
        self.settle(generation, Phase::Ready(ComposedPage { document, units }))
    }

    /// Refetch the current path.
    pub async fn reload(&self) -> PageView {
        match self.current_path() {
            Some(path) => self.navigate(&path).await,
            None => PageView::Nothing,
        }
    }

    /// Boundary reset: re-enter the render path from held state, without
    /// refetching data or reloading units.
    pub fn retry_render(&self) -> PageView {
        self.view()
    }

    /// Current view for the host to draw.
    pub fn view(&self) -> PageView {
        let state = self.state.read();
        match &state.phase {
            Phase::Idle | Phase::FetchingData => PageView::Nothing,
            Phase::LoadingComponents => PageView::Spinner,
            Phase::Failed(err) => PageView::Error(self.present(err)),
            Phase::Ready(page) => match self.compose(page) {
                Ok(html) => PageView::Page(html),
                Err(err) => PageView::Error(self.present(&err)),
            },
        }
    }

    // ------------------------------------------------------------------
    // Navigation internals
    // ------------------------------------------------------------------

    async fn fetch_document(&self, path: &str) -> Result<PageDocument, StructuredError> {
        // Hard access boundary, checked before any fetch.
        if self.options.mode.is_production() && path.starts_with(&self.options.debug_prefix) {
            return Err(StructuredError::not_found(format!("Page not found: {path}")));
        }

        let data = self.sources.fetch_json_file(path).await?;

        let invalid = || {
            StructuredError::new(
                ErrorKind::ServerError,
                500,
                (self.options.translator)("errors.general.invalidPageData"),
            )
        };
        let document = PageDocument::from_value(data).map_err(|err| invalid().with_source(err))?;
        if document.components.is_none() {
            return Err(invalid());
        }
        Ok(document)
    }

    /// Load the distinct referenced types concurrently. An individual
    /// failure is recorded as an empty slot and never aborts siblings.
    async fn load_units(
        &self,
        document: &PageDocument,
    ) -> HashMap<String, Option<Arc<dyn Renderable>>> {
        let types = document.distinct_types();
        if types.is_empty() {
            return HashMap::new();
        }
        log!("page"; "component types to load: {}", types.join(", "));

        let loads = types.into_iter().map(|component_type| {
            let registry = self.registry.clone();
            async move {
                match registry.load_component(&component_type).await {
                    Ok(unit) => (component_type, Some(unit)),
                    Err(err) => {
                        warn!("page"; "failed to load component {component_type}: {err}");
                        (component_type, None)
                    }
                }
            }
        });

        join_all(loads).await.into_iter().collect()
    }

    /// Publish a settled phase unless a newer navigation superseded this
    /// one. Returns the view after publishing (or the current view).
    fn settle(&self, generation: u64, phase: Phase) -> PageView {
        if !self.advance(generation, phase) {
            log!("page"; "discarding stale navigation result");
        }
        self.view()
    }

    /// Set the phase if `generation` is still current.
    fn advance(&self, generation: u64, phase: Phase) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        let mut state = self.state.write();
        state.phase = phase;
        true
    }

    // ------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------

    /// Render every reference in declared order. Failures here are the
    /// boundary's business: a production miss or any unit render error
    /// replaces the entire page.
    fn compose(&self, page: &ComposedPage) -> Result<String, StructuredError> {
        let references = page.document.components.as_deref().unwrap_or_default();
        let mut blocks = Vec::with_capacity(references.len());

        for (index, reference) in references.iter().enumerate() {
            let unit = page
                .units
                .get(&reference.component_type)
                .and_then(|unit| unit.as_ref());

            match unit {
                Some(unit) => match unit.render(&reference.props) {
                    Ok(output) => blocks.push(output),
                    Err(err) => return Err(self.render_failure(index, reference, err)),
                },
                None if self.options.mode.is_production() => {
                    return Err(StructuredError::new(
                        ErrorKind::ComponentError,
                        500,
                        format!("Component \"{}\" not found", reference.component_type),
                    ));
                }
                None => {
                    warn!(
                        "page";
                        "component \"{}\" not found in loaded components",
                        reference.component_type
                    );
                    blocks.push(self.missing_placeholder(reference, page));
                }
            }
        }

        Ok(blocks.join("\n"))
    }

    /// Inline development placeholder for a reference whose type failed to
    /// resolve. Does not abort the page.
    fn missing_placeholder(&self, reference: &ComponentReference, page: &ComposedPage) -> String {
        let translate = &self.options.translator;
        let loaded = page.loaded_names();
        let available = if loaded.is_empty() {
            "None".to_string()
        } else {
            loaded.join(", ")
        };
        format!(
            "<div class=\"trellis-component-error\">\
             <strong>{}</strong>\
             <p>Component \"{}\" not found</p>\
             <p>Available: {available}</p>\
             </div>",
            translate("errors.component.title"),
            reference.component_type,
        )
    }

    /// A unit render error, enriched with the component-stack analog in
    /// development and fully generic in production.
    fn render_failure(
        &self,
        index: usize,
        reference: &ComponentReference,
        err: anyhow::Error,
    ) -> StructuredError {
        let message = if self.options.mode.is_production() {
            (self.options.translator)("errors.general.internalServerError")
        } else {
            format!(
                "Render error in component #{index} (\"{}\"): {err}",
                reference.component_type
            )
        };
        StructuredError::new(ErrorKind::ServerError, 500, message).with_source(err)
    }

    fn present(&self, err: &StructuredError) -> ErrorPresentation {
        boundary::present(err, self.options.mode, &self.options.translator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcePreference;
    use crate::fetch::testing::MapFetcher;
    use crate::registry::ManifestEntry;
    use crate::render::{FnRenderable, Props};
    use crate::store::{DataStore, LocalStore};
    use serde_json::{Value, json};

    fn unit(template: &'static str) -> Arc<dyn Renderable> {
        Arc::new(FnRenderable(move |props: &Props| {
            let filled = props
                .iter()
                .fold(template.to_string(), |acc, (key, value)| {
                    acc.replace(
                        &format!("{{{key}}}"),
                        value.as_str().unwrap_or_default(),
                    )
                });
            Ok(filled)
        }))
    }

    fn failing_unit() -> Arc<dyn Renderable> {
        Arc::new(FnRenderable(|_: &Props| {
            Err(anyhow::anyhow!("boom at render time"))
        }))
    }

    fn registry() -> Arc<ComponentRegistry> {
        Arc::new(ComponentRegistry::from_manifest(vec![
            ManifestEntry::unit("user/components/layout/Hero", unit("<h1>{headline}</h1>")),
            ManifestEntry::unit("user/components/layout/Footer", unit("<footer>{copyright}</footer>")),
            ManifestEntry::unit("user/components/content/Card", unit("<div>{body}</div>")),
            ManifestEntry::unit("user/components/content/Crash", failing_unit()),
        ]))
    }

    fn sources_with(pages: &[(&str, Value)]) -> Arc<DataSourceManager> {
        let mut fetcher = MapFetcher::new();
        for (location, value) in pages {
            fetcher = fetcher.with_json(location, value.clone());
        }
        let local: Arc<dyn DataStore> =
            Arc::new(LocalStore::new(Arc::new(fetcher), "database/json"));
        Arc::new(DataSourceManager::new(vec![local], SourcePreference::Auto))
    }

    fn options(mode: BuildMode) -> RenderOptions {
        RenderOptions {
            mode,
            debug_prefix: "/tests".to_string(),
            translator: boundary::identity_translator(),
        }
    }

    fn controller(pages: &[(&str, Value)], mode: BuildMode) -> PageController {
        PageController::new(sources_with(pages), registry(), options(mode))
    }

    fn hero_footer_page() -> Value {
        json!({
            "components": [
                { "type": "Hero", "headline": "Welcome" },
                { "type": "Footer", "copyright": "© 2025" }
            ]
        })
    }

    #[tokio::test]
    async fn test_renders_components_in_declared_order() {
        let controller = controller(
            &[("database/json/index.json", hero_footer_page())],
            BuildMode::Development,
        );
        let view = controller.navigate("/").await;

        match view {
            PageView::Page(html) => {
                assert_eq!(html, "<h1>Welcome</h1>\n<footer>© 2025</footer>");
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_types_render_n_outputs() {
        let page = json!({
            "components": [
                { "type": "Card", "body": "one" },
                { "type": "Card", "body": "two" },
                { "type": "Card", "body": "three" }
            ]
        });
        let controller = controller(
            &[("database/json/cards/index.json", page)],
            BuildMode::Development,
        );
        match controller.navigate("/cards").await {
            PageView::Page(html) => {
                assert_eq!(html, "<div>one</div>\n<div>two</div>\n<div>three</div>");
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_loads_proportional_to_distinct_types() {
        use crate::registry::ComponentLoader;
        use futures::future::BoxFuture;
        use std::sync::atomic::AtomicUsize;

        let calls = Arc::new(AtomicUsize::new(0));
        let counting_loader = |output: &'static str, calls: Arc<AtomicUsize>| -> ComponentLoader {
            Arc::new(move || {
                let calls = calls.clone();
                Box::pin(async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(unit(output))
                }) as BoxFuture<'static, _>
            })
        };
        let registry = Arc::new(ComponentRegistry::from_manifest(vec![
            ManifestEntry::new(
                "user/components/layout/Hero",
                counting_loader("<h1>{headline}</h1>", calls.clone()),
            ),
            ManifestEntry::new(
                "user/components/content/Card",
                counting_loader("<div>{body}</div>", calls.clone()),
            ),
        ]));

        // Five entries, two distinct types.
        let page = json!({
            "components": [
                { "type": "Card", "body": "a" },
                { "type": "Hero", "headline": "h" },
                { "type": "Card", "body": "b" },
                { "type": "Card", "body": "c" },
                { "type": "Hero", "headline": "h2" }
            ]
        });
        let controller = PageController::new(
            sources_with(&[("database/json/index.json", page)]),
            registry,
            options(BuildMode::Development),
        );

        match controller.navigate("/").await {
            PageView::Page(html) => {
                assert_eq!(html.matches("<div>").count(), 3);
                assert_eq!(html.matches("<h1>").count(), 2);
            }
            other => panic!("expected page, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_debug_route_rejected_in_production_before_fetch() {
        let fetcher = Arc::new(MapFetcher::new());
        let local: Arc<dyn DataStore> =
            Arc::new(LocalStore::new(fetcher.clone(), "database/json"));
        let sources = Arc::new(DataSourceManager::new(vec![local], SourcePreference::Auto));
        let controller =
            PageController::new(sources, registry(), options(BuildMode::Production));

        match controller.navigate("/tests/component-error").await {
            PageView::Error(presentation) => {
                assert_eq!(presentation.status, 404);
                assert_eq!(presentation.kind, ErrorKind::NotFound);
            }
            other => panic!("expected error, got {other:?}"),
        }
        // The gate fired before any fetch.
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_debug_route_allowed_in_development() {
        let controller = controller(
            &[("database/json/tests/index.json", hero_footer_page())],
            BuildMode::Development,
        );
        assert!(matches!(
            controller.navigate("/tests").await,
            PageView::Page(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_component_development_placeholder() {
        let page = json!({
            "components": [
                { "type": "Hero", "headline": "hi" },
                { "type": "Missing" }
            ]
        });
        let controller = controller(
            &[("database/json/index.json", page)],
            BuildMode::Development,
        );
        match controller.navigate("/").await {
            PageView::Page(html) => {
                assert!(html.contains("<h1>hi</h1>"));
                assert!(html.contains("Component \"Missing\" not found"));
                assert!(html.contains("Available: Hero"));
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_component_production_replaces_page() {
        let page = json!({
            "components": [
                { "type": "Hero", "headline": "hi" },
                { "type": "Missing" }
            ]
        });
        let controller = controller(
            &[("database/json/index.json", page)],
            BuildMode::Production,
        );
        match controller.navigate("/").await {
            PageView::Error(presentation) => {
                assert_eq!(presentation.kind, ErrorKind::ComponentError);
                assert_eq!(presentation.status, 500);
                assert!(presentation.detail.is_none());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_exception_contained_by_boundary() {
        let page = json!({ "components": [{ "type": "Crash" }] });

        let dev = controller(&[("database/json/index.json", page.clone())], BuildMode::Development);
        match dev.navigate("/").await {
            PageView::Error(presentation) => {
                let detail = presentation.detail.unwrap();
                assert!(detail.original.unwrap().contains("boom at render time"));
            }
            other => panic!("expected error, got {other:?}"),
        }

        let prod = controller(&[("database/json/index.json", page)], BuildMode::Production);
        match prod.navigate("/").await {
            PageView::Error(presentation) => {
                assert_eq!(presentation.status, 500);
                assert!(presentation.detail.is_none());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_page_data_is_server_error() {
        let controller = controller(
            &[("database/json/index.json", json!({ "title": "no components" }))],
            BuildMode::Development,
        );
        match controller.navigate("/").await {
            PageView::Error(presentation) => {
                assert_eq!(presentation.kind, ErrorKind::ServerError);
                assert_eq!(presentation.status, 500);
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retry_render_reuses_held_state() {
        let controller = controller(
            &[("database/json/index.json", hero_footer_page())],
            BuildMode::Development,
        );
        controller.navigate("/").await;
        assert!(matches!(controller.retry_render(), PageView::Page(_)));
        assert_eq!(controller.current_path().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_stale_settle_does_not_overwrite_newer_navigation() {
        let controller = controller(
            &[
                ("database/json/index.json", hero_footer_page()),
                (
                    "database/json/about/index.json",
                    json!({ "components": [{ "type": "Card", "body": "about" }] }),
                ),
            ],
            BuildMode::Development,
        );

        // Second navigation supersedes the first; a settle carrying the
        // first generation must be discarded.
        let first_generation = controller.generation.fetch_add(1, Ordering::SeqCst) + 1;
        controller.navigate("/about").await;
        let view = controller.settle(
            first_generation,
            Phase::Failed(StructuredError::not_found("stale")),
        );

        match view {
            PageView::Page(html) => assert!(html.contains("about")),
            other => panic!("expected the newer page, got {other:?}"),
        }
        assert_eq!(controller.current_path().as_deref(), Some("/about"));
    }

    #[tokio::test]
    async fn test_view_before_any_navigation_is_nothing() {
        let controller = controller(&[], BuildMode::Development);
        assert!(matches!(controller.view(), PageView::Nothing));
        assert!(matches!(controller.reload().await, PageView::Nothing));
    }
}

//! Page - one document session
//!
//! Ties the document, its stylesheets, the reconciler, a layout engine and
//! a render backend together. The host mutates the document between frames
//! and calls [`Page::tick`] once per frame.

use tessel_css::{SheetId, StyleSheetManager};
use tessel_dom::{Document, DomTree, NodeId, Tag};
use tessel_html::{HtmlParser, ParseOutput};
use tessel_layout::{ApproxTextMeasurer, FlexLayout, LayoutEngine, TextMeasurer};
use tessel_render::{MirrorBackend, RenderBackend};

use crate::scripts::text_content;
use crate::{
    Config, EngineResult, FileProvider, FsFileProvider, Reconciler, ScriptEngine, ScriptReport,
    ScriptRunner, TickStats, resolve_path,
};

/// What loading a document did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub parse: ParseOutput,
    /// Stylesheets added from `<style>` and `<link>`
    pub stylesheets: usize,
    /// Linked stylesheets that could not be read
    pub missing_stylesheets: usize,
    pub scripts: ScriptReport,
}

/// A loaded document and everything needed to render it
pub struct Page<B: RenderBackend = MirrorBackend> {
    config: Config,
    document: Document,
    sheets: StyleSheetManager,
    /// Sheets that came from the current document's markup
    document_sheets: Vec<SheetId>,
    reconciler: Reconciler,
    layout: Box<dyn LayoutEngine>,
    measurer: Box<dyn TextMeasurer>,
    files: Box<dyn FileProvider>,
    script_engine: Option<Box<dyn ScriptEngine>>,
    backend: B,
}

impl Page<MirrorBackend> {
    /// Page with the default flex layout, approximate text metrics, the
    /// filesystem provider and a mirror backend
    pub fn new(config: Config) -> Self {
        Self::with_backend(config, MirrorBackend::new())
    }
}

impl<B: RenderBackend> Page<B> {
    pub fn with_backend(config: Config, backend: B) -> Self {
        let reconciler = Reconciler::new(config.layout_epsilon);
        Self {
            config,
            document: Document::new("about:blank"),
            sheets: StyleSheetManager::new(),
            document_sheets: Vec::new(),
            reconciler,
            layout: Box::new(FlexLayout::new()),
            measurer: Box::new(ApproxTextMeasurer),
            files: Box::new(FsFileProvider),
            script_engine: None,
            backend,
        }
    }

    pub fn with_files(mut self, files: impl FileProvider + 'static) -> Self {
        self.files = Box::new(files);
        self
    }

    pub fn with_script_engine(mut self, engine: impl ScriptEngine + 'static) -> Self {
        self.script_engine = Some(Box::new(engine));
        self
    }

    pub fn with_layout_engine(mut self, layout: impl LayoutEngine + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &DomTree {
        &self.document.tree
    }

    /// Mutable access for host and script mutations between ticks
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.document.tree
    }

    pub fn sheets(&self) -> &StyleSheetManager {
        &self.sheets
    }

    /// Host-managed stylesheets survive [`Page::load_html`]
    pub fn sheets_mut(&mut self) -> &mut StyleSheetManager {
        &mut self.sheets
    }

    pub fn add_stylesheet(&mut self, css: &str) -> SheetId {
        self.sheets.add_sheet(css)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Replace the document content with `html`.
    ///
    /// Existing content under the root is detached, so the next tick
    /// destroys it on the renderer. Styles from the markup are loaded,
    /// then scripts run in document order.
    pub fn load_html(&mut self, html: &str) -> EngineResult<LoadReport> {
        let tree = &mut self.document.tree;
        let old: Vec<NodeId> = tree.children(NodeId::ROOT).to_vec();
        for child in old {
            tree.remove_child(NodeId::ROOT, child)?;
        }
        for id in self.document_sheets.drain(..) {
            self.sheets.remove_sheet(id);
        }

        let reconciler = &mut self.reconciler;
        let parse = HtmlParser::new().parse_into(tree, html, |id| reconciler.mark_created(id));

        let (stylesheets, missing_stylesheets) = self.load_styles(&parse);

        let scripts = match (&mut self.script_engine, self.config.enable_scripts) {
            (Some(engine), true) => ScriptRunner::new(&self.config.base_path, self.files.as_ref())
                .execute_scripts(&mut self.document.tree, &parse.scripts, engine.as_mut()),
            (None, true) if !parse.scripts.is_empty() => {
                tracing::debug!(scripts = parse.scripts.len(), "no script engine, scripts not run");
                ScriptReport {
                    executed: 0,
                    skipped: parse.scripts.len(),
                }
            }
            _ => ScriptReport::default(),
        };

        tracing::info!(
            nodes = parse.created,
            stylesheets,
            scripts = scripts.executed,
            "document loaded"
        );
        Ok(LoadReport {
            parse,
            stylesheets,
            missing_stylesheets,
            scripts,
        })
    }

    /// Add `<style>` contents and linked stylesheets in document order
    fn load_styles(&mut self, parse: &ParseOutput) -> (usize, usize) {
        let mut sources: Vec<NodeId> = parse.styles.iter().chain(&parse.links).copied().collect();
        sources.sort_unstable();

        let (mut loaded, mut missing) = (0, 0);
        for id in sources {
            let tree = &self.document.tree;
            let Some(node) = tree.get(id) else {
                continue;
            };
            let css = if node.tag == Tag::Style {
                text_content(tree, id)
            } else {
                let is_stylesheet = node
                    .attribute("rel")
                    .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")));
                let Some(href) = node.attribute("href").filter(|_| is_stylesheet) else {
                    continue;
                };
                let path = resolve_path(&self.config.base_path, href);
                match self.files.read(&path) {
                    Some(css) => css,
                    None => {
                        tracing::warn!(path = %path, "stylesheet not found");
                        missing += 1;
                        continue;
                    }
                }
            };
            self.document_sheets.push(self.sheets.add_sheet(&css));
            loaded += 1;
        }
        (loaded, missing)
    }

    /// Reconcile pending changes and hand the buffer to the backend
    pub fn tick(&mut self) -> TickStats {
        let output = self.reconciler.tick(
            &mut self.document.tree,
            &self.sheets,
            self.layout.as_mut(),
            self.measurer.as_ref(),
            self.config.viewport(),
        );
        self.backend.execute(&output.buffer);
        output.stats
    }

    /// Change the viewport; the next tick lays out again
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
    }

    pub fn layout_x(&self, node: NodeId) -> f32 {
        self.backend.get_x(node)
    }

    pub fn layout_y(&self, node: NodeId) -> f32 {
        self.backend.get_y(node)
    }

    pub fn layout_width(&self, node: NodeId) -> f32 {
        self.backend.get_width(node)
    }

    pub fn layout_height(&self, node: NodeId) -> f32 {
        self.backend.get_height(node)
    }
}

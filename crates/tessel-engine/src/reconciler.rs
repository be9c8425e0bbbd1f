//! Reconciliation
//!
//! Once per tick: drain dirty nodes, re-resolve styles, lay out, and diff
//! what the renderer can see against what it saw last tick. Each
//! difference becomes one command; the batch is encoded into a single
//! buffer.

use std::collections::{BTreeMap, HashMap};

use tessel_css::StyleSheetManager;
use tessel_css::properties::is_render_relevant;
use tessel_dom::{DirtyFlags, DomTree, Node, NodeId};
use tessel_layout::{LayoutEngine, LayoutMap, Rect, TextMeasurer, Viewport};
use tessel_render::{Command, encode};

/// What the renderer knows about one node
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    parent: Option<NodeId>,
    sibling_index: usize,
    layout: Rect,
    /// Render-relevant subset of the computed style
    styles: BTreeMap<String, String>,
    text: Option<String>,
}

/// Counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Nodes drained from the dirty queue or announced as created
    pub dirty: usize,
    /// Nodes whose style was re-resolved
    pub resolved: usize,
    /// Nodes whose stored style was kept
    pub reused: usize,
    /// Commands emitted
    pub commands: usize,
}

/// Result of one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Encoded command buffer; empty when nothing changed
    pub buffer: Vec<u8>,
    pub commands: Vec<Command>,
    pub stats: TickStats,
}

/// Turns accumulated document mutations into render commands
#[derive(Debug)]
pub struct Reconciler {
    /// Renderer-side state as of the previous tick
    known: HashMap<NodeId, Snapshot>,
    /// Known nodes in previous document order
    order: Vec<NodeId>,
    /// Nodes announced through [`Reconciler::mark_created`] since the last tick
    created: Vec<NodeId>,
    /// Stylesheet generation the stored styles were resolved against
    generation: Option<u64>,
    viewport: Option<Viewport>,
    epsilon: f32,
}

impl Reconciler {
    /// `epsilon` is the largest layout delta that is not reported
    pub fn new(epsilon: f32) -> Self {
        Self {
            // The root exists on both sides before the first tick
            known: HashMap::from([(NodeId::ROOT, Snapshot::default())]),
            order: vec![NodeId::ROOT],
            created: Vec::new(),
            generation: None,
            viewport: None,
            epsilon,
        }
    }

    /// Announce a node that entered the tree without going through the
    /// dirty queue (bulk parsing). Its flags are raised at the next tick.
    pub fn mark_created(&mut self, id: NodeId) {
        if id != NodeId::ROOT {
            self.created.push(id);
        }
    }

    /// Whether the renderer was told about `id` by an earlier tick
    pub fn is_known(&self, id: NodeId) -> bool {
        self.known.contains_key(&id)
    }

    /// Forget all renderer-side state, as for a fresh renderer
    pub fn reset(&mut self) {
        *self = Self::new(self.epsilon);
    }

    /// Run one reconciliation pass
    pub fn tick(
        &mut self,
        tree: &mut DomTree,
        sheets: &StyleSheetManager,
        layout: &mut dyn LayoutEngine,
        measurer: &dyn TextMeasurer,
        viewport: Viewport,
    ) -> TickOutput {
        let mut dirty = tree.take_dirty();
        for id in self.created.drain(..) {
            tree.add_dirty_flags(id, DirtyFlags::ALL);
            dirty.push(id);
        }
        dirty.sort_unstable();
        dirty.dedup();

        let restyle_all = self.generation != Some(sheets.generation());
        let relayout = self.viewport != Some(viewport);
        if dirty.is_empty() && !restyle_all && !relayout {
            tracing::trace!("nothing to reconcile");
            return TickOutput::default();
        }

        if restyle_all {
            tree.mark_all_style_dirty();
            self.generation = Some(sheets.generation());
        }
        self.viewport = Some(viewport);

        // Selector results depend on structure and attributes
        for &id in &dirty {
            let flags = tree.get(id).map(|n| n.dirty).unwrap_or_default();
            if flags.intersects(DirtyFlags::TREE | DirtyFlags::ATTRIBUTES) {
                tree.add_dirty_flags(id, DirtyFlags::STYLE);
            }
        }

        let root = tree.root();
        let resolve = tessel_css::resolve_tree(tree, root, sheets.all_rules());
        let rects = layout.compute(tree, root, viewport, measurer);
        let commands = self.diff(tree, &rects);

        for &id in &dirty {
            tree.clear_dirty(id, DirtyFlags::TREE | DirtyFlags::ATTRIBUTES | DirtyFlags::TEXT);
        }

        let stats = TickStats {
            dirty: dirty.len(),
            resolved: resolve.resolved,
            reused: resolve.reused,
            commands: commands.len(),
        };
        tracing::debug!(
            dirty = stats.dirty,
            resolved = stats.resolved,
            reused = stats.reused,
            commands = stats.commands,
            "tick"
        );

        let buffer = if commands.is_empty() {
            Vec::new()
        } else {
            encode(&commands)
        };
        TickOutput {
            buffer,
            commands,
            stats,
        }
    }

    /// Compare the reachable tree with the previous snapshot.
    ///
    /// Creates and updates come in document order; destroys follow, in the
    /// previous document order.
    fn diff(&mut self, tree: &DomTree, rects: &LayoutMap) -> Vec<Command> {
        let mut commands = Vec::new();
        let mut next = HashMap::with_capacity(self.known.len());
        let mut order = Vec::with_capacity(self.order.len());

        for id in tree.descendants(tree.root()) {
            let Some(node) = tree.get(id) else {
                continue;
            };
            let current = Snapshot {
                parent: node.parent,
                sibling_index: tree.sibling_index(id).unwrap_or(0),
                layout: rects.get(&id).copied().unwrap_or_default(),
                styles: render_styles(node),
                text: node.text.clone(),
            };

            match self.known.get(&id) {
                None => commands.push(Command::create(
                    id,
                    node.tag,
                    current.parent,
                    current.sibling_index,
                    current.layout,
                    current
                        .styles
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    current.text.clone(),
                )),
                Some(previous) => changes(id, previous, &current, self.epsilon, &mut commands),
            }

            order.push(id);
            next.insert(id, current);
        }

        for &id in &self.order {
            if !next.contains_key(&id) {
                commands.push(Command::destroy(id));
            }
        }

        self.known = next;
        self.order = order;
        commands
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(0.01)
    }
}

fn render_styles(node: &Node) -> BTreeMap<String, String> {
    node.computed_style
        .iter()
        .flat_map(|style| style.iter())
        .filter(|(property, _)| is_render_relevant(property))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Update commands for a node the renderer already has
fn changes(id: NodeId, previous: &Snapshot, current: &Snapshot, epsilon: f32, out: &mut Vec<Command>) {
    if previous.parent != current.parent || previous.sibling_index != current.sibling_index {
        out.push(Command::reparent(id, current.parent, current.sibling_index));
    }

    if previous.layout.differs(&current.layout, epsilon) {
        out.push(Command::update_layout(id, current.layout));
    }

    let mut styles: Vec<(String, String)> = current
        .styles
        .iter()
        .filter(|(k, v)| previous.styles.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    // Properties that vanished are cleared
    styles.extend(
        previous
            .styles
            .keys()
            .filter(|k| !current.styles.contains_key(*k))
            .map(|k| (k.clone(), String::new())),
    );
    if !styles.is_empty() {
        out.push(Command::update_style(id, styles));
    }

    if previous.text != current.text {
        out.push(Command::update_text(id, current.text.as_deref().unwrap_or_default()));
    }
}

//! Script execution
//!
//! The engine has no interpreter of its own. Hosts plug one in through
//! [`ScriptEngine`]; [`ScriptRunner`] feeds it the document's scripts in
//! order and keeps going past failures.

use tessel_dom::{DomTree, NodeId};

use crate::{EngineError, EngineResult, FileProvider, resolve_path};

/// An interpreter that can mutate the document
pub trait ScriptEngine {
    /// Run `source`. `origin` names the script in diagnostics: the resolved
    /// path for external scripts, `inline:<node>` otherwise.
    fn evaluate(&mut self, source: &str, origin: &str, tree: &mut DomTree) -> EngineResult<()>;
}

/// Outcome of running a batch of scripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub executed: usize,
    pub skipped: usize,
}

/// Runs `<script>` elements against a [`ScriptEngine`]
pub struct ScriptRunner<'a> {
    base_path: &'a str,
    files: &'a dyn FileProvider,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(base_path: &'a str, files: &'a dyn FileProvider) -> Self {
        Self { base_path, files }
    }

    /// Execute `scripts` in the given order.
    ///
    /// A missing file or a failing script is logged and skipped.
    pub fn execute_scripts(
        &self,
        tree: &mut DomTree,
        scripts: &[NodeId],
        engine: &mut dyn ScriptEngine,
    ) -> ScriptReport {
        let mut report = ScriptReport::default();

        for (index, &node) in scripts.iter().enumerate() {
            let (source, origin) = match self.source(tree, node) {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping script");
                    report.skipped += 1;
                    continue;
                }
            };

            match engine.evaluate(&source, &origin, tree) {
                Ok(()) => report.executed += 1,
                Err(e) => {
                    tracing::warn!(index, path = %origin, error = %e, "script failed");
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(executed = report.executed, skipped = report.skipped, "scripts run");
        report
    }

    /// Source text and origin of one script element
    fn source(&self, tree: &DomTree, node: NodeId) -> EngineResult<(String, String)> {
        let src = tree.get(node).and_then(|n| n.attribute("src"));
        match src {
            Some(src) => {
                let path = resolve_path(self.base_path, src);
                match self.files.read(&path) {
                    Some(text) => Ok((text, path)),
                    None => Err(EngineError::MissingFile(path)),
                }
            }
            None => Ok((text_content(tree, node), format!("inline:{}", node.0))),
        }
    }
}

/// Concatenated text of every text node under `node`
pub(crate) fn text_content(tree: &DomTree, node: NodeId) -> String {
    tree.descendants(node)
        .filter_map(|id| tree.get(id).and_then(|n| n.text.as_deref()))
        .collect()
}

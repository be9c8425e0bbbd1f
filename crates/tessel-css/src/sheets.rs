//! Stylesheet Manager
//!
//! Holds every active stylesheet in document order and exposes their rules
//! as one list. Source order is renumbered across sheets whenever the set
//! changes, and the generation counter tells callers that every node needs
//! restyling.

use crate::{CssParser, CssRule, Stylesheet};

/// Handle to a sheet owned by a [`StyleSheetManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub u32);

#[derive(Debug, Default)]
pub struct StyleSheetManager {
    sheets: Vec<(SheetId, Stylesheet)>,
    rules: Vec<CssRule>,
    next_id: u32,
    generation: u64,
}

impl StyleSheetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `css` and append it after every existing sheet
    pub fn add_sheet(&mut self, css: &str) -> SheetId {
        self.add_parsed(CssParser::new().parse(css))
    }

    pub fn add_parsed(&mut self, sheet: Stylesheet) -> SheetId {
        let id = SheetId(self.next_id);
        self.next_id += 1;
        tracing::debug!(sheet = id.0, rules = sheet.len(), "stylesheet added");
        self.sheets.push((id, sheet));
        self.rebuild();
        id
    }

    /// Replace a sheet's contents, keeping its position
    pub fn update_sheet(&mut self, id: SheetId, css: &str) -> bool {
        let Some(slot) = self.sheets.iter_mut().find(|(sid, _)| *sid == id) else {
            return false;
        };
        slot.1 = CssParser::new().parse(css);
        tracing::debug!(sheet = id.0, rules = slot.1.len(), "stylesheet updated");
        self.rebuild();
        true
    }

    pub fn remove_sheet(&mut self, id: SheetId) -> bool {
        let before = self.sheets.len();
        self.sheets.retain(|(sid, _)| *sid != id);
        if self.sheets.len() == before {
            return false;
        }
        tracing::debug!(sheet = id.0, "stylesheet removed");
        self.rebuild();
        true
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Stylesheet> {
        self.sheets
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, sheet)| sheet)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// All rules across all sheets, in cascade source order
    pub fn all_rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Bumped on every change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn rebuild(&mut self) {
        self.rules = self
            .sheets
            .iter()
            .flat_map(|(_, sheet)| sheet.rules.iter().cloned())
            .collect();
        for (order, rule) in self.rules.iter_mut().enumerate() {
            rule.source_order = order as u32;
        }
        self.generation += 1;
    }
}

//! Layout editor: an in-memory block list with bounded undo/redo history.
//!
//! [`LayoutEditor`] is an explicit value owned by the editing session. It is
//! mutated only through the named operations below (or the equivalent
//! [`EditorAction`] passed to [`LayoutEditor::dispatch`]). Edits do not record
//! history by themselves; callers checkpoint with
//! [`LayoutEditor::save_to_history`].
//!
//! # Example
//!
//! ```
//! use pagebuilder::editor::LayoutEditor;
//! use pagebuilder::types::{Block, HeroData};
//!
//! let mut editor = LayoutEditor::new();
//! editor.add_block(Block::hero("h1", HeroData::default()));
//! editor.save_to_history();
//! editor.undo();
//! assert!(editor.blocks().is_empty());
//! editor.redo();
//! assert_eq!(editor.blocks().len(), 1);
//! ```

pub mod store;

pub use store::{EditorStore, JsonFileStore, MemoryStore, PersistedEditorState};

use crate::types::{Block, BlockKind, LayoutConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of history entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Editor tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum history entries kept; the oldest are dropped first. At least 1.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A named editor operation, suitable for queuing or logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EditorAction {
    SetBlocks(Vec<Block>),
    AddBlock(Block),
    RemoveBlock(String),
    #[serde(rename_all = "camelCase")]
    ReorderBlocks { from_index: usize, to_index: usize },
    UpdateBlock { id: String, data: Map<String, Value> },
    SaveToHistory,
    Undo,
    Redo,
    LoadLayout(LayoutConfig),
    MarkClean,
}

/// Block list plus linear history.
///
/// Invariant: `history` is never empty and
/// `current_history_index < history.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEditor {
    blocks: Vec<Block>,
    history: Vec<LayoutConfig>,
    current_history_index: usize,
    is_dirty: bool,
    config: EditorConfig,
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl LayoutEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            blocks: Vec::new(),
            history: vec![LayoutConfig::default()],
            current_history_index: 0,
            is_dirty: false,
            config: EditorConfig {
                history_limit: config.history_limit.max(1),
            },
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn history(&self) -> &[LayoutConfig] {
        &self.history
    }

    pub fn current_history_index(&self) -> usize {
        self.current_history_index
    }

    /// Unsaved-changes hint. Never gates an operation.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    pub fn can_undo(&self) -> bool {
        self.current_history_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_history_index + 1 < self.history.len()
    }

    /// Current blocks as a layout configuration.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::new(self.blocks.clone())
    }

    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.is_dirty = true;
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
        self.is_dirty = true;
    }

    /// Remove the first block with `id`. Absent ids are not an error.
    pub fn remove_block(&mut self, id: &str) {
        if let Some(pos) = self.blocks.iter().position(|b| b.id == id) {
            self.blocks.remove(pos);
        }
        self.is_dirty = true;
    }

    /// Move the block at `from` to `to`. Out-of-range indices leave the
    /// editor untouched.
    pub fn reorder_blocks(&mut self, from: usize, to: usize) {
        let len = self.blocks.len();
        if from >= len || to >= len {
            log::warn!("ignoring reorder {} -> {} on {} blocks", from, to, len);
            return;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.is_dirty = true;
    }

    /// Shallow-merge `partial` into the data of the block with `id`.
    ///
    /// The merged data is decoded like freshly parsed input: keys outside the
    /// block's schema are kept in its `extra` map, an unreadable image slot
    /// is dropped, and ill-typed text turns the block opaque.
    pub fn update_block(&mut self, id: &str, partial: &Map<String, Value>) {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            log::debug!("update for unknown block '{}' ignored", id);
            return;
        };
        let mut data = match block.kind.data_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in partial {
            data.insert(key.clone(), value.clone());
        }
        let tag = block.tag().to_string();
        block.kind = BlockKind::decode(&tag, Value::Object(data));
        self.is_dirty = true;
    }

    /// Checkpoint the current blocks. Discards any redo entries and keeps at
    /// most `history_limit` entries.
    pub fn save_to_history(&mut self) {
        self.history.truncate(self.current_history_index + 1);
        self.history.push(self.layout());
        let limit = self.config.history_limit;
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
        self.current_history_index = self.history.len() - 1;
    }

    pub fn undo(&mut self) {
        if !self.can_undo() {
            return;
        }
        self.current_history_index -= 1;
        self.restore_current();
    }

    pub fn redo(&mut self) {
        if !self.can_redo() {
            return;
        }
        self.current_history_index += 1;
        self.restore_current();
    }

    fn restore_current(&mut self) {
        self.blocks = self.history[self.current_history_index].blocks.clone();
        self.is_dirty = true;
    }

    /// Start over from `config`: it becomes the only history entry.
    pub fn load_layout(&mut self, config: LayoutConfig) {
        self.blocks = config.blocks.clone();
        self.history = vec![config];
        self.current_history_index = 0;
        self.is_dirty = false;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Apply a named operation.
    pub fn dispatch(&mut self, action: EditorAction) {
        match action {
            EditorAction::SetBlocks(blocks) => self.set_blocks(blocks),
            EditorAction::AddBlock(block) => self.add_block(block),
            EditorAction::RemoveBlock(id) => self.remove_block(&id),
            EditorAction::ReorderBlocks {
                from_index,
                to_index,
            } => self.reorder_blocks(from_index, to_index),
            EditorAction::UpdateBlock { id, data } => self.update_block(&id, &data),
            EditorAction::SaveToHistory => self.save_to_history(),
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::LoadLayout(config) => self.load_layout(config),
            EditorAction::MarkClean => self.mark_clean(),
        }
    }

    /// Snapshot of the fields eligible for storage.
    pub fn to_persisted(&self) -> PersistedEditorState {
        PersistedEditorState {
            blocks: self.blocks.clone(),
            history: self.history.clone(),
            current_history_index: Some(self.current_history_index),
            is_dirty: self.is_dirty,
        }
    }

    /// Rebuild an editor from stored state, repairing anything that would
    /// break the history invariant.
    pub fn from_persisted(state: PersistedEditorState, config: EditorConfig) -> Self {
        let mut editor = Self::with_config(config);
        let PersistedEditorState {
            blocks,
            mut history,
            current_history_index,
            is_dirty,
        } = state;

        if history.is_empty() {
            history.push(LayoutConfig::new(blocks.clone()));
        }
        let mut index = current_history_index
            .unwrap_or(history.len() - 1)
            .min(history.len() - 1);
        let limit = editor.config.history_limit;
        if history.len() > limit {
            let excess = history.len() - limit;
            history.drain(..excess);
            index = index.saturating_sub(excess);
        }

        editor.blocks = blocks;
        editor.history = history;
        editor.current_history_index = index;
        editor.is_dirty = is_dirty;
        editor
    }

    /// Write the editor state to `store`.
    pub fn persist<S: EditorStore + ?Sized>(&self, store: &mut S) -> crate::Result<()> {
        store.save(&self.to_persisted())
    }

    /// Load a previously persisted editor, if `store` holds one.
    pub fn restore<S: EditorStore + ?Sized>(store: &S, config: EditorConfig) -> crate::Result<Option<Self>> {
        Ok(store.load()?.map(|state| Self::from_persisted(state, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetRef, HeroData, TwoColumnData};
    use serde_json::json;

    fn block(id: &str) -> Block {
        Block::hero(
            id,
            HeroData {
                heading: id.to_uppercase(),
                ..Default::default()
            },
        )
    }

    fn ids(editor: &LayoutEditor) -> Vec<&str> {
        editor.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn starts_with_single_empty_history_entry() {
        let editor = LayoutEditor::new();
        assert!(editor.blocks().is_empty());
        assert_eq!(editor.history(), &[LayoutConfig::default()]);
        assert_eq!(editor.current_history_index(), 0);
        assert!(!editor.is_dirty());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn edits_mark_dirty_without_recording_history() {
        let mut editor = LayoutEditor::new();
        editor.add_block(block("a"));
        assert!(editor.is_dirty());
        assert_eq!(editor.history().len(), 1);

        editor.mark_clean();
        editor.set_blocks(vec![block("b")]);
        assert!(editor.is_dirty());
        assert_eq!(ids(&editor), vec!["b"]);
    }

    #[test]
    fn remove_block_removes_first_match_only() {
        let mut editor = LayoutEditor::new();
        editor.set_blocks(vec![block("a"), block("b"), block("a")]);
        editor.mark_clean();
        editor.remove_block("a");
        assert_eq!(ids(&editor), vec!["b", "a"]);
        assert!(editor.is_dirty());

        editor.mark_clean();
        editor.remove_block("missing");
        assert_eq!(ids(&editor), vec!["b", "a"]);
        assert!(editor.is_dirty());
    }

    #[test]
    fn reorder_moves_element() {
        let mut editor = LayoutEditor::new();
        editor.set_blocks(vec![block("a"), block("b"), block("c")]);
        editor.reorder_blocks(0, 2);
        assert_eq!(ids(&editor), vec!["b", "c", "a"]);
        editor.reorder_blocks(2, 0);
        assert_eq!(ids(&editor), vec!["a", "b", "c"]);
    }

    #[test]
    fn reorder_out_of_range_is_noop() {
        let mut editor = LayoutEditor::new();
        editor.load_layout(LayoutConfig::new(vec![block("a"), block("b")]));
        editor.reorder_blocks(0, 2);
        editor.reorder_blocks(5, 0);
        assert_eq!(ids(&editor), vec!["a", "b"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn update_block_merges_shallowly() {
        let mut editor = LayoutEditor::new();
        editor.load_layout(LayoutConfig::new(vec![Block::two_column(
            "t",
            TwoColumnData {
                heading: "Old".into(),
                subtitle: "Keep".into(),
                image: Some(AssetRef::unresolved("a1")),
                ..Default::default()
            },
        )]));

        let partial = json!({"heading": "New", "image": {"sys": {"id": "a2"}}});
        editor.update_block("t", partial.as_object().unwrap());

        match &editor.blocks()[0].kind {
            BlockKind::TwoColumn(d) => {
                assert_eq!(d.heading, "New");
                assert_eq!(d.subtitle, "Keep");
                assert_eq!(d.image.as_ref().and_then(|r| r.id()), Some("a2"));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert!(editor.is_dirty());
    }

    #[test]
    fn update_keeps_keys_outside_the_schema() {
        let mut editor = LayoutEditor::new();
        editor.load_layout(
            LayoutConfig::from_json(r#"{"blocks":[{"id":"h","type":"hero","data":{"heading":"Hi","overlay":"dark"}}]}"#)
                .unwrap(),
        );
        editor.update_block("h", json!({"theme": "blue"}).as_object().unwrap());

        let saved: serde_json::Value = serde_json::from_str(&editor.layout().to_json().unwrap()).unwrap();
        let data = &saved["blocks"][0]["data"];
        assert_eq!(data["theme"], "blue");
        assert_eq!(data["overlay"], "dark");
        assert_eq!(data["heading"], "Hi");
        assert!(matches!(&editor.blocks()[0].kind, BlockKind::Hero(_)));
        assert!(editor.is_dirty());
    }

    #[test]
    fn update_unknown_block_is_noop() {
        let mut editor = LayoutEditor::new();
        editor.load_layout(LayoutConfig::new(vec![block("a")]));
        let before = editor.clone();
        editor.update_block("zzz", json!({"heading": "x"}).as_object().unwrap());
        assert_eq!(editor, before);
    }

    #[test]
    fn ill_typed_update_makes_block_opaque() {
        let mut editor = LayoutEditor::new();
        editor.set_blocks(vec![block("a")]);
        editor.update_block("a", json!({"heading": ["not", "text"]}).as_object().unwrap());
        assert!(matches!(&editor.blocks()[0].kind, BlockKind::Opaque { tag, .. } if tag == "hero"));
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut editor = LayoutEditor::new();
        let b0 = vec![block("a")];
        editor.load_layout(LayoutConfig::new(b0.clone()));

        editor.add_block(block("x"));
        editor.save_to_history();
        assert_eq!(editor.current_history_index(), 1);

        editor.undo();
        assert_eq!(editor.blocks(), b0.as_slice());
        assert!(editor.is_dirty());

        editor.redo();
        assert_eq!(ids(&editor), vec!["a", "x"]);
    }

    #[test]
    fn undo_and_redo_at_bounds_are_noops() {
        let mut editor = LayoutEditor::new();
        editor.undo();
        editor.redo();
        assert_eq!(editor.current_history_index(), 0);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn save_discards_redo_branch() {
        let mut editor = LayoutEditor::new();
        for id in ["a", "b", "c"] {
            editor.add_block(block(id));
            editor.save_to_history();
        }
        editor.undo();
        editor.undo();
        assert_eq!(editor.current_history_index(), 1);

        editor.add_block(block("z"));
        editor.save_to_history();
        assert_eq!(editor.history().len(), 3);
        assert_eq!(editor.current_history_index(), 2);
        assert!(!editor.can_redo());
        assert_eq!(ids(&editor), vec!["a", "z"]);
    }

    #[test]
    fn history_is_bounded() {
        let mut editor = LayoutEditor::new();
        for i in 0..75 {
            editor.add_block(block(&format!("b{}", i)));
            editor.save_to_history();
            assert!(editor.history().len() <= DEFAULT_HISTORY_LIMIT);
            assert_eq!(editor.current_history_index(), editor.history().len() - 1);
        }
        assert_eq!(editor.history().len(), DEFAULT_HISTORY_LIMIT);
        // Oldest surviving entry is the 26th checkpoint.
        assert_eq!(editor.history()[0].blocks.len(), 26);
    }

    #[test]
    fn history_limit_is_at_least_one() {
        let mut editor = LayoutEditor::with_config(EditorConfig { history_limit: 0 });
        editor.add_block(block("a"));
        editor.save_to_history();
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.current_history_index(), 0);
    }

    #[test]
    fn load_layout_resets_history() {
        let mut editor = LayoutEditor::new();
        editor.add_block(block("a"));
        editor.save_to_history();
        editor.save_to_history();

        let config = LayoutConfig::new(vec![block("q")]);
        editor.load_layout(config.clone());
        assert_eq!(editor.history(), &[config]);
        assert_eq!(editor.current_history_index(), 0);
        assert!(!editor.is_dirty());
        assert_eq!(ids(&editor), vec!["q"]);
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let mut direct = LayoutEditor::new();
        direct.add_block(block("a"));
        direct.add_block(block("b"));
        direct.reorder_blocks(1, 0);
        direct.save_to_history();
        direct.remove_block("a");

        let mut dispatched = LayoutEditor::new();
        for action in [
            EditorAction::AddBlock(block("a")),
            EditorAction::AddBlock(block("b")),
            EditorAction::ReorderBlocks {
                from_index: 1,
                to_index: 0,
            },
            EditorAction::SaveToHistory,
            EditorAction::RemoveBlock("a".into()),
        ] {
            dispatched.dispatch(action);
        }
        assert_eq!(direct, dispatched);
    }

    #[test]
    fn actions_deserialize_from_wire_form() {
        let action: EditorAction =
            serde_json::from_value(json!({"type": "reorderBlocks", "payload": {"fromIndex": 0, "toIndex": 1}})).unwrap();
        assert_eq!(
            action,
            EditorAction::ReorderBlocks {
                from_index: 0,
                to_index: 1
            }
        );
        let undo: EditorAction = serde_json::from_value(json!({"type": "undo"})).unwrap();
        assert_eq!(undo, EditorAction::Undo);
    }

    #[test]
    fn persisted_state_round_trips() {
        let mut editor = LayoutEditor::new();
        editor.add_block(block("a"));
        editor.save_to_history();
        editor.add_block(block("b"));

        let restored = LayoutEditor::from_persisted(editor.to_persisted(), EditorConfig::default());
        assert_eq!(restored, editor);
    }

    #[test]
    fn restore_repairs_broken_history() {
        let state = PersistedEditorState {
            blocks: vec![block("a")],
            history: Vec::new(),
            current_history_index: Some(7),
            is_dirty: false,
        };
        let editor = LayoutEditor::from_persisted(state, EditorConfig::default());
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.current_history_index(), 0);
        assert_eq!(editor.history()[0].blocks, editor.blocks());
    }

    #[test]
    fn restore_trims_to_limit() {
        let history: Vec<LayoutConfig> = (0..10).map(|i| LayoutConfig::new(vec![block(&format!("b{}", i))])).collect();
        let state = PersistedEditorState {
            blocks: vec![block("b9")],
            history,
            current_history_index: None,
            is_dirty: true,
        };
        let editor = LayoutEditor::from_persisted(state, EditorConfig { history_limit: 4 });
        assert_eq!(editor.history().len(), 4);
        assert_eq!(editor.current_history_index(), 3);
        assert_eq!(editor.history()[0].blocks[0].id, "b6");
        assert!(editor.is_dirty());
    }
}

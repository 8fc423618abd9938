//! Editor history behaviour through the public API

use pagebuilder::editor::{EditorAction, EditorConfig, EditorStore, JsonFileStore, LayoutEditor, DEFAULT_HISTORY_LIMIT};
use pagebuilder::pipeline::parse_layout_config;
use pagebuilder::types::{AssetRef, Block, HeroData, LayoutConfig};
use pagebuilder::{collect_asset_ids, render_page};

fn hero(id: &str) -> Block {
    Block::hero(
        id,
        HeroData {
            heading: format!("Heading {}", id),
            background_image: Some(AssetRef::unresolved(format!("asset-{}", id))),
            ..Default::default()
        },
    )
}

#[test]
fn undo_redo_round_trip_from_loaded_layout() {
    let b0 = vec![hero("a"), hero("b")];
    let mut editor = LayoutEditor::new();
    editor.load_layout(LayoutConfig::new(b0.clone()));

    editor.add_block(hero("x"));
    editor.save_to_history();
    editor.undo();
    assert_eq!(editor.blocks(), b0.as_slice());

    editor.redo();
    let mut expected = b0.clone();
    expected.push(hero("x"));
    assert_eq!(editor.blocks(), expected.as_slice());
}

#[test]
fn history_never_exceeds_limit() {
    let mut editor = LayoutEditor::new();
    for i in 0..120 {
        editor.dispatch(EditorAction::AddBlock(hero(&i.to_string())));
        editor.dispatch(EditorAction::SaveToHistory);
    }
    assert_eq!(editor.history().len(), DEFAULT_HISTORY_LIMIT);
    assert_eq!(editor.current_history_index(), editor.history().len() - 1);

    // Undo all the way back stops at the oldest retained entry.
    for _ in 0..200 {
        editor.undo();
    }
    assert_eq!(editor.current_history_index(), 0);
    assert_eq!(editor.blocks().len(), 120 - DEFAULT_HISTORY_LIMIT + 1);
}

#[test]
fn dirty_flag_never_blocks_operations() {
    let mut editor = LayoutEditor::new();
    editor.add_block(hero("a"));
    editor.save_to_history();
    editor.mark_clean();

    // Clean editors can still undo, and dirty ones can still load.
    editor.undo();
    assert!(editor.blocks().is_empty());
    assert!(editor.is_dirty());
    editor.load_layout(LayoutConfig::new(vec![hero("z")]));
    assert!(!editor.is_dirty());
}

#[test]
fn edited_layout_feeds_the_renderer() {
    let mut editor = LayoutEditor::new();
    editor.load_layout(
        parse_layout_config(Some(
            r#"{"blocks":[{"id":"g","type":"imageGrid","data":{"images":[]}},{"id":"c","type":"carousel","data":{"speed":3}}]}"#,
        ))
        .unwrap(),
    );
    editor.add_block(hero("h"));
    editor.reorder_blocks(2, 0);

    let layout = editor.layout();
    let json = layout.to_json().unwrap();
    assert!(json.contains("\"carousel\""));
    assert!(json.contains("\"speed\":3"));

    let ids: Vec<_> = collect_asset_ids(&layout.blocks).into_iter().collect();
    assert_eq!(ids, vec!["asset-h"]);
    assert_eq!(render_page("Draft", "draft", &layout.blocks).keys(), vec!["h", "g"]);
}

#[test]
fn session_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");

    let mut editor = LayoutEditor::with_config(EditorConfig { history_limit: 5 });
    for id in ["a", "b", "c"] {
        editor.add_block(hero(id));
        editor.save_to_history();
    }
    editor.undo();
    let mut store = JsonFileStore::new(&path);
    editor.persist(&mut store).unwrap();

    let restored = LayoutEditor::restore(&JsonFileStore::new(&path), EditorConfig { history_limit: 5 })
        .unwrap()
        .unwrap();
    assert_eq!(restored, editor);
    assert!(restored.can_redo());

    store.clear().unwrap();
    assert!(!path.exists());
}

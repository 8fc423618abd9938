use criterion::{criterion_group, criterion_main, Criterion};
use pagebuilder::assets::{collect_asset_ids, hydrate_blocks, MissingAssetPolicy};
use pagebuilder::editor::LayoutEditor;
use pagebuilder::render_page;
use pagebuilder::types::{Asset, AssetRef, Block, HeroData, LayoutConfig, TwoColumnData};

// A layout of `n` blocks cycling through the three block kinds, each linking assets.
fn layout(n: usize) -> (LayoutConfig, Vec<Asset>) {
    let mut blocks = Vec::with_capacity(n);
    let mut assets = Vec::new();
    for i in 0..n {
        let id = format!("asset-{}", i);
        assets.push(Asset::new(id.clone(), format!("https://img/{}.jpg", i), format!("Image {}", i)));
        let block = match i % 3 {
            0 => Block::hero(
                format!("b{}", i),
                HeroData {
                    heading: format!("Hero {}", i),
                    background_image: Some(AssetRef::unresolved(id)),
                    ..Default::default()
                },
            ),
            1 => Block::two_column(
                format!("b{}", i),
                TwoColumnData {
                    heading: format!("Columns {}", i),
                    image: Some(AssetRef::unresolved(id)),
                    ..Default::default()
                },
            ),
            _ => Block::image_grid(
                format!("b{}", i),
                vec![AssetRef::unresolved(id), AssetRef::placeholder("p", "https://placehold.co/400x300", "p")],
            ),
        };
        blocks.push(block);
    }
    (LayoutConfig::new(blocks), assets)
}

fn bench_pipeline(c: &mut Criterion) {
    let (layout, assets) = layout(60);

    c.bench_function("collect_asset_ids", |b| b.iter(|| collect_asset_ids(&layout.blocks)));

    c.bench_function("hydrate_and_render", |b| {
        b.iter(|| {
            let hydrated = hydrate_blocks(&layout.blocks, &assets, MissingAssetPolicy::Preserve);
            render_page("Bench", "bench", &hydrated).to_html()
        })
    });
}

fn bench_editor(c: &mut Criterion) {
    let (layout, _) = layout(30);

    c.bench_function("editor_checkpoint_and_undo", |b| {
        b.iter(|| {
            let mut editor = LayoutEditor::new();
            editor.load_layout(layout.clone());
            for i in 0..60 {
                editor.reorder_blocks(i % 30, (i * 7) % 30);
                editor.save_to_history();
            }
            while editor.can_undo() {
                editor.undo();
            }
            editor.current_history_index()
        })
    });
}

criterion_group!(benches, bench_pipeline, bench_editor);
criterion_main!(benches);

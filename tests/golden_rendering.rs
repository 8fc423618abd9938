use std::fs;
use std::path::PathBuf;

use pagebuilder::assets::{hydrate_blocks, MissingAssetPolicy};
use pagebuilder::pipeline::parse_layout_config;
use pagebuilder::render_page;
use pagebuilder::types::Asset;
use sha2::{Digest, Sha256};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn render_fixture(policy: MissingAssetPolicy) -> String {
    let layout = fs::read_to_string("tests/goldens/layouts/page1.json").expect("read layout fixture");
    let assets: Vec<Asset> = serde_json::from_str(
        &fs::read_to_string("tests/goldens/layouts/page1.assets.json").expect("read asset fixture"),
    )
    .expect("asset fixture is valid");

    let layout = parse_layout_config(Some(layout.as_str())).expect("layout fixture is valid");
    let hydrated = hydrate_blocks(&layout.blocks, &assets, policy);
    render_page("Golden page", "golden", &hydrated).to_html()
}

fn check_golden(name: &str, html: &str) {
    let digest = Sha256::digest(html.as_bytes());
    let expected_path = golden_path(name);

    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, hex::encode(digest)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    let exp_bytes = hex::decode(exp.trim()).expect("invalid hex in golden");
    assert_eq!(digest.as_slice(), exp_bytes.as_slice(), "rendered HTML changed:\n{}", html);
}

#[test]
fn golden_html_preserve_policy() {
    check_golden("page1.preserve.sha256", &render_fixture(MissingAssetPolicy::Preserve));
}

#[test]
fn golden_html_elide_policy() {
    check_golden("page1.elide.sha256", &render_fixture(MissingAssetPolicy::Elide));
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(
        render_fixture(MissingAssetPolicy::Preserve),
        render_fixture(MissingAssetPolicy::Preserve)
    );
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagebuilder::assets::{collect_asset_ids, MissingAssetPolicy};
use pagebuilder::pipeline::{PageBuilder, PageOutcome, ParsedLandingPage};
use pagebuilder::source::InMemoryContentSource;
use pagebuilder::types::{Asset, LandingPage};
use pagebuilder::PageConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pagebuilder", version, about = "Render CMS-authored landing pages")]
struct Cli {
    /// Drop unresolved asset references instead of keeping them
    #[arg(long, global = true)]
    elide_missing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a page from the CMS and print its HTML
    Render {
        slug: String,
        /// Write the HTML to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a layout JSON file without contacting the CMS
    RenderFile {
        layout: PathBuf,
        /// JSON array of assets to resolve linked references against
        #[arg(long)]
        assets: Option<PathBuf>,
        #[arg(long, default_value = "Preview")]
        title: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List page slugs and their public URLs
    List,
    /// Print the asset ids a layout JSON file links to
    Assets { layout: PathBuf },
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn emit(html: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", html);
            Ok(())
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = PageConfig::from_env();
    if cli.elide_missing {
        config.missing_asset_policy = MissingAssetPolicy::Elide;
    }

    match cli.command {
        Command::Render { slug, out } => {
            let source = pagebuilder::new_content_source(&config)?;
            let builder = PageBuilder::with_policy(source, config.missing_asset_policy);
            match builder.build(&slug)? {
                PageOutcome::Rendered(page) => emit(&page.to_html(), out.as_deref())?,
                PageOutcome::NotFound => {
                    eprintln!("page not found: {}", slug);
                    return Ok(2);
                }
            }
        }
        Command::RenderFile {
            layout,
            assets,
            title,
            out,
        } => {
            let assets: Vec<Asset> = match assets {
                Some(path) => serde_json::from_str(&read(&path)?)
                    .with_context(|| format!("invalid asset list in {}", path.display()))?,
                None => Vec::new(),
            };
            let page = LandingPage {
                title,
                slug: "preview".into(),
                layout_config: Some(read(&layout)?),
                ..Default::default()
            };
            let parsed = ParsedLandingPage::from_page(page)
                .with_context(|| format!("invalid layout in {}", layout.display()))?;
            let source = InMemoryContentSource::new().with_assets(assets);
            let builder = PageBuilder::with_policy(source, config.missing_asset_policy);
            emit(&builder.render_parsed(&parsed).to_html(), out.as_deref())?;
        }
        Command::List => {
            let source = pagebuilder::new_content_source(&config)?;
            for slug in PageBuilder::new(source).slugs() {
                println!("{}\t{}", slug, config.page_url(&slug));
            }
        }
        Command::Assets { layout } => {
            let raw = read(&layout)?;
            let parsed = pagebuilder::pipeline::parse_layout_config(Some(raw.as_str()))
                .with_context(|| format!("invalid layout in {}", layout.display()))?;
            for id in collect_asset_ids(&parsed.blocks) {
                println!("{}", id);
            }
        }
    }
    Ok(0)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("pagebuilder=info")).init();

    match run(Cli::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

//! Frame cache inspector.
//!
//! Loads sprite frame descriptors through the same [`FrameCache`] the engine
//! uses and prints what ended up in the cache. Texture sizes are read from the
//! PNG headers, so no window or GPU context is needed.
//!
//! # Running
//!
//! ```sh
//! cargo run -- --lookup hero sheets/hero.json sheets/items.json
//! ```

use clap::Parser;
use log::info;
use std::path::PathBuf;

use framecache::resources::atlastexture::{PngHeaderLoader, TextureStore};
use framecache::resources::cacheconfig::CacheConfig;
use framecache::resources::descriptor::JsonDescriptorSource;
use framecache::resources::error::FrameCacheError;
use framecache::resources::framecache::FrameCache;

/// Sprite frame cache inspector
#[derive(Parser)]
#[command(version, about = "Load sprite frame descriptors and inspect the resulting frame cache.")]
struct Cli {
    /// INI configuration file (default: ./framecache.ini, if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Texture file to use instead of the one each descriptor declares.
    #[arg(long, value_name = "PATH")]
    texture: Option<PathBuf>,

    /// Frame or alias name to look up after loading. Repeatable.
    #[arg(long = "lookup", value_name = "NAME")]
    lookups: Vec<String>,

    /// Descriptor to remove again after loading. Repeatable.
    #[arg(long = "unload", value_name = "DESCRIPTOR")]
    unloads: Vec<String>,

    /// Descriptor ids, relative to the configured root.
    #[arg(required = true, value_name = "DESCRIPTOR")]
    descriptors: Vec<String>,
}

fn load_config(path: Option<PathBuf>) -> Result<CacheConfig, FrameCacheError> {
    match path {
        Some(path) => {
            let mut config = CacheConfig::with_path(path);
            config.load_from_file().map_err(FrameCacheError::Config)?;
            Ok(config)
        }
        None => {
            let mut config = CacheConfig::new();
            if let Err(e) = config.load_from_file() {
                info!("Config file not found or invalid, using defaults: {}", e);
            }
            Ok(config)
        }
    }
}

fn run(cli: Cli) -> Result<(), FrameCacheError> {
    let config = load_config(cli.config)?;
    let mut cache = FrameCache::new(
        JsonDescriptorSource::new(&config.root),
        TextureStore::new(PngHeaderLoader),
    )
    .with_config(&config);

    for descriptor in &cli.descriptors {
        match &cli.texture {
            Some(texture) => cache.load_from_source_with_texture_file(descriptor, texture)?,
            None => cache.load_from_source(descriptor, None)?,
        };
    }

    for name in cache.names() {
        let Some(frame) = cache.get_frame(name) else {
            continue;
        };
        let rect = frame.rect();
        let original = frame.original_size();
        println!(
            "{:<32} {:>6},{:<6} {:>5}x{:<5} original={}x{} rotated={} trimmed={} texture={}",
            name,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            original.width,
            original.height,
            frame.rotated(),
            frame.trimmed(),
            frame.texture().path.display()
        );
    }

    for name in &cli.lookups {
        match cache.get_frame(name) {
            Some(frame) => {
                let rect = frame.rect();
                println!(
                    "{} -> {},{} {}x{} in {}",
                    name,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    frame.texture().path.display()
                );
            }
            None => println!("{} -> not found", name),
        }
    }

    for descriptor in &cli.unloads {
        let removed = cache.remove_by_source(descriptor);
        println!("Unloaded {} frames from {}", removed, descriptor);
    }

    println!(
        "{} frames, {} aliases, {} textures",
        cache.len(),
        cache.alias_count(),
        cache.textures().len()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

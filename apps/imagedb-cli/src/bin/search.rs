use std::{env, path::PathBuf};

use imagedb_core::config::Config;
use imagedb_engine::{ImageSearchEngine, DEFAULT_K};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <corpus_dir> <query_image> [--descriptor name] [--limit N] [--json]", args[0]);
        eprintln!("Example: {} ./images query.jpg --descriptor color_histogram --limit 5", args[0]);
        std::process::exit(1);
    }
    let corpus_dir = PathBuf::from(&args[1]);
    let query_path = PathBuf::from(&args[2]);

    let config = Config::load()?;
    let mut descriptor: String = config
        .get("search.descriptor")
        .unwrap_or_else(|_| "color_histogram".to_string());
    let mut limit: usize = config.get("search.limit").unwrap_or(DEFAULT_K);
    let mut json = false;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--descriptor" | "-d" => {
                if i + 1 < args.len() {
                    descriptor = args[i + 1].clone();
                    i += 1;
                } else {
                    eprintln!("Error: --descriptor requires a name");
                    std::process::exit(1);
                }
            }
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(l) = args[i + 1].parse::<usize>() {
                        limit = l;
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            "--json" => json = true,
            _ => {}
        }
        i += 1;
    }

    let mut engine = ImageSearchEngine::with_default_descriptors()?;
    let count = engine.load_corpus(&corpus_dir)?;
    engine.build_index(&descriptor)?;
    let hits = engine.search_file(&query_path, &descriptor, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!("🔍 imagedb-search\n=================");
    println!("Corpus: {} images from {}", count, corpus_dir.display());
    println!("Descriptor: {}", descriptor);
    println!("\n🔍 Found {} results for: \"{}\"", hits.len(), query_path.display());
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "  {}. similarity={:.4}  id={}  file={}",
            i + 1,
            hit.similarity,
            hit.id,
            hit.filename
        );
    }
    Ok(())
}

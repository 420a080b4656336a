use std::{env, path::PathBuf, time::Instant};

use imagedb_core::config::{expand_path, Config};
use imagedb_engine::ImageSearchEngine;
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut corpus_dir = None;
    let mut descriptor = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--descriptor" | "-d" => {
                if i + 1 < args.len() {
                    descriptor = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --descriptor requires a name");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => corpus_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let corpus_dir = corpus_dir.unwrap_or_else(|| {
        let dir: String = config.get("data.corpus_dir").unwrap_or_else(|_| "./images".to_string());
        expand_path(dir)
    });

    println!("imagedb indexer\n===============");
    println!("Corpus directory: {}", corpus_dir.display());

    let mut engine = ImageSearchEngine::with_default_descriptors()?;
    let start = Instant::now();
    let count = engine.load_corpus(&corpus_dir)?;
    println!("Loaded {} images in {:.2?}", count, start.elapsed());

    let names = match descriptor {
        Some(name) => vec![name],
        None => engine.registry().names(),
    };
    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} indexes {msg}")?
            .progress_chars("#>-"),
    );
    for name in &names {
        pb.set_message(format!("building {}", name));
        let start = Instant::now();
        engine.build_index(name)?;
        pb.inc(1);
        if let Some(index) = engine.index(name) {
            pb.println(format!(
                "  {}: {} vectors, dim {}, built in {:.2?}",
                name,
                index.len(),
                index.dim(),
                start.elapsed()
            ));
        }
    }
    pb.finish_with_message("done");

    println!("\n✅ Built {} index(es) over {} images", names.len(), count);
    println!("\n💡 Indexes live in memory; to run a query end to end:");
    println!("💡   cargo run --bin imagedb-search -- {} <query_image>", corpus_dir.display());
    Ok(())
}

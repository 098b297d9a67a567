use anyhow::Result;
use clap::Parser;
use quarry::index::{CorpusBuilder, InvertedIndex};
use quarry::output;
use quarry::query::QueryProcessor;
use quarry::sync::{ReadWriteLock, WorkQueue};
use quarry::web::{HttpFetcher, WebCrawler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Index a plain-text corpus and answer exact or prefix search queries")]
struct Cli {
    /// Corpus root (directory or single file) to index
    #[arg(long, value_name = "PATH")]
    text: Option<PathBuf>,

    /// Query file, one query per line; blank lines are ignored
    #[arg(long, value_name = "PATH")]
    query: Option<PathBuf>,

    /// Prefix-match query stems instead of exact matches
    #[arg(long)]
    partial: bool,

    /// Write per-location token counts as JSON
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "counts.json")]
    counts: Option<PathBuf>,

    /// Write the inverted index as JSON
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "index.json")]
    index: Option<PathBuf>,

    /// Write ranked search results as JSON
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "results.json")]
    results: Option<PathBuf>,

    /// Run the concurrent engine with this many worker threads
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5", allow_negative_numbers = true)]
    threads: Option<i64>,

    /// Seed URL to crawl into the index (always runs on the worker pool)
    #[arg(long, value_name = "URL")]
    html: Option<Url>,

    /// Maximum number of pages to visit from the seed
    #[arg(long, value_name = "N", default_value_t = 1, allow_negative_numbers = true)]
    crawl: i64,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let index = Arc::new(ReadWriteLock::new(InvertedIndex::new()));
    let workers = cli.threads.map(|n| n.max(1) as usize);
    let pool = if workers.is_some() || cli.html.is_some() {
        Some(Arc::new(WorkQueue::new(workers.unwrap_or(5))))
    } else {
        None
    };

    if let Some(root) = &cli.text {
        let builder = CorpusBuilder::new(Arc::clone(&index));
        let built = match &pool {
            Some(pool) => builder.build_with(root, pool),
            None => builder.build(root),
        };
        if let Err(err) = built {
            eprintln!("Unable to index the files at path: {} ({err:#})", root.display());
        }
    }

    if let (Some(seed), Some(pool)) = (cli.html.clone(), &pool) {
        match HttpFetcher::new(HttpFetcher::MAX_REDIRECTS) {
            Ok(fetcher) => {
                let crawler = Arc::new(WebCrawler::new(
                    Arc::clone(&index),
                    Arc::clone(pool),
                    Box::new(fetcher),
                    cli.crawl.max(1) as usize,
                ));
                crawler.crawl(seed);
            }
            Err(err) => eprintln!("Unable to start the crawler: {err:#}"),
        }
    }

    if let Some(path) = &cli.counts {
        if let Err(err) = output::write_counts_file(&index.read(), path) {
            eprintln!("Unable to write {}: {err}", path.display());
        }
    }

    if let Some(path) = &cli.index {
        if let Err(err) = output::write_index_file(&index.read(), path) {
            eprintln!("Unable to write {}: {err}", path.display());
        }
    }

    if let Some(path) = &cli.query {
        let processor = Arc::new(QueryProcessor::new(Arc::clone(&index)));
        let processed = Arc::clone(&processor).process_file(path, cli.partial, pool.as_deref());
        if let Err(err) = processed {
            eprintln!("Unable to process query file: {err:#}");
        }
        if let Some(path) = &cli.results {
            let results = processor.results(cli.partial);
            if let Err(err) = output::write_results_file(&results, path) {
                eprintln!("Unable to write {}: {err}", path.display());
            }
        }
    }

    if let Some(pool) = &pool {
        pool.join();
    }

    println!("Elapsed: {:.3} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

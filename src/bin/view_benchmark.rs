use std::{fmt::Write, sync::Arc, time::Instant};

use anyhow::Result;
use clap::Parser as ClapParser;
use scoped_thread_pool::Pool;
use aview::{ViewConfig, ViewEngine, Environment, MemorySource, TemplateCache,
            in_threadpool::map_in_threadpool};


const PAGE: &str = "<html><head><title>{{title}}</title></head><body>\
<p>Counter: {{counter}}</p>\
<table>{{rows}}</table>\
{{row}}<tr><td>{{a}}</td><td>{{b}}</td>{{on}}<td>on</td>{{/on}}</tr>{{/row}}\
{{footer \"/partials/footer.html\" year:\"2024\"}}\
</body></html>";

const FOOTER: &str = "<footer>{{year}} {{owner}}</footer>";


#[derive(clap::Parser, Debug)]
/// Render a page many times from one cached parse, on a thread pool.
struct Args {
    #[clap(long, default_value = "4")]
    threads: u32,

    /// Number of pages to render
    #[clap(long, default_value = "1000")]
    pages: usize,

    /// Table rows per page
    #[clap(long, default_value = "200")]
    rows: usize,
}

fn render_page(engine: &ViewEngine, counter: usize, rows: usize) -> Result<String> {
    let mut row = engine.load("/page.html", "row");
    let mut table = String::new();
    let mut b = String::new();
    for i in 0..rows {
        row.clear();
        row.set("a", format!("{counter}abc"));
        b.clear();
        write!(&mut b, "{}", i + counter)?;
        row.set("b", b.as_str());
        row.set_bool("on", (i as f64 * 0.1).sin() > 0.432);
        table.push_str(&row.render());
    }

    let mut page = engine.load("/page.html", "");
    page.set("title", "Test page");
    page.set("counter", counter.to_string());
    page.set("footer-owner", "aview");
    // The row block itself stays hidden
    page.set("rows", table);
    Ok(page.render())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ViewConfig {
        environment: Environment::Production,
        ..ViewConfig::default()
    };
    let source = MemorySource::with_files([
        ("/page.html", PAGE),
        ("/partials/footer.html", FOOTER)]);
    let engine = ViewEngine::new(config, Box::new(source), Arc::new(TemplateCache::new()));

    let pool = Pool::new(args.threads as usize);
    let start = Instant::now();
    let results = map_in_threadpool(&pool, args.pages, |i| {
        render_page(&engine, i, args.rows).map(|page| page.len())
    });
    let elapsed = start.elapsed();
    pool.shutdown();

    let mut bytes = 0;
    for r in results {
        bytes += r?;
    }
    println!("{} pages, {} bytes in {:?} ({:?} per page), {} cached templates",
             args.pages, bytes, elapsed,
             elapsed / (args.pages.max(1) as u32),
             engine.cache().len());
    Ok(())
}

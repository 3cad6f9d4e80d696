//! HAL Benchmark Binary
//!
//! Measures building and rendering documents at different scales
//! (100, 1,000, 10,000 embedded resources).
//! Run with: `cargo run --bin hal-bench --release`

use std::time::Instant;

use anyhow::Result;
use hal_core::{
    Builder, Formatting, HalSerializer, LinkItemOptions, LinkingBuilder, Resource, ResourceBuilder,
    SerializerOptions,
};
use hal_host::{HalPresenter, PagedResult, Payload, RequestContext, RequestUrl};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Synthetic data generation
// ---------------------------------------------------------------------------

const STATUSES: &[&str] = &["shipped", "processing", "cancelled", "returned"];
const CURRENCIES: &[&str] = &["USD", "EUR", "GBP"];

#[derive(Serialize)]
struct Order {
    id: usize,
    total_amount: f64,
    currency: &'static str,
    status: &'static str,
    customer_note: Option<String>,
}

fn generate_order(i: usize) -> Order {
    Order {
        id: i,
        total_amount: (i % 500) as f64 + 0.99,
        currency: CURRENCIES[i % CURRENCIES.len()],
        status: STATUSES[i % STATUSES.len()],
        customer_note: (i % 3 == 0).then(|| format!("note for order {i}")),
    }
}

fn build_orders_document(orders: &[Order]) -> Result<Resource> {
    let items = orders.iter().map(|order| {
        ResourceBuilder::new()
            .with_state(order)
            .add_self_link()
            .with_link_item(format!("/orders/{}", order.id))
            .add_link("ea:customer")
            .with_link_item(format!("/customers/{}", order.id % 97))
    });

    Ok(ResourceBuilder::new()
        .with_state(serde_json::json!({ "currentlyProcessing": orders.len() }))
        .add_self_link()
        .with_link_item("/orders")
        .add_curies_link()
        .with_link_item_options(
            "http://example.com/docs/rels/{rel}",
            LinkItemOptions::new().name("ea").templated(true),
        )
        .add_embedded_array("ea:order")
        .resources(items)
        .build()?)
}

// ---------------------------------------------------------------------------
// Percentile computation
// ---------------------------------------------------------------------------

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    let idx = if idx == 0 { 0 } else { idx - 1 };
    sorted[idx.min(sorted.len() - 1)]
}

fn time_runs(runs: usize, mut f: impl FnMut() -> Result<()>) -> Result<(f64, f64)> {
    let mut latencies: Vec<f64> = Vec::with_capacity(runs);
    for _ in 0..runs {
        let start = Instant::now();
        f()?;
        latencies.push(start.elapsed().as_micros() as f64);
    }
    latencies.sort_by(f64::total_cmp);
    Ok((percentile(&latencies, 50.0), percentile(&latencies, 95.0)))
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_duration_us(us: f64) -> String {
    if us >= 1_000_000.0 {
        format!("{:.1} s", us / 1_000_000.0)
    } else if us >= 1_000.0 {
        format!("{:.0} ms", us / 1_000.0)
    } else {
        format!("{:.0} us", us)
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1_024 * 1_024 {
        format!("{:.1} MB", bytes as f64 / (1_024.0 * 1_024.0))
    } else {
        format!("{:.0} KB", bytes as f64 / 1_024.0)
    }
}

fn format_scale(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{}M", n / 1_000_000)
    } else if n >= 1_000 {
        format!("{}K", n / 1_000)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Benchmark results
// ---------------------------------------------------------------------------

type MetricRow = (&'static str, fn(&ScaleResult) -> f64);

#[derive(Default)]
struct ScaleResult {
    build_p50_us: f64,
    build_p95_us: f64,
    compact_p50_us: f64,
    compact_p95_us: f64,
    indented_p50_us: f64,
    camel_case_p50_us: f64,
    present_p50_us: f64,
    compact_bytes: usize,
    indented_bytes: usize,
}

// ---------------------------------------------------------------------------
// Benchmark runner for a single scale
// ---------------------------------------------------------------------------

fn run_benchmark(n: usize, runs: usize) -> Result<ScaleResult> {
    let orders: Vec<Order> = (0..n).map(generate_order).collect();
    let mut result = ScaleResult::default();

    // --- Build ---
    (result.build_p50_us, result.build_p95_us) = time_runs(runs, || {
        build_orders_document(&orders)?;
        Ok(())
    })?;

    let document = build_orders_document(&orders)?;
    let compact = HalSerializer::new(SerializerOptions::default().with_formatting(Formatting::Compact));
    let indented = HalSerializer::default();
    let web = HalSerializer::new(SerializerOptions::web());

    // --- Serialize ---
    (result.compact_p50_us, result.compact_p95_us) = time_runs(runs, || {
        compact.to_vec(&document)?;
        Ok(())
    })?;
    (result.indented_p50_us, _) = time_runs(runs, || {
        indented.to_vec(&document)?;
        Ok(())
    })?;
    (result.camel_case_p50_us, _) = time_runs(runs, || {
        web.to_vec(&document)?;
        Ok(())
    })?;
    result.compact_bytes = compact.to_vec(&document)?.len();
    result.indented_bytes = indented.to_vec(&document)?.len();

    // --- Present a paged result ---
    let presenter = HalPresenter::default().with_item_path(|id| Some(format!("/orders/{id}")));
    let request = RequestContext::new(RequestUrl::parse("http://localhost:5000/orders?page=1")?)
        .with_collection("Orders");
    (result.present_p50_us, _) = time_runs(runs, || {
        let page = PagedResult::paginate((0..n).map(generate_order), 1, n as u64);
        presenter.present(200, Payload::paged(page)?, &request)?;
        Ok(())
    })?;

    Ok(result)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let scales: &[usize] = &[100, 1_000, 10_000];
    let runs = 20;

    println!();
    println!("HAL Benchmark");
    println!("=============");
    println!(
        "Platform: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();

    eprint!("Warming up... ");
    run_benchmark(10, 3)?;
    eprintln!("done.");
    println!();

    let mut results: Vec<(usize, ScaleResult)> = Vec::new();
    for &n in scales {
        eprint!("Benchmarking {} resources... ", n);
        let start = Instant::now();
        let result = run_benchmark(n, runs)?;
        eprintln!("done in {:.1}s", start.elapsed().as_secs_f64());
        results.push((n, result));
    }

    println!();

    let col0 = 24;
    let colw = 14;

    print!("| {:col0$}", "Operation");
    for &n in scales {
        print!("| {:>colw$}", format!("{} resources", format_scale(n)));
    }
    println!("|");

    print!("|{}", "-".repeat(col0 + 1));
    for _ in scales {
        print!("|{}", "-".repeat(colw + 1));
    }
    println!("|");

    let rows: Vec<MetricRow> = vec![
        ("Build (p50)", |r: &ScaleResult| r.build_p50_us),
        ("Build (p95)", |r: &ScaleResult| r.build_p95_us),
        ("Compact (p50)", |r: &ScaleResult| r.compact_p50_us),
        ("Compact (p95)", |r: &ScaleResult| r.compact_p95_us),
        ("Indented (p50)", |r: &ScaleResult| r.indented_p50_us),
        ("camelCase (p50)", |r: &ScaleResult| r.camel_case_p50_us),
        ("Present paged (p50)", |r: &ScaleResult| r.present_p50_us),
    ];
    for (label, getter) in &rows {
        print!("| {:col0$}", label);
        for (_, r) in &results {
            print!("| {:>colw$}", format_duration_us(getter(r)));
        }
        println!("|");
    }

    print!("| {:col0$}", "Compact Size");
    for (_, r) in &results {
        print!("| {:>colw$}", format_size(r.compact_bytes));
    }
    println!("|");

    print!("| {:col0$}", "Indented Size");
    for (_, r) in &results {
        print!("| {:>colw$}", format_size(r.indented_bytes));
    }
    println!("|");

    println!();
    Ok(())
}

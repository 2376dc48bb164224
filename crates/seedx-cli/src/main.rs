//! `seedx`: command-line driver for the seed-hit-to-alignment extension
//! pipeline, wiring FASTA input, a fixture seed generator, and
//! [`seedx_core::run_search`] together.

mod cli;
mod fasta;
mod seed;

use std::io::Write as _;

use clap::Parser;
use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_hitbuf::PartitionedHitBuffer;
use seedx_types::Statistics;

fn main() {
    let cli = cli::Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &cli::Cli) -> seedx_error::Result<()> {
    let config = cli.resolve_config()?;
    let query_records = fasta::read_fasta(&cli.query)?;
    let target_records = fasta::read_fasta(&cli.db)?;

    let database = InMemoryDatabase::new(target_records.clone());
    let target_seqs: Vec<&[u8]> = target_records.iter().map(|(_, seq)| seq.as_slice()).collect();
    let mut global_offsets = Vec::with_capacity(target_seqs.len());
    let mut acc = 0u64;
    for seq in &target_seqs {
        global_offsets.push(acc);
        acc += seq.len() as u64;
    }

    let query_seqs: Vec<&[u8]> = query_records.iter().map(|(_, seq)| seq.as_slice()).collect();
    let contexts = 1;
    let hits = seed::generate_seed_hits(&query_seqs, &target_seqs, &global_offsets, cli.seed_len, contexts);
    tracing::info!(hit_count = hits.len(), "generated fixture seed hits");

    let queries: Vec<QueryRecord<'_>> = query_records
        .iter()
        .enumerate()
        .map(|(idx, (name, seq))| QueryRecord::protein(idx as u32, name.clone(), seq.as_slice()))
        .collect();

    let mut hit_source = PartitionedHitBuffer::new(hits, contexts);
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(
        &mut hit_source,
        &queries,
        &database,
        &config,
        &format,
        &sink,
        &stats,
        contexts,
    )?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for (_, buffer) in sink.drain_ready() {
        handle.write_all(&buffer)?;
    }

    tracing::info!(
        dp_overflow_count = stats.dp_overflow_count(),
        matrix_adjust_count = stats.matrix_adjust_count(),
        "search complete"
    );

    Ok(())
}

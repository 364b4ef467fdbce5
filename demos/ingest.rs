// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Chunked trace ingestion
//!
//! This program feeds a raw trace file to an engine in chunks, simulating a
//! trace unit delivering data in bursts. After every chunk, the pending data
//! is decoded and the resulting events are printed to stdout. Optionally,
//! parameters may be supplied in the form of a TOML file, e.g.
//!
//!     architecture = "CORESIGHT_ETM"
//!     capacity = 65536
//!
//! The architecture may also be overridden on the command line. Log output is
//! controlled via the `RUST_LOG` environment variable.

use std::path::PathBuf;

use hwtrace::config::Parameters;
use hwtrace::decoder::Architecture;
use hwtrace::engine;

fn main() {
    env_logger::init();

    let matches = clap::Command::new("Chunked trace ingestion")
        .arg(clap::arg!(<trace> "Path to the raw trace").value_parser(clap::value_parser!(PathBuf)))
        .arg(
            clap::arg!(-p --params <FILE> "Engine parameters")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::arg!(-a --arch <ARCH> "Trace architecture, e.g. INTEL_PT or CORESIGHT_ETM")
                .value_parser(|s: &str| s.parse::<Architecture>()),
        )
        .arg(
            clap::arg!(-c --"chunk-size" <BYTES> "Number of bytes ingested at once")
                .default_value("4096")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            clap::arg!(-d --debug "Print per-chunk statistics")
                .env("DEBUG")
                .action(clap::ArgAction::SetTrue)
                .value_parser(clap::builder::FalseyValueParser::new()),
        )
        .get_matches();

    let debug = matches.get_flag("debug");

    let mut params: Parameters = matches
        .get_one::<PathBuf>("params")
        .map(|p| {
            let params = std::fs::read_to_string(p).expect("Could not load parameters");
            toml::from_str(params.as_ref()).expect("Could not parse parameters")
        })
        .unwrap_or_default();
    if let Some(arch) = matches.get_one::<Architecture>("arch") {
        params.architecture = *arch;
    }
    if debug {
        eprintln!("Parameters: {params:?}");
    }

    let trace_data = std::fs::read(
        matches
            .get_one::<PathBuf>("trace")
            .expect("No trace file specified"),
    )
    .expect("Could not load trace file");
    let chunk_size = *matches
        .get_one::<usize>("chunk-size")
        .expect("No chunk size");
    assert!(chunk_size > 0, "Chunk size must be non-zero");

    let mut engine = engine::builder()
        .with_params(&params)
        .build()
        .expect("Could not set up engine");

    for (i, chunk) in trace_data.chunks(chunk_size).enumerate() {
        engine.ingest(chunk);
        let count = engine.process();
        if debug {
            eprintln!(
                "Chunk {i}: {count} events, {} bytes pending",
                engine.pending()
            );
        }
        engine.take_events().iter().for_each(|e| println!("{e}"));
    }

    eprintln!(
        "Ingested {} bytes, {} bytes lost, {} overflows, {} bytes left undecoded",
        engine.buffer().total_written(),
        engine.lost_bytes(),
        engine.overflow_count(),
        engine.pending(),
    );
}

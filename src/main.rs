// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! apitap CLI - In-process Network Call Tracker
//!
//! Fetches URLs through a tracked client and prints the call report.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use apitap::{
    write_export, FetchApi, FetchInit, FetchInput, HttpClient, ResourceTimingBuffer, Tracker,
    TrackerConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "apitap=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            let options = match FetchOptions::parse(&args[2..]) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{}", e);
                    eprintln!("Usage: apitap fetch <url>... [--config <file>] [--export <dir>] [--warmup <url>]");
                    return ExitCode::from(1);
                }
            };
            match fetch_urls(options).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::from(1)
                }
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("apitap {}", apitap::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"apitap - In-process Network Call Tracker

USAGE:
    apitap <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>...  Fetch URLs through the tracker and print the call report
    help            Show this help message
    version         Show version information

FETCH OPTIONS:
    --config <file>   Load tracker configuration from a JSON file
    --export <dir>    Write the call log as JSON into <dir>
    --warmup <url>    Fetch <url> before tracking starts (repeatable)

EXAMPLES:
    apitap fetch https://example.com/api/status https://example.com/api/status
    apitap fetch https://example.com/ --warmup https://example.com/boot.json
    apitap fetch https://example.com/ --config apitap.json --export ./logs
"#
    );
}

#[derive(Debug, Default)]
struct FetchOptions {
    urls: Vec<String>,
    warmup: Vec<String>,
    config: Option<PathBuf>,
    export: Option<PathBuf>,
}

impl FetchOptions {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => options.config = Some(value_of(&mut iter, arg)?.into()),
                "--export" => options.export = Some(value_of(&mut iter, arg)?.into()),
                "--warmup" => options.warmup.push(value_of(&mut iter, arg)?.to_string()),
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                url => options.urls.push(url.to_string()),
            }
        }

        if options.urls.is_empty() {
            bail!("No URL given");
        }
        Ok(options)
    }
}

fn value_of<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> anyhow::Result<&'a str> {
    iter.next()
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}

async fn fetch_urls(options: FetchOptions) -> anyhow::Result<()> {
    let config = match options.config {
        Some(ref path) => TrackerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TrackerConfig::full_capture(),
    };

    let tracker = Tracker::new(config, &options.urls[0]).context("Failed to create tracker")?;

    // Warm-up calls happen before interception and only show up in timing
    let timing = ResourceTimingBuffer::new();
    if !options.warmup.is_empty() {
        let client = HttpClient::new()?.with_timing_buffer(timing.clone());
        for url in &options.warmup {
            println!("Warming up: {}", url);
            if let Err(e) = client.fetch(FetchInput::from(url.as_str()), FetchInit::new()).await {
                eprintln!("Warm-up failed for {}: {}", url, e);
            }
        }
    }
    if let Err(e) = tracker.import_resource_timing(&timing) {
        eprintln!("Resource timing skipped: {}", e);
    }

    let fetch = tracker.wrap_fetch(HttpClient::new()?);
    for url in &options.urls {
        match fetch.get(url).await {
            Ok(response) => println!(
                "[{}] {} ({} bytes, {}ms)",
                response.status_code(),
                response.url,
                response.body_len(),
                response.response_time_ms
            ),
            Err(e) => eprintln!("Failed to fetch {}: {}", url, e),
        }
    }

    println!("\n{}", tracker.report());

    let failed = tracker.store().failed();
    if !failed.is_empty() {
        println!("\n=== Failed ({}) ===", failed.len());
        for call in &failed {
            println!(
                "  {} {}: {}",
                call.method,
                call.url,
                call.details.error.as_deref().unwrap_or("")
            );
        }
    }

    if let Some(ref dir) = options.export {
        let path = write_export(&tracker, dir)
            .with_context(|| format!("Failed to export to {}", dir.display()))?;
        println!("\nExported to {}", path.display());
    }

    Ok(())
}

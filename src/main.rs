// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use clap::Parser;
use lake_vitals::{Analyzer, SourceConfig, SourceFactory};
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Structural health metrics for a snapshot-versioned table
#[derive(Parser, Debug)]
#[command(name = "lake-vitals")]
#[command(about = "Structural health metrics for a snapshot-versioned table", long_about = None)]
struct Cli {
    /// URL or local path of the table's JSON metadata document
    location: String,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Also write the JSON output to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting Lake Vitals, location={}", cli.location);
    let start = Instant::now();

    let source = SourceFactory::from_config(SourceConfig::document(&cli.location)).await?;
    let analyzer = Analyzer::builder().build()?;

    let metrics = analyzer.compute_table_metrics(source.as_ref()).await?;
    let health = analyzer.table_health(source.as_ref()).await?;
    info!("Analysis finished, took={}", start.elapsed().as_millis());

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "metrics": metrics,
        "health": health,
    }))?;

    if let Some(out) = &cli.out {
        let mut f = File::create(out)?;
        f.write_all(json.as_bytes())?;
        info!("Wrote metrics to {}", out.display());
    }

    if cli.json {
        println!("{}", json);
    } else {
        println!("{}", metrics);
        println!("{}", health);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli =
            Cli::try_parse_from(["lake-vitals", "metadata.json", "--json", "--out", "m.json"])
                .unwrap();

        assert_eq!(cli.location, "metadata.json");
        assert!(cli.json);
        assert_eq!(cli.out, Some(PathBuf::from("m.json")));
    }

    #[test]
    fn test_cli_requires_location() {
        assert!(Cli::try_parse_from(["lake-vitals", "--json"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["lake-vitals", "m.json", "--verbose"]).is_err());
    }
}

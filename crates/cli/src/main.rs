//! `vadmark` -- operational CLI for an annotation backend.
//!
//! Thin wrapper over the HTTP client for tasks that do not need an
//! interactive session: liveness checks, progress statistics, result
//! export, and the full reset.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default | Description                              |
//! |------------------------|----------|---------|------------------------------------------|
//! | `VADMARK_API_URL`      | yes      | --      | API base URL, e.g. `http://host:5000/api` |
//! | `VADMARK_TIMEOUT_SECS` | no       | none    | Per-request timeout in seconds           |

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vadmark_client::AnnotationApi;

const USAGE: &str = "\
usage: vadmark <command>

commands:
  health           check backend liveness
  stats            print aggregate annotation statistics
  export [path]    fetch the CSV export (stdout, or to a file)
  reset --yes      delete every annotation on the backend
";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vadmark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_url = std::env::var("VADMARK_API_URL").unwrap_or_else(|_| {
        tracing::error!("VADMARK_API_URL environment variable is required");
        std::process::exit(1);
    });

    let timeout_secs: Option<u64> = std::env::var("VADMARK_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok());

    let api = match timeout_secs {
        Some(secs) => AnnotationApi::with_timeout(api_url, Duration::from_secs(secs))
            .unwrap_or_else(|error| {
                tracing::error!(error = %error, "Failed to build HTTP client");
                std::process::exit(1);
            }),
        None => AnnotationApi::new(api_url),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("health") => health(&api).await,
        Some("stats") => stats(&api).await,
        Some("export") => export(&api, args.get(1).map(String::as_str)).await,
        Some("reset") => reset(&api, args.iter().any(|a| a == "--yes")).await,
        _ => {
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(error) = result {
        tracing::error!(error = %error, "Command failed");
        std::process::exit(1);
    }
}

async fn health(api: &AnnotationApi) -> Result<(), vadmark_client::ApiError> {
    let status = api.health().await?;
    println!("backend status: {}", status.status);
    Ok(())
}

async fn stats(api: &AnnotationApi) -> Result<(), vadmark_client::ApiError> {
    let stats = api.fetch_statistics().await?;
    println!("total media:     {}", stats.total_media);
    println!("annotated:       {}", stats.total_annotated);
    println!("pending:         {}", stats.pending);
    println!("completion rate: {:.1}%", stats.completion_rate);
    if !stats.emotion_summary.is_empty() {
        println!("by emotion:");
        let mut tags: Vec<_> = stats.emotion_summary.iter().collect();
        tags.sort_by_key(|(tag, _)| tag.as_str());
        for (tag, count) in tags {
            println!("  {tag:<10} {count}");
        }
    }
    if let Some(vad) = &stats.vad_summary {
        if let (Some(v), Some(a)) = (vad.avg_valence, vad.avg_arousal) {
            println!("avg valence:     {v:.3}");
            println!("avg arousal:     {a:.3}");
        }
    }
    Ok(())
}

async fn export(api: &AnnotationApi, path: Option<&str>) -> Result<(), vadmark_client::ApiError> {
    let report = api.export_results().await?;
    tracing::info!(
        total = report.total,
        annotated = report.annotated,
        "Export fetched"
    );
    match path {
        Some(path) => {
            if let Err(error) = std::fs::write(path, &report.csv) {
                tracing::error!(path, error = %error, "Failed to write export file");
                std::process::exit(1);
            }
            println!("wrote {} rows to {path}", report.annotated);
        }
        None => print!("{}", report.csv),
    }
    Ok(())
}

async fn reset(api: &AnnotationApi, confirmed: bool) -> Result<(), vadmark_client::ApiError> {
    // Destructive; require the explicit flag instead of prompting.
    if !confirmed {
        eprintln!("refusing to reset without --yes");
        std::process::exit(2);
    }
    let report = api.reset_all().await?;
    println!("{}", report.message);
    Ok(())
}

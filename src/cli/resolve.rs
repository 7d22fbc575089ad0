//! Resolve command implementation

use anyhow::{Context, Result};

use hark::config::Config;
use hark::engine::Engine;
use hark::{HypothesisSet, Locale, Resolved};

/// Resolve hypotheses given on the command line and print the winner
pub async fn resolve_command(
    config: &Config,
    texts: Vec<String>,
    confidences: Vec<f32>,
    locale: Option<String>,
    json: bool,
) -> Result<()> {
    let confidences = if confidences.is_empty() {
        vec![1.0; texts.len()]
    } else {
        confidences
    };
    let hypotheses = HypothesisSet::new(texts, confidences)?;
    let locale = locale
        .map(Locale::new)
        .unwrap_or_else(|| config.resolver.locale());

    let engine = Engine::from_config(config)?;
    let resolution = tokio::task::spawn_blocking(move || engine.resolve(&hypotheses, &locale))
        .await
        .context("Resolution task failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("{}", resolution);
    if let Resolved::Command(matched) = &resolution.resolved {
        match matched.entry.action() {
            Ok(action) => println!("  action: {}", action.summary()),
            Err(e) => eprintln!("  unreadable action payload: {}", e),
        }
        println!("  heard: \"{}\"", matched.result.input_text);
    }

    Ok(())
}

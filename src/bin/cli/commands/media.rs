use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

/// Catalog spelling for a word id or English word; free text passes through
fn resolve_word(app: &App, key: &str) -> String {
    app.find_word(key)
        .map(|w| w.en)
        .unwrap_or_else(|_| key.to_string())
}

pub fn run_illustrate(
    app: &App,
    key: &str,
    out: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let word = resolve_word(app, key);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let image = runtime.block_on(async {
        let gateway = app.gateway()?;
        anyhow::Ok(gateway.illustration_for(&word).await)
    })?;
    let image = image.with_context(|| format!("No illustration could be generated for '{}'", word))?;

    if let Some(path) = out {
        let bytes = image.decode().context("Failed to decode image data")?;
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": word,
                "path": out.map(|p| p.to_string_lossy().to_string()),
                "dataUrl": if out.is_none() { Some(image.as_str()) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match out {
            Some(path) => println!("Saved illustration of {} to {}", word, path.display()),
            None => println!("{}", image.as_str()),
        },
    }

    Ok(())
}

pub fn run_say(app: &App, key: &str, out: &Path, format: &OutputFormat) -> Result<()> {
    let word = resolve_word(app, key);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let audio = runtime.block_on(async {
        let gateway = app.gateway()?;
        anyhow::Ok(gateway.generate_pronunciation(&word).await)
    })?;
    let audio = audio.with_context(|| format!("No pronunciation could be generated for '{}'", word))?;

    fs::write(out, audio.to_wav_bytes())
        .with_context(|| format!("Failed to write {}", out.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": word,
                "path": out.to_string_lossy(),
                "durationSecs": audio.duration_secs(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!(
            "Saved pronunciation of {} ({:.1}s) to {}",
            word,
            audio.duration_secs(),
            out.display()
        ),
    }

    Ok(())
}

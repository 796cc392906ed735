// Inline a web page's stylesheets, scripts and images into one HTML document.
//
// Usage: antidote <URL> [OUTPUT]
//
// The cured document goes to stdout, or to OUTPUT when given. Set
// ANTIDOTE_CONFIG to a JSON `CureConfig` file to change extension sets or
// fetch limits.

use anyhow::{Context, Result, bail};

use antidote::utils::CONFIG_ENV_VAR;
use antidote::{Antidote, CureConfig, Ingredients};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: antidote <URL> [OUTPUT]");
    };
    let output = args.next();

    let config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => CureConfig::from_json_file(&path)
            .with_context(|| format!("Invalid config in {}", path.to_string_lossy()))?,
        None => CureConfig::default(),
    };

    let mut antidote = Antidote::with_config(config);
    antidote.configure(Ingredients::new(url.as_str()))?;
    let html = antidote
        .cure()
        .await
        .with_context(|| format!("Failed to cure {url}"))?;

    if let Some(summary) = antidote.last_summary()
        && summary.has_failures()
    {
        log::warn!(
            "{} of {} assets could not be inlined",
            summary.failures.len(),
            summary.total()
        );
    }

    match output {
        Some(path) => {
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("Failed to write {path}"))?;
            log::info!("Wrote cured page to {path}");
        }
        None => println!("{html}"),
    }

    Ok(())
}

//! CLI Status Command
//!
//! Asks a running server for `/api/health`.

use anyhow::Result;
use codelens_config::CodeLensConfig;

use crate::terminal_output::{note_error, note_success};

pub async fn run(config: &CodeLensConfig) -> Result<()> {
    let host = match config.gateway.bind.as_str() {
        "0.0.0.0" | "::" => "127.0.0.1",
        bind => bind,
    };
    let url = format!("http://{host}:{}/api/health", config.gateway.port);

    let client = reqwest::Client::new();
    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("CodeLens is running at {url}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            note_error(&format!("CodeLens is not running on port {}", config.gateway.port));
        }
    }

    Ok(())
}

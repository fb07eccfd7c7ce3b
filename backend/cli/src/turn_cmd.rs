//! One-shot `ask` and `explain` commands.
//!
//! Each run gets a fresh session; only the bot entries are printed.

use std::path::Path;

use anyhow::{bail, Context, Result};
use codelens_agent::Submission;
use codelens_config::CodeLensConfig;
use codelens_gateway::GatewayState;
use codelens_media::MediaPayload;

use crate::terminal_output::print_bot_entries;

pub async fn ask(config: &CodeLensConfig, question: String) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question is empty");
    }
    run_turn(config, Submission::text(question)).await
}

pub async fn explain(config: &CodeLensConfig, image: &Path) -> Result<()> {
    let data = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let filename = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let payload = MediaPayload::new(filename, data);

    let state = GatewayState::from_config(config);
    state
        .uploads
        .check(&payload)
        .with_context(|| format!("Cannot explain {}", image.display()))?;

    run_turn_with(&state, Submission::image(payload.data.to_vec())).await
}

async fn run_turn(config: &CodeLensConfig, submission: Submission) -> Result<()> {
    let state = GatewayState::from_config(config);
    run_turn_with(&state, submission).await
}

async fn run_turn_with(state: &GatewayState, submission: Submission) -> Result<()> {
    let mut session = state.session.lock().await;
    let outcome = state.agent.submit(&mut session, submission).await;

    print_bot_entries(session.conversation());

    if let Some(kind) = outcome.error {
        bail!("turn ended with error: {kind:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use codelens_agent::ChatAgent;
    use codelens_core::ChatError;
    use codelens_media::UploadPolicy;
    use codelens_model::MockProvider;
    use codelens_understanding::TesseractEngine;

    fn state_with(llm: MockProvider) -> GatewayState {
        let agent = ChatAgent::new(Arc::new(llm), Arc::new(TesseractEngine::default()));
        GatewayState::new(agent, UploadPolicy::default())
    }

    #[tokio::test]
    async fn answered_turn_is_ok() {
        let state = state_with(MockProvider::new("mock").with_response("A slice."));
        run_turn_with(&state, Submission::text("What is &[u8]?")).await.unwrap();
        assert_eq!(state.session.lock().await.conversation().len(), 2);
    }

    #[tokio::test]
    async fn failed_turn_returns_error() {
        let state = state_with(
            MockProvider::new("mock").with_error(ChatError::ModelConnection("refused".into())),
        );
        let err = run_turn_with(&state, Submission::text("hello")).await.unwrap_err();
        assert_eq!(err.to_string(), "turn ended with error: ModelConnection");
        // The error reply is still recorded before the command fails.
        assert_eq!(state.session.lock().await.conversation().len(), 2);
    }

    #[tokio::test]
    async fn explain_rejects_disallowed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"not an image").await.unwrap();

        let err = explain(&CodeLensConfig::default(), &path).await.unwrap_err();
        assert!(err.to_string().starts_with("Cannot explain"));
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let err = ask(&CodeLensConfig::default(), "  ".into()).await.unwrap_err();
        assert_eq!(err.to_string(), "question is empty");
    }
}

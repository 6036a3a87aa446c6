//! Non-interactive `generate` command: one exchange, printed to stdout.

use anyhow::{anyhow, bail, Result};
use colored::*;

use crate::client::GeneratorClient;
use crate::content::{ContentView, FormInput, GeneratedContent};
use crate::state::{RequestStatus, SubmissionController};

/// Run a single submission through the same lifecycle the TUI uses.
///
/// On failure the error carries only the user-facing message; the cause is
/// logged by the controller.
pub async fn generate(client: &GeneratorClient, input: &FormInput) -> Result<GeneratedContent> {
    if !input.is_submittable() {
        bail!("Prompt must not be empty");
    }

    let mut controller = SubmissionController::new();
    let Some(ticket) = controller.begin() else {
        bail!("A generation request is already in flight");
    };

    let result = client.generate(input).await;
    controller.complete(ticket, result);

    match controller.status() {
        RequestStatus::Succeeded(content) => Ok(content.clone()),
        RequestStatus::Failed(message) => Err(anyhow!("{}", message)),
        RequestStatus::Idle | RequestStatus::Pending => bail!("Generation did not complete"),
    }
}

/// All four fields (placeholders for empty ones) followed by the sources.
pub fn format_content(content: &GeneratedContent) -> String {
    let mut out = String::new();

    for view in ContentView::all() {
        out.push_str(&format!("{}\n", format!("{}:", view.title()).bold().green()));
        match content.field(view) {
            Some(value) if view.is_media() => {
                out.push_str(&format!("{}\n\n", value.blue().underline()))
            }
            Some(value) => out.push_str(&format!("{}\n\n", value)),
            None => out.push_str(&format!("{}\n\n", view.placeholder().dimmed())),
        }
    }

    if content.has_sources() {
        out.push_str(&format!("{}\n", "Sources:".bold().blue()));
        for (i, source) in content.sources.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", (i + 1).to_string().bold(), source.blue()));
        }
    }

    out
}

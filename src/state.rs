//! Request lifecycle for a single generation form
//!
//! `SubmissionController` is the only place that changes `RequestStatus`.
//! It enforces single flight (`begin` refuses while a request is pending)
//! and tags each submission with a `Ticket` so a completion that arrives
//! after a newer submission or a cancel is dropped instead of clobbering
//! the current state.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::content::GeneratedContent;

/// Shown for every kind of failure. The underlying error only goes to the log.
pub const FAILURE_MESSAGE: &str = "Failed to generate content. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded(GeneratedContent),
    Failed(String),
}

/// Generation token for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    status: RequestStatus,
    // Last successful content while status is not Succeeded
    retained: Option<GeneratedContent>,
    generation: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RequestStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// The most recent successful content, kept across later failures.
    pub fn content(&self) -> Option<&GeneratedContent> {
        match &self.status {
            RequestStatus::Succeeded(content) => Some(content),
            _ => self.retained.as_ref(),
        }
    }

    /// Move to `Pending` and hand out a ticket, or `None` if a request is
    /// already in flight.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.is_pending() {
            debug!("submission refused, request already pending");
            return None;
        }

        if let RequestStatus::Succeeded(content) =
            std::mem::replace(&mut self.status, RequestStatus::Pending)
        {
            self.retained = Some(content);
        }

        self.generation += 1;
        debug!(ticket = self.generation, "submission started");
        Some(Ticket(self.generation))
    }

    /// Apply the outcome of the exchange started with `ticket`.
    ///
    /// Returns `false` when the ticket is stale and nothing changed.
    pub fn complete(&mut self, ticket: Ticket, result: Result<GeneratedContent>) -> bool {
        if ticket.0 != self.generation || !self.is_pending() {
            warn!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale generation result"
            );
            return false;
        }

        self.status = match result {
            Ok(content) => {
                info!(ticket = ticket.0, "generation succeeded");
                self.retained = None;
                RequestStatus::Succeeded(content)
            }
            Err(err) => {
                error!(ticket = ticket.0, "Error generating content: {:#}", err);
                RequestStatus::Failed(FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    /// Invalidate the in-flight request, if any. Its result will be ignored.
    pub fn cancel(&mut self) {
        if self.is_pending() {
            info!(ticket = self.generation, "cancelling pending generation");
            self.generation += 1;
            self.status = RequestStatus::Idle;
        }
    }
}

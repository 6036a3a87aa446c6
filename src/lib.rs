pub mod app;
pub mod client;
pub mod config;
pub mod content;
pub mod handler;
pub mod logging;
pub mod oneshot;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use client::GeneratorClient;
pub use config::Config;
pub use content::{ContentView, FormInput, GeneratedContent, Platform, Tone};
pub use state::{RequestStatus, SubmissionController, Ticket, FAILURE_MESSAGE};

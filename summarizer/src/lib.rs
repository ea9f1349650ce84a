//! # Project Summary Service Client
//!
//! Rust client for the external text-summarization service used by the
//! dashboard. The service accepts two free-text fields (project details and
//! recent changes) and returns a single free-text summary.
//!
//! Failures surface as a [`SummarizerError`] that callers present as a
//! dismissible message; the client applies no retry or timeout policy of
//! its own.
//!
//! ## Example
//!
//! ```no_run
//! use debrisflow_summarizer::{SummarizeRequest, SummarizerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from DEBRISFLOW_SUMMARIZER_API_KEY
//!     let client = SummarizerClient::from_env()?;
//!
//!     let request = SummarizeRequest::new(
//!         "Hurricane cleanup, 1205 transactions, 3 errors",
//!         "Two new trucks onboarded this week",
//!     );
//!
//!     let response = client.summarize(request).await?;
//!     println!("Summary: {}", response.summary);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

// Re-export main types for convenience
pub use client::{SummarizeRequest, SummarizeResponse, SummarizerClient};
pub use error::SummarizerError;

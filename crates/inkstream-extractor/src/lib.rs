//! Inkstream Extractor
//!
//! Reads a structured article out of generative-model output while it is
//! still streaming.
//!
//! # Overview
//!
//! Models are asked for five fields (`title`, `content`, `metaDescription`,
//! `keywords`, `headings`) but do not reliably stick to one output format.
//! The [`Extractor`] accepts any of three grammars, tried in order:
//!
//! 1. **Fenced JSON**: a ```` ```json ```` block, possibly unclosed and cut
//!    mid-value.
//! 2. **Sections**: `field: value` headers, with multi-line values and
//!    bullet lists.
//! 3. **Markdown**: a `# heading` as title and the rest as content.
//!
//! Extraction never fails. Whatever the text, a best-effort
//! [`ExtractedDocument`] comes back.
//!
//! # Architecture
//!
//! ```text
//! chunks → StreamingSession (buffer) → Extractor (whole buffer) → ExtractedDocument
//! ```
//!
//! The [`StreamingSession`] re-parses its whole buffer on every chunk rather
//! than keeping incremental parser state, so a document depends only on the
//! text received so far.
//!
//! # Example Usage
//!
//! ```
//! use inkstream_extractor::{StreamingSession, ExtractMode, extract};
//!
//! let mut session = StreamingSession::new();
//! for chunk in ["title: Rust ", "streams\ncontent: ## Why\n", "Because."] {
//!     let partial = session.on_chunk(chunk).unwrap();
//!     println!("live title: {:?}", partial.title);
//! }
//!
//! let article = session.finalize().unwrap();
//! assert_eq!(article.title.as_deref(), Some("Rust streams"));
//! assert_eq!(article.headings, Some(vec!["Why".to_string()]));
//!
//! // One-shot extraction
//! let doc = extract("# Title\n\nBody", ExtractMode::Final);
//! assert_eq!(doc.title.as_deref(), Some("Title"));
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod parser;
mod extractor;
mod session;


pub use error::ExtractorError;
pub use config::ExtractorConfig;
pub use types::{ExtractMode, ExtractedDocument, Extraction, Field, Grammar};
pub use extractor::{extract, Extractor};
pub use session::{SessionState, StreamingSession};

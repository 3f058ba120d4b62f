//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the two external backends (pdfium, the LLM) stay behind traits.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ extract ──▶ preprocess ──▶ llm ──▶ postprocess ──▶ write
//! (dir)    (pdfium)    (budget)       (chat)  (optional)      (.md)
//! ```
//!
//! 1. [`scan`]: list the `.pdf` files of the input directory
//! 2. [`extract`]: pull plain text out of a PDF; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`preprocess`]: cap the text at the input token budget
//! 4. [`llm`]: one system + one user message to the provider; the
//!    only stage with network I/O
//! 5. [`postprocess`]: opt-in cleanup of fences and whitespace
//! 6. [`write`]: `<stem>_summary.md` in the output directory

pub mod extract;
pub mod llm;
pub mod postprocess;
pub mod preprocess;
pub mod scan;
pub mod write;

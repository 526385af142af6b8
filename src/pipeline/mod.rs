//! Pipeline stages for DOCX-to-plain-English conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the speech engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ rewrite ──▶ postprocess ──▶ write ──▶ speech
//! (docx-rs)   (LLM)        (cleanup)     (docx-rs)  (espeak-ng, optional)
//! ```
//!
//! 1. [`extract`] — parse the DOCX and join paragraph text, one per line
//! 2. [`tokens`]  — count tokens against the configured model's BPE, for
//!    usage reporting only
//! 3. [`rewrite`] — wrap the text in the rewrite template and drive one
//!    completion call; the only stage with network I/O
//! 4. [`postprocess`] — deterministic text-cleanup rules to fix model quirks
//!    (stray fences, CRLF, invisible Unicode)
//! 5. [`write`]   — serialise the result into a fresh DOCX
//! 6. [`speech`]  — synthesize a WAV with the local engine when requested

pub mod extract;
pub mod postprocess;
pub mod rewrite;
pub mod speech;
pub mod tokens;
pub mod write;

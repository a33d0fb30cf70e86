//! Pipeline stages for Markdown-to-JSON conversion.
//!
//! Each submodule implements exactly one transformation step. Every stage is
//! a pure function of its input: no I/O, no shared state, no failure modes.
//! That keeps each stage independently testable and lets the caller process
//! documents concurrently without coordination.
//!
//! ## Data Flow
//!
//! ```text
//! raw text ──▶ frontmatter ──▶ html ──▶ record
//!             (meta, body)    (body → HTML)  (Post)
//! ```
//!
//! 1. [`frontmatter`]: split the `---` block into typed [`frontmatter::MetaValue`]s
//!    and return the body untouched
//! 2. [`html`]: ordered Markdown-to-HTML passes over the body
//! 3. [`links`]: the link/image pass used by [`html`]; a single scan with a
//!    parenthesis-depth counter instead of a regex
//! 4. [`record`]: map well-known keys to a [`record::Post`] and drop drafts

pub mod frontmatter;
pub mod html;
pub mod links;
pub mod record;

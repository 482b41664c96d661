//! Core library for jiramark
//!
//! This crate implements the **Functional Core** of the jiramark application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`jiramark_core`** (this crate): Pure transformation functions with zero I/O
//! - **`jiramark`**: CLI and MCP server that read input and print results (the Imperative Shell)
//!
//! Every function here is deterministic and side-effect free: the same
//! Markdown always produces the same wiki markup, and conversions running in
//! parallel share no state.
//!
//! # Module Organization
//!
//! - [`jira`]: The Markdown to Jira wiki markup conversion pipeline
//! - [`request`]: Shaping of `{ "markdown" | "text" }` requests into `{ "jira" }` responses
//!
//! # Example Usage
//!
//! ```rust
//! use jiramark_core::jira::convert;
//!
//! let markup = convert("## Summary\n- Item 1\n- Item 2");
//! assert_eq!(markup, "h2. Summary\n* Item 1\n* Item 2");
//! ```

pub mod jira;
pub mod request;

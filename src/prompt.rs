//! Request kinds and prompt construction.
//!
//! A request is either a rewrite of the current selection (Modify) or an
//! insertion of new code (Generate). The kind is a closed set: it is parsed
//! once at command-registration time, and every function consuming it
//! handles exactly the two variants. Prompt construction is verbatim
//! template substitution, with no escaping of the instruction or code text.

use anyhow::{Result, anyhow};

/// The two supported request kinds.
///
/// Any other tag is an `UnsupportedRequestKind` configuration error at
/// parse time, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Rewrite the selected code according to the instruction.
    Modify,
    /// Insert new code at the end of the selection.
    Generate,
}

impl RequestKind {
    /// Parses a request kind from its command name.
    ///
    /// This is the only place an unsupported kind can appear; it fails
    /// before any prompt is built or any network activity occurs.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "modify" => Ok(Self::Modify),
            "generate" => Ok(Self::Generate),
            other => Err(anyhow!("UnsupportedRequestKind: {}", other)),
        }
    }
}

/// Descriptor for the instruction input box, selected per request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBoxSpec {
    pub placeholder: &'static str,
    pub prompt: &'static str,
}

/// Returns the input box copy for a request kind.
pub fn input_box(kind: RequestKind) -> InputBoxSpec {
    match kind {
        RequestKind::Modify => InputBoxSpec {
            placeholder: "Fix the following code",
            prompt: "Prompt for the AI",
        },
        RequestKind::Generate => InputBoxSpec {
            placeholder: "Write a ruby program that does something",
            prompt: "Prompt for the AI",
        },
    }
}

/// Builds the completion prompt. Pure and deterministic.
///
/// Modify interpolates the language, instruction, and selected code in that
/// order; Generate ignores the selected code entirely.
pub fn build_prompt(kind: RequestKind, instruction: &str, language: &str, code: &str) -> String {
    match kind {
        RequestKind::Modify => {
            format!("Modify this {language} code by:\n{instruction}\n\n{code}")
        }
        RequestKind::Generate => {
            format!("Write some {language} code that:\n{instruction}")
        }
    }
}

//! Editor host surface and edit application.
//!
//! The host editor is an external collaborator; this module models the
//! slice of its API the orchestrator consumes: read the active selection,
//! collect a free-text instruction, show a notice, and perform one atomic
//! replace-or-insert edit. The mapping from request kind to edit action is
//! a total function over the closed kind set, so an out-of-set kind cannot
//! reach edit application.

use crate::prompt::{InputBoxSpec, RequestKind};
use anyhow::Result;
use async_trait::async_trait;

/// Byte span of the current selection within the document.
///
/// Offsets must fall on character boundaries. The span doubles as the
/// replacement target (Modify) and the insertion anchor (Generate inserts
/// at `end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: usize,
    pub end: usize,
}

/// Snapshot of the active editor at the moment a command is invoked.
///
/// Created fresh per invocation and dropped when it ends; nothing here
/// outlives the invocation.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    /// Language identifier of the document, e.g. "python".
    pub language: String,
    /// Text currently selected, possibly empty.
    pub text: String,
    /// Span the selection occupies.
    pub span: SelectionSpan,
}

/// A single document mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the text spanning `span` with `text`.
    Replace { span: SelectionSpan, text: String },
    /// Insert `text` at byte offset `at`, leaving existing text intact.
    Insert { at: usize, text: String },
}

impl Edit {
    /// Applies this edit to a document, returning the new content.
    pub fn apply_to(&self, document: &str) -> String {
        let mut content = document.to_string();
        match self {
            Edit::Replace { span, text } => {
                content.replace_range(span.start..span.end, text);
            }
            Edit::Insert { at, text } => {
                content.insert_str(*at, text);
            }
        }
        content
    }
}

/// Maps a request kind to its edit action.
///
/// Modify replaces the selection; Generate inserts at the selection's end
/// boundary.
pub fn edit_for(kind: RequestKind, span: SelectionSpan, new_text: &str) -> Edit {
    match kind {
        RequestKind::Modify => Edit::Replace {
            span,
            text: new_text.to_string(),
        },
        RequestKind::Generate => Edit::Insert {
            at: span.end,
            text: new_text.to_string(),
        },
    }
}

/// The editor surface the orchestrator drives.
///
/// Implementations back this with a real host (a file plus a terminal in
/// the shipped CLI) or with in-memory state in tests.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Returns the active selection context, or `None` when there is no
    /// active editor.
    fn selection_context(&self) -> Option<SelectionContext>;

    /// Collects the user's free-text instruction.
    ///
    /// This is a suspension point: the call yields until the user answers
    /// or cancels. `None` means cancelled.
    async fn read_instruction(&self, spec: &InputBoxSpec) -> Option<String>;

    /// Shows an informational notice to the user.
    fn notify(&self, message: &str);

    /// Performs one atomic document mutation.
    fn apply_edit(&self, edit: Edit) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_maps_to_replace() {
        let span = SelectionSpan { start: 4, end: 9 };
        let edit = edit_for(RequestKind::Modify, span, "new");
        assert_eq!(
            edit,
            Edit::Replace {
                span,
                text: "new".to_string()
            }
        );
    }

    #[test]
    fn test_generate_maps_to_insert_at_end() {
        let span = SelectionSpan { start: 4, end: 9 };
        let edit = edit_for(RequestKind::Generate, span, "new");
        assert_eq!(
            edit,
            Edit::Insert {
                at: 9,
                text: "new".to_string()
            }
        );
    }

    #[test]
    fn test_replace_changes_only_the_span() {
        let document = "aaa bbb ccc";
        let edit = Edit::Replace {
            span: SelectionSpan { start: 4, end: 7 },
            text: "XYZ!".to_string(),
        };
        assert_eq!(edit.apply_to(document), "aaa XYZ! ccc");
    }

    #[test]
    fn test_insert_keeps_existing_text() {
        let document = "aaa bbb ccc";
        let edit = Edit::Insert {
            at: 7,
            text: "\nnew".to_string(),
        };
        assert_eq!(edit.apply_to(document), "aaa bbb\nnew ccc");
    }

    #[test]
    fn test_replace_entire_document() {
        let edit = Edit::Replace {
            span: SelectionSpan { start: 0, end: 3 },
            text: String::new(),
        };
        assert_eq!(edit.apply_to("abc"), "");
    }
}

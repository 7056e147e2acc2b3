//! Per-invocation command orchestration.
//!
//! One orchestrator drives one user-triggered command end to end: read the
//! active selection, collect the instruction (first suspension point),
//! build the prompt, fetch the completion (second suspension point), and
//! apply the edit. Stages run strictly in sequence and every stage-local
//! failure short-circuits the rest; no partial edit is ever applied after
//! a failed fetch. Invocations share no mutable state, so concurrent
//! commands each run their own instance.

use crate::completion::{CompletionClient, CompletionError};
use crate::editor::{EditorHost, edit_for};
use crate::prompt::{RequestKind, build_prompt, input_box};
use anyhow::Result;
use tracing::{error, info};

/// Terminal state of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The completion was fetched and the edit applied.
    Done,
    /// No active editor; nothing further happened.
    NoEditor,
    /// The user cancelled the instruction prompt; nothing further happened.
    NoInstruction,
    /// The completion request failed; no edit was applied.
    Failed(CompletionError),
}

/// Drives one command invocation against a host and a completion client.
///
/// The request kind is fixed at registration time, matching the command
/// surface: one orchestrator per registered command.
pub struct CommandOrchestrator<H, C> {
    kind: RequestKind,
    host: H,
    client: C,
}

impl<H: EditorHost, C: CompletionClient> CommandOrchestrator<H, C> {
    pub fn new(kind: RequestKind, host: H, client: C) -> Self {
        Self { kind, host, client }
    }

    /// Runs the invocation to a terminal state.
    ///
    /// User abstention (no editor, cancelled input) is not an error; it is
    /// reported through the returned [`Outcome`]. Only host edit failures
    /// propagate as errors.
    pub async fn run(&self) -> Result<Outcome> {
        let Some(context) = self.host.selection_context() else {
            self.host.notify("Couldn't get active editor!");
            return Ok(Outcome::NoEditor);
        };

        let spec = input_box(self.kind);
        let instruction = match self.host.read_instruction(&spec).await {
            Some(text) if !text.is_empty() => text,
            _ => {
                self.host.notify("No prompt provided!");
                return Ok(Outcome::NoInstruction);
            }
        };

        info!(
            "Invoking {:?} for {} code, selection {}..{}",
            self.kind, context.language, context.span.start, context.span.end
        );

        let prompt = build_prompt(self.kind, &instruction, &context.language, &context.text);

        self.host.notify("Fetching completion...");
        let completion = match self.client.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Completion failed: {}", e);
                self.host.notify(&e.to_string());
                return Ok(Outcome::Failed(e));
            }
        };

        self.host.notify("Got completion!");
        self.host.apply_edit(edit_for(self.kind, context.span, &completion))?;
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Edit, SelectionContext, SelectionSpan};
    use crate::prompt::InputBoxSpec;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory editor host for driving the state machine in tests.
    struct MockHost {
        context: Option<SelectionContext>,
        instruction: Option<String>,
        document: Mutex<String>,
        notices: Mutex<Vec<String>>,
        input_requested: AtomicBool,
        edits_applied: AtomicBool,
    }

    impl MockHost {
        fn new(document: &str, context: Option<SelectionContext>, instruction: Option<&str>) -> Self {
            Self {
                context,
                instruction: instruction.map(str::to_string),
                document: Mutex::new(document.to_string()),
                notices: Mutex::new(Vec::new()),
                input_requested: AtomicBool::new(false),
                edits_applied: AtomicBool::new(false),
            }
        }

        fn document(&self) -> String {
            self.document.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EditorHost for &MockHost {
        fn selection_context(&self) -> Option<SelectionContext> {
            self.context.clone()
        }

        async fn read_instruction(&self, _spec: &InputBoxSpec) -> Option<String> {
            self.input_requested.store(true, Ordering::SeqCst);
            self.instruction.clone()
        }

        fn notify(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }

        fn apply_edit(&self, edit: Edit) -> Result<()> {
            self.edits_applied.store(true, Ordering::SeqCst);
            let mut document = self.document.lock().unwrap();
            *document = edit.apply_to(&document);
            Ok(())
        }
    }

    /// Completion client that records whether it was called.
    struct MockClient {
        response: Result<String, CompletionError>,
        called: AtomicBool,
    }

    impl MockClient {
        fn returning(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                called: AtomicBool::new(false),
            }
        }

        fn failing(err: CompletionError) -> Self {
            Self {
                response: Err(err),
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for &MockClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.called.store(true, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn selection(document: &str, start: usize, end: usize) -> SelectionContext {
        SelectionContext {
            language: "python".to_string(),
            text: document[start..end].to_string(),
            span: SelectionSpan { start, end },
        }
    }

    #[tokio::test]
    async fn test_no_editor_skips_input_and_network() {
        let host = MockHost::new("", None, Some("irrelevant"));
        let client = MockClient::returning("text");

        let outcome = CommandOrchestrator::new(RequestKind::Modify, &host, &client)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoEditor);
        assert!(!host.input_requested.load(Ordering::SeqCst));
        assert!(!client.called.load(Ordering::SeqCst));
        assert_eq!(host.notices.lock().unwrap()[0], "Couldn't get active editor!");
    }

    #[tokio::test]
    async fn test_cancelled_input_skips_network_and_edit() {
        let document = "def f(x):\n  return x";
        let host = MockHost::new(document, Some(selection(document, 0, document.len())), None);
        let client = MockClient::returning("text");

        let outcome = CommandOrchestrator::new(RequestKind::Modify, &host, &client)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoInstruction);
        assert!(host.input_requested.load(Ordering::SeqCst));
        assert!(!client.called.load(Ordering::SeqCst));
        assert!(!host.edits_applied.load(Ordering::SeqCst));
        assert_eq!(host.document(), document);
    }

    #[tokio::test]
    async fn test_empty_instruction_counts_as_cancelled() {
        let document = "x = 1";
        let host = MockHost::new(document, Some(selection(document, 0, 5)), Some(""));
        let client = MockClient::returning("text");

        let outcome = CommandOrchestrator::new(RequestKind::Modify, &host, &client)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoInstruction);
        assert!(!client.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_modify_replaces_exactly_the_selection() {
        let document = "# header\ndef f(x):\n  return x\n# footer";
        let start = 9;
        let end = 29;
        assert_eq!(&document[start..end], "def f(x):\n  return x");

        let host = MockHost::new(document, Some(selection(document, start, end)), Some("add input validation"));
        let client = MockClient::returning("def f(x):\n  if x < 0: raise ValueError\n  return x");

        let outcome = CommandOrchestrator::new(RequestKind::Modify, &host, &client)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(
            host.document(),
            "# header\ndef f(x):\n  if x < 0: raise ValueError\n  return x\n# footer"
        );
    }

    #[tokio::test]
    async fn test_generate_inserts_at_selection_end() {
        let document = "line one\nline two\n";
        let host = MockHost::new(document, Some(selection(document, 0, 8)), Some("print hello"));
        let client = MockClient::returning("\nprint('hello')");

        let outcome = CommandOrchestrator::new(RequestKind::Generate, &host, &client)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Done);
        // Selection text still present, completion inserted at its end.
        assert_eq!(host.document(), "line one\nprint('hello')\nline two\n");
    }

    #[tokio::test]
    async fn test_failed_completion_applies_no_edit() {
        let document = "keep me";
        let host = MockHost::new(document, Some(selection(document, 0, 7)), Some("break"));
        let client = MockClient::failing(CompletionError::Transport("boom".to_string()));

        let outcome = CommandOrchestrator::new(RequestKind::Modify, &host, &client)
            .run()
            .await
            .unwrap();

        match outcome {
            Outcome::Failed(CompletionError::Transport(message)) => assert_eq!(message, "boom"),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(!host.edits_applied.load(Ordering::SeqCst));
        assert_eq!(host.document(), document);
        // The failure detail reaches the user notice.
        assert!(host.notices.lock().unwrap().iter().any(|n| n.contains("boom")));
    }
}

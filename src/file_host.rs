//! File-backed editor host for the CLI.
//!
//! Stands in for a real editor: the "active selection" is a line range of
//! a file on disk, the instruction input box is a stdin prompt, and
//! notices go to stdout. One host instance serves one invocation.

use crate::editor::{Edit, EditorHost, SelectionContext, SelectionSpan};
use crate::prompt::InputBoxSpec;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Editor host over a file plus an optional 1-based inclusive line range.
///
/// Without a range the selection is the empty span at end of file, which
/// makes `generate` append and gives `modify` nothing to replace.
pub struct FileEditorHost {
    path: PathBuf,
    content: String,
    span: SelectionSpan,
    language: String,
}

impl FileEditorHost {
    /// Opens a file and resolves the selection from a line range.
    pub fn open(path: &Path, lines: Option<(usize, usize)>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Could not read {}: {}", path.display(), e))?;
        let span = match lines {
            Some((start, end)) => line_span(&content, start, end)?,
            None => SelectionSpan {
                start: content.len(),
                end: content.len(),
            },
        };
        let language = language_id(path);
        Ok(Self {
            path: path.to_path_buf(),
            content,
            span,
            language,
        })
    }

    /// Reads one instruction line from `input`, prompting on `output`.
    ///
    /// Split out from the trait method so tests can inject streams, as the
    /// interactive pieces elsewhere in this crate do.
    fn read_instruction_from(
        spec: &InputBoxSpec,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Option<String> {
        // An unwritable prompt cancels the input box rather than leaving
        // the user blocked on a silent stdin read.
        if let Err(e) = write!(output, "{} ({}): ", spec.prompt, spec.placeholder)
            .and_then(|_| output.flush())
        {
            warn!("Could not display instruction prompt: {}", e);
            return None;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                if line.is_empty() { None } else { Some(line) }
            }
        }
    }
}

#[async_trait]
impl EditorHost for FileEditorHost {
    fn selection_context(&self) -> Option<SelectionContext> {
        Some(SelectionContext {
            language: self.language.clone(),
            text: self.content[self.span.start..self.span.end].to_string(),
            span: self.span,
        })
    }

    async fn read_instruction(&self, spec: &InputBoxSpec) -> Option<String> {
        let stdin = io::stdin();
        Self::read_instruction_from(spec, &mut stdin.lock(), &mut io::stdout())
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn apply_edit(&self, edit: Edit) -> Result<()> {
        let updated = edit.apply_to(&self.content);
        fs::write(&self.path, updated)?;
        info!("Wrote edit to {}", self.path.display());
        Ok(())
    }
}

/// Resolves a 1-based inclusive line range to a byte span.
///
/// The span ends before the final line's newline, so replacing it keeps
/// the line structure around the selection intact.
fn line_span(content: &str, start_line: usize, end_line: usize) -> Result<SelectionSpan> {
    if start_line == 0 || end_line < start_line {
        return Err(anyhow!("Invalid line range {}-{}", start_line, end_line));
    }

    let mut offset = 0;
    let mut start = None;
    let mut end = None;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        let line_number = index + 1;
        if line_number == start_line {
            start = Some(offset);
        }
        if line_number == end_line {
            let without_newline = line.strip_suffix('\n').unwrap_or(line);
            end = Some(offset + without_newline.len());
        }
        offset += line.len();
    }

    match (start, end) {
        (Some(start), Some(end)) => Ok(SelectionSpan { start, end }),
        _ => Err(anyhow!(
            "Line range {}-{} is outside the file",
            start_line,
            end_line
        )),
    }
}

/// Maps a file extension to an editor-style language identifier.
fn language_id(path: &Path) -> String {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match extension {
        "py" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "java" => "java",
        "sh" => "shellscript",
        "" => "plaintext",
        other => other,
    }
    .to_string()
}

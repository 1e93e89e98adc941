// UI layer: a terminal host for the gist commands using `dialoguer`
// prompts and an `indicatif` spinner.
//
// The terminal has no editor of its own, so "documents" are files:
// opening a gist file writes it to a scratch directory (and optionally
// launches $EDITOR on it), and the most recently opened file is the
// active editor. A file given on the command line can be the active
// editor too, optionally with a line range as its selection.

use crate::api::GistApi;
use crate::commands::{Command, GistCommands};
use crate::config::Config;
use crate::error::{GistError, Result};
use crate::host::{
    ActiveEditor, Desktop, InputRequest, NewDocument, PickItem, Prompts, ViewId, Workspace,
};
use dialoguer::{Confirm, Editor, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Inclusive, 1-based line range used as the editor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for LineRange {
    type Err = String;

    /// Accepts `START:END` or a single line number.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("invalid line number: {v:?}"))
        };
        let (start, end) = match s.split_once(':') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        if end < start {
            return Err(format!("line range {start}:{end} ends before it starts"));
        }
        Ok(LineRange { start, end })
    }
}

impl LineRange {
    /// Lines of `text` covered by the range, clamped to the text.
    pub fn extract(&self, text: &str) -> String {
        text.lines()
            .skip(self.start - 1)
            .take(self.end - self.start + 1)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct OpenView {
    id: ViewId,
    path: PathBuf,
    /// Scratch files stand in for unsaved views and report no path.
    scratch: bool,
    selection: Option<LineRange>,
}

/// Host implementation backed by the terminal.
pub struct TerminalHost {
    scratch_dir: PathBuf,
    editor_command: Option<String>,
    open_in_editor: bool,
    views: Vec<OpenView>,
    next_view: u64,
    spinner: Option<ProgressBar>,
}

impl TerminalHost {
    pub fn new(config: &Config) -> Self {
        TerminalHost {
            scratch_dir: config.scratch_dir(),
            editor_command: config.editor_command(),
            open_in_editor: config.documents.open_in_editor,
            views: Vec::new(),
            next_view: 1,
            spinner: None,
        }
    }

    /// Make an existing file the active editor.
    pub fn open_file(&mut self, path: PathBuf, selection: Option<LineRange>) -> ViewId {
        self.push_view(path, false, selection)
    }

    /// Close the active view, returning its id.
    pub fn close_active(&mut self) -> Option<ViewId> {
        let view = self.views.pop()?;
        if view.scratch {
            let dir = view.path.parent().unwrap_or(view.path.as_path());
            if let Err(e) = std::fs::remove_dir_all(dir) {
                debug!(path = %dir.display(), error = %e, "could not remove scratch directory");
            }
        }
        Some(view.id)
    }

    /// Path of the active view's file.
    pub fn active_path(&self) -> Option<&Path> {
        self.views.last().map(|v| v.path.as_path())
    }

    fn push_view(&mut self, path: PathBuf, scratch: bool, selection: Option<LineRange>) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        self.views.push(OpenView {
            id,
            path,
            scratch,
            selection,
        });
        id
    }

    fn launch_editor(&self, path: &Path) {
        let Some(command) = self.editor_command.as_deref() else {
            return;
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };
        match ProcessCommand::new(program).args(parts).arg(path).status() {
            Ok(status) if !status.success() => warn!(%status, "editor exited with failure"),
            Ok(_) => {}
            Err(e) => warn!(editor = program, error = %e, "failed to launch editor"),
        }
    }
}

/// Map a dialoguer result to `None` when the prompt was interrupted.
pub(crate) fn cancelled_or<T>(result: dialoguer::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(GistError::Host(format!("prompt failed: {e}"))),
    }
}

fn render_item(item: &PickItem) -> String {
    let mut line = item.label.clone();
    if let Some(description) = &item.description {
        line.push_str(&format!("  ({description})"));
    }
    if let Some(detail) = &item.detail {
        line.push_str(&format!("  [{detail}]"));
    }
    line
}

impl Prompts for TerminalHost {
    fn input(&mut self, request: &InputRequest) -> Result<Option<String>> {
        if request.multiline {
            println!("{}", request.prompt);
            let initial = request.value.clone().unwrap_or_default();
            return Editor::new()
                .extension(".txt")
                .edit(&initial)
                .map_err(|e| GistError::Host(format!("failed to open editor: {e}")));
        }

        let mut input = Input::<String>::new()
            .with_prompt(&request.prompt)
            .allow_empty(!request.required);
        if let Some(value) = &request.value {
            input = input.default(value.clone());
        }
        if request.required {
            input = input.validate_with(|value: &String| -> std::result::Result<(), &'static str> {
                if value.trim().is_empty() {
                    Err("A value is required")
                } else {
                    Ok(())
                }
            });
        }
        cancelled_or(input.interact_text())
    }

    fn pick(&mut self, placeholder: &str, items: &[PickItem]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        let rendered: Vec<String> = items.iter().map(render_item).collect();
        // `interact_opt` returns None when the user presses Esc or q.
        let selection = Select::new()
            .with_prompt(placeholder)
            .items(&rendered)
            .default(0)
            .interact_opt();
        Ok(cancelled_or(selection)?.flatten())
    }

    fn confirm(&mut self, message: &str, action: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(format!("{message} [{action}]"))
            .default(false)
            .interact_opt();
        Ok(cancelled_or(answer)?.flatten().unwrap_or(false))
    }

    fn notify_info(&mut self, message: &str, actions: &[&str]) -> Result<Option<usize>> {
        println!("{message}");
        if actions.is_empty() {
            return Ok(None);
        }
        let mut items: Vec<&str> = actions.to_vec();
        items.push("Dismiss");
        let choice = cancelled_or(Select::new().items(&items).default(0).interact_opt())?;
        Ok(choice.flatten().filter(|i| *i < actions.len()))
    }

    fn notify_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn begin_progress(&mut self, title: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(title.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn end_progress(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Workspace for TerminalHost {
    fn active_editor(&self) -> Result<Option<ActiveEditor>> {
        let Some(view) = self.views.last() else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(&view.path)?;
        let selection = view.selection.map(|range| range.extract(&text));
        Ok(Some(ActiveEditor {
            view: view.id,
            path: (!view.scratch).then(|| view.path.display().to_string()),
            text,
            selection,
        }))
    }

    fn open_document(&mut self, document: NewDocument) -> Result<ViewId> {
        // one directory per view
        let dir = self
            .scratch_dir
            .join(&document.gist_id)
            .join(self.next_view.to_string());
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&document.file_name);
        std::fs::write(&path, &document.content)?;

        println!(
            "Opened {} ({}) at {}",
            document.file_name,
            document.language.unwrap_or("plaintext"),
            path.display()
        );
        let view = self.push_view(path.clone(), true, None);
        if self.open_in_editor {
            self.launch_editor(&path);
        }
        Ok(view)
    }
}

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["pbcopy"]];
#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["clip"]];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

#[cfg(target_os = "macos")]
const OPEN_COMMAND: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPEN_COMMAND: &[&str] = &["cmd", "/C", "start", ""];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPEN_COMMAND: &[&str] = &["xdg-open"];

impl Desktop for TerminalHost {
    fn open_external(&mut self, url: &str) -> Result<()> {
        let (program, args) = OPEN_COMMAND
            .split_first()
            .ok_or_else(|| GistError::Host("no browser command".into()))?;
        ProcessCommand::new(program)
            .args(args)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GistError::Host(format!("Failed to open {url}: {e}")))?;
        Ok(())
    }

    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        for command in CLIPBOARD_COMMANDS {
            let Some((program, args)) = command.split_first() else {
                continue;
            };
            let child = ProcessCommand::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match child {
                Ok(child) => child,
                Err(e) => {
                    debug!(program, error = %e, "clipboard command unavailable");
                    continue;
                }
            };
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes())?;
            }
            if child.wait()?.success() {
                return Ok(());
            }
        }
        Err(GistError::Host("no clipboard command available".into()))
    }
}

/// Interactive menu. Runs a select loop over the commands until the
/// user chooses "Exit" or dismisses the menu.
pub fn main_menu<A: GistApi>(commands: &mut GistCommands<A, TerminalHost>) -> anyhow::Result<()> {
    loop {
        let mut items: Vec<&str> = Command::ALL.iter().map(|c| c.title()).collect();
        items.push("Close active document");
        items.push("Exit");

        if let Some(path) = commands.host().active_path() {
            println!("Active document: {}", path.display());
        }
        let Some(selection) = Select::new().items(&items).default(0).interact_opt()? else {
            break;
        };
        match Command::ALL.get(selection) {
            Some(command) => {
                commands.run(*command);
            }
            None if selection == Command::ALL.len() => {
                match commands.host_mut().close_active() {
                    Some(view) => commands.view_closed(view),
                    None => println!("No open document."),
                }
            }
            None => break,
        }
    }
    Ok(())
}

// Command layer: the four user commands (list & open, create, update,
// delete) written against the `GistApi` and `Host` traits.
//
// Each command is a short chain of prompts and API calls. A dismissed
// prompt stops the chain with `Outcome::Cancelled`; an error stops it
// with `Outcome::Failed` after exactly one error notification. Nothing
// is cached between commands: every command fetches the list again.

use crate::api::GistApi;
use crate::error::{GistError, Result};
use crate::host::{Host, InputRequest, NewDocument, PickItem, ViewId};
use crate::language::language_for;
use crate::model::{single_file, single_file_update, Gist};
use crate::session::{SessionMetadata, SessionTable};
use tracing::{debug, warn};

/// Filename offered when the active document has never been saved.
pub const DEFAULT_FILE_NAME: &str = "untitled.txt";

const ACTION_OPEN_BROWSER: &str = "Open in Browser";
const ACTION_COPY_URL: &str = "Copy URL";
const ACTION_DELETE: &str = "Delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ListAndOpen,
    Create,
    Update,
    Delete,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::ListAndOpen,
        Command::Create,
        Command::Update,
        Command::Delete,
    ];

    /// Menu title.
    pub fn title(self) -> &'static str {
        match self {
            Command::ListAndOpen => "List & open Gist",
            Command::Create => "Create Gist",
            Command::Update => "Update Gist",
            Command::Delete => "Delete Gist",
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Command::ListAndOpen => "Failed to list Gists",
            Command::Create => "Failed to create Gist",
            Command::Update => "Failed to update Gist",
            Command::Delete => "Failed to delete Gist",
        }
    }
}

/// How a command invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Cancelled,
    Failed,
}

/// Result of an intermediate step: keep going with a value, or end the
/// command with the given outcome.
enum Flow<T> {
    Continue(T),
    Stop(Outcome),
}

macro_rules! step {
    ($flow:expr) => {
        match $flow {
            Flow::Continue(value) => value,
            Flow::Stop(outcome) => return Ok(outcome),
        }
    };
}

/// Runs commands against an API and a host, and owns the session table
/// of views opened from gists.
pub struct GistCommands<A, H> {
    api: A,
    host: H,
    sessions: SessionTable,
}

impl<A: GistApi, H: Host> GistCommands<A, H> {
    pub fn new(api: A, host: H) -> Self {
        GistCommands {
            api,
            host,
            sessions: SessionTable::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Forget the gist a view was opened from. Call when the view closes.
    pub fn view_closed(&mut self, view: ViewId) {
        if self.sessions.detach(view).is_some() {
            debug!(view = view.0, "dropped session metadata");
        }
    }

    /// Run one command and surface any failure to the user.
    pub fn run(&mut self, command: Command) -> Outcome {
        debug!(?command, "running command");
        let result = match command {
            Command::ListAndOpen => self.list_and_open(),
            Command::Create => self.create(),
            Command::Update => self.update(),
            Command::Delete => self.delete(),
        };
        match result {
            Ok(outcome) => {
                debug!(?command, ?outcome, "command finished");
                outcome
            }
            Err(e) => {
                warn!(?command, error = %e, "command failed");
                let message = if e.is_validation() {
                    e.to_string()
                } else {
                    format!("{}: {}", command.failure_prefix(), e)
                };
                self.host.notify_error(&message);
                Outcome::Failed
            }
        }
    }

    /// Pick a gist and one of its files, then open it in a new view.
    pub fn list_and_open(&mut self) -> Result<Outcome> {
        let gist = step!(self.select_gist("Select a Gist to open")?);
        let file_name = step!(self.select_file(&gist, "Select a file to open")?);
        self.open_file(gist, &file_name)?;
        Ok(Outcome::Succeeded)
    }

    /// Create a single-file gist from the active editor or typed content.
    pub fn create(&mut self) -> Result<Outcome> {
        let editor = self.host.active_editor()?;
        let (mut content, default_name) = match &editor {
            Some(editor) => (
                editor.selection_or_text().to_string(),
                editor.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string(),
            ),
            None => (String::new(), DEFAULT_FILE_NAME.to_string()),
        };

        let request = InputRequest {
            prompt: "Enter file name".into(),
            value: Some(default_name),
            required: true,
            ..Default::default()
        };
        let Some(file_name) = self.host.input(&request)? else {
            return Ok(Outcome::Cancelled);
        };
        let file_name = file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(GistError::validation("File name is required"));
        }

        let request = InputRequest {
            prompt: "Enter Gist description (optional)".into(),
            placeholder: Some("Description".into()),
            ..Default::default()
        };
        let Some(description) = self.host.input(&request)? else {
            return Ok(Outcome::Cancelled);
        };

        let visibility = [
            PickItem::new("Secret")
                .with_description("Only visible to you and those you share the URL with"),
            PickItem::new("Public").with_description("Visible to everyone"),
        ];
        let Some(choice) = self.host.pick("Select visibility", &visibility)? else {
            return Ok(Outcome::Cancelled);
        };
        let is_public = choice == 1;

        if content.is_empty() {
            let request = InputRequest {
                prompt: "Enter Gist content".into(),
                placeholder: Some("Content".into()),
                multiline: true,
                ..Default::default()
            };
            content = self.host.input(&request)?.unwrap_or_default();
        }
        if content.trim().is_empty() {
            return Err(GistError::validation("Content cannot be empty"));
        }

        let files = single_file(&file_name, &content);
        let gist = self.with_progress("Creating Gist...", |api| {
            api.create_gist(&description, &files, is_public)
        })?;
        debug!(id = %gist.id, "created gist");

        let actions = [ACTION_OPEN_BROWSER, ACTION_COPY_URL];
        match self.host.notify_info("Gist created successfully!", &actions)? {
            Some(0) => self.host.open_external(&gist.html_url)?,
            Some(1) => {
                self.host.write_clipboard(&gist.html_url)?;
                self.host.notify_info("URL copied to clipboard", &[])?;
            }
            _ => {}
        }
        Ok(Outcome::Succeeded)
    }

    /// Push the active editor's text to a gist file. Views opened from a
    /// gist go back to that gist; other views pick a target first.
    pub fn update(&mut self) -> Result<Outcome> {
        let editor = self
            .host
            .active_editor()?
            .ok_or(GistError::NoActiveEditor)?;

        if let Some(meta) = self.sessions.get(editor.view).cloned() {
            let files = single_file_update(&meta.file_name, &editor.text);
            self.with_progress("Updating Gist...", |api| {
                api.update_gist(&meta.gist_id, &meta.description, &files)
            })?;
        } else {
            let gist = step!(self.select_gist("Select a Gist to update")?);
            let file_name = step!(self.select_file(&gist, "Select a file to update")?);
            let content = editor.selection_or_text();
            if content.trim().is_empty() {
                return Err(GistError::validation("Content cannot be empty"));
            }
            let files = single_file_update(&file_name, content);
            self.with_progress("Updating Gist...", |api| {
                api.update_gist(&gist.id, gist.description_or_empty(), &files)
            })?;
        }

        self.host.notify_info("Gist updated successfully!", &[])?;
        Ok(Outcome::Succeeded)
    }

    /// Delete a gist after explicit confirmation.
    pub fn delete(&mut self) -> Result<Outcome> {
        let gist = step!(self.select_gist("Select a Gist to delete")?);
        let message = format!("Are you sure you want to delete \"{}\"?", gist.label());
        if !self.host.confirm(&message, ACTION_DELETE)? {
            return Ok(Outcome::Cancelled);
        }
        self.with_progress("Deleting Gist...", |api| api.delete_gist(&gist.id))?;
        self.host.notify_info("Gist deleted successfully!", &[])?;
        Ok(Outcome::Succeeded)
    }

    fn with_progress<T>(&mut self, title: &str, call: impl FnOnce(&A) -> Result<T>) -> Result<T> {
        self.host.begin_progress(title);
        let result = call(&self.api);
        self.host.end_progress();
        result
    }

    /// Fetch the list and let the user choose a gist. An empty list ends
    /// the command successfully.
    fn select_gist(&mut self, placeholder: &str) -> Result<Flow<Gist>> {
        let mut gists = self.with_progress("Loading Gists...", |api| api.list_gists())?;
        if gists.is_empty() {
            self.host.notify_info("No Gists found.", &[])?;
            return Ok(Flow::Stop(Outcome::Succeeded));
        }

        let items: Vec<PickItem> = gists
            .iter()
            .map(|gist| {
                PickItem::new(gist.label())
                    .with_description(gist.summary())
                    .with_detail(gist.detail())
            })
            .collect();
        match self.host.pick(placeholder, &items)? {
            Some(index) if index < gists.len() => Ok(Flow::Continue(gists.swap_remove(index))),
            _ => Ok(Flow::Stop(Outcome::Cancelled)),
        }
    }

    /// Single-file gists skip the file prompt.
    fn select_file(&mut self, gist: &Gist, placeholder: &str) -> Result<Flow<String>> {
        let names = gist.file_names();
        match names.as_slice() {
            [] => Err(GistError::validation(format!(
                "Gist \"{}\" has no files",
                gist.label()
            ))),
            [only] => Ok(Flow::Continue(only.to_string())),
            _ => {
                let items: Vec<PickItem> = names.iter().map(|name| PickItem::new(*name)).collect();
                match self.host.pick(placeholder, &items)? {
                    Some(index) if index < names.len() => {
                        Ok(Flow::Continue(names[index].to_string()))
                    }
                    _ => Ok(Flow::Stop(Outcome::Cancelled)),
                }
            }
        }
    }

    /// Open `file_name` in a new view and remember where it came from.
    /// List responses carry no (or truncated) content, in which case the
    /// full gist is fetched first.
    fn open_file(&mut self, gist: Gist, file_name: &str) -> Result<ViewId> {
        let complete = gist
            .files
            .get(file_name)
            .is_some_and(|file| file.has_full_content());
        let gist = if complete {
            gist
        } else {
            self.with_progress("Loading Gist...", |api| api.get_gist(&gist.id))?
        };

        let content = gist
            .files
            .get(file_name)
            .and_then(|file| file.content.clone())
            .unwrap_or_default();
        let view = self.host.open_document(NewDocument {
            gist_id: gist.id.clone(),
            file_name: file_name.to_string(),
            content,
            language: language_for(file_name),
        })?;

        self.sessions.attach(
            view,
            SessionMetadata {
                gist_id: gist.id.clone(),
                file_name: file_name.to_string(),
                description: gist.description_or_empty().to_string(),
            },
        );
        debug!(view = view.0, id = %gist.id, file = file_name, "opened gist file");
        Ok(view)
    }
}

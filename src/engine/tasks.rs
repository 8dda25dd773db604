//! Detached background work
//!
//! Anything that waits on the user runs on its own thread. The only way back
//! to the engine is an optional event posted when the work is done.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::core::error::Result;
use crate::engine::dispatch::HostEvent;

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad.exe";

#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "vi";

/// Program and leading arguments of the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl EditorCommand {
    /// Split a `$EDITOR` style value such as `code -w`.
    ///
    /// A value naming an existing file is taken whole, so unquoted paths
    /// with spaces still work.
    pub fn parse(value: &OsStr) -> Self {
        if Path::new(value).is_file() {
            return Self {
                program: value.to_os_string(),
                args: Vec::new(),
            };
        }

        let text = value.to_string_lossy();
        let mut words = text.split_whitespace().map(OsString::from);
        match words.next() {
            Some(program) => Self {
                program,
                args: words.collect(),
            },
            None => Self::parse(OsStr::new(DEFAULT_EDITOR)),
        }
    }
}

/// Editor command: `$VISUAL`, then `$EDITOR`, then the platform default
pub fn editor_command() -> EditorCommand {
    editor_from(std::env::var_os("VISUAL"), std::env::var_os("EDITOR"))
}

fn editor_from(visual: Option<OsString>, editor: Option<OsString>) -> EditorCommand {
    let value = visual
        .filter(|v| !v.is_empty())
        .or_else(|| editor.filter(|e| !e.is_empty()))
        .unwrap_or_else(|| OsString::from(DEFAULT_EDITOR));
    EditorCommand::parse(&value)
}

/// Open `path` in the user's editor and post `then` once the editor exits.
pub fn spawn_editor(
    path: PathBuf,
    then: Option<HostEvent>,
    events: Sender<HostEvent>,
) -> Result<JoinHandle<()>> {
    spawn_editor_with(editor_command(), path, then, events)
}

/// [`spawn_editor`] with an explicit editor
pub fn spawn_editor_with(
    editor: EditorCommand,
    path: PathBuf,
    then: Option<HostEvent>,
    events: Sender<HostEvent>,
) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("editor".to_string())
        .spawn(move || {
            run_editor(&editor, &path);
            if let Some(event) = then {
                if events.send(event).is_err() {
                    tracing::debug!("Engine stopped before {:?} could be posted", event);
                }
            }
        })?;
    Ok(handle)
}

fn run_editor(editor: &EditorCommand, path: &Path) {
    tracing::debug!("Opening {:?} with {:?}", path, editor);
    match Command::new(&editor.program)
        .args(&editor.args)
        .arg(path)
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!("Editor exited with {}", status),
        Err(e) => tracing::warn!("Failed to start editor {:?}: {}", editor.program, e),
    }
}

/// Open `path` with its default handler on a detached thread.
pub fn spawn_open(path: PathBuf) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("open".to_string())
        .spawn(move || {
            if let Err(e) = open::that(&path) {
                tracing::warn!("Failed to open {:?}: {}", path, e);
            }
        })?;
    Ok(handle)
}

#![forbid(unsafe_code)]

//! Line-oriented edit scripts.
//!
//! Each non-blank line is one command; `#` starts a comment line. Personas
//! and bundles get generated ids, so scripts refer to them by name. Names
//! resolve against the editor state at the time the line runs.

use std::fmt;

use rca::{
    BundleId, ClickOrigin, Command, Editor, NodeId, Persona, PersonaId, PriorityLevel, TocBundle,
};
use tracing::debug;

/// A script line that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

impl From<ScriptError> for rca::Error {
    fn from(err: ScriptError) -> Self {
        rca::Error::Usage(err.to_string())
    }
}

/// Apply every line of `text` to `editor`. Returns how many commands changed
/// the state.
pub fn run_script(editor: &mut Editor, text: &str) -> Result<usize, ScriptError> {
    let mut changed = 0;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cmd = parse_line(editor, line).map_err(|message| ScriptError {
            line: idx + 1,
            message,
        })?;
        if editor.update(cmd) {
            changed += 1;
        } else {
            debug!(line = idx + 1, text = line, "script command left state unchanged");
        }
    }
    Ok(changed)
}

/// Split off the first whitespace-delimited word.
fn head(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn word<'a>(rest: &mut &'a str, what: &str) -> Result<&'a str, String> {
    let (w, tail) = head(rest);
    if w.is_empty() {
        return Err(format!("missing {what}"));
    }
    *rest = tail;
    Ok(w)
}

fn text<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    let t = rest.trim();
    if t.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(t)
    }
}

fn origin(rest: &mut &str) -> Result<ClickOrigin, String> {
    match word(rest, "origin (fishbone|why)")? {
        "fishbone" => Ok(ClickOrigin::Fishbone),
        "why" => Ok(ClickOrigin::WhyTree),
        other => Err(format!("unknown origin `{other}`")),
    }
}

fn node(rest: &mut &str) -> Result<NodeId, String> {
    word(rest, "node id").map(NodeId::new)
}

fn persona_named(editor: &Editor, name: &str) -> Result<PersonaId, String> {
    editor
        .state()
        .diagram
        .personas
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id.clone())
        .ok_or_else(|| format!("no persona named `{name}`"))
}

fn bundle_named(editor: &Editor, name: &str) -> Result<BundleId, String> {
    editor
        .state()
        .toc
        .toc_bundles
        .values()
        .find(|b| b.name == name)
        .map(|b| b.id.clone())
        .ok_or_else(|| format!("no bundle named `{name}`"))
}

fn parse_line(editor: &Editor, line: &str) -> Result<Command, String> {
    let (verb, mut rest) = head(line);
    let cmd = match verb {
        "add-category" => Command::AddCategory,
        "add-cause" => Command::AddCause { category: node(&mut rest)? },
        "add-why" => Command::AddWhy { parent: node(&mut rest)? },
        "template" => Command::InsertTemplate {
            template: word(&mut rest, "template id")?.to_string(),
        },
        "select" => {
            let origin = origin(&mut rest)?;
            Command::Select { id: node(&mut rest)?, origin }
        }
        "clear" => Command::ClearSelection,
        "rename" => {
            let origin = origin(&mut rest)?;
            let id = node(&mut rest)?;
            // An empty label is allowed; the editor substitutes "Untitled".
            Command::Rename { id, label: rest.trim().to_string(), origin }
        }
        "delete" => {
            let origin = origin(&mut rest)?;
            Command::Delete { id: node(&mut rest)?, origin }
        }
        "reorder-categories" => Command::ReorderCategories {
            from: node(&mut rest)?,
            to: node(&mut rest)?,
        },
        "reorder-causes" => Command::ReorderCauses {
            category: node(&mut rest)?,
            from: node(&mut rest)?,
            to: node(&mut rest)?,
        },
        "note" => Command::SetNote { id: node(&mut rest)?, text: rest.trim().to_string() },
        "priority" => {
            let id = node(&mut rest)?;
            let priority: PriorityLevel = word(&mut rest, "priority")?.parse()?;
            Command::SetPriority { id, priority }
        }
        "title" => Command::SetTitle(text(rest, "title")?.to_string()),
        "persona" => Command::AddPersona(Persona::new(text(rest, "persona name")?)),
        "toggle" => {
            let id = node(&mut rest)?;
            let persona = persona_named(editor, text(rest, "persona name")?)?;
            Command::TogglePersona { node: id, persona }
        }
        "bundle" => Command::AddBundle(TocBundle::new(text(rest, "bundle name")?)),
        "anchor" => {
            let bundle = bundle_named(editor, word(&mut rest, "bundle name")?)?;
            Command::AnchorCause { bundle, cause: node(&mut rest)? }
        }
        "activate" => Command::ActivateBundle(bundle_named(editor, text(rest, "bundle name")?)?),
        "lock" => Command::SetFishboneLocked(true),
        "unlock" => Command::SetFishboneLocked(false),
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(cmd)
}

#![forbid(unsafe_code)]

//! Reference front end for the RCA editor core.
//!
//! Loads a document (or starts from the starter diagram), applies an edit
//! script, optionally focuses a node, and renders text reports of the tree
//! and both views. The result can be exported as JSON.

pub mod cli;
pub mod logging;
pub mod report;
pub mod script;

use std::fs;

use rca::{ClickOrigin, Command, DocumentStore, Editor, FileStore, NodeId};
use tracing::{debug_span, info};

pub use cli::{CliAction, Opts};
pub use report::Guides;
pub use script::{ScriptError, run_script};

/// Run the harness and return the report text.
pub fn run(opts: &Opts) -> rca::Result<String> {
    let _span = debug_span!("harness_run").entered();
    let mut editor = Editor::default();

    if let Some(path) = &opts.doc {
        let store = FileStore::new(path);
        if !editor.load(&store)? {
            return Err(rca::Error::Usage(format!(
                "document not found: {}",
                path.display()
            )));
        }
        info!(path = %path.display(), "document loaded");
    }

    if let Some(path) = &opts.script {
        let text = fs::read_to_string(path)?;
        let changed = run_script(&mut editor, &text)?;
        info!(path = %path.display(), changed, "script applied");
    }

    if let Some(focus) = &opts.focus {
        let id = NodeId::new(focus.as_str());
        if !rca::core::tree::contains(&editor.state().diagram.root, &id) {
            return Err(rca::Error::Usage(format!("unknown node for --focus: {focus}")));
        }
        editor.update(Command::Select { id, origin: ClickOrigin::Fishbone });
    }

    let report = render(&editor, opts);

    if let Some(path) = &opts.export {
        FileStore::new(path).save(&editor.state().to_document())?;
        info!(path = %path.display(), "document exported");
    }

    Ok(report)
}

/// Every report section for the current editor state.
#[must_use]
pub fn render(editor: &Editor, opts: &Opts) -> String {
    let state = editor.state();
    let mut out = report::outline(state, opts.guides);

    let bundles = report::bundles_report(state);
    if !bundles.is_empty() {
        out.push('\n');
        out.push_str(&bundles);
    }

    if opts.geometry {
        out.push('\n');
        out.push_str(&report::fishbone_report(&editor.fishbone_layout()));
        if let Some(why) = editor.why_tree_layout() {
            out.push('\n');
            out.push_str(&report::why_tree_report(&why));
        }
    }
    out
}

#![forbid(unsafe_code)]

//! Command-line argument parsing for the harness.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `RCA_` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

use crate::report::Guides;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
RCA Harness: scripted edits and text reports for root-cause diagrams

USAGE:
    rca-harness [OPTIONS]

OPTIONS:
    --doc=PATH           Load the diagram document from PATH (default: starter diagram)
    --script=PATH        Apply the edit script at PATH before reporting
    --focus=NODE_ID      Focus the why-tree on NODE_ID (as a fishbone click)
    --export=PATH        Write the resulting document to PATH as JSON
    --guides=STYLE       Outline guides: 'unicode' (default) or 'ascii'
    --no-geometry        Print the outline only
    --log-json           Emit logs as JSON lines on stderr
    --help, -h           Show this help message
    --version, -V        Show version

SCRIPT COMMANDS (one per line, '#' starts a comment):
    add-category | add-cause CAT | add-why PARENT | template ID
    select fishbone|why NODE | clear
    rename fishbone|why NODE LABEL... | delete fishbone|why NODE
    reorder-categories A B | reorder-causes CAT A B
    note NODE TEXT... | priority NODE none|low|medium|high | title TEXT...
    persona NAME... | toggle NODE PERSONA_NAME...
    bundle NAME... | anchor BUNDLE_NAME NODE | activate BUNDLE_NAME
    lock | unlock

ENVIRONMENT VARIABLES:
    RCA_DOC          Override --doc
    RCA_FOCUS        Override --focus
    RCA_LOG          Log filter directives (default: warn)
    RCA_LOG_JSON     Set to 1 for JSON log output";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Document to load; `None` starts from the starter diagram.
    pub doc: Option<PathBuf>,
    /// Edit script applied after loading.
    pub script: Option<PathBuf>,
    /// Node to focus before the why-tree report.
    pub focus: Option<String>,
    /// Where to write the resulting document.
    pub export: Option<PathBuf>,
    /// Outline guide style.
    pub guides: Guides,
    /// Whether to print the geometry sections.
    pub geometry: bool,
    /// `EnvFilter` directives.
    pub log_filter: String,
    /// JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            doc: None,
            script: None,
            focus: None,
            export: None,
            guides: Guides::Unicode,
            geometry: true,
            log_filter: "warn".into(),
            log_json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(CliAction::Run(opts)) => opts,
            Ok(CliAction::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(CliAction::Version) => {
                println!("rca-harness {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with environment lookups through `var`.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse_from(
        args: &[String],
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<CliAction, String> {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("RCA_DOC")
            && !val.is_empty()
        {
            opts.doc = Some(PathBuf::from(val));
        }
        if let Some(val) = var("RCA_FOCUS")
            && !val.is_empty()
        {
            opts.focus = Some(val);
        }
        if let Some(val) = var("RCA_LOG")
            && !val.is_empty()
        {
            opts.log_filter = val;
        }
        if let Some(val) = var("RCA_LOG_JSON") {
            opts.log_json = matches!(val.as_str(), "1" | "true" | "yes");
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(CliAction::Help),
                "--version" | "-V" => return Ok(CliAction::Version),
                "--log-json" => opts.log_json = true,
                "--no-geometry" => opts.geometry = false,
                other => {
                    if let Some(val) = other.strip_prefix("--doc=") {
                        opts.doc = Some(non_empty("--doc", val)?.into());
                    } else if let Some(val) = other.strip_prefix("--script=") {
                        opts.script = Some(non_empty("--script", val)?.into());
                    } else if let Some(val) = other.strip_prefix("--focus=") {
                        opts.focus = Some(non_empty("--focus", val)?.to_string());
                    } else if let Some(val) = other.strip_prefix("--export=") {
                        opts.export = Some(non_empty("--export", val)?.into());
                    } else if let Some(val) = other.strip_prefix("--guides=") {
                        opts.guides = match val {
                            "unicode" => Guides::Unicode,
                            "ascii" => Guides::Ascii,
                            _ => return Err(format!("Invalid --guides value: {val}")),
                        };
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(CliAction::Run(opts))
    }
}

fn non_empty<'a>(flag: &str, val: &'a str) -> Result<&'a str, String> {
    if val.is_empty() {
        Err(format!("Invalid {flag} value: empty"))
    } else {
        Ok(val)
    }
}

//! # eolcheck
//!
//! A pre-commit check that rejects files with mixed line endings, or with
//! line endings their extension does not allow.
//!
//! ## Overview
//!
//! eolcheck is built on top of eolchecklib. By default it looks at the files
//! staged for the next commit (added, modified, copied, or renamed) and reads
//! their content from the index, so the working tree does not matter.
//!
//! ## Usage
//!
//! ```bash
//! # Reject staged files that mix line endings
//! eolcheck
//!
//! # Also require CRLF for batch files and LF for shell scripts
//! eolcheck --crlf bat,cmd --lf sh
//!
//! # List every checked file, not only the rejected ones
//! eolcheck -v
//!
//! # Check every file of a commit instead of the index
//! eolcheck --commit HEAD~1
//!
//! # Machine-readable report
//! eolcheck --output json
//! ```
//!
//! Binary files (any NUL byte) are listed but never rejected. The exit
//! status is 1 if any file was rejected or could not be read.

mod render;

use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use eolchecklib::{check_sources, CheckOptions, CheckReport, EolPolicy, GitRepo, DEFAULT_CHUNK_SIZE};
use render::OutputMode;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("eolcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reject commits with mixed or disallowed line endings")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("List the status of every file"),
        )
        .arg(
            Arg::new("case-sensitive")
                .short('s')
                .long("case-sensitive")
                .action(ArgAction::SetTrue)
                .help("Compare file name extensions case-sensitively"),
        )
        .arg(
            Arg::new("crlf")
                .long("crlf")
                .action(ArgAction::Append)
                .help("Comma-separated extensions that must use CRLF"),
        )
        .arg(
            Arg::new("lf")
                .long("lf")
                .action(ArgAction::Append)
                .help("Comma-separated extensions that must use LF"),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .default_value(".")
                .help("Path to repository"),
        )
        .arg(
            Arg::new("commit")
                .long("commit")
                .help("Check every file in this commit instead of the staged changes"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_parser(value_parser!(usize))
                .help(format!("Bytes read per chunk (default {})", DEFAULT_CHUNK_SIZE)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
}

/// Build the extension policy from matches
fn build_policy(matches: &ArgMatches) -> EolPolicy {
    let mut policy = EolPolicy::new().case_sensitive(matches.get_flag("case-sensitive"));

    if let Some(lists) = matches.get_many::<String>("crlf") {
        for list in lists {
            policy = policy.crlf_extensions(list);
        }
    }

    if let Some(lists) = matches.get_many::<String>("lf") {
        for list in lists {
            policy = policy.lf_extensions(list);
        }
    }

    policy
}

/// Discover the repository, pick the files, and check them
fn run_check(matches: &ArgMatches) -> anyhow::Result<CheckReport> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");

    let mut options = CheckOptions::new().policy(build_policy(matches));
    if let Some(&chunk_size) = matches.get_one::<usize>("chunk-size") {
        options = options.chunk_size(chunk_size);
    }

    let repo = GitRepo::discover(path)?;
    let sources = match matches.get_one::<String>("commit") {
        Some(rev) => repo.commit_sources(rev)?,
        None => repo.staged_sources()?,
    };

    tracing::debug!(files = sources.len(), "checking");
    Ok(check_sources(&sources, &options))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let matches = build_command().get_matches();

    let report = match run_check(&matches) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mode = matches
        .get_one::<String>("output")
        .map(|s| OutputMode::from_arg(s))
        .unwrap_or(OutputMode::Text);

    match mode {
        OutputMode::Json => match render::render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        OutputMode::Text => {
            let text = render::render_text(
                &report,
                matches.get_flag("verbose"),
                &render::bad_style(),
            );
            eprint!("{text}");
        }
    }

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

//! Build script for sprout-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("sprout")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage per-branch git worktree workspaces")
        .long_about(
            "Create one git worktree per branch and provision its .env files from \
             .env.example templates, with free local ports for auto_port() placeholders",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("create")
                .about("Create a workspace for a branch")
                .long_about("Add a worktree for the branch and render every .env.example into it")
                .arg(Arg::new("branch").required(true))
                .arg(
                    Arg::new("path")
                        .long("path")
                        .help("Print only the workspace path on stdout")
                        .action(ArgAction::SetTrue),
                ),
            Command::new("ls")
                .about("List workspaces")
                .visible_alias("list")
                .arg(Arg::new("format").long("format").value_name("FORMAT")),
            Command::new("rm")
                .about("Remove a workspace")
                .visible_alias("remove")
                .arg(Arg::new("branch").required(true))
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue),
                ),
            Command::new("path")
                .about("Print the path of a workspace")
                .arg(Arg::new("branch").required(true)),
            Command::new("env")
                .about("Create .env files from .env.example templates")
                .arg(Arg::new("force").long("force").action(ArgAction::SetTrue))
                .arg(Arg::new("dry-run").long("dry-run").action(ArgAction::SetTrue))
                .arg(Arg::new("silent").long("silent").action(ArgAction::SetTrue)),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true)),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("sprout.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

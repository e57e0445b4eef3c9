use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::device::Model;

#[derive(Parser, Debug)]
#[command(name = "rm-stylus-button")]
#[command(about = "Undo, redo and eraser gestures for the reMarkable stylus button")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Toggle the eraser with a single click instead of holding the button
    #[arg(long)]
    pub toggle: bool,

    /// Increase log detail (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Pen input device path
    #[arg(long)]
    pub pen_device: Option<String>,

    /// Device model (rm1, rm2, rmpp); detected when omitted
    #[arg(long, value_parser = clap::value_parser!(Model))]
    pub model: Option<Model>,

    /// Path to config file
    #[arg(long, env = "RMSTYLUS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print raw pen events for debugging
    Dump,
}

impl Cli {
    /// Parse arguments, dropping any that clap doesn't know.
    ///
    /// Returns the parsed CLI and the arguments that were ignored. Other parse
    /// errors (bad values, --help, --version) are returned as-is.
    pub fn parse_lenient<I, S>(args: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut ignored = Vec::new();

        loop {
            let err = match Self::try_parse_from(&args) {
                Ok(cli) => return Ok((cli, ignored)),
                Err(err) => err,
            };
            let context = match err.kind() {
                ErrorKind::UnknownArgument => ContextKind::InvalidArg,
                ErrorKind::InvalidSubcommand => ContextKind::InvalidSubcommand,
                _ => return Err(err),
            };
            let Some(ContextValue::String(unknown)) = err.get(context) else {
                return Err(err);
            };
            let Some(dropped) = drop_arg(&mut args, unknown) else {
                return Err(err);
            };
            ignored.push(dropped);
        }
    }
}

/// Remove `unknown` from `args` (skipping the program name) and return what was
/// dropped. An unknown short flag inside a cluster (`-vx`) is cut out of the
/// cluster, leaving the known flags in place.
fn drop_arg(args: &mut Vec<String>, unknown: &str) -> Option<String> {
    let with_value = format!("{}=", unknown);
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| a == unknown || a.starts_with(&with_value))
    {
        return Some(args.remove(pos + 1));
    }

    let short = unknown
        .strip_prefix('-')
        .filter(|s| !s.starts_with('-'))
        .and_then(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        });
    if let Some(c) = short {
        let pos = args
            .iter()
            .skip(1)
            .position(|a| a.starts_with('-') && !a.starts_with("--") && a[1..].contains(c))?
            + 1;
        let rest: String = args[pos][1..].chars().filter(|&ch| ch != c).collect();
        if rest.is_empty() {
            args.remove(pos);
        } else {
            args[pos] = format!("-{}", rest);
        }
        return Some(unknown.to_string());
    }

    let pos = args.iter().skip(1).position(|a| a.contains(unknown))? + 1;
    Some(args.remove(pos))
}

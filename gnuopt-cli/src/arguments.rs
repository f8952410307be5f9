use gnuopt::{AccessError, FromValue, OptionMap, Parsed};

use crate::error::{CliError, Result};

#[derive(Debug, Default, PartialEq)]
pub struct Cmdline {
    pub map_path: Option<String>,
    pub map_stdin: bool,
    pub entries: Vec<(String, String)>,
    pub wildcard: Option<String>,
    pub pretty: bool,
    pub verbose: u64,
    pub args: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum Action {
    Help,
    Version,
    Run(Cmdline),
}

pub const USAGE: &str = r#"Usage: gnuopt [OPTION]... [--args ARG...]
Parse ARGs against an option map and print the result as JSON.

Option map:
  -m, --map FILE         JSON object of NAME: DESCRIPTOR.
  -i, --stdin            Read the JSON object from standard input.
  -e, --entry NAME=DESC  Add or replace one entry.  Can be repeated.
  -w, --wildcard DESC    Descriptor for undeclared flags (the "-" key).

Output:
  -p, --pretty           Pretty-print the JSON result.
  -v, --verbose          More log output on stderr.  Can be repeated.

  -h, --help             This help.
      --version          Print version.

  -a, --args ARG...      Everything after this flag is parsed.

Descriptors:
  string, number, integer, switch   builtin types
  *TYPE                             repeatable, values collect in a list
  ~TYPE                             takes every remaining argument
  &NAME                             alias of another entry

Exit status: 0 on success, 1 if ARGs do not parse, 2 on usage errors.
Set GNUOPT_LOG to override the log filter.
"#;

fn build_options() -> OptionMap {
    OptionMap::new()
        // Option map sources
        .entry("map", "string")
        .entry("m", "&map")
        .entry("stdin", "switch")
        .entry("i", "&stdin")
        .entry("entry", "*string")
        .entry("e", "&entry")
        .entry("wildcard", "string")
        .entry("w", "&wildcard")
        // Output
        .entry("pretty", "switch")
        .entry("p", "&pretty")
        .entry("verbose", "*switch")
        .entry("v", "&verbose")
        // Informational
        .entry("help", "switch")
        .entry("h", "&help")
        .entry("version", "switch")
        // The argument list to parse
        .entry("args", "~string")
        .entry("a", "&args")
}

/// Whether `arg` starts the slurped argument list: `--args`, `--args=..`,
/// or any short cluster containing `a`.
fn is_args_flag(arg: &str) -> bool {
    if let Some(long) = arg.strip_prefix("--") {
        return long == "args" || long.starts_with("args=");
    }
    arg.strip_prefix('-').is_some_and(|cluster| cluster.contains('a'))
}

/// Value of an option that may be absent.
fn optional<T: FromValue>(parsed: &Parsed, name: &str) -> Result<Option<T>> {
    match parsed.get_as::<T>(name) {
        Ok(v) => Ok(Some(v)),
        Err(AccessError::NotFound(_)) => Ok(None),
        Err(e) => Err(CliError::Usage(e.to_string())),
    }
}

fn split_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((name, desc)) if !name.is_empty() => Ok((name.to_string(), desc.to_string())),
        _ => Err(CliError::Usage(format!(
            "invalid entry '{}': expected NAME=DESCRIPTOR",
            entry
        ))),
    }
}

pub fn parse_args() -> Result<Action> {
    parse_from(
        std::env::args_os()
            .skip(1)
            .map(|a| a.to_string_lossy().into_owned()),
    )
}

pub fn parse_from<I>(argv: I) -> Result<Action>
where
    I: IntoIterator<Item = String>,
{
    let argv: Vec<String> = argv.into_iter().collect();

    // Check for --help/-h before parsing so a broken command line still
    // gets help. Anything after --args belongs to the parsed list.
    for arg in argv.iter().take_while(|a| !is_args_flag(a)) {
        if arg == "--help" || arg == "-h" {
            return Ok(Action::Help);
        }
    }

    let parsed = gnuopt::parse(&argv, &build_options())?;

    if parsed.contains("help") {
        return Ok(Action::Help);
    }
    if parsed.contains("version") {
        return Ok(Action::Version);
    }
    if let Some(extra) = parsed.positional().first() {
        return Err(CliError::Usage(format!(
            "unexpected argument '{}' (arguments to parse go after --args)",
            extra
        )));
    }

    let entries = optional::<Vec<String>>(&parsed, "entry")?
        .unwrap_or_default()
        .iter()
        .map(|e| split_entry(e))
        .collect::<Result<Vec<_>>>()?;

    Ok(Action::Run(Cmdline {
        map_path: optional(&parsed, "map")?,
        map_stdin: parsed.count("stdin") > 0,
        entries,
        wildcard: optional(&parsed, "wildcard")?,
        pretty: parsed.count("pretty") > 0,
        verbose: parsed.count("verbose"),
        args: optional(&parsed, "args")?.unwrap_or_default(),
    }))
}

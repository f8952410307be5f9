use std::io::Read;

use gnuopt::{OptionMap, WILDCARD};

use crate::arguments::Cmdline;
use crate::error::{CliError, Result};

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CliError::io("<stdin>", e))?;
    Ok(buf)
}

/// Build the option map from the map file (or stdin), then `--entry` and
/// `--wildcard` overrides, in that order.
pub fn load(cmdline: &Cmdline) -> Result<OptionMap> {
    let mut map = match (cmdline.map_path.as_deref(), cmdline.map_stdin) {
        (Some(_), true) => {
            return Err(CliError::Usage(
                "--map and --stdin cannot be used together".to_string(),
            ))
        }
        (Some(path), false) => {
            let json = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            let map = OptionMap::from_json(&json)?;
            tracing::debug!(path, entries = map.len(), "loaded option map");
            map
        }
        (None, true) => {
            let map = OptionMap::from_json(&read_stdin()?)?;
            tracing::debug!(entries = map.len(), "loaded option map from stdin");
            map
        }
        (None, false) => OptionMap::new(),
    };

    map.extend(
        cmdline
            .entries
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.as_str())),
    );
    if let Some(wildcard) = cmdline.wildcard.as_deref() {
        map.insert(WILDCARD, wildcard);
    }

    for (name, descriptor) in map.iter() {
        tracing::trace!(name, %descriptor, "map entry");
    }
    if map.is_empty() {
        tracing::warn!("option map is empty; every flag will be rejected");
    }
    Ok(map)
}

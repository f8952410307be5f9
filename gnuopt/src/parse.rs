use crate::coerce::coerce;
use crate::error::{ParseError, Result};
use crate::optmap::{OptionMap, Sign};
use crate::resolve::{resolve, Resolved};
use crate::tokens::gnu_args;
use crate::value::{Parsed, POSITIONAL_KEY};

/// The flag most recently resolved, waiting for (or holding) its value.
#[derive(Debug)]
struct Pending<'m> {
    option: Resolved<'m>,
    has_value: bool,
}

impl Pending<'_> {
    fn missing_value(&self) -> ParseError {
        ParseError::missing_value(&self.option.origin, self.option.type_name())
    }
}

/// Token-at-a-time parse state machine.
///
/// All state lives in the driver, so independent parses never interact.
/// `parse` is the usual entry point; the driver is public for callers
/// that produce tokens incrementally.
#[derive(Debug)]
pub struct Driver<'m> {
    map: &'m OptionMap,
    result: Parsed,
    last: Option<Pending<'m>>,
}

impl<'m> Driver<'m> {
    pub fn new(map: &'m OptionMap) -> Self {
        Driver {
            map,
            result: Parsed::new(),
            last: None,
        }
    }

    /// Consume one canonical token (see [`gnu_args`](crate::gnu_args)).
    pub fn feed(&mut self, token: &str) -> Result<()> {
        // Slurp mode: never returns to flag scanning.
        if let Some(last) = self
            .last
            .as_mut()
            .filter(|l| l.option.sign == Some(Sign::Slurp))
        {
            tracing::trace!(token, option = %last.option.name, "slurp");
            let value = coerce(token, last.option.kind, &last.option.origin)?;
            self.result.append(&last.option.name, value);
            last.has_value = true;
            return Ok(());
        }

        if token.starts_with('-') {
            if let Some(last) = self.last.as_ref().filter(|l| !l.has_value) {
                return Err(last.missing_value());
            }
            for name in flag_names(token) {
                self.open_flag(name)?;
            }
            return Ok(());
        }

        match self.last.as_mut() {
            Some(last) if !last.has_value => {
                tracing::trace!(token, option = %last.option.name, "value");
                let value = coerce(token, last.option.kind, &last.option.origin)?;
                if last.option.sign == Some(Sign::Repeat) {
                    self.result.append(&last.option.name, value);
                } else {
                    self.result.set(&last.option.name, value);
                }
                last.has_value = true;
            }
            _ => {
                tracing::trace!(token, "positional");
                self.result.push_positional(token.to_string());
            }
        }
        Ok(())
    }

    fn open_flag(&mut self, name: &str) -> Result<()> {
        let option = resolve(self.map, name)?;
        tracing::trace!(flag = name, option = %option.name, "flag");

        // `$` holds the positional list and is always present.
        if option.name == POSITIONAL_KEY {
            return Err(ParseError::InvalidRepetition {
                option: option.origin,
            });
        }

        let has_value = if self.result.contains(&option.name) {
            if option.sign.is_none() {
                return Err(ParseError::InvalidRepetition {
                    option: option.origin,
                });
            }
            if option.is_switch() {
                self.result.increment(&option.name);
                true
            } else {
                false
            }
        } else if option.is_switch() {
            self.result.increment(&option.name);
            true
        } else {
            self.result.declare(&option.name);
            false
        };

        self.last = Some(Pending { option, has_value });
        Ok(())
    }

    /// End of input. Fails if the last flag never got its value.
    pub fn finish(self) -> Result<Parsed> {
        if let Some(last) = self.last.as_ref().filter(|l| !l.has_value) {
            return Err(last.missing_value());
        }
        Ok(self.result)
    }
}

/// Flag names carried by a flag-shaped token.
///
/// `--name` is one long name; `-abc` is the cluster `a`, `b`, `c`.
fn flag_names(token: &str) -> Vec<&str> {
    if let Some(long) = token.strip_prefix("--") {
        return vec![long];
    }
    let cluster = &token[1..];
    cluster
        .char_indices()
        .map(|(i, c)| &cluster[i..i + c.len_utf8()])
        .collect()
}

/// Parse `args` against `map`.
pub fn parse<I>(args: I, map: &OptionMap) -> Result<Parsed>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut driver = Driver::new(map);
    for token in gnu_args(args) {
        driver.feed(&token).inspect_err(|e| tracing::debug!(error = %e, "parse failed"))?;
    }
    driver.finish()
}

/// Parse the process arguments, without the program name.
pub fn parse_env(map: &OptionMap) -> Result<Parsed> {
    parse(
        std::env::args_os()
            .skip(1)
            .map(|a| a.to_string_lossy().into_owned()),
        map,
    )
}

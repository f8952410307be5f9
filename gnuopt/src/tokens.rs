/// Split `--name=value` into `("--name", "value")`.
///
/// The name must be non-empty and the split happens at the first `=`.
/// Short flags are never split.
pub fn split_long_assignment(arg: &str) -> Option<(&str, &str)> {
    let body = arg.strip_prefix("--")?;
    match body.find('=') {
        Some(pos) if pos > 0 => Some((&arg[..pos + 2], &body[pos + 1..])),
        _ => None,
    }
}

/// Lazy token stream over raw arguments, see [`gnu_args`].
pub struct GnuArgs<I> {
    inner: I,
    pending: Option<String>,
}

impl<I> Iterator for GnuArgs<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }
        let arg = self.inner.next()?;
        let arg = arg.as_ref();
        match split_long_assignment(arg) {
            Some((name, value)) => {
                self.pending = Some(value.to_string());
                Some(name.to_string())
            }
            None => Some(arg.to_string()),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        let extra = usize::from(self.pending.is_some());
        (lo + extra, hi.and_then(|h| h.checked_mul(2)?.checked_add(extra)))
    }
}

/// Canonical token stream: every `--name=value` becomes the two tokens
/// `--name` and `value`, everything else passes through in order.
pub fn gnu_args<I>(args: I) -> GnuArgs<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    GnuArgs {
        inner: args.into_iter(),
        pending: None,
    }
}

use crate::error::{ParseError, Result};
use crate::optmap::{Descriptor, OptionMap, Sign, TypeKind};

/// A flag name resolved to its terminal type.
#[derive(Debug, Clone)]
pub struct Resolved<'m> {
    /// Name at the end of the alias chain; results are stored under it.
    pub name: String,
    pub kind: &'m TypeKind,
    pub sign: Option<Sign>,
    /// Name as typed by the user, reported in every error.
    pub origin: String,
}

impl Resolved<'_> {
    pub fn is_switch(&self) -> bool {
        self.kind.is_switch()
    }

    /// Type as written in the map, without the sign.
    pub fn type_name(&self) -> String {
        self.kind.to_string()
    }
}

/// Resolve `name` (without leading dashes) against `map`.
///
/// An undeclared name falls back to the wildcard entry. Alias targets must
/// be declared explicitly; the wildcard never satisfies them.
pub fn resolve<'m>(map: &'m OptionMap, name: &str) -> Result<Resolved<'m>> {
    let origin = name;
    let mut descriptor = map
        .get(name)
        .or_else(|| map.wildcard_descriptor())
        .ok_or_else(|| ParseError::UndefinedType {
            option: origin.to_string(),
            ty: None,
        })?;
    let mut current = name;
    let mut route = vec![origin];

    loop {
        match descriptor {
            Descriptor::Typed { sign, kind } => {
                tracing::debug!(origin, name = current, ty = %kind, "resolved option");
                return Ok(Resolved {
                    name: current.to_string(),
                    kind,
                    sign: *sign,
                    origin: origin.to_string(),
                });
            }
            Descriptor::Alias(target) => {
                let target = target.as_str();
                let seen = route.contains(&target);
                route.push(target);
                if seen {
                    return Err(ParseError::CircularReference {
                        option: origin.to_string(),
                        route: route.iter().map(|s| s.to_string()).collect(),
                    });
                }
                descriptor = map.get(target).ok_or_else(|| ParseError::UndefinedType {
                    option: origin.to_string(),
                    ty: Some(format!("&{}", target)),
                })?;
                current = target;
            }
        }
    }
}

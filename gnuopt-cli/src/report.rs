use std::error::Error as _;

use gnuopt::{ParseError, Parsed};
use serde::Serialize;

use crate::error::{CliError, Result};

/// JSON shape of a failed parse.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    pub kind: &'static str,
    pub option: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner: Option<String>,
    pub message: String,
}

impl<'a> From<&'a ParseError> for ErrorReport<'a> {
    fn from(e: &'a ParseError) -> Self {
        let mut report = ErrorReport {
            kind: e.kind(),
            option: e.option(),
            ty: None,
            value: None,
            route: None,
            inner: e.source().map(|s| s.to_string()),
            message: e.to_string(),
        };
        match e {
            ParseError::InvalidValue { ty, value, .. } => {
                report.ty = Some(ty.as_str());
                report.value = value.as_deref();
            }
            ParseError::UndefinedType { ty, .. } => report.ty = ty.as_deref(),
            ParseError::CircularReference { route, .. } => report.route = Some(route.as_slice()),
            ParseError::InvalidRepetition { .. } => {}
        }
        report
    }
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(CliError::Encode)
}

pub fn render(parsed: &Parsed, pretty: bool) -> Result<String> {
    encode(parsed, pretty)
}

pub fn render_error(e: &ParseError, pretty: bool) -> Result<String> {
    encode(&ErrorReport::from(e), pretty)
}

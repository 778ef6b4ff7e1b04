//! Template loading and placeholder substitution.
//!
//! Placeholders are written `{{ name }}`. A template may pin the number of
//! secret bytes it was written for with a directive line `{{% size N %}}`;
//! the directive is dropped from the rendered text.

use crate::context::RenderContext;
use crate::flavor::Flavor;
use crate::result::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const DIRECTIVE_CLOSE: &str = "%}}";

/// Templates compiled into the binary: name, flavor, source.
const BUILTINS: [(&str, Flavor, &str); 2] = [
    (
        "crackme.c",
        Flavor::Validator,
        include_str!("../templates/crackme.c"),
    ),
    (
        "solver.py",
        Flavor::Solver,
        include_str!("../templates/solver.py"),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    flavor: Flavor,
    expected_size: Option<usize>,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses template text.
    pub fn parse(name: impl Into<String>, flavor: Flavor, source: &str) -> Result<Self> {
        let name = name.into();
        let malformed = |reason: String| Error::MalformedTemplate {
            name: name.clone(),
            reason,
        };

        let mut segments = Vec::new();
        let mut expected_size = None;
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];

            if let Some(directive) = after_open.strip_prefix('%') {
                let end = directive
                    .find(DIRECTIVE_CLOSE)
                    .ok_or_else(|| malformed("unterminated directive".to_string()))?;
                let size = parse_size_directive(directive[..end].trim()).map_err(&malformed)?;
                if expected_size.replace(size).is_some() {
                    return Err(malformed("duplicate size directive".to_string()));
                }
                rest = &directive[end + DIRECTIVE_CLOSE.len()..];
                rest = rest.strip_prefix('\n').unwrap_or(rest);
                continue;
            }

            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| malformed("unterminated placeholder".to_string()))?;
            let placeholder = after_open[..end].trim();
            if placeholder.is_empty()
                || !placeholder
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(malformed(format!("invalid placeholder '{placeholder}'")));
            }
            segments.push(Segment::Placeholder(placeholder.to_string()));
            rest = &after_open[end + CLOSE.len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self {
            name,
            flavor,
            expected_size,
            segments,
        })
    }

    /// Loads one of the compiled-in templates.
    pub fn builtin(name: &str) -> Result<Self> {
        let (name, flavor, source) = BUILTINS
            .iter()
            .find(|(builtin, _, _)| *builtin == name)
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))?;
        Self::parse(*name, *flavor, source)
    }

    /// Names and flavors of the compiled-in templates.
    pub fn builtins() -> impl Iterator<Item = (&'static str, Flavor)> {
        BUILTINS.iter().map(|(name, flavor, _)| (*name, *flavor))
    }

    /// Loads a template file. Without an explicit flavor it is inferred from
    /// the extension.
    pub fn from_path(path: &Path, flavor: Option<Flavor>) -> Result<Self> {
        let flavor = match flavor {
            Some(flavor) => flavor,
            None => Flavor::from_path(path)
                .ok_or_else(|| Error::UnknownFlavor(path.display().to_string()))?,
        };
        let source = fs::read_to_string(path)?;
        debug!(path = %path.display(), %flavor, "loaded template");
        Self::parse(path.display().to_string(), flavor, &source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Secret length required by a `size` directive.
    pub fn expected_size(&self) -> Option<usize> {
        self.expected_size
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Substitutes every placeholder. Pure: the same context always yields
    /// the same text.
    pub fn render(&self, context: &RenderContext) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context.value(name).ok_or_else(|| Error::TemplateRender {
                        placeholder: name.clone(),
                    })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

fn parse_size_directive(body: &str) -> std::result::Result<usize, String> {
    let mut words = body.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("size"), Some(value), None) => value
            .parse()
            .map_err(|_| format!("invalid size '{value}'")),
        _ => Err(format!("unknown directive '{body}'")),
    }
}

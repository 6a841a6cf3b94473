//! View rendering
//!
//! Rendering is pluggable through [`ViewRenderer`]. The bundled
//! [`TemplateDirRenderer`] only substitutes `{{ path }}` placeholders; it is
//! enough for pages that mostly need translated strings.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::utils::{ApiError, ApiResult};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
});

pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Map<String, Value>) -> ApiResult<String>;
}

/// Renders `<root>/<template>.html`, caching template sources on first use
pub struct TemplateDirRenderer {
    root: PathBuf,
    cache: DashMap<String, Arc<str>>,
}

impl TemplateDirRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: DashMap::new() }
    }

    fn source(&self, template: &str) -> ApiResult<Arc<str>> {
        if let Some(source) = self.cache.get(template) {
            return Ok(Arc::clone(source.value()));
        }

        if template.contains("..") || template.starts_with('/') {
            return Err(ApiError::view_render(template, "invalid template name"));
        }

        let path = self.root.join(format!("{}.html", template));
        let source: Arc<str> = fs::read_to_string(&path)
            .map_err(|e| ApiError::view_render(template, format!("{}: {}", path.display(), e)))?
            .into();

        tracing::debug!("Loaded template '{}' from {}", template, path.display());
        self.cache.insert(template.to_string(), Arc::clone(&source));
        Ok(source)
    }
}

impl ViewRenderer for TemplateDirRenderer {
    fn render(&self, template: &str, context: &Map<String, Value>) -> ApiResult<String> {
        let source = self.source(template)?;
        render_placeholders(template, &source, context)
    }
}

/// Substitute every `{{ path }}` in `source` with its HTML-escaped value
pub fn render_placeholders(
    template: &str,
    source: &str,
    context: &Map<String, Value>,
) -> ApiResult<String> {
    let mut missing = None;

    let rendered = PLACEHOLDER.replace_all(source, |caps: &Captures| {
        let path = &caps[1];
        match lookup(context, path) {
            Some(value) => escape_html(&display_value(value)),
            None => {
                missing.get_or_insert_with(|| path.to_string());
                String::new()
            },
        }
    });

    match missing {
        Some(path) => Err(ApiError::view_render(template, format!("no value for '{}'", path))),
        None => Ok(rendered.into_owned()),
    }
}

/// Resolve a dotted path. A key that itself contains dots is tried whole
/// before the path is split.
fn lookup<'a>(context: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = context.get(path) {
        return Some(value);
    }

    let mut split_points = path.match_indices('.').map(|(i, _)| i).collect::<Vec<_>>();
    split_points.reverse();
    for idx in split_points {
        let (head, rest) = (&path[..idx], &path[idx + 1..]);
        if let Some(Value::Object(child)) = context.get(head)
            && let Some(value) = lookup(child, rest)
        {
            return Some(value);
        }
    }
    None
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

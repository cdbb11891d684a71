//! Invocation descriptor builder
//!
//! Turns parsed parameter sets into ordered, uniquely labelled invocation
//! descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{ParameterSpec, TypedArguments};
use crate::params::ParsedSet;

/// Default naming template for invocation labels
pub const DEFAULT_LABEL_TEMPLATE: &str = "[{index}] {params} ({method})";

/// How invocation labels are rendered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOptions {
    /// Supports `{index}`, `{params}`, `{method}` and `{class}`
    #[serde(default = "default_template")]
    pub template: String,

    /// Rendered parameters longer than this are cut and end in `...`
    #[serde(default = "default_max_params_len")]
    pub max_params_len: usize,
}

fn default_template() -> String {
    DEFAULT_LABEL_TEMPLATE.to_string()
}

fn default_max_params_len() -> usize {
    64
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            template: default_template(),
            max_params_len: default_max_params_len(),
        }
    }
}

impl LabelOptions {
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_max_params_len(mut self, len: usize) -> Self {
        self.max_params_len = len;
        self
    }
}

/// One scheduled invocation of a parameterized method
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationDescriptor {
    pub class: String,
    pub method: String,
    /// Zero-based position in declaration order
    pub index: usize,
    pub label: String,
    pub spec: ParameterSpec,
    pub arguments: TypedArguments,
}

/// Builds descriptors for one method
pub struct DescriptorBuilder<'a> {
    class: &'a str,
    method: &'a str,
    options: &'a LabelOptions,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(class: &'a str, method: &'a str, options: &'a LabelOptions) -> Self {
        Self {
            class,
            method,
            options,
        }
    }

    /// Emit descriptors in the order of `sets`. Never fails.
    pub fn build(&self, sets: Vec<ParsedSet>) -> Vec<InvocationDescriptor> {
        let mut seen = HashSet::new();

        sets.into_iter()
            .enumerate()
            .map(|(index, set)| {
                let natural = self.label(index, &set.spec);
                let mut label = natural.clone();
                let mut attempt = 0;
                while !seen.insert(label.clone()) {
                    label = match attempt {
                        0 => format!("{natural} [{index}]"),
                        n => format!("{natural} [{index}.{n}]"),
                    };
                    attempt += 1;
                }

                InvocationDescriptor {
                    class: self.class.to_string(),
                    method: self.method.to_string(),
                    index,
                    label,
                    spec: set.spec,
                    arguments: set.arguments,
                }
            })
            .collect()
    }

    /// Label for the set at `index`
    pub fn label(&self, index: usize, spec: &ParameterSpec) -> String {
        let params = render_params(&spec.tokens, self.options.max_params_len);
        let index = index.to_string();
        render_template(
            &self.options.template,
            &[
                ("index", index.as_str()),
                ("params", params.as_str()),
                ("method", self.method),
                ("class", self.class),
            ],
        )
    }
}

/// Join tokens for display, escaping control characters and truncating
pub fn render_params(tokens: &[String], max_len: usize) -> String {
    let joined = tokens.join(", ");
    let mut escaped = String::with_capacity(joined.len());
    for c in joined.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => escaped.push(c),
        }
    }

    if escaped.chars().count() <= max_len {
        return escaped;
    }

    let mut truncated: String = escaped.chars().take(max_len.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted text is never rescanned; unknown placeholders stay as written.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replaced = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });

        match replaced {
            Some((value, end)) => {
                output.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArgValue;

    fn set(literal: &str, tokens: &[&str]) -> ParsedSet {
        ParsedSet {
            spec: ParameterSpec::new(literal, tokens.iter().map(|t| t.to_string()).collect()),
            arguments: TypedArguments::new(
                tokens.iter().map(|t| ArgValue::Str(t.to_string())).collect(),
            ),
        }
    }

    #[test]
    fn test_default_labels_preserve_order() {
        let options = LabelOptions::default();
        let builder = DescriptorBuilder::new("Suite", "check", &options);
        let descriptors = builder.build(vec![set("true", &["true"]), set("false", &["false"])]);

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].index, 0);
        assert_eq!(descriptors[0].label, "[0] true (check)");
        assert_eq!(descriptors[1].label, "[1] false (check)");
        assert_eq!(descriptors[1].method, "check");
        assert_eq!(descriptors[1].class, "Suite");
    }

    #[test]
    fn test_duplicate_labels_are_disambiguated() {
        let options = LabelOptions::default().with_template("{method}({params})");
        let builder = DescriptorBuilder::new("Suite", "m", &options);
        let descriptors = builder.build(vec![
            set("a", &["a"]),
            set(" a", &["a"]),
            set("b", &["b"]),
        ]);

        assert_eq!(descriptors[0].label, "m(a)");
        assert_eq!(descriptors[1].label, "m(a) [1]");
        assert_eq!(descriptors[2].label, "m(b)");
    }

    #[test]
    fn test_suffixed_label_never_reuses_an_existing_one() {
        let options = LabelOptions::default().with_template("{params}");
        let builder = DescriptorBuilder::new("Suite", "m", &options);
        let descriptors = builder.build(vec![
            set("x", &["x"]),
            set("x [2]", &["x [2]"]),
            set("x", &["x"]),
            set("x [2]", &["x [2]"]),
        ]);

        let labels: Vec<_> = descriptors.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["x", "x [2]", "x [2.1]", "x [2] [3]"]);
        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_render_params_escapes_and_truncates() {
        let tokens = vec!["line\nbreak".to_string(), "tab\there".to_string()];
        assert_eq!(render_params(&tokens, 100), "line\\nbreak, tab\\there");

        let long = vec!["x".repeat(20)];
        let rendered = render_params(&long, 10);
        assert_eq!(rendered, "xxxxxxx...");
        assert_eq!(rendered.chars().count(), 10);
    }

    #[test]
    fn test_template_substitution_is_single_pass() {
        let rendered = render_template(
            "{class}.{method} {params} {unknown}",
            &[("class", "C"), ("method", "m"), ("params", "{method}")],
        );
        assert_eq!(rendered, "C.m {method} {unknown}");
    }

    #[test]
    fn test_template_with_unbalanced_brace() {
        assert_eq!(render_template("{index", &[("index", "0")]), "{index");
    }
}

// src/flow/builder.rs

//! Renders steps into a Maestro flow document.
//!
//! Layout:
//!
//! ```text
//! appId: com.example.app
//! ---
//! - launchApp: "com.example.app"
//! - tapOn:
//!     point:
//!       x: 50
//!       y: 100
//! - back
//! ```
//!
//! Flat strings, numbers and booleans are always rendered inline. Mappings
//! become blocks: first-level entries at four spaces, every nested mapping
//! two spaces deeper than its parent.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::flow::params::StepParams;
use crate::types::Step;

const ENTRY_INDENT: usize = 4;
const NESTED_INDENT_STEP: usize = 2;

/// Largest float that still converts to an exact integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A rendered flow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDocument(String);

impl FlowDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FlowDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FlowDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for FlowDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Build the flow document for `app_id` running `steps` in order.
pub fn build(app_id: &str, steps: &[Step]) -> FlowDocument {
    let mut out = format!("appId: {app_id}\n---\n");
    for step in steps {
        render_step(&mut out, step);
        out.push('\n');
    }
    FlowDocument(out)
}

fn render_step(out: &mut String, step: &Step) {
    let action = &step.action;
    match StepParams::classify(step.parameters.as_ref()) {
        StepParams::Absent => out.push_str(&format!("- {action}")),
        StepParams::Text(s) => out.push_str(&format!("- {action}: {}", quote(s))),
        StepParams::Number(n) => out.push_str(&format!("- {action}: {}", format_number(n))),
        StepParams::Bool(b) => out.push_str(&format!("- {action}: {b}")),
        StepParams::Map(map) => {
            out.push_str(&format!("- {action}:"));
            render_entries(out, map, ENTRY_INDENT);
        }
        StepParams::Other(value) => out.push_str(&format!("- {action}: {value}")),
    }
}

fn render_entries(out: &mut String, map: &Map<String, Value>, indent: usize) {
    for (key, value) in map {
        out.push('\n');
        match value {
            Value::Object(nested) => {
                out.push_str(&format!("{:indent$}{key}:", ""));
                render_entries(out, nested, indent + NESTED_INDENT_STEP);
            }
            other => out.push_str(&format!("{:indent$}{key}: {}", "", format_scalar(other))),
        }
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Whole-number floats render without a fractional part (`100.0` → `100`).
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f)
            if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER =>
        {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Quote a string for the flow document.
///
/// Backslashes are escaped before quotes, so `a\"b` becomes `a\\\"b`.
pub fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn whole_number_floats_render_as_integers() {
        let doc = build(
            "app",
            &[
                Step::with("eraseText", json!(100.0)),
                Step::with("swipe", json!({"duration": 250.0, "ratio": 0.5})),
            ],
        );
        assert_eq!(
            doc.as_str(),
            "appId: app\n---\n- eraseText: 100\n- swipe:\n    duration: 250\n    ratio: 0.5\n"
        );
    }

    #[test]
    fn empty_step_list_is_just_the_header() {
        assert_eq!(build("com.example.app", &[]).as_str(), "appId: com.example.app\n---\n");
    }

    #[test]
    fn string_parameters_render_inline_and_quoted() {
        let doc = build("com.test.app", &[Step::with("launchApp", "com.test.app")]);
        assert_eq!(doc.as_str(), "appId: com.test.app\n---\n- launchApp: \"com.test.app\"\n");
    }

    #[test]
    fn bare_step_has_no_colon() {
        let doc = build("app", &[Step::bare("back")]);
        assert_eq!(doc.as_str(), "appId: app\n---\n- back\n");
    }

    #[test]
    fn explicit_null_is_bare() {
        let doc = build("app", &[Step::with("hideKeyboard", Value::Null)]);
        assert_eq!(doc.as_str(), "appId: app\n---\n- hideKeyboard\n");
    }

    #[test]
    fn numbers_and_booleans_are_literals() {
        let doc = build(
            "app",
            &[Step::with("eraseText", 5), Step::with("clearState", true)],
        );
        assert_eq!(doc.as_str(), "appId: app\n---\n- eraseText: 5\n- clearState: true\n");
    }

    #[test]
    fn backslash_is_escaped_before_quote() {
        assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn nested_point_uses_two_indent_levels() {
        let doc = build(
            "app",
            &[Step::with("tapOn", json!({"point": {"x": 50, "y": 100}}))],
        );
        assert_eq!(
            doc.as_str(),
            "appId: app\n---\n- tapOn:\n    point:\n      x: 50\n      y: 100\n"
        );
    }

    #[test]
    fn mapping_keeps_insertion_order() {
        let doc = build(
            "app",
            &[Step::with(
                "swipe",
                json!({"start": "90%, 50%", "end": "10%, 50%", "duration": 400}),
            )],
        );
        assert_eq!(
            doc.as_str(),
            "appId: app\n---\n- swipe:\n    start: \"90%, 50%\"\n    end: \"10%, 50%\"\n    duration: 400\n"
        );
    }

    #[test]
    fn arrays_use_compact_json() {
        let doc = build("app", &[Step::with("runScript", json!(["a", 1, {"b": true}]))]);
        assert_eq!(doc.as_str(), "appId: app\n---\n- runScript: [\"a\",1,{\"b\":true}]\n");
    }

    #[test]
    fn non_scalar_values_inside_blocks_use_compact_json() {
        let doc = build(
            "app",
            &[Step::with("tapOn", json!({"text": "OK", "retry": null, "tags": ["x"]}))],
        );
        assert_eq!(
            doc.as_str(),
            "appId: app\n---\n- tapOn:\n    text: \"OK\"\n    retry: null\n    tags: [\"x\"]\n"
        );
    }

    #[test]
    fn third_level_keeps_indenting() {
        let doc = build("app", &[Step::with("custom", json!({"a": {"b": {"c": 1}}}))]);
        assert_eq!(
            doc.as_str(),
            "appId: app\n---\n- custom:\n    a:\n      b:\n        c: 1\n"
        );
    }
}

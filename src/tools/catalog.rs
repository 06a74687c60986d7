// src/tools/catalog.rs

//! Tool names, descriptions and JSON input schemas advertised via
//! `tools/list`.

use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema,
    }
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn app_and_device(extra: Value, required: &[&str]) -> Value {
    let mut properties = json!({
        "appId": { "type": "string", "description": "Application id / bundle id" },
        "deviceId": { "type": "string", "description": "Target device (defaults to the only connected one)" },
    });
    if let (Some(props), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        props.extend(extra);
    }

    let mut all_required = vec!["appId"];
    all_required.extend_from_slice(required);
    object(properties, &all_required)
}

fn selector_props() -> Value {
    json!({
        "text": { "type": "string", "description": "Visible text (regex)" },
        "id": { "type": "string", "description": "Accessibility / resource id" },
    })
}

fn merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a), Value::Object(b)) => {
            a.extend(b);
            Value::Object(a)
        }
        (a, _) => a,
    }
}

fn steps_schema() -> Value {
    json!({
        "type": "array",
        "description": "Ordered steps; each is {action, parameters?}",
        "items": {
            "type": "object",
            "properties": {
                "action": { "type": "string" },
                "parameters": {}
            },
            "required": ["action"]
        }
    })
}

/// Every tool exposed by the server, in listing order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "check_maestro",
            "Report the installed Maestro CLI version.",
            object(json!({}), &[]),
        ),
        tool(
            "list_devices",
            "List connected Android devices and available iOS simulators.",
            object(json!({}), &[]),
        ),
        tool(
            "launch_app",
            "Launch an application.",
            app_and_device(
                json!({
                    "clearState": { "type": "boolean" },
                    "stopApp": { "type": "boolean" },
                }),
                &[],
            ),
        ),
        tool("stop_app", "Stop an application.", app_and_device(json!({}), &[])),
        tool(
            "clear_state",
            "Clear an application's data.",
            app_and_device(json!({}), &[]),
        ),
        tool(
            "tap_on",
            "Tap an element by text, id or screen point.",
            app_and_device(
                merge(
                    selector_props(),
                    json!({
                        "point": { "description": "\"50%,50%\" or {\"x\": 50, \"y\": 100}" },
                        "index": { "type": "integer", "minimum": 0 },
                        "longPress": { "type": "boolean" },
                    }),
                ),
                &[],
            ),
        ),
        tool(
            "input_text",
            "Type text, optionally focusing a field by id first.",
            app_and_device(
                json!({
                    "text": { "type": "string" },
                    "elementId": { "type": "string" },
                }),
                &["text"],
            ),
        ),
        tool(
            "erase_text",
            "Erase characters from the focused field.",
            app_and_device(
                json!({ "characters": { "type": "integer", "minimum": 0 } }),
                &[],
            ),
        ),
        tool(
            "swipe",
            "Swipe in a direction or between two points.",
            app_and_device(
                json!({
                    "direction": { "type": "string", "enum": ["UP", "DOWN", "LEFT", "RIGHT"] },
                    "start": { "type": "string", "description": "\"90%,50%\"" },
                    "end": { "type": "string", "description": "\"10%,50%\"" },
                    "duration": { "type": "integer", "minimum": 0 },
                }),
                &[],
            ),
        ),
        tool(
            "scroll_until_visible",
            "Scroll until an element becomes visible.",
            app_and_device(
                merge(
                    selector_props(),
                    json!({
                        "direction": { "type": "string", "enum": ["UP", "DOWN", "LEFT", "RIGHT"] },
                        "timeoutMs": { "type": "integer", "minimum": 0 },
                    }),
                ),
                &[],
            ),
        ),
        tool(
            "assert_visible",
            "Assert an element is visible.",
            app_and_device(selector_props(), &[]),
        ),
        tool(
            "assert_not_visible",
            "Assert an element is not visible.",
            app_and_device(selector_props(), &[]),
        ),
        tool(
            "press_key",
            "Press a hardware or keyboard key (Enter, Back, Home, ...).",
            app_and_device(json!({ "key": { "type": "string" } }), &["key"]),
        ),
        tool("back", "Press the back button.", app_and_device(json!({}), &[])),
        tool(
            "hide_keyboard",
            "Hide the software keyboard.",
            app_and_device(json!({}), &[]),
        ),
        tool(
            "open_link",
            "Open a URL or deep link.",
            app_and_device(json!({ "url": { "type": "string" } }), &["url"]),
        ),
        tool(
            "wait_for_animation",
            "Wait until on-screen animations settle.",
            app_and_device(
                json!({ "timeoutMs": { "type": "integer", "minimum": 0 } }),
                &[],
            ),
        ),
        tool(
            "take_screenshot",
            "Capture a screenshot and return its file path.",
            object(
                json!({
                    "deviceId": { "type": "string" },
                    "outputPath": { "type": "string", "description": "Where to write the PNG" },
                }),
                &[],
            ),
        ),
        tool(
            "get_hierarchy",
            "Dump the current UI hierarchy.",
            object(json!({ "deviceId": { "type": "string" } }), &[]),
        ),
        tool(
            "run_flow",
            "Run a flow given inline YAML or a file path.",
            object(
                json!({
                    "flowYaml": { "type": "string" },
                    "flowFile": { "type": "string" },
                    "deviceId": { "type": "string" },
                    "timeoutSecs": { "type": "integer", "minimum": 1 },
                }),
                &[],
            ),
        ),
        tool(
            "run_steps",
            "Build a flow from a list of steps and run it.",
            app_and_device(
                json!({
                    "steps": steps_schema(),
                    "timeoutSecs": { "type": "integer", "minimum": 1 },
                }),
                &["steps"],
            ),
        ),
        tool(
            "run_steps_multi_device",
            "Run the same steps on several devices concurrently.",
            object(
                json!({
                    "appId": { "type": "string" },
                    "steps": steps_schema(),
                    "deviceIds": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
                    "timeoutSecs": { "type": "integer", "minimum": 1 },
                }),
                &["appId", "steps", "deviceIds"],
            ),
        ),
        tool(
            "run_sharded",
            "Run a directory of flows with Maestro's built-in sharding.",
            object(
                json!({
                    "flowDirectory": { "type": "string" },
                    "shards": { "type": "integer", "minimum": 1 },
                    "strategy": { "type": "string", "enum": ["all", "split"] },
                }),
                &["flowDirectory", "shards"],
            ),
        ),
        tool(
            "start_studio",
            "Start Maestro Studio in the background.",
            object(
                json!({
                    "deviceId": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                }),
                &[],
            ),
        ),
        tool(
            "raw_command",
            "Run the Maestro CLI with arbitrary arguments.",
            object(
                json!({ "args": { "type": "array", "items": { "type": "string" }, "minItems": 1 } }),
                &["args"],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let defs = tool_definitions();
        let names: HashSet<_> = defs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn app_tools_require_app_id() {
        let defs = tool_definitions();
        let swipe = defs.iter().find(|d| d.name == "swipe").unwrap();
        assert_eq!(swipe.input_schema["required"], json!(["appId"]));
        assert!(swipe.input_schema["properties"]["direction"].is_object());
    }
}

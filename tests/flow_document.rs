// tests/flow_document.rs

use proptest::prelude::*;
use serde_json::json;

use maestro_mcp::flow;
use maestro_mcp::flow::builder::quote;
use maestro_mcp::types::Step;
use maestro_mcp_test_utils::builders::StepsBuilder;

#[test]
fn launch_and_tap_by_text() {
    let steps = StepsBuilder::new()
        .bare("launchApp")
        .with("tapOn", json!({"text": "Login"}))
        .build();

    let doc = flow::build("com.example.app", &steps);

    assert_eq!(
        doc.as_str(),
        "appId: com.example.app\n---\n- launchApp\n- tapOn:\n    text: \"Login\"\n"
    );
}

#[test]
fn scalar_parameters_render_inline() {
    let steps = StepsBuilder::new()
        .with("inputText", "hello \"world\"")
        .with("eraseText", 5)
        .with("waitForAnimationToEnd", true)
        .build();

    let doc = flow::build("app", &steps);

    assert_eq!(
        doc.as_str(),
        "appId: app\n---\n\
         - inputText: \"hello \\\"world\\\"\"\n\
         - eraseText: 5\n\
         - waitForAnimationToEnd: true\n"
    );
}

#[test]
fn nested_maps_indent_one_level_deeper() {
    let steps = vec![Step::with(
        "scrollUntilVisible",
        json!({"element": {"id": "submit"}, "direction": "DOWN"}),
    )];

    let doc = flow::build("app", &steps);

    assert_eq!(
        doc.as_str(),
        "appId: app\n---\n\
         - scrollUntilVisible:\n    element:\n      id: \"submit\"\n    direction: \"DOWN\"\n"
    );
}

#[test]
fn quote_escapes_backslash_before_quote() {
    assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
}

/// Reverse of the quoting escape rules; `None` on a bare quote or a
/// dangling backslash.
fn unescape(inner: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                e @ ('\\' | '"') => out.push(e),
                _ => return None,
            },
            '"' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

fn action_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,12}"
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        action_strategy(),
        prop_oneof![
            Just(None),
            "[^\n\r]{0,20}".prop_map(|s| Some(json!(s))),
            any::<i32>().prop_map(|n| Some(json!(n))),
            any::<bool>().prop_map(|b| Some(json!(b))),
            ("[a-z]{1,6}", "[^\n\r]{0,20}").prop_map(|(k, v)| Some(json!({ k: v }))),
        ],
    )
        .prop_map(|(action, parameters)| Step { action, parameters })
}

proptest! {
    #[test]
    fn document_has_header_and_one_entry_per_step(
        app_id in "[a-z][a-z.]{0,20}",
        steps in proptest::collection::vec(step_strategy(), 0..12),
    ) {
        let doc = flow::build(&app_id, &steps);
        let text = doc.as_str();

        let header = format!("appId: {app_id}\n---\n");
        prop_assert!(text.starts_with(&header));
        prop_assert!(text.ends_with('\n'));

        let actions: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("- "))
            .map(|entry| entry.split(':').next().unwrap_or(entry))
            .collect();
        let expected: Vec<&str> = steps.iter().map(|s| s.action.as_str()).collect();
        prop_assert_eq!(actions, expected);
    }

    #[test]
    fn quoting_round_trips_backslashes_and_quotes(raw in "[\\\\\"a]{0,12}") {
        let quoted = quote(&raw);

        prop_assert!(quoted.len() >= 2);
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        prop_assert_eq!(unescape(&quoted[1..quoted.len() - 1]), Some(raw));
    }

    #[test]
    fn building_is_deterministic(
        steps in proptest::collection::vec(step_strategy(), 0..8),
    ) {
        prop_assert_eq!(flow::build("app", &steps), flow::build("app", &steps));
    }
}

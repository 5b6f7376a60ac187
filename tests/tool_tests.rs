//! Tool specs, argument coercion, and the closure-based tool wrapper.

use joao::error::JoaoError;
use joao::tools::{FnTool, ParamKind, Tool, ToolArguments, ToolSpec};
use pretty_assertions::assert_eq;

#[test]
fn spec_schema_has_stable_shape() {
    let spec = ToolSpec::builder("get_weather")
        .description("Get weather for a city")
        .string("city", "City name", true)
        .integer("days", "Forecast horizon", false)
        .build();

    assert_eq!(
        spec.schema(),
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name"},
                "days": {"type": "integer", "description": "Forecast horizon"},
            },
            "required": ["city"],
        })
    );
}

#[test]
fn any_kind_emits_permissive_schema() {
    let spec = ToolSpec::builder("opaque")
        .any("payload", "", true)
        .build();

    // No "type" constraint: anything the model sends passes.
    assert_eq!(
        spec.schema(),
        serde_json::json!({
            "type": "object",
            "properties": {"payload": {}},
            "required": ["payload"],
        })
    );
}

#[test]
fn empty_spec_builds_without_error() {
    let spec = ToolSpec::builder("ping").build();
    assert_eq!(
        spec.schema(),
        serde_json::json!({"type": "object", "properties": {}, "required": []})
    );
}

#[test]
fn coercion_converts_strings_to_declared_kinds() {
    let spec = ToolSpec::builder("mixed")
        .integer("count", "", true)
        .number("ratio", "", true)
        .boolean("flag", "", true)
        .string("label", "", true)
        .build();

    let args = ToolArguments::new(serde_json::json!({
        "count": "42",
        "ratio": "0.5",
        "flag": "true",
        "label": 7,
    }))
    .coerced(&spec);

    assert_eq!(args.get_i64("count").unwrap(), 42);
    assert_eq!(args.get_f64("ratio").unwrap(), 0.5);
    assert!(args.get_bool("flag").unwrap());
    assert_eq!(args.get_str("label").unwrap(), "7");
}

#[test]
fn coercion_leaves_unconvertible_values_untouched() {
    let spec = ToolSpec::builder("strict").integer("n", "", true).build();

    let args = ToolArguments::new(serde_json::json!({"n": "not a number"})).coerced(&spec);
    assert_eq!(
        args.get("n"),
        Some(&serde_json::Value::String("not a number".into()))
    );
    assert!(matches!(
        args.get_i64("n"),
        Err(JoaoError::InvalidArgument(_))
    ));
}

#[test]
fn coercion_ignores_undeclared_parameters() {
    let spec = ToolSpec::builder("sparse").integer("a", "", true).build();

    let args = ToolArguments::new(serde_json::json!({"a": "1", "extra": "text"})).coerced(&spec);
    assert_eq!(args.get_i64("a").unwrap(), 1);
    assert_eq!(
        args.get("extra"),
        Some(&serde_json::Value::String("text".into()))
    );
}

#[test]
fn whole_float_coerces_to_integer() {
    let spec = ToolSpec::builder("f").integer("n", "", true).build();
    let args = ToolArguments::new(serde_json::json!({"n": 3.0})).coerced(&spec);
    assert_eq!(args.get_i64("n").unwrap(), 3);
}

#[tokio::test]
async fn fn_tool_executes_with_arguments() {
    let tool = FnTool::new(
        ToolSpec::builder("add")
            .integer("a", "", true)
            .integer("b", "", true)
            .build(),
        |args| async move { Ok(serde_json::json!(args.get_i64("a")? + args.get_i64("b")?)) },
    );

    assert_eq!(tool.name(), "add");
    let args = ToolArguments::new(serde_json::json!({"a": 2, "b": 3}));
    let result = tool.execute(&args).await.unwrap();
    assert_eq!(result, serde_json::json!(5));
}

#[tokio::test]
async fn fn_tool_propagates_handler_errors() {
    let tool = FnTool::new(ToolSpec::builder("fail").build(), |_args| async move {
        Err(JoaoError::tool_execution("fail", "intentional"))
    });

    let err = tool.execute(&ToolArguments::default()).await.unwrap_err();
    assert!(matches!(err, JoaoError::ToolExecution { .. }));
    assert!(err.to_string().contains("intentional"));
}

#[test]
fn param_lookup_finds_declared_parameters() {
    let spec = ToolSpec::builder("t")
        .param("x", ParamKind::Number, "an x", true)
        .build();
    assert_eq!(spec.param("x").unwrap().kind, ParamKind::Number);
    assert!(spec.param("y").is_none());
}

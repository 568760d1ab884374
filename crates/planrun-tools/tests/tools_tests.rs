//! Tests for planrun-tools: ToolRegistry, Calculator, and TodoStore

use planrun_core::{Error, JsonMap};
use planrun_tools::*;
use serde_json::json;

fn input(value: serde_json::Value) -> JsonMap {
    value.as_object().expect("test input must be an object").clone()
}

// ===========================================================================
// ToolRegistry
// ===========================================================================

#[test]
fn registry_default_is_empty() {
    let reg = ToolRegistry::new();
    assert!(reg.list().is_empty());
    assert!(reg.descriptors().is_empty());
}

#[test]
fn create_default_registry_has_builtin_tools() {
    let reg = create_default_registry();
    let names = reg.list();
    assert!(names.contains(&"Calculator"));
    assert!(names.contains(&"TodoStore"));
    assert_eq!(names.len(), 2);
    assert_eq!(reg.descriptors().len(), 2);
}

#[test]
fn registry_resolve_unknown_tool() {
    let reg = create_default_registry();
    let err = reg.resolve("nonexistent").unwrap_err();
    assert!(matches!(err, Error::UnknownTool(_)));
    assert!(err.to_string().contains("nonexistent"));
}

#[test]
fn registry_get_and_contains() {
    let reg = create_default_registry();
    assert!(reg.get("Calculator").is_some());
    assert!(reg.contains("TodoStore"));
    assert!(!reg.contains("nope"));
}

#[test]
fn registry_descriptors_have_schemas() {
    let reg = create_default_registry();
    for desc in reg.descriptors() {
        assert!(!desc.name.is_empty());
        assert!(!desc.description.is_empty());
        assert!(desc.input_schema.is_object());
    }
}

#[tokio::test]
async fn registry_execute_unknown_tool() {
    let reg = create_default_registry();
    let err = reg.execute("nope", &JsonMap::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnknownTool(_)));
}

// ===========================================================================
// Calculator
// ===========================================================================

#[tokio::test]
async fn calculator_basic_arithmetic() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "(41*7)+13"})))
        .await
        .unwrap();
    assert_eq!(out["result"], json!(300.0));
}

#[tokio::test]
async fn calculator_operator_precedence() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "2+3*4"})))
        .await
        .unwrap();
    assert_eq!(out["result"], json!(14.0));
}

#[tokio::test]
async fn calculator_unary_minus_and_parens() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "-(2+3)*4"})))
        .await
        .unwrap();
    assert_eq!(out["result"], json!(-20.0));
}

#[tokio::test]
async fn calculator_power_both_spellings() {
    let reg = create_default_registry();
    let caret = reg
        .execute("Calculator", &input(json!({"expression": "2^10"})))
        .await
        .unwrap();
    assert_eq!(caret["result"], json!(1024.0));

    let double_star = reg
        .execute("Calculator", &input(json!({"expression": "2**10"})))
        .await
        .unwrap();
    assert_eq!(double_star["result"], json!(1024.0));
}

#[tokio::test]
async fn calculator_power_right_associative() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "2^3^2"})))
        .await
        .unwrap();
    assert_eq!(out["result"], json!(512.0));
}

#[tokio::test]
async fn calculator_floats() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "1.5 * 4"})))
        .await
        .unwrap();
    assert_eq!(out["result"], json!(6.0));
}

#[tokio::test]
async fn calculator_division_by_zero() {
    let reg = create_default_registry();
    let err = reg
        .execute("Calculator", &input(json!({"expression": "1/0"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ToolExecution { .. }));
    assert!(err.to_string().contains("division by zero"));
}

#[tokio::test]
async fn calculator_rejects_invalid_characters() {
    let reg = create_default_registry();
    let err = reg
        .execute("Calculator", &input(json!({"expression": "import os"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ToolExecution { .. }));
}

#[tokio::test]
async fn calculator_rejects_malformed_expression() {
    let reg = create_default_registry();
    for bad in ["2+", "(1+2", "", "   "] {
        let err = reg
            .execute("Calculator", &input(json!({"expression": bad})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolExecution { .. }), "expected error for {:?}", bad);
    }
}

#[tokio::test]
async fn calculator_missing_expression_param() {
    let reg = create_default_registry();
    let err = reg.execute("Calculator", &JsonMap::new()).await.unwrap_err();
    assert!(err.to_string().contains("expression"));
}

#[tokio::test]
async fn calculator_echoes_expression_in_output() {
    let reg = create_default_registry();
    let out = reg
        .execute("Calculator", &input(json!({"expression": "6*7"})))
        .await
        .unwrap();
    assert_eq!(out["expression"], json!("6*7"));
    assert_eq!(out["result"], json!(42.0));
}

// ===========================================================================
// TodoStore
// ===========================================================================

#[tokio::test]
async fn todo_add_and_list() {
    let reg = create_default_registry();
    let added = reg
        .execute("TodoStore", &input(json!({"operation": "add", "title": "Buy milk"})))
        .await
        .unwrap();
    assert_eq!(added["todo"]["title"], json!("Buy milk"));
    assert_eq!(added["todo"]["completed"], json!(false));

    let listed = reg
        .execute("TodoStore", &input(json!({"operation": "list"})))
        .await
        .unwrap();
    assert_eq!(listed["count"], json!(1));
    assert_eq!(listed["todos"][0]["title"], json!("Buy milk"));
}

#[tokio::test]
async fn todo_add_requires_title() {
    let reg = create_default_registry();
    for bad in [json!({"operation": "add"}), json!({"operation": "add", "title": "   "})] {
        let err = reg.execute("TodoStore", &input(bad)).await.unwrap_err();
        assert!(err.to_string().contains("title"));
    }
}

#[tokio::test]
async fn todo_complete_flow() {
    let reg = create_default_registry();
    let added = reg
        .execute("TodoStore", &input(json!({"operation": "add", "title": "Task"})))
        .await
        .unwrap();
    let id = added["todo"]["id"].as_str().unwrap().to_string();

    let completed = reg
        .execute("TodoStore", &input(json!({"operation": "complete", "todo_id": id})))
        .await
        .unwrap();
    assert_eq!(completed["todo"]["completed"], json!(true));
    assert!(completed["todo"]["completed_at"].is_string());
}

#[tokio::test]
async fn todo_complete_twice_is_idempotent() {
    let reg = create_default_registry();
    let added = reg
        .execute("TodoStore", &input(json!({"operation": "add", "title": "Task"})))
        .await
        .unwrap();
    let id = added["todo"]["id"].as_str().unwrap().to_string();

    reg.execute("TodoStore", &input(json!({"operation": "complete", "todo_id": id.clone()})))
        .await
        .unwrap();
    let again = reg
        .execute("TodoStore", &input(json!({"operation": "complete", "todo_id": id})))
        .await
        .unwrap();
    assert_eq!(again["message"], json!("Todo was already completed"));
}

#[tokio::test]
async fn todo_delete_removes_item() {
    let reg = create_default_registry();
    let added = reg
        .execute("TodoStore", &input(json!({"operation": "add", "title": "Gone soon"})))
        .await
        .unwrap();
    let id = added["todo"]["id"].as_str().unwrap().to_string();

    let deleted = reg
        .execute("TodoStore", &input(json!({"operation": "delete", "todo_id": id})))
        .await
        .unwrap();
    assert_eq!(deleted["deleted_todo"]["title"], json!("Gone soon"));

    let listed = reg
        .execute("TodoStore", &input(json!({"operation": "list"})))
        .await
        .unwrap();
    assert_eq!(listed["count"], json!(0));
}

#[tokio::test]
async fn todo_unknown_id_fails() {
    let reg = create_default_registry();
    for op in ["complete", "delete"] {
        let err = reg
            .execute("TodoStore", &input(json!({"operation": op, "todo_id": "no-such-id"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}

#[tokio::test]
async fn todo_invalid_operation() {
    let reg = create_default_registry();
    let err = reg
        .execute("TodoStore", &input(json!({"operation": "frobnicate"})))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid operation"));

    let err = reg.execute("TodoStore", &JsonMap::new()).await.unwrap_err();
    assert!(err.to_string().contains("operation"));
}

#[tokio::test]
async fn todo_list_preserves_insertion_order() {
    let reg = create_default_registry();
    for title in ["first", "second", "third"] {
        reg.execute("TodoStore", &input(json!({"operation": "add", "title": title})))
            .await
            .unwrap();
    }
    let listed = reg
        .execute("TodoStore", &input(json!({"operation": "list"})))
        .await
        .unwrap();
    assert_eq!(listed["count"], json!(3));
    assert_eq!(listed["todos"][0]["title"], json!("first"));
    assert_eq!(listed["todos"][2]["title"], json!("third"));
}

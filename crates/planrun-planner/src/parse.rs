//! Plan validation — raw planner output to a typed Plan
//!
//! Two-stage, pure, deterministic: a strict structural parse, then exactly
//! one fallback pass that extracts the first well-formed JSON object from
//! the surrounding text (planners love markdown fences) and re-runs the
//! strict parse. No third attempt.

use planrun_core::{Error, JsonMap, Plan, PlanStep, Result};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Loose shape accepted from planners. step_number and plan_id are optional
/// here; validation below assigns or checks them.
#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    plan_id: Option<String>,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    step_number: Option<u32>,
    tool: String,
    input: JsonMap,
    reasoning: String,
}

/// Parse and validate raw planner output into a Plan.
///
/// Tool names absent from `known_tools` do not fail the parse — structural
/// validity is checked here, tool existence at execution time.
pub fn parse_plan(raw: &str, known_tools: &[String]) -> Result<Plan> {
    let plan = match strict_parse(raw) {
        Ok(p) => p,
        Err(first_err) => {
            let extracted = extract_json_object(raw).ok_or_else(|| {
                Error::plan_parse(format!("no JSON object found in planner output: {}", first_err))
            })?;
            debug!("strict parse failed ({}), retrying on extracted JSON", first_err);
            strict_parse(&extracted)?
        }
    };

    for step in &plan.steps {
        if !known_tools.iter().any(|t| t == &step.tool) {
            warn!(
                "plan {} step {} names unregistered tool '{}'; deferred to execution",
                plan.plan_id, step.step_number, step.tool
            );
        }
    }

    Ok(plan)
}

/// Strict structural parse: non-empty steps, each with tool and input,
/// step numbers 1..N in order (assigned by position when absent).
fn strict_parse(raw: &str) -> Result<Plan> {
    let parsed: RawPlan = serde_json::from_str(raw)
        .map_err(|e| Error::plan_parse(format!("invalid plan JSON: {}", e)))?;

    if parsed.steps.is_empty() {
        return Err(Error::plan_parse("plan must have at least one step"));
    }

    let mut steps = Vec::with_capacity(parsed.steps.len());
    for (i, raw_step) in parsed.steps.into_iter().enumerate() {
        let expected = (i + 1) as u32;
        let step_number = raw_step.step_number.unwrap_or(expected);
        if step_number != expected {
            return Err(Error::plan_parse(format!(
                "step_number out of sequence: expected {}, got {}",
                expected, step_number
            )));
        }
        if raw_step.tool.trim().is_empty() {
            return Err(Error::plan_parse(format!("step {} has an empty tool name", expected)));
        }
        steps.push(PlanStep {
            step_number,
            tool: raw_step.tool,
            input: raw_step.input,
            reasoning: raw_step.reasoning,
        });
    }

    Ok(Plan {
        plan_id: parsed
            .plan_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        steps,
    })
}

/// Extract the first well-formed JSON object from free text.
///
/// Prefers a fenced ```json block; otherwise scans for the first balanced
/// top-level {...} (brace matching is string-literal aware).
fn extract_json_object(text: &str) -> Option<String> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid fence regex")
    });

    if let Some(captures) = fence.captures(text) {
        return Some(captures[1].to_string());
    }

    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

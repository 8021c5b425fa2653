use super::*;
use crate::rules::assets::StaticAssetResolver;
use crate::scene::parser::parse_scene;

fn run(scene: &str, config: &str) -> Vec<ValidationFinding> {
    let graph = parse_scene(scene).unwrap().graph;
    let config = RuleConfig::from_json_str(config).unwrap();
    let assets = StaticAssetResolver::default();
    RuleEngine::new(&config, &assets).evaluate(&graph)
}

const CAMERA_RULE: &str = r#"{
  "allowed_parents": { "camera": ["transform"] },
  "rules": [ { "name": "camera-parent", "kind": "hierarchy", "node_types": ["camera"] } ]
}"#;

#[test]
fn camera_under_transform_passes() {
    let findings = run(
        "createNode transform -n \"persp\";\ncreateNode camera -n \"perspShape\" -p \"persp\";\n",
        CAMERA_RULE,
    );
    assert!(findings.is_empty());
}

#[test]
fn camera_at_root_fails_once() {
    let findings = run("createNode camera -n \"cam\";\n", CAMERA_RULE);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, "camera-parent");
    assert_eq!(findings[0].severity, Severity::Error);
    assert_eq!(findings[0].node.as_deref(), Some("cam"));
    assert_eq!(findings[0].line, Some(1));
}

#[test]
fn rules_run_in_config_order_and_nodes_in_traversal_order() {
    let scene = r#"
createNode transform -n "b_root";
createNode transform -n "a_root";
createNode transform -n "child" -p "b_root";
"#;
    let config = r#"{ "rules": [
        { "name": "first", "kind": "required_attribute", "attribute": "v", "severity": "warning" },
        { "name": "second", "kind": "forbidden_name", "names": ["child", "a_root"] }
    ] }"#;
    let findings = run(scene, config);
    let seen: Vec<(&str, &str)> = findings
        .iter()
        .map(|f| (f.rule.as_str(), f.node.as_deref().unwrap()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("first", "b_root"),
            ("first", "child"),
            ("first", "a_root"),
            ("second", "child"),
            ("second", "a_root"),
        ]
    );
}

#[test]
fn reference_findings_are_errors_regardless_of_rule_severity() {
    let scene = "createNode file -n \"f\";\nsetAttr \".ftn\" -type \"string\" \"missing.png\";\n";
    let config = r#"{
      "references": { "file": [ { "attribute": "ftn", "target": "asset" } ] },
      "rules": [ { "name": "refs", "kind": "reference", "severity": "info" } ]
    }"#;
    let findings = run(scene, config);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.contains("missing.png"));
}

#[test]
fn faulting_rule_becomes_info_and_other_rules_still_run() {
    let scene = "createNode camera -n \"a\";\ncreateNode camera -n \"b\";\n";
    let config = r#"{
      "naming": { "camera": { "pattern": "((" } },
      "allowed_parents": { "camera": ["transform"] },
      "rules": [
        { "name": "naming", "kind": "naming" },
        { "name": "parent", "kind": "hierarchy", "severity": "warning" }
      ]
    }"#;
    let findings = run(scene, config);
    let seen: Vec<(&str, Severity, &str)> = findings
        .iter()
        .map(|f| (f.rule.as_str(), f.severity, f.node.as_deref().unwrap()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (RULE_ERROR, Severity::Info, "a"),
            (RULE_ERROR, Severity::Info, "b"),
            ("parent", Severity::Warning, "a"),
            ("parent", Severity::Warning, "b"),
        ]
    );
    assert!(findings[0].message.contains("rule 'naming' skipped for 'a'"));
}

#[test]
fn scene_level_rules_report_without_node() {
    let config = r#"{ "rules": [
        { "name": "has-light", "kind": "required_type", "node_type": "light",
          "message": "{rule}: {detail}" },
        { "name": "one-root", "kind": "single_root", "severity": "warning" }
    ] }"#;
    let findings = run("createNode transform -n \"a\";\ncreateNode transform -n \"b\";\n", config);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].node, None);
    assert_eq!(
        findings[0].message,
        "has-light: missing required element type 'light'"
    );
    assert_eq!(findings[1].severity, Severity::Warning);
}

#[test]
fn evaluation_is_deterministic() {
    let scene = "createNode camera -n \"x\";\ncreateNode mesh -n \"temp\";\n";
    let config = r#"{
      "allowed_parents": { "camera": ["transform"], "mesh": ["transform"] },
      "rules": [
        { "name": "parent", "kind": "hierarchy" },
        { "name": "no-temp", "kind": "forbidden_name", "names": ["temp"] }
      ]
    }"#;
    assert_eq!(run(scene, config), run(scene, config));
}

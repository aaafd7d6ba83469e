mod common;

use std::rc::Rc;

use autofill_observer::{
    capture::{capture_model::Field, extractor::extract_credential},
    cli::commands::load_scenarios,
    error::ScenarioError,
    observer::subscription::InsertionScan,
    scenario::{
        runner::{RunOptions, ScenarioRunner, compare_captures},
        scenario_model::{ExpectedCapture, FrameSpec, NodeSpec, Scenario, Step},
    },
    sink::sink::RecordingSink,
};

use common::utils::fixture;

fn load_one(name: &str) -> Scenario {
    let mut scenarios = load_scenarios(&fixture(name)).expect("fixture loads");
    scenarios.remove(0)
}

fn options(scan: InsertionScan) -> RunOptions {
    RunOptions {
        scan,
        ..RunOptions::default()
    }
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn load_single_file() {
    let scenario = load_one("login_basic.yaml");
    assert_eq!(scenario.name, "Static login form");
    assert_eq!(scenario.frames.len(), 1);
    assert_eq!(scenario.frames[0].steps.len(), 3);
    assert!(matches!(scenario.frames[0].steps[2], Step::Submit { .. }));
}

#[test]
fn load_directory_sorted_by_name() {
    let scenarios = load_scenarios(&fixture("")).expect("fixture dir loads");
    let names: Vec<_> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Form inside a late container",
            "Login in a sub-frame",
            "Static login form"
        ]
    );
}

#[test]
fn load_missing_path_is_io_error() {
    let err = load_scenarios("does/not/exist.yaml").unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}

#[test]
fn step_yaml_uses_action_tag() {
    let yaml = r#"
- action: insert
  node: { tag: form, id: f }
- action: remove
  target: f
- action: detach
"#;
    let steps: Vec<Step> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        steps[0],
        Step::Insert {
            parent: None,
            node: NodeSpec {
                tag: "form".into(),
                id: Some("f".into()),
                attrs: Default::default(),
                value: None,
                children: vec![],
            },
        }
    );
    assert_eq!(steps[1], Step::Remove { target: "f".into() });
    assert_eq!(steps[2], Step::Detach);
}

// =========================================================================
// Replay
// =========================================================================

#[test]
fn static_login_form_passes() {
    let result = ScenarioRunner::new(RunOptions::default()).run(&load_one("login_basic.yaml"));

    assert!(result.passed, "mismatches: {:?}", result.frames[0].mismatches);
    assert_eq!(result.capture_count(), 1);
    let capture = &result.frames[0].captures[0];
    assert_eq!(capture.origin_url, "https://example.com/login");
    assert_eq!(capture.username, "bob");
}

#[test]
fn late_container_passes_with_subtree_scan() {
    let scenario = load_one("late_container.yaml");
    let result = ScenarioRunner::new(options(InsertionScan::Subtree)).run(&scenario);
    assert!(result.passed);
}

#[test]
fn late_container_is_missed_with_added_node_scan() {
    let scenario = load_one("late_container.yaml");
    let result = ScenarioRunner::new(options(InsertionScan::AddedNodeOnly)).run(&scenario);

    assert!(!result.passed);
    assert_eq!(result.capture_count(), 0);
    assert_eq!(
        result.frames[0].mismatches,
        vec!["expected 1 captures, got 0".to_string()]
    );
}

#[test]
fn sub_frames_are_observed_by_default() {
    let result = ScenarioRunner::new(RunOptions::default()).run(&load_one("frames.yaml"));

    assert!(result.passed);
    assert!(result.frames.iter().all(|f| f.observed));
    assert!(result.frames[0].captures.is_empty(), "search form has no password");
    assert_eq!(result.frames[1].captures[0].origin_url, "https://auth.example.com/frame");
}

#[test]
fn sub_frames_can_be_left_unobserved() {
    let opts = RunOptions {
        runs_on_subframes: false,
        ..RunOptions::default()
    };
    let result = ScenarioRunner::new(opts).run(&load_one("frames.yaml"));

    assert!(!result.passed);
    assert!(result.frames[0].observed);
    assert!(!result.frames[1].observed);
    assert!(result.frames[1].captures.is_empty());
}

#[test]
fn detach_step_stops_capture() {
    let scenario = Scenario {
        name: "detached".into(),
        frames: vec![FrameSpec {
            url: "https://example.com".into(),
            tree: vec![NodeSpec {
                tag: "form".into(),
                id: Some("f".into()),
                attrs: Default::default(),
                value: None,
                children: vec![NodeSpec {
                    tag: "input".into(),
                    id: None,
                    attrs: [("type".to_string(), "password".to_string())].into(),
                    value: Some("pw".into()),
                    children: vec![],
                }],
            }],
            steps: vec![
                Step::Submit { form: "f".into() },
                Step::Detach,
                Step::Submit { form: "f".into() },
            ],
            expect: vec![ExpectedCapture {
                password: Some("pw".into()),
                ..ExpectedCapture::default()
            }],
        }],
    };

    let result = ScenarioRunner::new(RunOptions::default()).run(&scenario);
    assert!(result.passed, "mismatches: {:?}", result.frames[0].mismatches);
    assert_eq!(result.capture_count(), 1);
}

#[test]
fn unknown_element_aborts_with_error() {
    let scenario = Scenario {
        name: "broken".into(),
        frames: vec![FrameSpec {
            url: "https://example.com".into(),
            tree: vec![],
            steps: vec![Step::Submit {
                form: "missing".into(),
            }],
            expect: vec![],
        }],
    };

    let result = ScenarioRunner::new(RunOptions::default()).run(&scenario);
    assert!(!result.passed);
    assert_eq!(result.error.as_deref(), Some("no element with id 'missing'"));
}

#[test]
fn scenario_without_frames_fails() {
    let scenario = Scenario {
        name: "empty".into(),
        frames: vec![],
    };
    let result = ScenarioRunner::new(RunOptions::default()).run(&scenario);
    assert!(!result.passed);
    assert_eq!(result.error.as_deref(), Some("scenario has no frames"));
}

#[test]
fn captures_are_forwarded_to_extra_sink() {
    let forward = RecordingSink::new();
    let runner = ScenarioRunner::new(RunOptions::default()).with_forward(Rc::new(forward.clone()));

    runner.run(&load_one("login_basic.yaml"));
    runner.run(&load_one("frames.yaml"));

    let usernames: Vec<_> = forward.captured().into_iter().map(|c| c.username).collect();
    assert_eq!(usernames, vec!["bob", "carol"]);
}

// =========================================================================
// Expectation matching
// =========================================================================

#[test]
fn compare_reports_each_difference() {
    let fields = vec![
        Field::new("text", "username", "bob"),
        Field::new("password", "pw", "hunter2"),
    ];
    let actual = vec![extract_credential("https://example.com", &fields).unwrap()];
    let expected = vec![ExpectedCapture {
        username: Some("alice".into()),
        password: Some("wrong".into()),
        fields: Some(
            [
                ("username".to_string(), "bob".to_string()),
                ("otp".to_string(), "123".to_string()),
            ]
            .into(),
        ),
    }];

    let mismatches = compare_captures(&expected, &actual);
    assert_eq!(
        mismatches,
        vec![
            "capture 0: username expected \"alice\", got \"bob\"".to_string(),
            "capture 0: password differs".to_string(),
            "capture 0: field 'otp' missing".to_string(),
        ]
    );
}

#[test]
fn compare_ignores_unspecified_parts() {
    let fields = vec![Field::new("password", "pw", "x")];
    let actual = vec![extract_credential("https://example.com", &fields).unwrap()];
    assert!(compare_captures(&[ExpectedCapture::default()], &actual).is_empty());
}

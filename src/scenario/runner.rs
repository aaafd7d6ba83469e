use std::rc::Rc;

use tracing::{debug, warn};

use crate::capture::capture_model::CapturedCredential;
use crate::error::ScenarioError;
use crate::observer::autofill_observer::AutofillObserver;
use crate::observer::subscription::InsertionScan;
use crate::page::document::{Document, NodeId};
use crate::page::host::PageHost;
use crate::page::synthetic::SyntheticPage;
use crate::scenario::scenario_model::{
    ExpectedCapture, FrameResult, FrameSpec, NodeSpec, Scenario, ScenarioResult, Step,
};
use crate::sink::sink::{AutofillSink, MultiSink, RecordingSink};
use crate::trace::logger::TraceLogger;

/// Knobs that apply to every frame of a replay.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scan: InsertionScan,

    /// Install the engine in sub-frames too, not only the main document
    pub runs_on_subframes: bool,

    /// JSONL trace destination
    pub trace_path: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scan: InsertionScan::default(),
            runs_on_subframes: true,
            trace_path: None,
        }
    }
}

/// Replays [`Scenario`]s against synthetic pages.
pub struct ScenarioRunner {
    options: RunOptions,
    forward: Option<Rc<dyn AutofillSink>>,
}

impl ScenarioRunner {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            forward: None,
        }
    }

    /// Also hand every capture to `sink` (e.g. a live autofill service).
    pub fn with_forward(mut self, sink: Rc<dyn AutofillSink>) -> Self {
        self.forward = Some(sink);
        self
    }

    /// Replay every frame and compare captures with expectations.
    pub fn run(&self, scenario: &Scenario) -> ScenarioResult {
        if scenario.frames.is_empty() {
            return ScenarioResult {
                scenario_name: scenario.name.clone(),
                passed: false,
                frames: vec![],
                error: Some(ScenarioError::NoFrames.to_string()),
            };
        }

        let mut frames = Vec::new();
        for (i, frame) in scenario.frames.iter().enumerate() {
            let observed = i == 0 || self.options.runs_on_subframes;
            match self.run_frame(frame, observed) {
                Ok(result) => frames.push(result),
                Err(e) => {
                    warn!(scenario = %scenario.name, url = %frame.url, error = %e, "replay aborted");
                    return ScenarioResult {
                        scenario_name: scenario.name.clone(),
                        passed: false,
                        frames,
                        error: Some(e.to_string()),
                    };
                }
            }
        }

        let passed = frames.iter().all(|f| f.mismatches.is_empty());
        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed,
            frames,
            error: None,
        }
    }

    fn run_frame(&self, frame: &FrameSpec, observed: bool) -> Result<FrameResult, ScenarioError> {
        let mut document = Document::new(&frame.url);
        let root = document.root();
        for spec in &frame.tree {
            let node = build_node(&mut document, spec);
            document
                .append_child(root, node)
                .map_err(|source| ScenarioError::Dom { step: 0, source })?;
        }

        let mut page = SyntheticPage::new(document);
        let recording = RecordingSink::new();

        let mut observer = if observed {
            let mut sink = MultiSink::new().with(recording.clone());
            if let Some(forward) = &self.forward {
                sink = sink.with(Rc::clone(forward));
            }
            let tracer = TraceLogger::from_path(self.options.trace_path.as_deref());
            Some(AutofillObserver::install(&mut page, self.options.scan, sink, tracer))
        } else {
            debug!(url = %frame.url, "sub-frame left unobserved");
            None
        };

        for (i, step) in frame.steps.iter().enumerate() {
            let step_no = i + 1;
            match step {
                Step::Insert { parent, node } => {
                    let parent = match parent {
                        Some(id) => resolve(&page, id)?,
                        None => page.root(),
                    };
                    let node = build_node(page.document_mut(), node);
                    page.insert(parent, node)
                        .map_err(|source| ScenarioError::Dom { step: step_no, source })?;
                }
                Step::Remove { target } => {
                    let target = resolve(&page, target)?;
                    page.remove(target)
                        .map_err(|source| ScenarioError::Dom { step: step_no, source })?;
                }
                Step::SetValue { target, value } => {
                    let target = resolve(&page, target)?;
                    page.set_value(target, value)
                        .map_err(|source| ScenarioError::Dom { step: step_no, source })?;
                }
                Step::Submit { form } => {
                    let form = resolve(&page, form)?;
                    page.submit(form);
                }
                Step::Detach => {
                    if let Some(obs) = observer.as_mut() {
                        obs.detach(&mut page);
                    }
                }
            }

            match observer.as_mut() {
                Some(obs) => {
                    obs.run_until_idle(&mut page);
                }
                None => {
                    while page.next_event().is_some() {}
                }
            }
        }

        let captures = recording.take();
        let mismatches = compare_captures(&frame.expect, &captures);

        Ok(FrameResult {
            url: frame.url.clone(),
            observed,
            captures,
            mismatches,
        })
    }
}

/// Create `spec` and its children as a detached subtree.
fn build_node(document: &mut Document, spec: &NodeSpec) -> NodeId {
    let mut attrs = spec.attrs.clone();
    if let Some(id) = &spec.id {
        attrs.insert("id".to_string(), id.clone());
    }

    let node = document.create_element(&spec.tag, attrs);
    if let Some(value) = &spec.value {
        // Freshly created, so the node is known to exist.
        let _ = document.set_value(node, value);
    }

    for child in &spec.children {
        let child = build_node(document, child);
        let _ = document.append_child(node, child);
    }
    node
}

fn resolve(page: &SyntheticPage, id: &str) -> Result<NodeId, ScenarioError> {
    page.document()
        .by_id(id)
        .ok_or_else(|| ScenarioError::UnknownElement(id.to_string()))
}

/// Describe every way `actual` differs from `expected`.
pub fn compare_captures(expected: &[ExpectedCapture], actual: &[CapturedCredential]) -> Vec<String> {
    let mut mismatches = Vec::new();

    if expected.len() != actual.len() {
        mismatches.push(format!(
            "expected {} captures, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (want, got)) in expected.iter().zip(actual).enumerate() {
        if let Some(username) = &want.username {
            if *username != got.username {
                mismatches.push(format!(
                    "capture {}: username expected \"{}\", got \"{}\"",
                    i, username, got.username
                ));
            }
        }
        if let Some(password) = &want.password {
            if *password != got.password {
                mismatches.push(format!("capture {}: password differs", i));
            }
        }
        if let Some(fields) = &want.fields {
            let mut names: Vec<_> = fields.keys().collect();
            names.sort();
            for name in names {
                let value = &fields[name];
                match got.fields.get(name) {
                    Some(v) if v == value => {}
                    Some(v) => mismatches.push(format!(
                        "capture {}: field '{}' expected \"{}\", got \"{}\"",
                        i, name, value, v
                    )),
                    None => {
                        mismatches.push(format!("capture {}: field '{}' missing", i, name))
                    }
                }
            }
        }
    }

    mismatches
}

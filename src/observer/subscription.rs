use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::page::document::{MutationRecord, NodeId};
use crate::page::host::{ListenerId, ObserveOptions, ObserverId, PageHost};

/// How far an added node is searched for forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InsertionScan {
    /// Only the added node itself; a form nested in an inserted container is missed.
    AddedNodeOnly,

    /// The added node and all of its descendants.
    #[default]
    Subtree,
}

/// Keeps one submit listener on every form under the document root.
#[derive(Debug)]
pub struct FormSubscriptionManager {
    scan: InsertionScan,
    attached: HashMap<NodeId, ListenerId>,
    observer: Option<ObserverId>,
}

impl FormSubscriptionManager {
    pub fn new(scan: InsertionScan) -> Self {
        Self {
            scan,
            attached: HashMap::new(),
            observer: None,
        }
    }

    pub fn scan(&self) -> InsertionScan {
        self.scan
    }

    /// Attach to every existing form, then watch the whole document for new ones.
    pub fn install(&mut self, host: &mut dyn PageHost) {
        for form in host.forms() {
            self.attach(host, form);
        }

        let options = ObserveOptions {
            child_list: true,
            subtree: true,
        };
        let root = host.root();
        match host.observe(root, options) {
            Ok(id) => self.observer = Some(id),
            Err(e) => debug!(error = %e, "could not observe document root"),
        }
    }

    /// Attach to forms among the added nodes of a mutation batch.
    ///
    /// Returns the forms that got a listener from this batch.
    pub fn handle_mutations(
        &mut self,
        host: &mut dyn PageHost,
        records: &[MutationRecord],
    ) -> Vec<NodeId> {
        let mut newly_attached = Vec::new();

        for record in records {
            for &node in &record.added_nodes {
                let mut candidates = vec![node];
                if self.scan == InsertionScan::Subtree {
                    candidates.extend(host.descendants(node));
                }

                for candidate in candidates {
                    if host.is_form(candidate) && self.attach(host, candidate) {
                        newly_attached.push(candidate);
                    }
                }
            }
        }

        newly_attached
    }

    /// Attach a listener to `form` unless it already has one.
    pub fn attach(&mut self, host: &mut dyn PageHost, form: NodeId) -> bool {
        if self.attached.contains_key(&form) {
            return false;
        }
        match host.add_submit_listener(form) {
            Ok(listener) => {
                debug!(form = form.0, "attached submit listener");
                self.attached.insert(form, listener);
                true
            }
            Err(e) => {
                debug!(form = form.0, error = %e, "skipped form");
                false
            }
        }
    }

    pub fn is_attached(&self, form: NodeId) -> bool {
        self.attached.contains_key(&form)
    }

    pub fn owns_listener(&self, listener: ListenerId) -> bool {
        self.attached.values().any(|l| *l == listener)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn observer(&self) -> Option<ObserverId> {
        self.observer
    }

    /// Stop observing and drop every listener this manager added.
    pub fn detach(&mut self, host: &mut dyn PageHost) {
        if let Some(id) = self.observer.take() {
            host.disconnect(id);
        }
        for (_, listener) in self.attached.drain() {
            host.remove_submit_listener(listener);
        }
    }
}

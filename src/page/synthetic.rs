use std::collections::{HashMap, VecDeque};

use crate::capture::capture_model::Field;
use crate::error::{DomError, HostError};
use crate::page::document::{Document, MutationRecord, NodeId};
use crate::page::host::{ListenerId, ObserveOptions, ObserverId, PageEvent, PageHost};

#[derive(Debug)]
struct ObserverRegistration {
    id: ObserverId,
    target: NodeId,
    options: ObserveOptions,
    batch: Vec<MutationRecord>,
}

/// A page host backed by an in-memory [`Document`].
///
/// Models the event loop of a real page closely enough for the engine:
/// mutation records are batched per observer and flushed at a checkpoint
/// that always runs before the next queued task, so an observer sees an
/// insertion before any submit that was queued after it.
#[derive(Debug)]
pub struct SyntheticPage {
    document: Document,
    listeners: Vec<(ListenerId, NodeId)>,
    observers: Vec<ObserverRegistration>,
    tasks: VecDeque<NodeId>,
    ready: VecDeque<PageEvent>,
    next_id: u64,
}

impl SyntheticPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            listeners: Vec::new(),
            observers: Vec::new(),
            tasks: VecDeque::new(),
            ready: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct tree access. Changes made here are still reported to observers.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn create_element(&mut self, tag: &str, attrs: HashMap<String, String>) -> NodeId {
        self.document.create_element(tag, attrs)
    }

    pub fn insert(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.document.append_child(parent, child)
    }

    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.document.remove(node)
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.document.set_value(node, value)
    }

    /// Queue a submission of `form` as a task.
    ///
    /// Listeners run when the task is reached in [`PageHost::next_event`];
    /// a form that is disconnected by then does not fire.
    pub fn submit(&mut self, form: NodeId) {
        self.tasks.push_back(form);
    }

    pub fn listener_count(&self, form: NodeId) -> usize {
        self.listeners.iter().filter(|(_, f)| *f == form).count()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn route_records(&mut self) {
        let records = self.document.take_records();
        if records.is_empty() {
            return;
        }

        for reg in &mut self.observers {
            if !reg.options.child_list {
                continue;
            }
            for record in &records {
                let in_scope = record.target == reg.target
                    || (reg.options.subtree
                        && self.document.is_inclusive_ancestor(reg.target, record.target));
                if in_scope {
                    reg.batch.push(record.clone());
                }
            }
        }
    }
}

impl PageHost for SyntheticPage {
    fn location(&self) -> &str {
        self.document.url()
    }

    fn root(&self) -> NodeId {
        self.document.root()
    }

    fn forms(&self) -> Vec<NodeId> {
        self.document.forms()
    }

    fn is_form(&self, node: NodeId) -> bool {
        self.document.tag_name(node) == Some("form")
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.document.descendants(node)
    }

    fn form_fields(&self, form: NodeId) -> Vec<Field> {
        self.document
            .listed_elements(form)
            .into_iter()
            .filter_map(|node| self.document.field(node))
            .collect()
    }

    fn add_submit_listener(&mut self, form: NodeId) -> Result<ListenerId, HostError> {
        match self.document.tag_name(form) {
            None => return Err(HostError::UnknownNode(form)),
            Some("form") => {}
            Some(_) => return Err(HostError::NotAForm(form)),
        }
        let id = ListenerId(self.allocate_id());
        self.listeners.push((id, form));
        Ok(id)
    }

    fn remove_submit_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|(id, _)| *id != listener);
    }

    fn observe(
        &mut self,
        target: NodeId,
        options: ObserveOptions,
    ) -> Result<ObserverId, HostError> {
        if self.document.element(target).is_none() {
            return Err(HostError::UnknownNode(target));
        }
        // Changes made before registration are not reported.
        self.route_records();

        let id = ObserverId(self.allocate_id());
        self.observers.push(ObserverRegistration {
            id,
            target,
            options,
            batch: Vec::new(),
        });
        Ok(id)
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.route_records();
        self.observers.retain(|reg| reg.id != observer);
    }

    fn next_event(&mut self) -> Option<PageEvent> {
        if let Some(event) = self.ready.pop_front() {
            return Some(event);
        }

        // Checkpoint: pending mutation batches go out before the next task.
        self.route_records();
        if let Some(reg) = self.observers.iter_mut().find(|r| !r.batch.is_empty()) {
            return Some(PageEvent::Mutations {
                observer: reg.id,
                records: std::mem::take(&mut reg.batch),
            });
        }

        while let Some(form) = self.tasks.pop_front() {
            if !self.document.is_connected(form) {
                continue;
            }
            let events = self
                .listeners
                .iter()
                .filter(|(_, f)| *f == form)
                .map(|(listener, form)| PageEvent::Submit {
                    form: *form,
                    listener: *listener,
                });
            self.ready.extend(events);

            if let Some(event) = self.ready.pop_front() {
                return Some(event);
            }
        }

        None
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use crate::capture::capture_model::CapturedCredential;

/// The external autofill subsystem that stores captured credentials.
///
/// Fire-and-forget: called at most once per submission, only with a
/// non-empty password, and nothing is expected back.
pub trait AutofillSink {
    fn on_form_submitted(&self, credential: CapturedCredential);
}

/// Keeps every capture in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    captured: Rc<RefCell<Vec<CapturedCredential>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Vec<CapturedCredential> {
        self.captured.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.captured.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<CapturedCredential> {
        std::mem::take(&mut *self.captured.borrow_mut())
    }
}

impl AutofillSink for RecordingSink {
    fn on_form_submitted(&self, credential: CapturedCredential) {
        self.captured.borrow_mut().push(credential);
    }
}

/// Forwards each capture to every inner sink, in order.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn AutofillSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl AutofillSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AutofillSink for MultiSink {
    fn on_form_submitted(&self, credential: CapturedCredential) {
        for sink in &self.sinks {
            sink.on_form_submitted(credential.clone());
        }
    }
}

impl<S: AutofillSink + ?Sized> AutofillSink for Box<S> {
    fn on_form_submitted(&self, credential: CapturedCredential) {
        (**self).on_form_submitted(credential)
    }
}

impl<S: AutofillSink + ?Sized> AutofillSink for Rc<S> {
    fn on_form_submitted(&self, credential: CapturedCredential) {
        (**self).on_form_submitted(credential)
    }
}

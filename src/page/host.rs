use crate::capture::capture_model::Field;
use crate::error::HostError;
use crate::page::document::{MutationRecord, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// What a structural-change observer wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub subtree: bool,
}

/// An event the host delivers to whoever registered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A batch of child-list changes for one observer.
    Mutations {
        observer: ObserverId,
        records: Vec<MutationRecord>,
    },

    /// A form was submitted and `listener` is registered on it.
    Submit { form: NodeId, listener: ListenerId },
}

/// Capabilities the capture engine needs from the page it runs in.
///
/// A browser binding and the in-memory [`SyntheticPage`] both implement
/// this; the engine never touches a concrete page API.
///
/// [`SyntheticPage`]: crate::page::synthetic::SyntheticPage
pub trait PageHost {
    /// URL of the page, reported as the credential origin.
    fn location(&self) -> &str;

    fn root(&self) -> NodeId;

    /// Forms currently in the document, in document order.
    fn forms(&self) -> Vec<NodeId>;

    fn is_form(&self, node: NodeId) -> bool;

    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    /// Snapshot of the form's listed elements at this instant.
    fn form_fields(&self, form: NodeId) -> Vec<Field>;

    fn add_submit_listener(&mut self, form: NodeId) -> Result<ListenerId, HostError>;

    fn remove_submit_listener(&mut self, listener: ListenerId);

    fn observe(&mut self, target: NodeId, options: ObserveOptions)
    -> Result<ObserverId, HostError>;

    fn disconnect(&mut self, observer: ObserverId);

    /// Next pending event, or `None` when the page is idle.
    fn next_event(&mut self) -> Option<PageEvent>;
}

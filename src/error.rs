use thiserror::Error;

use crate::page::document::NodeId;

/// Failures raised by the arena document when a tree operation is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Inserting `child` under `parent` would create a cycle or target the document root
    #[error("cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {0:?} has no parent")]
    Detached(NodeId),
}

/// Failures a page host may report when the engine registers against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("node {0:?} is not a form element")]
    NotAForm(NodeId),

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
}

/// Failures while loading or replaying a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("scenario step {step}: {source}")]
    Dom {
        step: usize,
        #[source]
        source: DomError,
    },

    #[error("no element with id '{0}'")]
    UnknownElement(String),

    #[error("scenario has no frames")]
    NoFrames,
}

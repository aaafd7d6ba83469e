//! Credential capture for pages whose forms come and go.
//!
//! [`observer::autofill_observer::AutofillObserver`] keeps a submit listener
//! on every form of a page (including forms inserted after load) and, on
//! submission, runs [`capture::extractor::extract_credential`] and hands the
//! result to an [`sink::sink::AutofillSink`]. Pages are reached through the
//! [`page::host::PageHost`] capability; [`page::synthetic::SyntheticPage`]
//! is an in-memory implementation used for scenario replay and tests.

pub mod capture;
pub mod cli;
pub mod error;
pub mod observer;
pub mod page;
pub mod report;
pub mod scenario;
pub mod sink;
pub mod trace;

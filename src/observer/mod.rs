pub mod autofill_observer;
pub mod subscription;

//! Repository implementations.
//!
//! Only the in-memory `local` backend is built in; the persistence store
//! proper is external to this service and reachable through the same trait
//! seam.

pub mod local;

pub use local::LocalRepository;

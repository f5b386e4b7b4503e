//! Provider descriptors (data), the closed set of built-in providers, and the registry.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the backend path
//! identifier, display name, and capability flags. `kind` enumerates the providers the backend
//! ships with. `registry` resolves identifiers to descriptors for the coordinator.

pub mod descriptor;
pub mod kind;
pub mod registry;

pub use descriptor::*;
pub use kind::*;
pub use registry::*;

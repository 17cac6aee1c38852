//! Port/interface correlation and component assembly.
//!
//! [`Correlator`] collapses API records to one per interface name;
//! [`assemble`] groups the survivors into [`ComponentModel`]s.

mod component;
mod correlate;

pub use component::{ComponentModel, Port, PortAccess, RunnableUnit, assemble};
pub use correlate::Correlator;

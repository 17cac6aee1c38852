//! Per-node identifier sources.
//!
//! Every structural node of the generated document carries a `UUID`
//! attribute. The value is opaque to the generator, so it is drawn from an
//! [`IdSource`] chosen by the caller.

use uuid::Uuid;

/// Supplies one globally unique token per emitted node.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs rendered as 32 lower-case hex digits without dashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids (`id-1`, `id-2`, ...) for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("id-{}", self.counter)
    }
}

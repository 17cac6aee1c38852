//! PortInterfaceCorrelator: one record per interface name.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::{ApiRecord, Direction};

/// Direction and owner of an explicitly declared port.
#[derive(Clone, Debug, PartialEq, Eq)]
struct DeclaredPort {
    direction: Direction,
    component: String,
}

/// How an incoming record landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Merge {
    Inserted,
    Replaced,
    /// The earlier record stays; the incoming one only filled its gaps.
    Kept,
}

/// Merges records from explicit port declarations and runnable accesses.
///
/// Keyed by interface name; a kept record is replaced only when its task is
/// the default label and the incoming one's is not. Replacement keeps the
/// position of the first record.
#[derive(Debug)]
pub struct Correlator {
    default_component: String,
    default_task: String,
    records: IndexMap<String, ApiRecord>,
    ports: FxHashMap<String, DeclaredPort>,
}

impl Correlator {
    pub fn new(default_component: impl Into<String>, default_task: impl Into<String>) -> Self {
        Self {
            default_component: default_component.into(),
            default_task: default_task.into(),
            records: IndexMap::new(),
            ports: FxHashMap::default(),
        }
    }

    /// A record from an explicit port declaration. Its direction and
    /// component are authoritative for the interface, until a later
    /// declaration replaces the kept record.
    pub fn add_port(&mut self, record: ApiRecord) {
        let declared = DeclaredPort {
            direction: record.direction,
            component: record.component.clone(),
        };
        let interface = record.interface.clone();
        match self.merge(record) {
            Merge::Kept => {
                self.ports.entry(interface).or_insert(declared);
            }
            Merge::Inserted | Merge::Replaced => {
                self.ports.insert(interface, declared);
            }
        }
    }

    /// A record derived from a runnable's access point.
    pub fn add_access(&mut self, record: ApiRecord) {
        self.merge(record);
    }

    fn merge(&mut self, record: ApiRecord) -> Merge {
        let Some(kept) = self.records.get_mut(&record.interface) else {
            self.records.insert(record.interface.clone(), record);
            return Merge::Inserted;
        };

        if kept.task == self.default_task && record.task != self.default_task {
            tracing::debug!(
                interface = %record.interface,
                task = %record.task,
                "replacing default-task record"
            );
            let component = std::mem::take(&mut kept.component);
            let init_value = kept.init_value.take();
            *kept = record;
            if kept.component == self.default_component {
                kept.component = component;
            }
            if kept.init_value.is_none() {
                kept.init_value = init_value;
            }
            Merge::Replaced
        } else {
            if kept.component == self.default_component && record.component != self.default_component {
                kept.component = record.component;
            }
            if kept.init_value.is_none() {
                kept.init_value = record.init_value;
            }
            Merge::Kept
        }
    }

    /// Correlated records in first-occurrence order.
    ///
    /// Interfaces with a declared port take the port's direction, and the
    /// port's component where the record was left at the default.
    pub fn finish(self) -> Vec<ApiRecord> {
        let Self {
            default_component,
            records,
            ports,
            ..
        } = self;
        records
            .into_values()
            .map(|mut record| {
                if let Some(port) = ports.get(&record.interface) {
                    record.direction = port.direction;
                    if record.component == default_component {
                        record.component = port.component.clone();
                    }
                }
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{DEFAULT_COMPONENT, DEFAULT_TASK};

    fn correlator() -> Correlator {
        Correlator::new(DEFAULT_COMPONENT, DEFAULT_TASK)
    }

    #[test]
    fn test_named_task_wins_over_default() {
        let mut c = correlator();
        c.add_port(ApiRecord::new("Brake", "uint8", Direction::Send, "BrakeSWC", DEFAULT_TASK));
        c.add_access(ApiRecord::new("Brake", "uint8", Direction::Send, "BrakeSWC", "Brake10ms"));

        let records = c.finish();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task, "Brake10ms");
    }

    #[test]
    fn test_first_named_task_kept() {
        let mut c = correlator();
        c.add_access(ApiRecord::new("Brake", "uint8", Direction::Send, "A", "Brake10ms"));
        c.add_access(ApiRecord::new("Brake", "uint8", Direction::Send, "A", "Brake20ms"));
        c.add_access(ApiRecord::new("Brake", "uint8", Direction::Send, "A", DEFAULT_TASK));

        assert_eq!(c.finish()[0].task, "Brake10ms");
    }

    #[test]
    fn test_port_fills_direction_and_component() {
        let mut c = correlator();
        c.add_access(ApiRecord::new("Speed", "uint16", Direction::Send, DEFAULT_COMPONENT, "10ms"));
        c.add_port(ApiRecord::new("Speed", "uint16", Direction::Receive, "Dash", DEFAULT_TASK));

        let records = c.finish();
        assert_eq!(
            records,
            [ApiRecord::new("Speed", "uint16", Direction::Receive, "Dash", "10ms")]
        );
    }

    #[test]
    fn test_replacing_declaration_keeps_its_own_direction() {
        let mut c = correlator();
        c.add_port(ApiRecord::new("Brake", "uint8", Direction::Send, "A", DEFAULT_TASK));
        c.add_port(ApiRecord::new("Brake", "uint8", Direction::Receive, "A", "Brake10ms"));
        c.add_port(ApiRecord::new("Brake", "uint8", Direction::Send, "A", "Brake20ms"));

        assert_eq!(
            c.finish(),
            [ApiRecord::new("Brake", "uint8", Direction::Receive, "A", "Brake10ms")]
        );
    }

    #[test]
    fn test_replacement_keeps_first_position() {
        let mut c = correlator();
        c.add_port(ApiRecord::new("A", "uint8", Direction::Send, "C", DEFAULT_TASK));
        c.add_port(ApiRecord::new("B", "uint8", Direction::Send, "C", DEFAULT_TASK));
        c.add_access(ApiRecord::new("A", "uint8", Direction::Send, "C", "T1"));

        let names: Vec<_> = c.finish().into_iter().map(|r| r.interface).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_init_value_survives_replacement() {
        let mut c = correlator();
        c.add_port(
            ApiRecord::new("Speed", "uint16", Direction::Send, "C", DEFAULT_TASK).with_init_value("7"),
        );
        c.add_access(ApiRecord::new("Speed", "uint16", Direction::Send, "C", "10ms"));

        let records = c.finish();
        assert_eq!(records[0].init_value.as_deref(), Some("7"));
        assert_eq!(records[0].task, "10ms");
    }
}

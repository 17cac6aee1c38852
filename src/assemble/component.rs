//! ComponentAssembler: components, their ports, and one runnable per task.

use indexmap::IndexMap;

use crate::base::{ApiRecord, Direction};

/// A port prototype on a component. Ports are named after the interface
/// they carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub interface: String,
}

/// One data access performed by a runnable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortAccess {
    pub port: String,
    pub direction: Direction,
    pub interface: String,
}

impl PortAccess {
    /// `IN_<port>_<iface>` or `OUT_<port>_<iface>`.
    pub fn variable_access_name(&self) -> String {
        let prefix = match self.direction {
            Direction::Receive => "IN",
            Direction::Send => "OUT",
        };
        format!("{prefix}_{}_{}", self.port, self.interface)
    }
}

/// The runnable synthesized for one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnableUnit {
    /// Same as the task name.
    pub name: String,
    pub accesses: Vec<PortAccess>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentModel {
    pub name: String,
    pub ports: Vec<Port>,
    pub runnables: Vec<RunnableUnit>,
    /// Task name -> index into `runnables`.
    task_index: IndexMap<String, usize>,
}

impl ComponentModel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ports: Vec::new(),
            runnables: Vec::new(),
            task_index: IndexMap::new(),
        }
    }

    fn add(&mut self, record: &ApiRecord) {
        self.ports.push(Port {
            name: record.interface.clone(),
            direction: record.direction,
            interface: record.interface.clone(),
        });

        let next = self.runnables.len();
        let idx = *self.task_index.entry(record.task.clone()).or_insert(next);
        if idx == next {
            self.runnables.push(RunnableUnit {
                name: record.task.clone(),
                accesses: Vec::new(),
            });
        }
        self.runnables[idx].accesses.push(PortAccess {
            port: record.interface.clone(),
            direction: record.direction,
            interface: record.interface.clone(),
        });
    }

    /// The runnable synthesized for `task`.
    pub fn runnable_for_task(&self, task: &str) -> Option<&RunnableUnit> {
        self.task_index.get(task).map(|&idx| &self.runnables[idx])
    }

    /// `(task, runnable)` pairs in first-occurrence order.
    pub fn tasks(&self) -> impl Iterator<Item = (&str, &RunnableUnit)> {
        self.task_index
            .iter()
            .map(|(task, &idx)| (task.as_str(), &self.runnables[idx]))
    }
}

/// Group correlated records by component, then by task.
///
/// Components and runnables appear in first-occurrence order of `records`.
pub fn assemble(records: &[ApiRecord]) -> Vec<ComponentModel> {
    let mut components: IndexMap<&str, ComponentModel> = IndexMap::new();
    for record in records {
        components
            .entry(record.component.as_str())
            .or_insert_with(|| ComponentModel::new(&record.component))
            .add(record);
    }

    let components: Vec<_> = components.into_values().collect();
    for component in &components {
        tracing::debug!(
            component = %component.name,
            ports = component.ports.len(),
            runnables = component.runnables.len(),
            "component assembled"
        );
    }
    components
}

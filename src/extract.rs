//! ModelExtractor: ARXML document -> workbook rows.
//!
//! Types are recognized by node shape in the application hierarchy, API
//! records by ports and by each runnable's variable accesses. Both record
//! streams go through the same [`Correlator`] as generation, so extracting a
//! generated document gives back the rows it was generated from.

use rustc_hash::FxHashMap;

use crate::assemble::Correlator;
use crate::base::{
    ApiRecord, Direction, StructField, TypeBody, TypeCategory, TypeDefinition, paths,
};
use crate::catalog::{APIS_HEADER, TYPES_HEADER};
use crate::config::Config;
use crate::document::{Document, Node, NodeId};
use crate::error::{Diagnostics, Result};
use crate::generate::tags;
use crate::resolve::ArrayDefinition;
use crate::tabular::{Cell, Sheet, Workbook};

/// Type reference written for an API whose interface cannot be found.
pub const UNKNOWN_TYPE: &str = "UnknownType";

/// Rows recovered from a document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub types: Vec<TypeDefinition>,
    pub apis: Vec<ApiRecord>,
    pub diagnostics: Diagnostics,
}

impl Extraction {
    /// Lay the rows out as the Types and APIs sheets.
    pub fn to_workbook(&self, config: &Config) -> Workbook {
        let mut types = Sheet::new(&config.types_sheet).with_row(TYPES_HEADER);
        for def in &self.types {
            for row in type_rows(def) {
                types.push_row(row);
            }
        }

        let mut apis = Sheet::new(&config.apis_sheet).with_row(APIS_HEADER);
        for record in &self.apis {
            apis.push_row([
                Cell::from(record.interface.as_str()),
                Cell::from(record.type_ref.as_str()),
                Cell::from(record.direction.code()),
                Cell::from(record.component.as_str()),
                Cell::from(record.task.as_str()),
                Cell::from(record.init_value.as_deref()),
            ]);
        }

        Workbook::new().with_sheet(types).with_sheet(apis)
    }
}

fn type_rows(def: &TypeDefinition) -> Vec<[Cell; 4]> {
    let name = Cell::from(def.name.as_str());
    let category = Cell::from(def.category().as_str());
    match &def.body {
        TypeBody::Basic { alias } => {
            vec![[name, category, Cell::Empty, Cell::from(alias.as_deref())]]
        }
        TypeBody::Array { definition } => {
            vec![[name, category, Cell::Empty, Cell::from(definition.as_deref())]]
        }
        TypeBody::Struct { fields } if fields.is_empty() => {
            vec![[name, category, Cell::Empty, Cell::Empty]]
        }
        TypeBody::Struct { fields } => {
            let mut rows = Vec::with_capacity(fields.len());
            let mut head = Some((name, category));
            for field in fields {
                let (name, category) = head.take().unwrap_or_default();
                rows.push([
                    name,
                    category,
                    Cell::from(field.name.as_str()),
                    Cell::from(field.type_name.as_str()),
                ]);
            }
            rows
        }
    }
}

/// Recover type and API rows from `document`.
pub fn extract(document: &Document, config: &Config) -> Result<Extraction> {
    let mut extractor = Extractor::new(document, config);
    let types = extractor.types();
    let apis = extractor.apis();
    tracing::info!(types = types.len(), apis = apis.len(), "model extracted");
    Ok(Extraction {
        types,
        apis,
        diagnostics: extractor.diagnostics,
    })
}

/// What an interface declares about its single data element.
#[derive(Debug, Default)]
struct InterfaceInfo {
    type_ref: Option<String>,
    init_value: Option<String>,
}

struct Extractor<'d> {
    doc: &'d Document,
    config: &'d Config,
    interfaces: FxHashMap<String, InterfaceInfo>,
    diagnostics: Diagnostics,
}

impl<'d> Extractor<'d> {
    fn new(doc: &'d Document, config: &'d Config) -> Self {
        let mut interfaces = FxHashMap::default();
        for iface in doc.elements(tags::SENDER_RECEIVER_INTERFACE) {
            let Some(name) = doc.short_name(iface.id) else {
                continue;
            };
            let prototype = doc.descendants(iface.id, tags::VARIABLE_DATA_PROTOTYPE);
            let info = prototype.first().map_or_else(InterfaceInfo::default, |p| InterfaceInfo {
                type_ref: doc
                    .child_text(p.id, tags::TYPE_TREF)
                    .map(|path| paths::last_segment(path).to_string()),
                init_value: doc
                    .child_path(
                        p.id,
                        &[tags::INIT_VALUE, tags::NUMERICAL_VALUE_SPECIFICATION, tags::VALUE],
                    )
                    .and_then(|v| v.text.clone()),
            });
            interfaces.entry(name.to_string()).or_insert(info);
        }

        Self {
            doc,
            config,
            interfaces,
            diagnostics: Diagnostics::new(),
        }
    }

    fn types(&mut self) -> Vec<TypeDefinition> {
        let doc = self.doc;
        let mut nodes: Vec<&Node> = [
            tags::APPLICATION_PRIMITIVE,
            tags::APPLICATION_ARRAY,
            tags::APPLICATION_RECORD,
        ]
        .iter()
        .flat_map(|tag| doc.elements(tag))
        .collect();
        nodes.sort_by_key(|node| node.id);

        let mut types = Vec::with_capacity(nodes.len());
        for node in nodes {
            let Some(name) = doc.short_name(node.id) else {
                self.diagnostics.warn(&node.tag, "type node without SHORT-NAME skipped");
                continue;
            };
            let def = match node.tag.as_str() {
                tags::APPLICATION_ARRAY => self.array_type(name, node.id),
                tags::APPLICATION_RECORD => self.record_type(name, node.id),
                _ => TypeDefinition::basic(name, None),
            };
            tracing::debug!(name, category = %def.category(), "type extracted");
            types.push(def);
        }
        types
    }

    fn array_type(&mut self, name: &str, id: NodeId) -> TypeDefinition {
        let doc = self.doc;
        let element = doc.child(id, tags::ELEMENT);
        let base = element
            .and_then(|e| doc.child_text(e.id, tags::TYPE_TREF))
            .map(paths::last_segment);
        let size = element
            .and_then(|e| doc.child_text(e.id, tags::MAX_NUMBER_OF_ELEMENTS))
            .and_then(|s| s.trim().parse::<u64>().ok());

        match (base, size) {
            (Some(base), Some(size)) => {
                let definition = ArrayDefinition {
                    base: base.to_string(),
                    size,
                };
                TypeDefinition::array(name, &definition.to_string())
            }
            _ => {
                self.diagnostics
                    .warn(name, "array without element type or size, definition left blank");
                TypeDefinition::new(name, TypeCategory::Array)
            }
        }
    }

    fn record_type(&mut self, name: &str, id: NodeId) -> TypeDefinition {
        let doc = self.doc;
        let mut fields = Vec::new();
        for element in doc.descendants(id, tags::APPLICATION_RECORD_ELEMENT) {
            let field_name = doc.short_name(element.id);
            let field_type = doc
                .child_text(element.id, tags::TYPE_TREF)
                .map(paths::last_segment);
            match (field_name, field_type) {
                (Some(field), Some(ty)) => fields.push(StructField::new(field, ty)),
                _ => self
                    .diagnostics
                    .warn(name, "record element without name or type skipped"),
            }
        }
        TypeDefinition::structure(name, fields)
    }

    fn apis(&mut self) -> Vec<ApiRecord> {
        let mut correlator =
            Correlator::new(&self.config.default_component, &self.config.default_task);

        for record in self.port_records() {
            correlator.add_port(record);
        }
        for record in self.access_records() {
            correlator.add_access(record);
        }
        correlator.finish()
    }

    /// One record per port, with the default task.
    fn port_records(&mut self) -> Vec<ApiRecord> {
        let doc = self.doc;
        let mut ports: Vec<&Node> = doc
            .elements(tags::P_PORT)
            .into_iter()
            .chain(doc.elements(tags::R_PORT))
            .collect();
        ports.sort_by_key(|node| node.id);

        let mut records = Vec::with_capacity(ports.len());
        for port in ports {
            let direction = if port.is(tags::P_PORT) {
                Direction::Send
            } else {
                Direction::Receive
            };
            let interface = doc
                .descendants(port.id, tags::DATA_ELEMENT_REF)
                .first()
                .and_then(|r| r.text.as_deref())
                .and_then(|path| self.interface_name(path))
                .or_else(|| doc.short_name(port.id).map(str::to_string));
            let Some(interface) = interface else {
                self.diagnostics.warn(&port.tag, "port without interface skipped");
                continue;
            };
            let component = self.component_of(port.id);
            let task = self.config.default_task.clone();
            records.push(self.record(interface, direction, component, task));
        }
        records
    }

    /// One record per variable access, with the task of the owning runnable.
    fn access_records(&mut self) -> Vec<ApiRecord> {
        let doc = self.doc;
        let tasks = self.runnable_tasks();

        let mut records = Vec::new();
        for runnable in doc.elements(tags::RUNNABLE_ENTITY) {
            let Some(runnable_name) = doc.short_name(runnable.id) else {
                continue;
            };
            let task = tasks
                .get(&runnable.id)
                .cloned()
                .unwrap_or_else(|| runnable_name.to_string());

            for access in doc.descendants(runnable.id, tags::VARIABLE_ACCESS) {
                let direction = if doc.ancestor_with_tag(access.id, tags::SEND_POINT).is_some() {
                    Direction::Send
                } else if doc.ancestor_with_tag(access.id, tags::RECEIVE_POINT).is_some() {
                    Direction::Receive
                } else {
                    continue;
                };

                let port_ref = doc
                    .descendants(access.id, tags::PORT_PROTOTYPE_REF)
                    .first()
                    .and_then(|r| r.text.as_deref());
                let interface = doc
                    .descendants(access.id, tags::TARGET_DATA_PROTOTYPE_REF)
                    .first()
                    .and_then(|r| r.text.as_deref())
                    .and_then(|path| self.interface_name(path))
                    .or_else(|| port_ref.map(|p| paths::last_segment(p).to_string()));
                let Some(interface) = interface else {
                    self.diagnostics
                        .warn(runnable_name, "variable access without target skipped");
                    continue;
                };

                let component = port_ref
                    .and_then(|path| doc.resolve_reference(path))
                    .and_then(|port| doc.ancestor_with_tag(port, tags::SW_COMPONENT))
                    .or_else(|| doc.ancestor_with_tag(runnable.id, tags::SW_COMPONENT))
                    .and_then(|swc| doc.short_name(swc.id))
                    .map_or_else(|| self.config.default_component.clone(), str::to_string);

                records.push(self.record(interface, direction, component, task.clone()));
            }
        }
        records
    }

    /// Runnable node -> task name, from TASK-EVENTs.
    fn runnable_tasks(&self) -> FxHashMap<NodeId, String> {
        let doc = self.doc;
        let mut tasks = FxHashMap::default();
        for event in doc.elements(tags::TASK_EVENT) {
            let runnable = doc
                .child_text(event.id, tags::RUNNABLE_ENTITY_REF)
                .and_then(|path| doc.resolve_reference(path));
            let task = doc.child_text(event.id, tags::TASK_NAME);
            if let (Some(runnable), Some(task)) = (runnable, task) {
                tasks.entry(runnable).or_insert_with(|| task.to_string());
            }
        }
        tasks
    }

    /// Interface owning the data element at `path`.
    fn interface_name(&self, path: &str) -> Option<String> {
        let doc = self.doc;
        let owner = doc
            .resolve_reference(path)
            .and_then(|id| {
                if doc.get(id)?.is(tags::SENDER_RECEIVER_INTERFACE) {
                    doc.get(id)
                } else {
                    doc.ancestor_with_tag(id, tags::SENDER_RECEIVER_INTERFACE)
                }
            })
            .and_then(|iface| doc.short_name(iface.id));
        let name = owner.unwrap_or_else(|| paths::last_segment(path));
        (!name.is_empty()).then(|| name.to_string())
    }

    fn component_of(&self, id: NodeId) -> String {
        self.doc
            .ancestor_with_tag(id, tags::SW_COMPONENT)
            .and_then(|swc| self.doc.short_name(swc.id))
            .map_or_else(|| self.config.default_component.clone(), str::to_string)
    }

    fn record(
        &mut self,
        interface: String,
        direction: Direction,
        component: String,
        task: String,
    ) -> ApiRecord {
        let info = self.interfaces.get(&interface);
        let type_ref = info.and_then(|i| i.type_ref.clone());
        let init_value = info.and_then(|i| i.init_value.clone());

        let type_ref = type_ref.unwrap_or_else(|| {
            self.diagnostics
                .warn(&interface, format!("interface type not found, using {UNKNOWN_TYPE}"));
            UNKNOWN_TYPE.to_string()
        });

        let mut record = ApiRecord::new(interface, type_ref, direction, component, task);
        record.init_value = init_value;
        record
    }
}

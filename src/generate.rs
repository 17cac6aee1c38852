//! Generation: workbook rows -> ARXML document.
//!
//! ```text
//! Types sheet ──► TypeCatalog ──┐
//!                               ├─► ResolverContext ──► ADT / IDT nodes
//! APIs sheet  ──► ApiCatalog ───┤
//!                               └─► Correlator ──► assemble ──► interfaces,
//!                                                               components
//! ```
//!
//! Document layout:
//!
//! ```text
//! AUTOSAR
//! └─ AR-PACKAGES
//!    ├─ AR-PACKAGE DataTypes
//!    │  └─ AR-PACKAGES
//!    │     ├─ AR-PACKAGE ApplicationDataTypes / ELEMENTS
//!    │     └─ AR-PACKAGE ImplementationDataTypes / ELEMENTS
//!    ├─ AR-PACKAGE Interfaces / ELEMENTS
//!    └─ AR-PACKAGE Components / ELEMENTS
//! ```

use crate::assemble::{ComponentModel, Correlator, PortAccess, assemble};
use crate::base::{ApiRecord, Direction, IdSource, paths};
use crate::catalog::{ApiCatalog, TypeCatalog};
use crate::config::Config;
use crate::document::{Document, NodeId, SHORT_NAME};
use crate::error::{Diagnostics, Result};
use crate::resolve::{
    ApplicationType, Hierarchy, ImplementationType, ResolverContext, TypeKind, TypeRef,
};
use crate::tabular::Workbook;

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Tag names shared by generation and extraction.
pub mod tags {
    pub const AR_PACKAGES: &str = "AR-PACKAGES";
    pub const AR_PACKAGE: &str = "AR-PACKAGE";
    pub const ELEMENTS: &str = "ELEMENTS";
    pub const CATEGORY: &str = "CATEGORY";

    pub const APPLICATION_PRIMITIVE: &str = "APPLICATION-PRIMITIVE-DATA-TYPE";
    pub const APPLICATION_ARRAY: &str = "APPLICATION-ARRAY-DATA-TYPE";
    pub const APPLICATION_RECORD: &str = "APPLICATION-RECORD-DATA-TYPE";
    pub const APPLICATION_RECORD_ELEMENT: &str = "APPLICATION-RECORD-ELEMENT";
    pub const ELEMENT: &str = "ELEMENT";
    pub const TYPE_TREF: &str = "TYPE-TREF";
    pub const MAX_NUMBER_OF_ELEMENTS: &str = "MAX-NUMBER-OF-ELEMENTS";

    pub const IMPLEMENTATION_TYPE: &str = "IMPLEMENTATION-DATA-TYPE";
    pub const IMPLEMENTATION_ELEMENT: &str = "IMPLEMENTATION-DATA-TYPE-ELEMENT";
    pub const IMPLEMENTATION_TYPE_REF: &str = "IMPLEMENTATION-DATA-TYPE-REF";

    pub const SENDER_RECEIVER_INTERFACE: &str = "SENDER-RECEIVER-INTERFACE";
    pub const DATA_ELEMENTS: &str = "DATA-ELEMENTS";
    pub const VARIABLE_DATA_PROTOTYPE: &str = "VARIABLE-DATA-PROTOTYPE";
    pub const INIT_VALUE: &str = "INIT-VALUE";
    pub const NUMERICAL_VALUE_SPECIFICATION: &str = "NUMERICAL-VALUE-SPECIFICATION";
    pub const VALUE: &str = "VALUE";

    pub const SW_COMPONENT: &str = "APPLICATION-SW-COMPONENT-TYPE";
    pub const P_PORT: &str = "P-PORT-PROTOTYPE";
    pub const R_PORT: &str = "R-PORT-PROTOTYPE";
    pub const DATA_ELEMENT_REF: &str = "DATA-ELEMENT-REF";

    pub const RUNNABLE_ENTITY: &str = "RUNNABLE-ENTITY";
    pub const RECEIVE_POINT: &str = "DATA-RECEIVE-POINT-BY-ARGUMENTS";
    pub const SEND_POINT: &str = "DATA-SEND-POINT-BY-ARGUMENTS";
    pub const VARIABLE_ACCESS: &str = "VARIABLE-ACCESS";
    pub const PORT_PROTOTYPE_REF: &str = "PORT-PROTOTYPE-REF";
    pub const TARGET_DATA_PROTOTYPE_REF: &str = "TARGET-DATA-PROTOTYPE-REF";
    pub const TASK_EVENTS: &str = "TASK-EVENTS";
    pub const TASK_EVENT: &str = "TASK-EVENT";
    pub const RUNNABLE_ENTITY_REF: &str = "RUNNABLE-ENTITY-REF";
    pub const TASK_NAME: &str = "TASK-NAME";
}

/// Node counts of a generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub application_types: usize,
    pub implementation_types: usize,
    pub interfaces: usize,
    pub components: usize,
    pub runnables: usize,
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} application types, {} implementation types, {} interfaces, {} components, {} runnables",
            self.application_types,
            self.implementation_types,
            self.interfaces,
            self.components,
            self.runnables
        )
    }
}

/// Result of a generation run.
#[derive(Debug)]
pub struct Generation {
    pub document: Document,
    pub report: GenerationReport,
    pub diagnostics: Diagnostics,
}

/// Generate a document from the configured Types and APIs sheets.
pub fn generate(workbook: &Workbook, config: &Config, ids: &mut dyn IdSource) -> Result<Generation> {
    let types_sheet = workbook.require_sheet(&config.types_sheet)?;
    let apis_sheet = workbook.require_sheet(&config.apis_sheet)?;

    let mut diagnostics = Diagnostics::new();
    let catalog = TypeCatalog::from_sheet(types_sheet, &mut diagnostics)?;
    let apis = ApiCatalog::from_sheet(apis_sheet, config, &mut diagnostics)?;

    let mut generation = generate_from_catalogs(&catalog, &apis, config, ids)?;
    diagnostics.extend(generation.diagnostics);
    generation.diagnostics = diagnostics;
    Ok(generation)
}

/// Generate a document from already-built catalogs.
pub fn generate_from_catalogs(
    catalog: &TypeCatalog,
    apis: &ApiCatalog,
    config: &Config,
    ids: &mut dyn IdSource,
) -> Result<Generation> {
    let mut resolver = ResolverContext::new(catalog);
    resolver.resolve_all(apis.type_refs())?;

    let mut correlator = Correlator::new(&config.default_component, &config.default_task);
    for record in apis.records() {
        correlator.add_port(record.clone());
    }
    let records = correlator.finish();
    let components = assemble(&records);

    let mut diagnostics = Diagnostics::new();
    let mut builder = DocumentBuilder::new(config, ids);

    for node in resolver.application_types() {
        builder.application_type(node);
    }
    for node in resolver.implementation_types() {
        builder.implementation_type(node);
    }
    for record in &records {
        let kind = resolver
            .lookup(&record.type_ref, Hierarchy::Application)
            .map_or(TypeKind::Primitive, |r| r.kind);
        builder.interface(record, kind, &mut diagnostics);
    }
    for component in &components {
        builder.component(component);
    }

    let report = GenerationReport {
        application_types: resolver.application_types().len(),
        implementation_types: resolver.implementation_types().len(),
        interfaces: records.len(),
        components: components.len(),
        runnables: components.iter().map(|c| c.runnables.len()).sum(),
    };
    tracing::info!(%report, "document generated");

    let resolved = resolver.finish();
    let mut all = resolved.diagnostics;
    all.extend(diagnostics);

    Ok(Generation {
        document: builder.finish(),
        report,
        diagnostics: all,
    })
}

/// Owner-aware node construction for the generated layout.
struct DocumentBuilder<'a> {
    doc: Document,
    ids: &'a mut dyn IdSource,
    application_elements: NodeId,
    implementation_elements: NodeId,
    interface_elements: NodeId,
    component_elements: NodeId,
}

impl<'a> DocumentBuilder<'a> {
    fn new(config: &Config, ids: &'a mut dyn IdSource) -> Self {
        let mut doc = Document::new();
        if !config.tool_banner.is_empty() {
            doc.comment = Some(config.tool_banner.clone());
        }

        let root = doc.add_root("AUTOSAR");
        doc.set_attribute(root, "xmlns", config.schema_namespace.as_str());
        doc.set_attribute(root, "xmlns:xsi", XSI_NAMESPACE);
        doc.set_attribute(root, "xsi:schemaLocation", config.schema_location_attr());

        let packages = doc.append_child(root, tags::AR_PACKAGES);
        let data_types = package(&mut doc, packages, paths::DATA_TYPES_PACKAGE);
        let sub_packages = doc.append_child(data_types, tags::AR_PACKAGES);
        let application = package(&mut doc, sub_packages, paths::APPLICATION_TYPES_PACKAGE);
        let implementation = package(&mut doc, sub_packages, paths::IMPLEMENTATION_TYPES_PACKAGE);
        let interfaces = package(&mut doc, packages, paths::INTERFACES_PACKAGE);
        let components = package(&mut doc, packages, paths::COMPONENTS_PACKAGE);

        let application_elements = doc.append_child(application, tags::ELEMENTS);
        let implementation_elements = doc.append_child(implementation, tags::ELEMENTS);
        let interface_elements = doc.append_child(interfaces, tags::ELEMENTS);
        let component_elements = doc.append_child(components, tags::ELEMENTS);

        Self {
            doc,
            ids,
            application_elements,
            implementation_elements,
            interface_elements,
            component_elements,
        }
    }

    fn finish(self) -> Document {
        self.doc
    }

    /// A child carrying a `UUID` attribute.
    fn identified(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.doc.append_child(parent, tag);
        let uuid = self.ids.next_id();
        self.doc.set_attribute(id, "UUID", uuid);
        id
    }

    /// An identified child with a `SHORT-NAME`.
    fn named(&mut self, parent: NodeId, tag: &str, name: &str) -> NodeId {
        let id = self.identified(parent, tag);
        self.doc.child_with_text(id, SHORT_NAME, name);
        id
    }

    fn text(&mut self, parent: NodeId, tag: &str, text: impl Into<String>) -> NodeId {
        self.doc.child_with_text(parent, tag, text)
    }

    fn reference(&mut self, parent: NodeId, tag: &str, dest: &str, path: String) {
        let id = self.doc.child_with_text(parent, tag, path);
        self.doc.set_attribute(id, "DEST", dest);
    }

    /// `SW-DATA-DEF-PROPS/SW-DATA-DEF-PROPS-VARIANTS/SW-DATA-DEF-PROPS-CONDITIONAL`
    fn data_def_props(&mut self, parent: NodeId) -> NodeId {
        let props = self.doc.append_child(parent, "SW-DATA-DEF-PROPS");
        let variants = self.doc.append_child(props, "SW-DATA-DEF-PROPS-VARIANTS");
        self.doc.append_child(variants, "SW-DATA-DEF-PROPS-CONDITIONAL")
    }

    fn calibration_access(&mut self, parent: NodeId) {
        let conditional = self.data_def_props(parent);
        self.text(conditional, "SW-CALIBRATION-ACCESS", "READ-WRITE");
    }

    fn application_type(&mut self, node: &ApplicationType) {
        let parent = self.application_elements;
        match node {
            ApplicationType::Primitive { name } => {
                let id = self.named(parent, tags::APPLICATION_PRIMITIVE, name);
                self.text(id, tags::CATEGORY, "VALUE");
                self.calibration_access(id);
            }
            ApplicationType::Array {
                name,
                element,
                size,
            } => {
                let id = self.named(parent, tags::APPLICATION_ARRAY, name);
                self.text(id, tags::CATEGORY, "ARRAY");
                self.calibration_access(id);
                let elem = self.named(id, tags::ELEMENT, name);
                self.text(elem, tags::CATEGORY, application_category(element.kind));
                self.application_tref(elem, element);
                self.text(elem, "ARRAY-SIZE-SEMANTICS", "FIXED-SIZE");
                self.text(elem, tags::MAX_NUMBER_OF_ELEMENTS, size.to_string());
            }
            ApplicationType::Record { name, fields } => {
                let id = self.named(parent, tags::APPLICATION_RECORD, name);
                self.text(id, tags::CATEGORY, "STRUCTURE");
                self.calibration_access(id);
                let elements = self.doc.append_child(id, tags::ELEMENTS);
                for field in fields {
                    let elem = self.named(elements, tags::APPLICATION_RECORD_ELEMENT, &field.name);
                    self.application_tref(elem, &field.target);
                }
            }
        }
    }

    fn application_tref(&mut self, parent: NodeId, target: &TypeRef) {
        self.reference(
            parent,
            tags::TYPE_TREF,
            application_dest(target.kind),
            paths::application_type(&target.name),
        );
    }

    fn implementation_type(&mut self, node: &ImplementationType) {
        let parent = self.implementation_elements;
        match node {
            ImplementationType::Primitive { name, category } => {
                let id = self.named(parent, tags::IMPLEMENTATION_TYPE, name);
                self.text(id, tags::CATEGORY, category.as_str());
            }
            ImplementationType::Array {
                name,
                element,
                size,
            } => {
                let id = self.named(parent, tags::IMPLEMENTATION_TYPE, name);
                self.text(id, tags::CATEGORY, "TYPE_REFERENCE");
                let subs = self.doc.append_child(id, "SUB-ELEMENTS");
                let elem = self.named(subs, tags::IMPLEMENTATION_ELEMENT, "Element");
                self.text(elem, tags::CATEGORY, "TYPE_REFERENCE");
                self.text(elem, "ARRAY-SIZE", size.to_string());
                self.implementation_ref(elem, element);
            }
            ImplementationType::Structure { name, fields } => {
                let id = self.named(parent, tags::IMPLEMENTATION_TYPE, name);
                self.text(id, tags::CATEGORY, "STRUCTURE");
                let subs = self.doc.append_child(id, "SUB-ELEMENTS");
                for field in fields {
                    let elem = self.named(subs, tags::IMPLEMENTATION_ELEMENT, &field.name);
                    self.text(elem, tags::CATEGORY, "TYPE_REFERENCE");
                    self.implementation_ref(elem, &field.type_name);
                }
            }
        }
    }

    fn implementation_ref(&mut self, parent: NodeId, target: &str) {
        let conditional = self.data_def_props(parent);
        self.reference(
            conditional,
            tags::IMPLEMENTATION_TYPE_REF,
            tags::IMPLEMENTATION_TYPE,
            paths::implementation_type(target),
        );
    }

    /// The data element's TYPE-TREF names the declared type reference, not
    /// what it resolves to, so extraction gives back the row as written. For
    /// a basic alias (`Speed` -> `uint16`) no `Speed` node exists and the
    /// path does not resolve inside the document; DEST still carries the
    /// terminal node's kind.
    fn interface(&mut self, record: &ApiRecord, kind: TypeKind, diagnostics: &mut Diagnostics) {
        let parent = self.interface_elements;
        let iface = self.named(parent, tags::SENDER_RECEIVER_INTERFACE, &record.interface);
        let elements = self.doc.append_child(iface, tags::DATA_ELEMENTS);
        let prototype = self.named(elements, tags::VARIABLE_DATA_PROTOTYPE, &record.interface);
        self.reference(
            prototype,
            tags::TYPE_TREF,
            application_dest(kind),
            paths::application_type(&record.type_ref),
        );

        let Some(value) = &record.init_value else {
            return;
        };
        if kind != TypeKind::Primitive {
            diagnostics.warn(
                &record.interface,
                format!(
                    "init value '{value}' ignored, '{}' is not a primitive type",
                    record.type_ref
                ),
            );
            return;
        }
        let init = self.doc.append_child(prototype, tags::INIT_VALUE);
        let spec = self.doc.append_child(init, tags::NUMERICAL_VALUE_SPECIFICATION);
        self.text(spec, "SHORT-LABEL", format!("{}_Init", record.interface));
        self.text(spec, tags::VALUE, value.as_str());
    }

    fn component(&mut self, component: &ComponentModel) {
        let parent = self.component_elements;
        let swc = self.named(parent, tags::SW_COMPONENT, &component.name);

        let ports = self.doc.append_child(swc, "PORTS");
        for port in &component.ports {
            let (tag, specs, spec, iface_tref) = match port.direction {
                Direction::Send => (
                    tags::P_PORT,
                    "PROVIDED-COM-SPECS",
                    "NONQUEUED-SENDER-COM-SPEC",
                    "PROVIDED-INTERFACE-TREF",
                ),
                Direction::Receive => (
                    tags::R_PORT,
                    "REQUIRED-COM-SPECS",
                    "NONQUEUED-RECEIVER-COM-SPEC",
                    "REQUIRED-INTERFACE-TREF",
                ),
            };
            let id = self.named(ports, tag, &port.name);
            let specs = self.doc.append_child(id, specs);
            let spec = self.identified(specs, spec);
            self.reference(
                spec,
                tags::DATA_ELEMENT_REF,
                tags::VARIABLE_DATA_PROTOTYPE,
                paths::interface_data_element(&port.interface),
            );
            self.text(spec, "HANDLE-OUT-OF-RANGE", "NONE");
            self.text(spec, "USES-END-TO-END-PROTECTION", "false");
            self.text(spec, "ALIVE-TIMEOUT", "0");
            self.reference(
                id,
                iface_tref,
                tags::SENDER_RECEIVER_INTERFACE,
                paths::interface(&port.interface),
            );
        }

        let behaviors = self.doc.append_child(swc, "INTERNAL-BEHAVIORS");
        let behavior = self.named(
            behaviors,
            "SWC-INTERNAL-BEHAVIOR",
            &paths::internal_behavior_name(&component.name),
        );

        let runnables = self.doc.append_child(behavior, "RUNNABLES");
        for runnable in &component.runnables {
            let id = self.named(runnables, tags::RUNNABLE_ENTITY, &runnable.name);
            self.text(id, "MINIMUM-START-INTERVAL", "0");
            self.text(id, "CAN-BE-INVOKED-CONCURRENTLY", "false");
            for access in &runnable.accesses {
                self.access_point(id, &component.name, access);
            }
        }

        let events = self.doc.append_child(behavior, tags::TASK_EVENTS);
        for (task, runnable) in component.tasks() {
            let event = self.identified(events, tags::TASK_EVENT);
            self.reference(
                event,
                tags::RUNNABLE_ENTITY_REF,
                tags::RUNNABLE_ENTITY,
                paths::runnable(&component.name, &runnable.name),
            );
            self.text(event, tags::TASK_NAME, task);
        }
        tracing::debug!(component = %component.name, "component emitted");
    }

    fn access_point(&mut self, runnable: NodeId, component: &str, access: &PortAccess) {
        let (point_tag, port_dest) = match access.direction {
            Direction::Receive => (tags::RECEIVE_POINT, tags::R_PORT),
            Direction::Send => (tags::SEND_POINT, tags::P_PORT),
        };
        let point = self.doc.append_child(runnable, point_tag);
        let variable = self.named(point, tags::VARIABLE_ACCESS, &access.variable_access_name());
        let accessed = self.doc.append_child(variable, "ACCESSED-VARIABLE");
        let iref = self.doc.append_child(accessed, "AUTOSAR-VARIABLE-IREF");
        self.reference(
            iref,
            tags::PORT_PROTOTYPE_REF,
            port_dest,
            paths::component_port(component, &access.port),
        );
        self.reference(
            iref,
            tags::TARGET_DATA_PROTOTYPE_REF,
            tags::VARIABLE_DATA_PROTOTYPE,
            paths::interface_data_element(&access.interface),
        );
    }
}

fn package(doc: &mut Document, packages: NodeId, name: &str) -> NodeId {
    let id = doc.append_child(packages, tags::AR_PACKAGE);
    doc.child_with_text(id, SHORT_NAME, name);
    id
}

fn application_dest(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Primitive => tags::APPLICATION_PRIMITIVE,
        TypeKind::Array => tags::APPLICATION_ARRAY,
        TypeKind::Record => tags::APPLICATION_RECORD,
    }
}

fn application_category(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Primitive => "VALUE",
        TypeKind::Array => "ARRAY",
        TypeKind::Record => "STRUCTURE",
    }
}

//! Reference paths used inside the generated document.
//!
//! These strings are matched byte-for-byte by consuming tools, so every
//! reference the crate emits goes through one of these helpers.

/// Top-level package holding both data-type packages.
pub const DATA_TYPES_PACKAGE: &str = "DataTypes";
/// Sub-package for application (abstract) data types.
pub const APPLICATION_TYPES_PACKAGE: &str = "ApplicationDataTypes";
/// Sub-package for implementation (concrete) data types.
pub const IMPLEMENTATION_TYPES_PACKAGE: &str = "ImplementationDataTypes";
/// Package holding sender/receiver interfaces.
pub const INTERFACES_PACKAGE: &str = "Interfaces";
/// Package holding software components.
pub const COMPONENTS_PACKAGE: &str = "Components";

/// `/DataTypes/ApplicationDataTypes/<type>`
pub fn application_type(type_name: &str) -> String {
    format!("/{DATA_TYPES_PACKAGE}/{APPLICATION_TYPES_PACKAGE}/{type_name}")
}

/// `/DataTypes/ImplementationDataTypes/<type>`
pub fn implementation_type(type_name: &str) -> String {
    format!("/{DATA_TYPES_PACKAGE}/{IMPLEMENTATION_TYPES_PACKAGE}/{type_name}")
}

/// `/Interfaces/<iface>`
pub fn interface(interface: &str) -> String {
    format!("/{INTERFACES_PACKAGE}/{interface}")
}

/// `/Interfaces/<iface>/<iface>` - the interface's single data element.
pub fn interface_data_element(interface: &str) -> String {
    format!("/{INTERFACES_PACKAGE}/{interface}/{interface}")
}

/// `/Components/<swc>/<port>`
pub fn component_port(component: &str, port: &str) -> String {
    format!("/{COMPONENTS_PACKAGE}/{component}/{port}")
}

/// Name of the internal behavior owned by a component.
pub fn internal_behavior_name(component: &str) -> String {
    format!("{component}_InternalBehavior")
}

/// `/Components/<swc>/<swc>_InternalBehavior/<runnable>`
pub fn runnable(component: &str, runnable: &str) -> String {
    format!(
        "/{COMPONENTS_PACKAGE}/{component}/{}/{runnable}",
        internal_behavior_name(component)
    )
}

/// Last segment of a reference path (`/a/b/c` -> `c`).
pub fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_paths() {
        assert_eq!(
            application_type("Speed"),
            "/DataTypes/ApplicationDataTypes/Speed"
        );
        assert_eq!(
            implementation_type("Speed"),
            "/DataTypes/ImplementationDataTypes/Speed"
        );
        assert_eq!(interface_data_element("Vector"), "/Interfaces/Vector/Vector");
        assert_eq!(component_port("EngineSWC", "Vector"), "/Components/EngineSWC/Vector");
        assert_eq!(
            runnable("EngineSWC", "10ms"),
            "/Components/EngineSWC/EngineSWC_InternalBehavior/10ms"
        );
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("/Interfaces/Vector/Vector"), "Vector");
        assert_eq!(last_segment("plain"), "plain");
        assert_eq!(last_segment("/Components/Swc/"), "Swc");
    }
}

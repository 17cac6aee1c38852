//! Generation → ARXML → extraction round trips.
//!
//! Generating a document from API rows and extracting it again must give
//! back every (interface, type, direction, component, task) tuple, with
//! blank cells replaced by their defaults.

use arxmlgen::base::DEFAULT_TASK;
use arxmlgen::tabular::Sheet;
use arxmlgen::{
    Arxml, Config, Direction, SequentialIds, Workbook, WorkbookFormat, YamlWorkbook,
    detect_workbook_format, extract, generate,
};
use rstest::rstest;

type Tuple = (String, String, Direction, String, String);

const TYPES_YAML: &str = r#"
Types:
  - [Name, Category, Field Name, Definition]
  - [Speed, basic, null, uint16]
  - [Vector, array, null, "Speed[3]"]
  - [Pose, struct, x, sint16]
  - [null, null, y, sint16]
  - [Flag, basic, null, bool]
"#;

fn workbook(apis: &[[&str; 6]]) -> Workbook {
    let mut workbook = YamlWorkbook.read(TYPES_YAML.as_bytes()).unwrap();
    let mut sheet = Sheet::new("APIs").with_row([
        "API Name",
        "Type Reference",
        "Port Direction",
        "SWC Name",
        "Task",
        "InitValue",
    ]);
    for row in apis {
        sheet.push_row(*row);
    }
    workbook.sheets.push(sheet);
    workbook
}

/// Expected tuple after default fill.
fn expected(row: &[&str; 6]) -> Tuple {
    let or = |value: &str, default: &str| {
        let chosen = if value.is_empty() { default } else { value };
        chosen.to_string()
    };
    (
        row[0].to_string(),
        row[1].to_string(),
        Direction::parse(row[2]).unwrap_or_default(),
        or(row[3], "DefaultSWC"),
        or(row[4], DEFAULT_TASK),
    )
}

fn round_trip(wb: &Workbook) -> Vec<Tuple> {
    let config = Config::default();
    let generation = generate(wb, &config, &mut SequentialIds::new()).unwrap();
    let bytes = Arxml.write(&generation.document).unwrap();
    let document = Arxml.read(&bytes).unwrap();
    let extraction = extract(&document, &config).unwrap();
    let mut tuples: Vec<Tuple> = extraction
        .apis
        .into_iter()
        .map(|r| (r.interface, r.type_ref, r.direction, r.component, r.task))
        .collect();
    tuples.sort_by(|a, b| a.0.cmp(&b.0));
    tuples
}

#[rstest]
#[case::single_sender(&[["Vector", "Vector", "S", "EngineSWC", "10ms", ""]])]
#[case::blank_direction_and_task(&[["Speed", "Speed", "", "EngineSWC", "", "0"]])]
#[case::blank_component(&[["Pose", "Pose", "R", "", "20ms", ""]])]
#[case::two_components_shared_task(&[
    ["Speed", "Speed", "S", "Engine", "10ms", "3"],
    ["Pose", "Pose", "R", "Chassis", "10ms", ""],
    ["Flag", "Flag", "R", "Engine", "5ms", ""],
])]
#[case::direct_primitive_refs(&[
    ["Rpm", "uint16", "S", "Engine", "", ""],
    ["Temp", "sint8", "receive", "Engine", "", ""],
])]
fn test_round_trip_reproduces_api_tuples(#[case] apis: &[[&str; 6]]) {
    let mut want: Vec<Tuple> = apis.iter().map(expected).collect();
    want.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(round_trip(&workbook(apis)), want);
}

#[test]
fn test_init_values_survive_round_trip() {
    let wb = workbook(&[
        ["Speed", "uint16", "S", "Engine", "10ms", "42"],
        ["Vector", "Vector", "S", "Engine", "10ms", "7"],
    ]);
    let config = Config::default();
    let generation = generate(&wb, &config, &mut SequentialIds::new()).unwrap();
    // Init values on non-primitive types are dropped with a warning.
    assert!(generation.diagnostics.mentions("Vector"));

    let extraction = extract(&generation.document, &config).unwrap();
    let init = |name: &str| {
        extraction
            .apis
            .iter()
            .find(|r| r.interface == name)
            .and_then(|r| r.init_value.clone())
    };
    assert_eq!(init("Speed").as_deref(), Some("42"));
    assert_eq!(init("Vector"), None);
}

#[test]
fn test_extracted_types_regenerate_same_hierarchy() {
    let wb = workbook(&[
        ["Vector", "Vector", "S", "Engine", "10ms", ""],
        ["Pose", "Pose", "R", "Engine", "10ms", ""],
    ]);
    let config = Config::default();
    let first = generate(&wb, &config, &mut SequentialIds::new()).unwrap();

    let extracted = extract(&first.document, &config)
        .unwrap()
        .to_workbook(&config);
    let second = generate(&extracted, &config, &mut SequentialIds::new()).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(
        Arxml.write(&first.document).unwrap(),
        Arxml.write(&second.document).unwrap()
    );
}

#[test]
fn test_file_round_trip_through_yaml_and_arxml() {
    use tempfile::TempDir;

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("model.yaml");
    let arxml = temp_dir.path().join("model.arxml");
    let output = temp_dir.path().join("extracted.yml");

    let wb = workbook(&[["Speed", "Speed", "S", "EngineSWC", "10ms", "1"]]);
    std::fs::write(&input, YamlWorkbook.write(&wb).unwrap()).unwrap();

    let config = Config::default();
    let format = detect_workbook_format(&input).unwrap();
    let read_back = format.read(&std::fs::read(&input).unwrap()).unwrap();
    let generation = generate(&read_back, &config, &mut SequentialIds::new()).unwrap();
    std::fs::write(&arxml, Arxml.write(&generation.document).unwrap()).unwrap();

    let text = std::fs::read_to_string(&arxml).unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- generated by arxmlgen"));
    assert!(text.ends_with("</AUTOSAR>\n"));

    let document = Arxml.read(&std::fs::read(&arxml).unwrap()).unwrap();
    let extraction = extract(&document, &config).unwrap();
    let format = detect_workbook_format(&output).unwrap();
    std::fs::write(&output, format.write(&extraction.to_workbook(&config)).unwrap()).unwrap();

    let extracted = format.read(&std::fs::read(&output).unwrap()).unwrap();
    let apis = extracted.require_sheet("APIs").unwrap();
    let row: Vec<Option<String>> = apis.rows[1].iter().map(|c| c.normalized()).collect();
    let s = |v: &str| Some(v.to_string());
    assert_eq!(
        row,
        vec![s("Speed"), s("Speed"), s("S"), s("EngineSWC"), s("10ms"), s("1")]
    );
}

#[test]
fn test_custom_config_labels() {
    let config = Config::from_yaml_str(
        "types_sheet: Typen\napis_sheet: Schnittstellen\ndefault_component: Main\ndefault_task: Idle\ntool_banner: ''\n",
    )
    .unwrap();

    let mut types = Sheet::new("Typen").with_row(["Name", "Category", "Definition"]);
    types.push_row(["Speed", "basic", "uint16"]);
    let mut apis = Sheet::new("Schnittstellen").with_row(["API Name", "Type Reference"]);
    apis.push_row(["Speed", "Speed"]);
    let wb = Workbook::new().with_sheet(types).with_sheet(apis);

    let generation = generate(&wb, &config, &mut SequentialIds::new()).unwrap();
    assert!(generation.document.comment.is_none());

    let extraction = extract(&generation.document, &config).unwrap();
    assert_eq!(extraction.apis.len(), 1);
    assert_eq!(extraction.apis[0].component, "Main");
    assert_eq!(extraction.apis[0].task, "Idle");
    assert_eq!(extraction.apis[0].direction, Direction::Send);
}

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use neobench_core::record::{parse_bool, COLUMNS};
use neobench_core::{NeoBenchError, Operation, Record, Stage};

fn parse(csv_text: &str) -> Result<Vec<Record>, csv::Error> {
    csv::Reader::from_reader(csv_text.as_bytes())
        .deserialize()
        .collect()
}

#[test]
fn header_names_map_onto_record_fields() {
    let text = format!(
        "{}\n2162635,162635 (2000 SS164),1.19,2.67,13569.24,54839744.08,Earth,False,16.73,True\n",
        COLUMNS.join(",")
    );
    let rows = parse(&text).expect("must parse");
    assert_eq!(rows.len(), 1);
    let r = &rows[0];
    assert_eq!(r.id, 2162635);
    assert_eq!(r.name, "162635 (2000 SS164)");
    assert!((r.min_diameter - 1.19).abs() < 1e-9);
    assert!((r.max_diameter - 2.67).abs() < 1e-9);
    assert_eq!(r.orbiting_body, "Earth");
    assert!(!r.is_sentry_object);
    assert!((r.absolute_magnitude - 16.73).abs() < 1e-4);
    assert!(r.is_hazardous);
}

#[test]
fn bool_spellings() {
    for s in ["1", "t", "T", "TRUE", "true", "True", " True "] {
        assert_eq!(parse_bool(s), Some(true), "{s}");
    }
    for s in ["0", "f", "F", "FALSE", "false", "False"] {
        assert_eq!(parse_bool(s), Some(false), "{s}");
    }
    assert_eq!(parse_bool("yes"), None);
    assert_eq!(parse_bool(""), None);
}

#[test]
fn bad_bool_is_rejected() {
    let text = format!(
        "{}\n1,a,1.0,2.0,3.0,4.0,Earth,maybe,5.0,False\n",
        COLUMNS.join(",")
    );
    assert!(parse(&text).is_err());
}

#[test]
fn operations_run_in_crud_order() {
    let names: Vec<&str> = Operation::ALL.iter().map(|o| o.as_str()).collect();
    assert_eq!(names, ["insert", "update", "read", "delete"]);
    assert_eq!(Operation::Read.to_string(), "read");
}

#[test]
fn errors_map_to_stages() {
    assert_eq!(NeoBenchError::UnsupportedVersion.stage(), Stage::Config);
    assert_eq!(NeoBenchError::Dataset("x".into()).stage().as_str(), "dataset");
    assert_eq!(NeoBenchError::Database("x".into()).stage().as_str(), "database");
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert_eq!(NeoBenchError::from(io).stage(), Stage::Io);
}

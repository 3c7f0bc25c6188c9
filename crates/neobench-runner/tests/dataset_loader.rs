#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use neobench_core::{NeoBenchError, Stage};
use neobench_runner::dataset::{self, batch_sizes};

const HEADER: &str = "id,name,est_diameter_min,est_diameter_max,relative_velocity,miss_distance,orbiting_body,sentry_object,absolute_magnitude,hazardous";

#[test]
fn fixture_loads_in_order_with_coerced_types() {
    let records = common::sample_records();
    assert_eq!(records.len(), 9);

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(
        ids,
        [2162635, 2277475, 2512244, 3596030, 3667127, 54138696, 54189957, 54230078, 2088213]
    );

    let second = &records[1];
    assert_eq!(second.name, "277475 (2005 WK4)");
    assert!(second.is_hazardous);
    assert!(!second.is_sentry_object);
    assert!((second.absolute_magnitude - 20.0).abs() < f32::EPSILON);
    assert!(records.iter().all(|r| r.orbiting_body == "Earth"));
}

#[test]
fn k_rows_yield_k_records() {
    let mut text = String::from(HEADER);
    text.push('\n');
    for i in 0..25 {
        text.push_str(&format!("{i},obj {i},0.1,0.2,100.5,2000.25,Earth,false,21.5,{}\n", i % 2 == 0));
    }
    let records = dataset::load_from_reader(text.as_bytes()).expect("loads");
    assert_eq!(records.len(), 25);
    assert_eq!(records[24].id, 24);
    assert!(records[0].is_hazardous);
    assert!(!records[1].is_hazardous);
}

#[test]
fn empty_dataset_is_not_an_error() {
    let records = dataset::load_from_reader(format!("{HEADER}\n").as_bytes()).expect("loads");
    assert!(records.is_empty());
}

#[test]
fn a_single_bad_row_fails_the_load() {
    let text = format!(
        "{HEADER}\n1,a,0.1,0.2,1.0,2.0,Earth,False,20.0,False\n2,b,wide,0.2,1.0,2.0,Earth,False,20.0,False\n"
    );
    let err = dataset::load_from_reader(text.as_bytes()).expect_err("must fail");
    assert_eq!(err.stage(), Stage::Dataset);
    assert!(err.to_string().contains("row 3"), "{err}");
}

#[test]
fn missing_column_fails_the_load() {
    let text = "id,name\n1,a\n";
    assert!(matches!(
        dataset::load_from_reader(text.as_bytes()),
        Err(NeoBenchError::Dataset(_))
    ));
}

#[test]
fn missing_file_is_fatal() {
    let err = dataset::load_from_path("/nonexistent/neo.csv").expect_err("must fail");
    assert_eq!(err.stage(), Stage::Dataset);
}

#[test]
fn batch_sizes_are_thirds() {
    assert_eq!(batch_sizes(100), [33, 66, 100]);
    assert_eq!(batch_sizes(9), [3, 6, 9]);
    assert_eq!(batch_sizes(10), [3, 6, 10]);
    assert_eq!(batch_sizes(2), [0, 0, 2]);
    assert_eq!(batch_sizes(0), [0, 0, 0]);
}

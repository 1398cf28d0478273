use geocluster_dashboard::stats::{ClusterKey, ClusterSummary, CENTROID_LAT_COL, CLUSTER_SIZE_COL};
use geocluster_dashboard::{run_pipeline, PipelineError, PipelineOutput};
use rust_xlsxwriter::Workbook;

const MAHARASHTRA_CSV: &str = "State,Latitude,Longitude,cluster\n\
     \" Maharashtra \",19.0,72.8,1\n\
     MAHARASHTRA,19.2,72.9,1\n\
     Maharashtra,18.5,73.0,2\n\
     karnataka,12.9,77.6,1\n";

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "{} != {}",
        actual,
        expected
    );
}

fn assert_maharashtra(out: &PipelineOutput) {
    assert_eq!(out.states, ["Karnataka", "Maharashtra"]);
    assert_eq!(out.selected_state.as_deref(), Some("Maharashtra"));
    assert_eq!(out.metrics.total_points, 3);
    assert_eq!(out.metrics.cluster_count, 2);
    assert_eq!(out.enriched.height(), 3);

    let one: &ClusterSummary = &out.summary[0];
    assert_eq!(one.cluster, ClusterKey::Int(1));
    assert_close(one.centroid_lat, 19.1);
    assert_close(one.centroid_lon, 72.85);
    assert_eq!(one.cluster_size, 2);

    let two = &out.summary[1];
    assert_eq!(two.cluster, ClusterKey::Int(2));
    assert_close(two.centroid_lat, 18.5);
    assert_close(two.centroid_lon, 73.0);
    assert_eq!(two.cluster_size, 1);
}

#[test]
fn csv_example_scenario() {
    let out = run_pipeline(
        MAHARASHTRA_CSV.as_bytes(),
        "pincodes.csv",
        Some("Maharashtra"),
    )
    .unwrap();
    assert_maharashtra(&out);

    let states: Vec<Option<&str>> = out
        .enriched
        .column("State")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert!(states.iter().all(|s| *s == Some("Maharashtra")));
}

#[test]
fn xlsx_example_scenario() {
    let rows = [
        (" Maharashtra ", 19.0, 72.8, 1.0),
        ("MAHARASHTRA", 19.2, 72.9, 1.0),
        ("Maharashtra", 18.5, 73.0, 2.0),
        ("karnataka", 12.9, 77.6, 1.0),
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in ["State", "Latitude", "Longitude", "cluster"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (i, (state, lat, lon, cluster)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *state).unwrap();
        sheet.write_number(row, 1, *lat).unwrap();
        sheet.write_number(row, 2, *lon).unwrap();
        sheet.write_number(row, 3, *cluster).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let out = run_pipeline(&bytes, "pincodes.xlsx", Some("Maharashtra")).unwrap();
    assert_maharashtra(&out);
}

#[test]
fn sizes_sum_to_subset_and_every_row_is_joined() {
    let csv = "State,Latitude,Longitude,cluster,Pincode\n\
               Goa,15.1,73.9,a,403001\n\
               Goa,15.3,74.1,b,403002\n\
               goa,15.5,74.0,a,403003\n\
               Goa,15.2,73.8,c,403004\n\
               Kerala,10.0,76.0,a,682001\n";
    let out = run_pipeline(csv.as_bytes(), "goa.csv", Some("Goa")).unwrap();

    let total: usize = out.summary.iter().map(|s| s.cluster_size).sum();
    assert_eq!(total, out.metrics.total_points);
    assert_eq!(total, 4);

    assert_eq!(out.enriched.column(CENTROID_LAT_COL).unwrap().null_count(), 0);
    assert_eq!(out.enriched.column(CLUSTER_SIZE_COL).unwrap().null_count(), 0);
    assert_eq!(out.enriched.width(), 8);

    let a = &out.summary[0];
    assert_eq!(a.cluster, ClusterKey::Text("a".into()));
    assert_close(a.centroid_lat, 15.3);
    assert_eq!(a.cluster_size, 2);
}

#[test]
fn unknown_selection_falls_back_to_first_state() {
    let out = run_pipeline(MAHARASHTRA_CSV.as_bytes(), "pincodes.csv", Some("Goa")).unwrap();
    assert_eq!(out.selected_state.as_deref(), Some("Karnataka"));
    assert_eq!(out.metrics.total_points, 1);
    assert_eq!(out.points.len(), 1);
}

#[test]
fn missing_column_produces_no_output() {
    let csv = "State,Lat,Longitude,cluster\nGoa,15.1,73.9,1\n";
    match run_pipeline(csv.as_bytes(), "points.csv", None) {
        Err(PipelineError::Validation(e)) => assert_eq!(e.missing, ["Latitude"]),
        other => panic!("expected validation error, got {:?}", other.map(|o| o.metrics)),
    }
}

#[test]
fn unreadable_workbook_is_an_ingestion_error() {
    let err = run_pipeline(b"PK\x03\x04 truncated", "points.xlsx", None).unwrap_err();
    assert!(matches!(err, PipelineError::Ingestion(_)));
}

#[test]
fn empty_workbook_reports_missing_columns() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    let bytes = workbook.save_to_buffer().unwrap();

    match run_pipeline(&bytes, "blank.xlsx", None) {
        Err(PipelineError::Validation(e)) => {
            assert_eq!(e.missing, ["State", "Latitude", "Longitude", "cluster"])
        }
        other => panic!("expected validation error, got {:?}", other.map(|o| o.metrics)),
    }
}

use aih_analytics::analytics::ranking::compute_ranking;
use aih_analytics::analytics::series::compute_series;
use aih_analytics::analytics::share::compute_share;
use aih_analytics::auth;
use aih_analytics::records::Payload;

fn load_fixture() -> Payload {
    let body = include_str!("fixtures/sample_payload.json");
    serde_json::from_str(body).expect("Failed to parse payload fixture")
}

#[test]
fn test_full_pipeline() {
    let payload = load_fixture();
    let limit = payload.filters.effective_top_n();

    let ranking = compute_ranking(&payload.rows, limit);
    let series = compute_series(&payload.rows);
    let share = compute_share(&payload.rows);

    assert!(ranking.len() <= limit);
    assert!(!series.bins.is_empty());
    for row in &series.series {
        assert_eq!(row.values.len(), series.bins.len());
    }
    assert_eq!(share.len(), 4);
    for entry in &share {
        assert!(entry.pct.is_finite());
    }
}

#[test]
fn test_ranking_matches_reference_output() {
    let payload = load_fixture();
    let ranking = compute_ranking(&payload.rows, payload.filters.effective_top_n());

    // The "N/A" value and the unparseable date degrade, they never drop
    // a record from this view.
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].doctor, "Ana Souza");
    assert_eq!(ranking[0].avg, 250.0);
    assert_eq!(ranking[1].doctor, "Bruno Lima");
    assert_eq!(ranking[1].avg, 200.25);
    assert_eq!(ranking[2].doctor, "Carla Mendes");
    assert_eq!(ranking[2].avg, 75.0);
}

#[test]
fn test_series_matches_reference_output() {
    let payload = load_fixture();
    let view = compute_series(&payload.rows);

    assert_eq!(view.bins, vec!["2024-01-01", "2024-01-15"]);
    assert_eq!(view.series.len(), 4);

    assert_eq!(view.series[0].doctor, "Ana Souza");
    assert_eq!(view.series[0].values, vec![Some(300.0), Some(200.0)]);

    assert_eq!(view.series[1].doctor, "Bruno Lima");
    assert_eq!(view.series[1].values, vec![Some(150.0), Some(250.5)]);

    // Carla's undated record is excluded here but still counted above.
    assert_eq!(view.series[2].doctor, "Carla Mendes");
    assert_eq!(view.series[2].values, vec![None, Some(90.0)]);

    assert_eq!(view.series[3].doctor, "Diego Alves");
    assert_eq!(view.series[3].values, vec![None, Some(0.0)]);
}

#[test]
fn test_share_matches_reference_output() {
    let payload = load_fixture();
    let share = compute_share(&payload.rows);

    let names: Vec<&str> = share.iter().map(|e| e.doctor.as_str()).collect();
    assert_eq!(
        names,
        vec!["Ana Souza", "Bruno Lima", "Carla Mendes", "Diego Alves"]
    );

    assert_eq!(share[0].value, 1000.0);
    assert_eq!(share[3].value, 0.0);
    assert_eq!(share[3].pct, 0.0);

    let sum: f64 = share.iter().map(|e| e.pct).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_views_are_idempotent() {
    let payload = load_fixture();

    let first = serde_json::to_string(&compute_series(&payload.rows)).unwrap();
    let second = serde_json::to_string(&compute_series(&payload.rows)).unwrap();
    assert_eq!(first, second);

    let first = serde_json::to_string(&compute_ranking(&payload.rows, 6)).unwrap();
    let second = serde_json::to_string(&compute_ranking(&payload.rows, 6)).unwrap();
    assert_eq!(first, second);

    let first = serde_json::to_string(&compute_share(&payload.rows)).unwrap();
    let second = serde_json::to_string(&compute_share(&payload.rows)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_payload_yields_empty_views() {
    let payload: Payload = serde_json::from_str(r#"{"filters": {}, "rows": []}"#).unwrap();

    assert!(compute_ranking(&payload.rows, payload.filters.effective_top_n()).is_empty());
    let view = compute_series(&payload.rows);
    assert!(view.bins.is_empty());
    assert!(view.series.is_empty());
    assert!(compute_share(&payload.rows).is_empty());
}

#[test]
fn test_gate_rejects_before_computation() {
    // A caller with the wrong token never reaches the engine.
    assert!(auth::guard(Some("wrong"), "secret").is_err());
    assert!(auth::guard(Some("secret"), "secret").is_ok());
}

use manhattan::data::points::*;

#[test]
fn enriches_rows_with_index_and_neg_log10() {
    let prepared = prepare_points(vec![RawRecord::new("A", 0.001), RawRecord::new("B", 0.0001)]);
    assert!(prepared.rejected.is_empty());
    let a = &prepared.points[0];
    let b = &prepared.points[1];
    assert_eq!((a.index, b.index), (0, 1));
    assert!((a.neg_log10_p - 3.0).abs() < 1e-12);
    assert!((b.neg_log10_p - 4.0).abs() < 1e-12);
    assert_eq!(a.color, DEFAULT_POINT_COLOR);
    assert!((max_neg_log10_p(&prepared.points).unwrap() - 4.0).abs() < 1e-12);
    assert_eq!(max_neg_log10_p(&[]), None);
}

#[test]
fn malformed_rows_are_rejected_and_do_not_consume_an_index() {
    let prepared = prepare_points(vec![
        RawRecord::new("zero", 0.0),
        RawRecord::new("ok", 0.5),
        RawRecord::new("nan", f64::NAN),
        RawRecord::new("big", 1.5),
        RawRecord::new("ok", 0.1),
        RawRecord::new("last", 1.0),
    ]);
    let ids: Vec<_> = prepared.points.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["ok", "last"]);
    assert_eq!(prepared.points[1].index, 1);
    assert_eq!(prepared.points[1].neg_log10_p, 0.0);

    let reasons: Vec<_> = prepared.rejected.iter().map(|r| (r.row, r.reason.clone())).collect();
    assert_eq!(reasons[0], (0, PointError::NonPositive(0.0)));
    assert!(matches!(reasons[1], (2, PointError::NotFinite(_))));
    assert_eq!(reasons[2], (3, PointError::AboveOne(1.5)));
    assert_eq!(reasons[3], (4, PointError::DuplicateId));
}

#[test]
fn parses_json_rows_with_extra_fields_in_order() {
    let json = r#"[
        {"id": "rs1", "pValue": 0.01, "gene": "BRCA1", "chr": 17, "color": "red"},
        {"id": "rs2", "p_val": 0.2, "annotated": true},
        {"id": "rs3"}
    ]"#;
    let prepared = prepare_points_json(json).unwrap();
    assert_eq!(prepared.points.len(), 2);
    let rs1 = &prepared.points[0];
    assert_eq!(rs1.color, "red");
    assert_eq!(
        rs1.extra,
        vec![
            ("gene".to_string(), "BRCA1".to_string()),
            ("chr".to_string(), "17".to_string())
        ]
    );
    assert!(prepared.points[1].annotated);
    assert_eq!(prepared.rejected[0].reason, PointError::MissingPValue);
}

#[test]
fn wrongly_typed_rows_are_rejected_without_losing_the_rest() {
    let json = r#"[
        {"id": "ok", "pValue": 0.01},
        {"id": "bad", "pValue": "n/a"},
        {"id": 7, "pValue": 0.1},
        {"id": "null_flag", "pValue": 0.2, "annotated": null},
        {"pValue": 0.3},
        {"id": "also_ok", "pValue": 0.5}
    ]"#;
    let prepared = prepare_points_json(json).unwrap();
    let ids: Vec<_> = prepared.points.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["ok", "also_ok"]);
    assert_eq!(prepared.points[1].index, 1);

    let rejected: Vec<_> = prepared.rejected.iter().map(|r| (r.row, r.id.as_str())).collect();
    assert_eq!(rejected, vec![(1, "bad"), (2, "7"), (3, "null_flag"), (4, "")]);
    assert!(prepared
        .rejected
        .iter()
        .all(|r| matches!(r.reason, PointError::Malformed(_))));
}

#[test]
fn malformed_and_invalid_rows_are_reported_in_input_order() {
    let json = r#"[{"id": "zero", "pValue": 0}, {"id": "bad", "pValue": true}, {"id": "ok", "pValue": 0.5}]"#;
    let prepared = prepare_points_json(json).unwrap();
    assert_eq!(prepared.points.len(), 1);
    assert_eq!(prepared.rejected[0].row, 0);
    assert_eq!(prepared.rejected[0].reason, PointError::NonPositive(0.0));
    assert_eq!(prepared.rejected[1].row, 1);
    assert!(matches!(prepared.rejected[1].reason, PointError::Malformed(_)));
}

#[test]
fn invalid_json_is_an_error() {
    assert!(prepare_points_json("{not json").is_err());
    assert!(prepare_points_json(r#"{"id": "a", "pValue": 0.1}"#).is_err());
}

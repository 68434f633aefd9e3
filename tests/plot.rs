use manhattan::render::{DrawingSurface, Layer, Shape};
use manhattan::*;

fn two_points() -> ManhattanPlot {
    let cfg = ManhattanConfig {
        significance_threshold: Some(0.01),
        ..Default::default()
    };
    ManhattanPlot::new(
        vec![RawRecord::new("A", 0.001), RawRecord::new("B", 0.0001)],
        cfg,
        Size::new(800.0, 600.0),
    )
}

fn marker(plot: &ManhattanPlot, id: &str) -> ScreenPos {
    plot.mapper().marker_position(plot.point(id).unwrap())
}

fn box_rect(plot: &ManhattanPlot, id: &str) -> manhattan::data::geometry::ScreenRect {
    let key = manhattan::helpers::sanitize_id(id);
    match plot.scene().get(Layer::Boxes, &key) {
        Some(Shape::Box(b)) => b.rect,
        other => panic!("no box for {id}: {other:?}"),
    }
}

#[test]
fn click_delete_round_trip() {
    let mut plot = two_points();
    let a = plot.point("A").unwrap();
    let b = plot.point("B").unwrap();
    assert!((a.neg_log10_p - 3.0).abs() < 1e-12);
    assert!((b.neg_log10_p - 4.0).abs() < 1e-12);
    assert!(plot.mapper().y_max() >= 4.0);

    let at = marker(&plot, "A");
    assert!(plot.click_marker("A", at));
    assert_eq!(plot.annotations().len(), 1);
    assert!(!plot.click_marker("A", at));
    assert_eq!(plot.annotations().len(), 1);
    assert_eq!(plot.scene().len(Layer::Boxes), 1);
    assert_eq!(plot.scene().len(Layer::Connectors), 1);

    assert!(plot.delete_annotation("A"));
    assert!(plot.annotations().is_empty());
    assert_eq!(plot.scene().len(Layer::Boxes), 0);
    assert_eq!(plot.scene().len(Layer::Connectors), 0);
    assert_eq!(plot.scene().len(Layer::Markers), 2);
    assert!(!plot.delete_annotation("A"));
}

#[test]
fn click_on_unknown_marker_does_nothing() {
    let mut plot = two_points();
    assert!(!plot.click_marker("Z", ScreenPos::new(10.0, 10.0)));
    assert!(plot.annotations().is_empty());
}

#[test]
fn drag_moves_box_and_persists_after_release() {
    let mut plot = two_points();
    let at = marker(&plot, "B");
    plot.click_marker("B", at);
    let origin = box_rect(&plot, "B").origin;

    let press = origin + ScreenPos::new(4.0, 4.0);
    assert!(plot.pointer_down_on_box("B", press));
    assert!(plot.is_dragging());
    assert!(plot.pointer_move(press + ScreenPos::new(50.0, 30.0)));
    let moved = box_rect(&plot, "B").origin;
    assert!(moved.distance_to(origin + ScreenPos::new(50.0, 30.0)) < 1e-9);
    assert_eq!(plot.pointer_up().as_deref(), Some("B"));
    assert!(!plot.is_dragging());

    // A later redraw keeps the dropped position.
    plot.redraw();
    assert!(box_rect(&plot, "B").origin.distance_to(moved) < 1e-9);
    // Moves after release are ignored.
    assert!(!plot.pointer_move(ScreenPos::new(0.0, 0.0)));
}

#[test]
fn press_and_release_without_movement_keeps_anchor() {
    let mut plot = two_points();
    plot.click_marker("A", marker(&plot, "A"));
    let anchor = plot.annotation_anchor("A").unwrap();
    let press = box_rect(&plot, "A").center();
    plot.pointer_down_on_box("A", press);
    plot.pointer_move(press);
    plot.pointer_up();
    assert_eq!(plot.annotation_anchor("A"), Some(anchor));
}

#[test]
fn snapped_drag_keeps_box_on_grid() {
    let cfg = ManhattanConfig {
        grid_snap_step: GridSnap::Step(5.0),
        ..Default::default()
    };
    let mut plot = ManhattanPlot::new(vec![RawRecord::new("A", 0.001)], cfg, Size::new(800.0, 600.0));
    plot.click_marker("A", marker(&plot, "A"));
    let press = box_rect(&plot, "A").center();
    plot.pointer_down_on_box("A", press);
    plot.pointer_move(press + ScreenPos::new(7.3, 11.1));
    let o = box_rect(&plot, "A").origin;
    assert!(((o.x / 5.0) - (o.x / 5.0).round()).abs() < 1e-9);
    assert!(((o.y / 5.0) - (o.y / 5.0).round()).abs() < 1e-9);
}

#[test]
fn delete_during_drag_ends_the_drag() {
    let mut plot = two_points();
    plot.click_marker("A", marker(&plot, "A"));
    let press = box_rect(&plot, "A").center();
    plot.pointer_down_on_box("A", press);
    plot.delete_annotation("A");
    assert_eq!(plot.drag_state(), &DragState::Idle);
    assert!(!plot.pointer_move(press + ScreenPos::new(10.0, 0.0)));
}

#[test]
fn resize_preserves_domain_anchor() {
    let mut plot = two_points();
    plot.click_marker("A", marker(&plot, "A"));
    let press = box_rect(&plot, "A").center();
    plot.pointer_down_on_box("A", press);
    plot.pointer_move(press + ScreenPos::new(1.0, 0.0));
    plot.pointer_up();
    let anchor = plot.annotation_anchor("A").unwrap();

    plot.on_resize(Size::new(1000.0, 600.0));
    assert_eq!(plot.annotation_anchor("A"), Some(anchor));
    let expected = plot.mapper().to_screen(anchor);
    assert!(box_rect(&plot, "A").origin.distance_to(expected) < 1e-9);
    assert_eq!(plot.scene().size(), Size::new(1000.0, 600.0));
}

#[test]
fn readded_annotation_starts_from_new_click() {
    let mut plot = two_points();
    plot.click_marker("A", marker(&plot, "A"));
    let press = box_rect(&plot, "A").center();
    plot.pointer_down_on_box("A", press);
    plot.pointer_move(press + ScreenPos::new(120.0, -40.0));
    plot.pointer_up();
    plot.delete_annotation("A");

    let click = marker(&plot, "A") + ScreenPos::new(2.0, -1.0);
    plot.click_marker("A", click);
    let anchor = plot.annotation_anchor("A").unwrap();
    let s = plot.mapper().to_screen(anchor);
    assert!(s.distance_to(click + ScreenPos::new(5.0, 5.0)) < 1e-9);
}

#[test]
fn preannotated_rows_are_placed_on_load() {
    let plot = ManhattanPlot::new(
        vec![
            RawRecord::new("A", 0.001).annotated(true),
            RawRecord::new("B", 0.0001),
        ],
        ManhattanConfig::default(),
        Size::new(800.0, 600.0),
    );
    assert_eq!(plot.annotations().ids().collect::<Vec<_>>(), vec!["A"]);
    let s = plot.mapper().to_screen(plot.annotation_anchor("A").unwrap());
    assert!(s.distance_to(marker(&plot, "A") + ScreenPos::new(5.0, 5.0)) < 1e-9);
}

#[test]
fn hit_test_prefers_boxes_over_markers() {
    let mut plot = two_points();
    assert_eq!(plot.hit_test(marker(&plot, "A")), Hit::Marker("A".into()));
    assert_eq!(plot.hit_test(ScreenPos::new(1.0, 1.0)), Hit::None);

    plot.click_marker("A", marker(&plot, "A"));
    let rect = box_rect(&plot, "A");
    assert_eq!(plot.hit_test(rect.center()), Hit::Box("A".into()));

    let delete_center = match plot.scene().get(Layer::Boxes, "code_A") {
        Some(Shape::Box(b)) => b.delete_button.center,
        _ => unreachable!(),
    };
    // Hidden delete buttons are not hit.
    assert_eq!(plot.hit_test(delete_center), Hit::Box("A".into()));
    assert!(plot.set_box_hover("A", true));
    assert_eq!(plot.hit_test(delete_center), Hit::DeleteButton("A".into()));
}

#[test]
fn hover_shows_and_hides_popup() {
    let mut plot = two_points();
    plot.hover_marker("B");
    assert_eq!(plot.hovered_marker(), Some("B"));
    assert_eq!(plot.scene().len(Layer::Popup), 1);
    plot.hover_out();
    assert_eq!(plot.hovered_marker(), None);
    assert_eq!(plot.scene().len(Layer::Popup), 0);
}

#[test]
fn rejected_rows_are_reported() {
    let plot = ManhattanPlot::new(
        vec![RawRecord::new("A", 0.001), RawRecord::new("bad", 0.0)],
        ManhattanConfig::default(),
        Size::new(800.0, 600.0),
    );
    assert_eq!(plot.points().len(), 1);
    assert_eq!(plot.rejected().len(), 1);
    assert_eq!(plot.rejected()[0].id, "bad");
}

#[test]
fn plot_loads_from_json_keeping_valid_rows() {
    let prepared = manhattan::data::points::prepare_points_json(
        r#"[{"id": "A", "pValue": 0.001}, {"id": "B", "pValue": "n/a"}]"#,
    )
    .unwrap();
    let plot = ManhattanPlot::from_prepared(prepared, ManhattanConfig::default(), Size::new(800.0, 600.0));
    assert_eq!(plot.points().len(), 1);
    assert_eq!(plot.scene().len(Layer::Markers), 1);
    assert_eq!(plot.rejected()[0].id, "B");
}

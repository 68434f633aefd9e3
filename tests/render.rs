use manhattan::config::{ConnectorAnchor, ManhattanConfig};
use manhattan::data::annotations::{Annotation, AnnotationStore};
use manhattan::data::geometry::{DomainPos, ScreenPos, Size};
use manhattan::data::mapper::CoordinateMapper;
use manhattan::data::points::{prepare_points, DataPoint, RawRecord};
use manhattan::render::chrome::draw_chrome;
use manhattan::render::text::annotation_lines;
use manhattan::render::*;

fn points() -> Vec<DataPoint> {
    prepare_points(vec![
        RawRecord::new("A", 0.001).with_field("gene", "TP53"),
        RawRecord::new("B", 0.0001),
        RawRecord::new("C", 0.05),
    ])
    .points
}

fn setup(cfg: &ManhattanConfig) -> (Vec<DataPoint>, CoordinateMapper, RenderSynchronizer, Scene) {
    let pts = points();
    let mapper = CoordinateMapper::from_points(&pts, cfg, Size::new(800.0, 600.0));
    let scene = Scene::new(mapper.viewport());
    (pts, mapper, RenderSynchronizer::new(cfg), scene)
}

fn get_box<'a>(scene: &'a Scene, key: &str) -> &'a AnnotationBox {
    match scene.get(Layer::Boxes, key) {
        Some(Shape::Box(b)) => b,
        other => panic!("expected box at {key}, got {other:?}"),
    }
}

fn get_line(scene: &Scene, key: &str) -> (ScreenPos, ScreenPos) {
    match scene.get(Layer::Connectors, key) {
        Some(Shape::Line { from, to, .. }) => (*from, *to),
        other => panic!("expected line at {key}, got {other:?}"),
    }
}

#[test]
fn sync_enters_updates_and_exits_boxes() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::new(&pts[0]));

    let r = sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    assert_eq!(r, SyncReport { entered: 1, updated: 0, exited: 0 });
    assert_eq!(scene.len(Layer::Markers), 3);
    assert_eq!(scene.len(Layer::Boxes), 1);
    assert_eq!(scene.len(Layer::Connectors), 1);

    let r = sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    assert_eq!(r, SyncReport { entered: 0, updated: 1, exited: 0 });

    store.remove_by_id("A");
    let r = sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    assert_eq!(r, SyncReport { entered: 0, updated: 0, exited: 1 });
    assert_eq!(scene.len(Layer::Boxes), 0);
    assert_eq!(scene.len(Layer::Connectors), 0);
    assert_eq!(scene.len(Layer::Markers), 3);
}

#[test]
fn first_sync_seeds_default_anchor_next_to_marker() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::new(&pts[1]));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);

    let anchor = store.get("B").and_then(|a| a.anchor()).unwrap();
    let expected = mapper.marker_position(&pts[1]) + ScreenPos::new(5.0, 5.0);
    let got = mapper.to_screen(anchor);
    assert!(got.distance_to(expected) < 1e-9);
    assert!(get_box(&scene, "code_B").rect.origin.distance_to(expected) < 1e-9);
}

#[test]
fn connectors_paint_behind_everything() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::new(&pts[0]));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    assert_eq!(scene.paint_order()[0], Layer::Connectors);
    assert_eq!(scene.paint_order().len(), Layer::DEFAULT_ORDER.len());
}

#[test]
fn connector_runs_from_marker_to_box_anchor_point() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::with_anchor(&pts[0], DomainPos::new(1.5, 2.0)));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    let (from, to) = get_line(&scene, "code_A");
    assert_eq!(from, mapper.marker_position(&pts[0]));
    assert_eq!(to, get_box(&scene, "code_A").rect.center());

    let cfg = ManhattanConfig {
        connector_anchor: ConnectorAnchor::TopLeft,
        ..Default::default()
    };
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::with_anchor(&pts[0], DomainPos::new(1.5, 2.0)));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    let (_, to) = get_line(&scene, "code_A");
    assert_eq!(to, mapper.to_screen(DomainPos::new(1.5, 2.0)));
}

#[test]
fn layout_sizes_box_from_lines() {
    let cfg = ManhattanConfig::default();
    let (pts, _, sync, _) = setup(&cfg);
    let layout = sync.layout(&pts[0], &ApproxTextMeasurer);
    // id heading, gene, p-value
    assert_eq!(layout.lines.len(), 3);
    let line_height = 15.0 * 1.3;
    assert!((layout.size.height - (3.0 * line_height + 10.0)).abs() < 1e-9);
    assert!(layout.size.width > 20.0);
}

#[test]
fn reposition_moves_only_the_dragged_box() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::new(&pts[0]));
    store.add_if_absent(Annotation::new(&pts[1]));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    let b_before = get_box(&scene, "code_B").clone();

    let target = ScreenPos::new(400.0, 100.0);
    assert!(sync.reposition(&mut scene, "A", target));
    let a = get_box(&scene, "code_A");
    assert_eq!(a.rect.origin, target);
    let (from, to) = get_line(&scene, "code_A");
    assert_eq!(from, mapper.marker_position(&pts[0]));
    assert_eq!(to, a.rect.center());
    assert_eq!(get_box(&scene, "code_B"), &b_before);
    assert!(!sync.reposition(&mut scene, "missing", target));
}

#[test]
fn delete_button_visibility_survives_redraw() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    let mut store = AnnotationStore::new();
    store.add_if_absent(Annotation::new(&pts[0]));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    assert!(!get_box(&scene, "code_A").delete_button.visible);
    assert!(sync.set_delete_visible(&mut scene, "A", true));
    sync.sync(&mut scene, &pts, &mut store, &mapper, &ApproxTextMeasurer);
    let b = get_box(&scene, "code_A");
    assert!(b.delete_button.visible);
    // Top-right corner, inset by the padding.
    let right = b.rect.origin.x + b.rect.size.width;
    let expected = ScreenPos::new(right - 16.0, b.rect.origin.y + 16.0);
    assert!(b.delete_button.center.distance_to(expected) < 1e-9);
}

#[test]
fn popup_sits_up_and_right_of_marker() {
    let cfg = ManhattanConfig::default();
    let (pts, mapper, sync, mut scene) = setup(&cfg);
    sync.show_popup(&mut scene, &pts[2], &mapper);
    match scene.get(Layer::Popup, "popup") {
        Some(Shape::Popup { pos, text }) => {
            assert_eq!(text, "C");
            assert_eq!(*pos, mapper.marker_position(&pts[2]) + ScreenPos::new(10.0, -10.0));
        }
        other => panic!("no popup: {other:?}"),
    }
    sync.hide_popup(&mut scene);
    assert_eq!(scene.len(Layer::Popup), 0);
}

#[test]
fn annotation_text_modes() {
    let pts = points();
    let full = annotation_lines(&pts[0], &ManhattanConfig::default());
    let shown: Vec<_> = full.iter().map(|l| l.display()).collect();
    assert_eq!(shown, vec!["A", "gene: TP53", "P-Value: 1.00e-3"]);
    assert!(full[0].heading);

    let simple = ManhattanConfig {
        simple_annotation_mode: true,
        ..Default::default()
    };
    let shown: Vec<_> = annotation_lines(&pts[0], &simple).iter().map(|l| l.display()).collect();
    assert_eq!(shown, vec!["TP53", "1.00e-3"]);

    let ignoring = ManhattanConfig {
        columns_to_ignore_in_annotation: vec!["gene".into(), "id".into()],
        ..Default::default()
    };
    let shown: Vec<_> = annotation_lines(&pts[0], &ignoring).iter().map(|l| l.display()).collect();
    assert_eq!(shown, vec!["P-Value: 1.00e-3"]);
}

#[test]
fn chrome_tracks_title_and_threshold() {
    let cfg = ManhattanConfig {
        title: Some("Study".into()),
        significance_threshold: Some(0.01),
        ..Default::default()
    };
    let (_, mapper, _, mut scene) = setup(&cfg);
    draw_chrome(&mut scene, &mapper, &cfg);
    assert!(scene.get(Layer::Chrome, "title").is_some());
    match scene.get(Layer::Chrome, "significance_line") {
        Some(Shape::Line { from, .. }) => {
            assert!((from.y - mapper.to_screen(DomainPos::new(0.0, 2.0)).y).abs() < 1e-9)
        }
        other => panic!("no threshold line: {other:?}"),
    }
    assert!(scene.get(Layer::Chrome, "y_tick_0").is_some());

    let plain = ManhattanConfig::default();
    draw_chrome(&mut scene, &mapper, &plain);
    assert!(scene.get(Layer::Chrome, "title").is_none());
    assert!(scene.get(Layer::Chrome, "significance_line").is_none());
}

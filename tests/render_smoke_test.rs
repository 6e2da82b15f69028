use sextant::sink::{PathStep, SinkEvent};
use sextant::style::Direction;
use sextant::{Cell, CellTable, Geometry, Point, RecordingSink, Renderer};

const EPS: f64 = 1e-6;

fn vertex(id: &str, style_str: &str, x: f64, y: f64, width: f64, height: f64) -> Cell {
    let mut cell = Cell {
        id: id.to_string(),
        vertex: true,
        style_str: style_str.to_string(),
        geometry: Geometry {
            x,
            y,
            width,
            height,
            ..Geometry::default()
        },
        ..Cell::default()
    };
    cell.resolve_style();
    cell
}

fn edge(id: &str, source: &str, target: &str, style_str: &str) -> Cell {
    let mut cell = Cell {
        id: id.to_string(),
        edge: true,
        source_id: Some(source.to_string()),
        target_id: Some(target.to_string()),
        style_str: style_str.to_string(),
        ..Cell::default()
    };
    cell.resolve_style();
    cell
}

fn draw(cell: &mut Cell, cells: &CellTable) -> RecordingSink {
    let mut sink = RecordingSink::new();
    Renderer::new().draw_cell(cell, cells, &mut sink);
    sink
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn single_rectangle_draws_at_scale() {
    let mut cell = vertex("A", "rounded=0", 0.0, 0.0, 10000.0, 5000.0);
    let sink = draw(&mut cell, &CellTable::new());
    let rect = sink
        .events
        .iter()
        .find_map(|event| match event {
            SinkEvent::Rectangle(rect) => Some(rect.clone()),
            _ => None,
        })
        .expect("no rectangle drawn");
    assert_eq!(rect.id.as_deref(), Some("A"));
    assert_eq!(rect.style_name, "gr_0");
    assert_eq!((rect.x, rect.y), (0.0, 0.0));
    assert_eq!((rect.width, rect.height), (100.0, 50.0));
    // Unrotated: the transform chain collapses to the identity.
    assert_eq!(rect.transform.angle, 0.0);
    assert_close(rect.transform.pre_translate.x, 0.0);
    assert_close(rect.transform.pre_translate.y, 0.0);
    assert_close(rect.transform.post_translate.x, 0.0);
    assert_close(rect.transform.post_translate.y, 0.0);
}

#[test]
fn ellipse_draws_center_and_radii() {
    let mut cell = vertex("A", "ellipse", 1000.0, 1000.0, 8000.0, 4000.0);
    let sink = draw(&mut cell, &CellTable::new());
    let ellipse = sink
        .events
        .iter()
        .find_map(|event| match event {
            SinkEvent::Ellipse(ellipse) => Some(ellipse.clone()),
            _ => None,
        })
        .expect("no ellipse drawn");
    assert_eq!((ellipse.cx, ellipse.cy), (50.0, 30.0));
    assert_eq!((ellipse.rx, ellipse.ry), (40.0, 20.0));
    assert_eq!(ellipse.rotation, 0.0);
}

#[test]
fn hexagon_draws_six_sided_path() {
    let mut cell = vertex("A", "shape=hexagon", 0.0, 0.0, 10000.0, 5000.0);
    let sink = draw(&mut cell, &CellTable::new());
    let path = sink
        .events
        .iter()
        .find_map(|event| match event {
            SinkEvent::Path(path) => Some(path.clone()),
            _ => None,
        })
        .expect("no path drawn");
    let expected = [
        (0.2, 0.0),
        (99.8, 0.0),
        (100.0, 25.0),
        (99.8, 50.0),
        (0.2, 50.0),
        (0.0, 25.0),
    ];
    assert_eq!(path.steps.len(), 7);
    assert!(matches!(path.steps[0], PathStep::MoveTo(_)));
    assert!(matches!(path.steps[6], PathStep::Close));
    for (step, (x, y)) in path.steps.iter().zip(expected) {
        let point = match step {
            PathStep::MoveTo(p) | PathStep::LineTo(p) => *p,
            other => panic!("unexpected step {other:?}"),
        };
        assert_close(point.x, x);
        assert_close(point.y, y);
    }
}

#[test]
fn straight_edge_resolves_facing_perimeter_points() {
    let mut cells = CellTable::new();
    cells.insert(vertex("A", "", 0.0, 0.0, 10000.0, 5000.0));
    cells.insert(vertex("B", "", 20000.0, 0.0, 10000.0, 5000.0));
    let mut cell = edge("E", "A", "B", "");
    let sink = draw(&mut cell, &cells);
    assert_close(cell.geometry.source_point.x, 10000.0);
    assert_close(cell.geometry.source_point.y, 2500.0);
    assert_close(cell.geometry.target_point.x, 20000.0);
    assert_close(cell.geometry.target_point.y, 2500.0);
    let connector = sink
        .events
        .iter()
        .find_map(|event| match event {
            SinkEvent::Connector(connector) => Some(connector.clone()),
            _ => None,
        })
        .expect("no connector drawn");
    assert_eq!(connector.source_shape.as_deref(), Some("A"));
    assert_eq!(connector.target_shape.as_deref(), Some("B"));
    assert_close(connector.start.x, 100.0);
    assert_close(connector.start.y, 25.0);
    assert_close(connector.end.x, 200.0);
    assert_close(connector.end.y, 25.0);
}

#[test]
fn orthogonal_edge_routes_manhattan_path() {
    let mut cells = CellTable::new();
    cells.insert(vertex("A", "", 0.0, 0.0, 10000.0, 5000.0));
    cells.insert(vertex("B", "", 20000.0, 20000.0, 10000.0, 5000.0));
    let mut cell = edge("E", "A", "B", "edgeStyle=orthogonalEdgeStyle");
    draw(&mut cell, &cells);
    // Leaves the right side of A, enters the top of B.
    assert_close(cell.geometry.source_point.x, 10000.0);
    assert_close(cell.geometry.source_point.y, 2500.0);
    assert_close(cell.geometry.target_point.x, 25000.0);
    assert_close(cell.geometry.target_point.y, 20000.0);
    assert!(!cell.geometry.waypoints.is_empty());

    let mut path = vec![cell.geometry.source_point];
    path.extend(cell.geometry.waypoints.iter().copied());
    path.push(cell.geometry.target_point);
    for pair in path.windows(2) {
        let dx = (pair[0].x - pair[1].x).abs();
        let dy = (pair[0].y - pair[1].y).abs();
        assert!(
            dx < EPS || dy < EPS,
            "segment {:?} -> {:?} is not axis-aligned",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn label_tags_are_stripped_into_one_span() {
    let mut cell = vertex("A", "", 0.0, 0.0, 10000.0, 5000.0);
    cell.label = "hello <b>world</b>!".to_string();
    let sink = draw(&mut cell, &CellTable::new());
    assert_eq!(sink.texts(), ["hello world!"]);
    let spans = sink
        .events
        .iter()
        .filter(|event| matches!(event, SinkEvent::OpenSpan))
        .count();
    assert_eq!(spans, 1);
}

#[test]
fn fixed_exit_and_entry_ratios_override_routing() {
    let mut cells = CellTable::new();
    cells.insert(vertex("A", "", 0.0, 0.0, 10000.0, 5000.0));
    cells.insert(vertex("B", "", 20000.0, 0.0, 10000.0, 5000.0));
    let mut cell = edge("E", "A", "B", "exitX=0.5;exitY=1;entryX=0.5;entryY=0");
    draw(&mut cell, &cells);
    assert_close(cell.geometry.source_point.x, 5000.0);
    assert_close(cell.geometry.source_point.y, 5000.0);
    assert_close(cell.geometry.target_point.x, 25000.0);
    assert_close(cell.geometry.target_point.y, 0.0);
}

#[test]
fn dangling_edge_reference_is_recovered() {
    let mut cells = CellTable::new();
    cells.insert(vertex("A", "", 0.0, 0.0, 10000.0, 5000.0));
    let mut cell = edge("E", "A", "missing", "");
    cell.geometry.target_point = Point::new(30000.0, 1000.0);
    let sink = draw(&mut cell, &cells);
    // The bound side resolves; the dangling side keeps its stored point.
    assert_close(cell.geometry.target_point.x, 30000.0);
    assert_close(cell.geometry.target_point.y, 1000.0);
    assert!(sink
        .events
        .iter()
        .any(|event| matches!(event, SinkEvent::Connector(_))));
}

#[test]
fn direction_changes_shape_frame() {
    let mut cell = vertex("A", "shape=hexagon;direction=south", 0.0, 0.0, 10000.0, 5000.0);
    assert_eq!(cell.style.direction, Direction::South);
    let sink = draw(&mut cell, &CellTable::new());
    let path = sink
        .events
        .iter()
        .find_map(|event| match event {
            SinkEvent::Path(path) => Some(path.clone()),
            _ => None,
        })
        .expect("no path drawn");
    // The hexagon's point faces down: the lowest vertex sits at the
    // bottom-center of the world box.
    let mut lowest = Point::new(0.0, f64::MIN);
    for step in &path.steps {
        if let PathStep::MoveTo(p) | PathStep::LineTo(p) = step {
            if p.y > lowest.y {
                lowest = *p;
            }
        }
    }
    assert_close(lowest.x, 50.0);
    assert_close(lowest.y, 50.0);
}

#[test]
fn session_counter_spans_cells() {
    let mut cells = CellTable::new();
    cells.insert(vertex("A", "", 0.0, 0.0, 10000.0, 5000.0));
    cells.insert(vertex("B", "", 20000.0, 0.0, 10000.0, 5000.0));
    let mut sink = RecordingSink::new();
    let mut renderer = Renderer::new();
    let mut a = cells.get("A").unwrap().clone();
    let mut b = cells.get("B").unwrap().clone();
    let mut e = edge("E", "A", "B", "");
    renderer.draw_cell(&mut a, &cells, &mut sink);
    renderer.draw_cell(&mut b, &cells, &mut sink);
    renderer.draw_cell(&mut e, &cells, &mut sink);
    let names: Vec<String> = sink
        .events
        .iter()
        .filter_map(|event| match event {
            SinkEvent::SetStyle(style) => Some(style.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["gr_0", "gr_0", "gr_1", "gr_1", "gr_2", "gr_2"]);
    // A fresh renderer starts a fresh session.
    assert_eq!(Renderer::new().draw_count(), 0);
}

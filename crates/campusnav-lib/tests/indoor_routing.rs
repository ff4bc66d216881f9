mod common;

use campusnav_lib::{k_shortest_paths, route_through, shortest_path, Directions, Error};

use common::fixture_store;

#[test]
fn hall_second_floor_regression_path() {
    let store = fixture_store();
    let graph = store.graph_for("hall", false).expect("hall loaded");

    let path = shortest_path(graph, "h2_209", "h2_260").expect("route exists");
    assert_eq!(
        path.path,
        vec!["h2_209", "h2_hw8", "h2_290", "h2_hw4", "h2_hw3", "h2_hw2", "h2_260"]
    );
    assert!((path.distance - 30.0).abs() < 1e-9);
}

#[test]
fn stairs_are_preferred_unless_accessible() {
    let store = fixture_store();

    let graph = store.graph_for("hall", false).unwrap();
    let direct = shortest_path(graph, "h2_260", "h1_exit_main").unwrap();
    assert!(direct.path.contains(&"h2_stairs".to_string()));
    assert!((direct.distance - 28.0).abs() < 1e-9);
    assert!((direct.weight - 32.0).abs() < 1e-9);

    let accessible = store.graph_for("hall", true).unwrap();
    let step_free = shortest_path(accessible, "h2_260", "h1_exit_main").unwrap();
    assert!(step_free.path.contains(&"h2_elevator".to_string()));
    assert!(step_free
        .path
        .iter()
        .all(|id| !id.contains("stairs") && !id.contains("escalator")));
    assert!(step_free.distance > direct.distance);
}

#[test]
fn unknown_node_and_unreachable_are_distinct() {
    let store = fixture_store();
    let graph = store.graph_for("hall", false).unwrap();

    let err = shortest_path(graph, "h2_2O9", "h2_260").unwrap_err();
    match &err {
        Error::NodeNotFound {
            node, suggestions, ..
        } => {
            assert_eq!(node, "h2_2O9");
            assert!(suggestions.contains(&"h2_209".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_no_path());

    let err = store.graph_for("hal", false).unwrap_err();
    assert!(err.to_string().contains("Did you mean 'hall'?"));
}

#[test]
fn k_paths_are_ordered_and_distinct() {
    let store = fixture_store();
    let graph = store.graph_for("hall", false).unwrap();

    let paths = k_shortest_paths(graph, "h2_209", "h2_260", 3).unwrap();
    assert_eq!(paths.len(), 3);
    assert_eq!(
        paths[0].path,
        shortest_path(graph, "h2_209", "h2_260").unwrap().path
    );
    for pair in paths.windows(2) {
        assert!(pair[0].weight <= pair[1].weight);
        assert_ne!(pair[0].path, pair[1].path);
    }
    for path in &paths {
        let mut seen = std::collections::HashSet::new();
        assert!(path.path.iter().all(|id| seen.insert(id)), "simple path");
    }
}

#[test]
fn multi_stop_route_over_fixture() {
    let store = fixture_store();
    let graph = store.graph_for("hall", false).unwrap();

    let report = route_through(graph, "h2_209", &["h2_260", "h1_110"]);
    assert!(report.is_complete());
    let first = shortest_path(graph, "h2_209", "h2_260").unwrap();
    let second = shortest_path(graph, "h2_260", "h1_110").unwrap();
    let stitched = report.into_path().unwrap();
    assert!((stitched.distance - (first.distance + second.distance)).abs() < 1e-9);
    assert_eq!(stitched.path.len(), first.path.len() + second.path.len() - 1);
}

#[test]
fn directions_describe_regression_path() {
    let store = fixture_store();
    let graph = store.graph_for("hall", false).unwrap();
    let path = shortest_path(graph, "h2_209", "h2_260").unwrap();

    let directions = Directions::for_path(&path, 1.4);
    assert_eq!(directions.steps.len(), 6);
    assert_eq!(directions.steps[0], "Exit room H-209 and enter the hallway");
    assert_eq!(directions.steps[5], "Look for room H-260 along the hallway");
    assert_eq!(directions.to, "H-260 (Floor 2)");
}

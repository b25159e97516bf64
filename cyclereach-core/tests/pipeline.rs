use cyclereach_core::{
    PipelineStage,
    algo::ScenarioReport,
    export::{graph_to_geojson, segments_to_geojson},
    loading::{
        AnalysisConfig, StreetFeature, destinations::parse_destinations_geojson, prepare_network,
        streets::parse_street_features,
    },
};
use geo::Coord;

const STREETS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[13.400, 52.500], [13.405, 52.500]]},
            "properties": {"highway": "cycleway"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[13.405, 52.500], [13.410, 52.500]]},
            "properties": {"highway": "residential", "name": "Quiet Street"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[13.405, 52.500], [13.405, 52.503], [13.400, 52.503]]},
            "properties": {"highway": "primary"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[13.420, 52.510], [13.425, 52.510]]},
            "properties": {"highway": "service"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[14.500, 52.500], [14.505, 52.500]]},
            "properties": {"highway": "residential"}
        }
    ]
}"#;

const SHELTERS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": "quiet", "geometry": {"type": "Point", "coordinates": [13.4095, 52.5001]}, "properties": {}},
        {"type": "Feature", "id": "lane", "geometry": {"type": "Point", "coordinates": [13.4051, 52.5020]}, "properties": {}},
        {"type": "Feature", "id": "island", "geometry": {"type": "Point", "coordinates": [13.4230, 52.5101]}, "properties": {}},
        {"type": "Feature", "id": "remote", "geometry": {"type": "Point", "coordinates": [14.5020, 52.5000]}, "properties": {}}
    ]
}"#;

fn config(radius_km: f64) -> AnalysisConfig {
    let content = format!(
        r#"
        origin = {{ lon = 13.400, lat = 52.500 }}
        radius_km = {radius_km:?}

        [[scenarios]]
        name = "any street"
        time_threshold_min = 15.0

        [[scenarios]]
        name = "cycle track only"
        time_threshold_min = 15.0
        suitability_filter = ["good"]

        [[scenarios]]
        name = "no main roads"
        time_threshold_min = 15.0
        suitability_filter = ["good", "medium"]
        "#
    );
    toml::from_str(&content).unwrap()
}

/// Ground rising one meter per 0.001 degrees northwards
fn sloped(coord: Coord<f64>) -> Option<f64> {
    Some((coord.y - 52.5) * 1_000.0)
}

fn streets() -> Vec<StreetFeature> {
    parse_street_features(STREETS).unwrap()
}

#[test]
fn prepares_the_largest_routable_component() {
    let network = prepare_network(&streets(), &sloped, &config(3.0)).unwrap();

    let summary = &network.summary;
    assert_eq!(summary.features_in, 5);
    assert_eq!(summary.features_outside_area, 1);
    assert_eq!(summary.segments, 4);
    assert_eq!(summary.segments_missing_elevation, 0);
    assert_eq!(summary.graph_nodes, 6);
    assert_eq!(summary.graph_edges, 4);
    assert_eq!(summary.components, 2);
    assert_eq!(summary.routable_nodes, 4);
    assert_eq!(summary.routable_edges, 3);

    let sloped_segment = network
        .segments
        .iter()
        .find(|s| s.tags().highway() == Some("primary"))
        .unwrap();
    assert!(sloped_segment.gradient_pct.unwrap().abs() > 0.1);
    assert!((sloped_segment.speed_kmh.unwrap() - 20.0).abs() > 0.1);
}

#[test]
fn scenarios_report_reachable_shelters() {
    let config = config(3.0);
    let network = prepare_network(&streets(), &sloped, &config).unwrap();
    let shelters = parse_destinations_geojson(SHELTERS).unwrap();

    let (used, report) = network.analyze(shelters, &config);
    assert_eq!(used.len(), 3);
    assert_eq!(report.destinations_outside_area, 1);

    let [any, good, no_main] = &report.scenarios[..] else {
        panic!("expected three scenario reports");
    };
    let ids = |ids: &[&str]| ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    assert_eq!(any.reachable, ids(&["quiet", "lane", "island"]));
    assert_eq!(
        [any.graph_edges, good.graph_edges, no_main.graph_edges],
        [3, 1, 2]
    );

    // Shelters attach to the nearest street each scenario allows
    assert_eq!(good.reachable, ids(&["quiet", "lane", "island"]));
    assert_eq!(good.unreachable_count, 0);
    assert_eq!(no_main.reachable, ids(&["quiet", "lane", "island"]));
    let lane = |report: &ScenarioReport| report.destinations[1].offset_m.unwrap();
    assert!(lane(any) < 20.0);
    assert!(lane(good) > 200.0);

    // The service road island is not routable, its shelter snaps to the main network
    let island = &any.destinations[2];
    assert!(island.offset_m.unwrap() > 1_000.0);
    assert!(any.destinations[0].offset_m.unwrap() < 20.0);
}

#[test]
fn exports_segments_and_graph() {
    let network = prepare_network(&streets(), &sloped, &config(3.0)).unwrap();

    let segments = segments_to_geojson(&network.segments);
    assert_eq!(segments.features.len(), network.segments.len());
    assert!(
        segments
            .features
            .iter()
            .all(|f| f.property("time_min").is_some_and(|t| t.is_number()))
    );

    let graph = graph_to_geojson(&network.graph);
    assert_eq!(
        graph.features.len(),
        network.graph.node_count() + network.graph.edge_count()
    );
}

#[test]
fn failures_name_their_stage() {
    let bad_radius = prepare_network(&streets(), &sloped, &config(0.0))
        .map(|_| ())
        .unwrap_err();
    assert_eq!(bad_radius.stage(), Some(PipelineStage::Configuration));

    let empty = prepare_network(&[], &sloped, &config(3.0)).map(|_| ()).unwrap_err();
    assert_eq!(empty.stage(), Some(PipelineStage::Normalization));

    let no_elevation = |_: Coord<f64>| -> Option<f64> { None };
    let unroutable = prepare_network(&streets(), &no_elevation, &config(3.0))
        .map(|_| ())
        .unwrap_err();
    assert_eq!(unroutable.stage(), Some(PipelineStage::Connectivity));
}

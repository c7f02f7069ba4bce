//! File source and sink tests against a temporary directory.

use std::fs;
use std::path::Path;

use map_pipeline::{
    augment_derived, DisplayMode, Pipeline, PipelineConfig, PipelineError, PointSource, Request,
};
use ocean_common::{ChannelStats, Provenance, TimeWindow};
use salinity_viewer::config::ViewerConfig;
use salinity_viewer::output::{FileSinks, RadarPlot, DIAGRAM_FILE, LEGEND_FILE, MAP_FILE};
use salinity_viewer::source::JsonFileSource;
use serde_json::{json, Value};
use test_utils::{campaign_start, salinity_field};

/// 8 x 8 observations across the German Bight on 2013-06-01, plus one
/// backward and one forward row per observation on the first row.
fn write_dump(dir: &Path) -> std::path::PathBuf {
    let mut observation = Vec::new();
    let mut backward = Vec::new();
    let mut forward = Vec::new();

    for j in 0..8 {
        for i in 0..8 {
            let n = j * 8 + i;
            let lon = 7.8 + 1.1 * i as f64 / 7.0;
            let lat = 53.8 + 0.7 * j as f64 / 7.0;
            let salinity = salinity_field(lon, lat);
            let time = format!("2013060100{:02}", n % 60);
            observation.push(json!({
                "latitude": lat, "longitude": lon, "time": time, "label": n,
                "sensor_1": salinity, "sensor_2": 7.5, "sensor_3": 12.0,
                "sensor_4": 3.1, "sensor_5": 0.4, "sensor_6": 1013.0, "sensor_7": 8.2
            }));
            if j == 0 {
                backward.push(json!({
                    "latitude": lat - 0.05, "longitude": lon, "initial_time": 201306011000u64, "label": n
                }));
                forward.push(json!({
                    "latitude": lat + 0.05, "longitude": lon, "time": 201306011100u64, "label": n
                }));
            }
        }
    }

    let path = dir.join("points.json");
    let dump = json!({ "observation": observation, "backward": backward, "forward": forward });
    fs::write(&path, serde_json::to_string(&dump).unwrap()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn first_day() -> TimeWindow {
    TimeWindow::day_starting(campaign_start().to_datetime().unwrap())
}

// ============================================================================
// Point source
// ============================================================================

#[test]
fn test_json_source_loads_all_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(write_dump(dir.path()));

    let mut points = source.load().unwrap();
    assert_eq!(points.partition(Provenance::Observation).len(), 64);
    assert_eq!(points.partition(Provenance::Backward).len(), 8);
    assert!(points.partition(Provenance::Forward)[0].values.is_missing());

    assert_eq!(augment_derived(&mut points), 2);
    assert!(!points.partition(Provenance::Forward)[0].values.is_missing());
}

#[test]
fn test_missing_dump_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("absent.json"));
    assert!(matches!(source.load(), Err(PipelineError::Source(_))));
}

#[test]
fn test_malformed_dump_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.json");
    fs::write(&path, r#"{"observation": [{"latitude": 54.0}]}"#).unwrap();
    assert!(matches!(
        JsonFileSource::new(path).load(),
        Err(PipelineError::Source(_))
    ));
}

// ============================================================================
// File sinks
// ============================================================================

fn render(dir: &Path, mode: DisplayMode) {
    render_window(dir, first_day(), mode);
}

fn render_window(dir: &Path, window: TimeWindow, mode: DisplayMode) {
    let mut points = JsonFileSource::new(write_dump(dir)).load().unwrap();
    augment_derived(&mut points);
    let stats = ChannelStats::from_samples(points.union());

    let mut config = PipelineConfig::default();
    config.grid.resolution = 40;
    let pipeline = Pipeline::new(config);
    let request = Request::new(window, pipeline.config()).with_mode(mode);
    let outcome = pipeline.update(&points, &stats, &request).unwrap();

    let mut sinks = FileSinks::create(dir.join("out")).unwrap();
    let mut diagram = sinks.clone();
    pipeline.render(&outcome, &mut sinks, &mut diagram).unwrap();
}

#[test]
fn test_contour_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    render(dir.path(), DisplayMode::Contour);
    let out = dir.path().join("out");

    let map = read_json(&out.join(MAP_FILE));
    assert_eq!(map["type"], "FeatureCollection");
    let features = map["features"].as_array().unwrap();
    assert!(!features.is_empty());
    assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
    assert_eq!(features[0]["properties"]["fill-opacity"], 0.5);

    let legend = read_json(&out.join(LEGEND_FILE));
    assert_eq!(legend["caption"], "Salinity in PSU");
    let breakpoints = legend["breakpoints"].as_array().unwrap().len();
    assert_eq!(legend["colors"].as_array().unwrap().len(), breakpoints - 1);
}

#[test]
fn test_point_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    render(dir.path(), DisplayMode::Points);

    let map = read_json(&dir.path().join("out").join(MAP_FILE));
    let features = map["features"].as_array().unwrap();
    assert_eq!(features.len(), 80);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert!(features[0]["properties"]["marker-color"].is_string());
}

#[test]
fn test_diagram_artifact() {
    let dir = tempfile::tempdir().unwrap();
    render(dir.path(), DisplayMode::Contour);

    let plot: RadarPlot =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out").join(DIAGRAM_FILE)).unwrap())
            .unwrap();
    assert_eq!(plot.axes.len(), 7);
    assert_eq!(plot.angles.len(), 7);
    assert_eq!(plot.frame.first(), plot.frame.last());
    assert_eq!(plot.patches.len(), 6);
    for patch in plot.patches.iter().filter(|p| !p.outline.is_empty()) {
        assert_eq!(patch.outline.len(), 8);
        assert!(patch.values.iter().all(|v| v.is_some()));
    }
}

#[test]
fn test_empty_window_removes_earlier_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    render(dir.path(), DisplayMode::Contour);
    assert!(out.join(LEGEND_FILE).exists());
    assert!(out.join(DIAGRAM_FILE).exists());

    render_window(dir.path(), first_day().shift_days(10), DisplayMode::Contour);
    assert!(!out.join(LEGEND_FILE).exists());
    assert!(!out.join(DIAGRAM_FILE).exists());

    let map = read_json(&out.join(MAP_FILE));
    assert!(map["features"].as_array().unwrap().is_empty());

    // clearing twice is fine
    render_window(dir.path(), first_day().shift_days(10), DisplayMode::Points);
    assert!(!out.join(LEGEND_FILE).exists());
}

// ============================================================================
// Configuration file
// ============================================================================

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viewer.yaml");
    fs::write(
        &path,
        "output_dir: /tmp/salinity\npipeline:\n  pivot: 30.0\n  contour:\n    min_angle_deg: 5.0\n",
    )
    .unwrap();

    let config = ViewerConfig::from_yaml(&path).unwrap();
    assert_eq!(config.pipeline.pivot, 30.0);
    assert_eq!(config.pipeline.contour.min_angle_deg, 5.0);
    assert_eq!(config.pipeline.contour.ndigits, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unreadable_config_reports_path() {
    let err = ViewerConfig::from_yaml("/nonexistent/viewer.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("viewer.yaml"));
}

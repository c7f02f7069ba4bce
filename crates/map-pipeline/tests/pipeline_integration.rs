//! End-to-end tests: synthetic day of drifter data through the pipeline and
//! into recording sinks.

use map_pipeline::{
    augment_derived, DiagramSink, Diagram, DisplayMode, MapLayer, Pipeline, PipelineConfig,
    PipelineError, PointSource, RenderSink, Request, Result, Side, Statistic,
};
use ocean_common::{Channel, ChannelStats, PointSet, Provenance, TimeWindow};
use renderer::{contour::signed_area, ContourRegion, Legend, PointMarker};
use test_utils::{campaign_start, synthetic_point_set, DEFAULT_PIVOT};

struct SyntheticSource {
    observations: usize,
    derived: usize,
}

impl PointSource for SyntheticSource {
    fn load(&self) -> Result<PointSet> {
        Ok(synthetic_point_set(
            self.observations,
            self.derived,
            21,
            campaign_start(),
        ))
    }
}

#[derive(Default)]
struct RecordingSink {
    regions: Vec<Vec<ContourRegion>>,
    markers: Vec<Vec<PointMarker>>,
    legends: Vec<Legend>,
    diagrams: Vec<Diagram>,
    legend_clears: usize,
    diagram_clears: usize,
}

impl RenderSink for RecordingSink {
    fn draw_regions(&mut self, regions: &[ContourRegion]) -> Result<()> {
        self.regions.push(regions.to_vec());
        Ok(())
    }

    fn draw_markers(&mut self, markers: &[PointMarker]) -> Result<()> {
        self.markers.push(markers.to_vec());
        Ok(())
    }

    fn draw_legend(&mut self, legend: &Legend) -> Result<()> {
        self.legends.push(legend.clone());
        Ok(())
    }

    fn clear_legend(&mut self) -> Result<()> {
        self.legend_clears += 1;
        Ok(())
    }
}

impl DiagramSink for RecordingSink {
    fn draw_diagram(&mut self, diagram: &Diagram) -> Result<()> {
        self.diagrams.push(diagram.clone());
        Ok(())
    }

    fn clear_diagram(&mut self) -> Result<()> {
        self.diagram_clears += 1;
        Ok(())
    }
}

struct FailingSink;

impl DiagramSink for FailingSink {
    fn draw_diagram(&mut self, _diagram: &Diagram) -> Result<()> {
        Err(PipelineError::Sink("display closed".to_string()))
    }

    fn clear_diagram(&mut self) -> Result<()> {
        Err(PipelineError::Sink("display closed".to_string()))
    }
}

fn loaded() -> (PointSet, ChannelStats) {
    let source = SyntheticSource {
        observations: 400,
        derived: 150,
    };
    let mut points = source.load().unwrap();
    assert_eq!(augment_derived(&mut points), 2);
    let stats = ChannelStats::from_samples(points.union());
    (points, stats)
}

fn pipeline() -> Pipeline {
    let mut config = PipelineConfig::default();
    config.grid.resolution = 60;
    Pipeline::new(config)
}

fn first_day() -> TimeWindow {
    TimeWindow::day_starting(campaign_start().to_datetime().unwrap())
}

// =============================================================================
// Contour display
// =============================================================================

#[test]
fn test_contour_request_renders_all_layers() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let request = Request::new(first_day(), pipeline.config());

    let outcome = pipeline.update(&points, &stats, &request).unwrap();
    assert_eq!(outcome.selected, 700);

    let mut map = RecordingSink::default();
    let mut diagram = RecordingSink::default();
    pipeline.render(&outcome, &mut map, &mut diagram).unwrap();

    assert_eq!(map.regions.len(), 1);
    assert!(map.markers.is_empty());
    assert_eq!(map.legends.len(), 1);
    assert_eq!(diagram.diagrams.len(), 1);
    assert_eq!(map.legend_clears + diagram.diagram_clears, 0);

    let regions = &map.regions[0];
    assert!(!regions.is_empty());
    assert!(regions.windows(2).all(|w| w[0].upper <= w[1].lower + 1e-12));
    for region in regions {
        for polygon in &region.polygons {
            assert!(signed_area(&polygon[0]) > 0.0);
            for ring in polygon {
                assert_eq!(ring.first(), ring.last());
            }
        }
    }
}

#[test]
fn test_derived_rows_feed_the_diagram() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let request = Request::new(first_day(), pipeline.config()).with_pivot(DEFAULT_PIVOT);

    let outcome = pipeline.update(&points, &stats, &request).unwrap();
    let diagram = outcome.diagram.unwrap();
    assert_eq!(diagram.series.len(), 6);
    assert_eq!(diagram.axes[0], "Salinity");

    let max_below = diagram
        .series
        .iter()
        .find(|s| s.statistic == Statistic::Max && s.side == Side::Below)
        .unwrap();
    let salinity = stats.summary(Channel::Salinity);
    let expected_cap = (DEFAULT_PIVOT - salinity.min) / salinity.max;
    assert!(max_below.values[0] < expected_cap);
}

#[test]
fn test_next_day_is_empty() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let request = Request::new(first_day().shift_days(1), pipeline.config());

    let outcome = pipeline.update(&points, &stats, &request).unwrap();
    assert_eq!(outcome.layer, MapLayer::Empty);

    let mut map = RecordingSink::default();
    let mut diagram = RecordingSink::default();
    pipeline.render(&outcome, &mut map, &mut diagram).unwrap();
    assert_eq!(map.regions, vec![Vec::new()]);
    assert!(map.legends.is_empty());
    assert!(diagram.diagrams.is_empty());
    assert_eq!(map.legend_clears, 1);
    assert_eq!(diagram.diagram_clears, 1);
}

#[test]
fn test_smoothing_keeps_levels() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let plain = Request::new(first_day(), pipeline.config());
    let smoothed = plain.with_smoothing(2.0);

    let a = pipeline.update(&points, &stats, &plain).unwrap();
    let b = pipeline.update(&points, &stats, &smoothed).unwrap();
    assert_eq!(a.legend, b.legend);
    assert_ne!(a.layer, b.layer);
}

#[test]
fn test_repeated_requests_match() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let request = Request::new(first_day(), pipeline.config()).with_smoothing(1.5);

    let first = pipeline.update(&points, &stats, &request).unwrap();
    let second = pipeline.update(&points, &stats, &request).unwrap();
    assert_eq!(first.layer, second.layer);
}

// =============================================================================
// Point display
// =============================================================================

#[test]
fn test_point_request_downsamples_union() {
    let (points, stats) = loaded();
    let mut config = PipelineConfig::default();
    config.grid.target_points = 200;
    let pipeline = Pipeline::new(config);
    let request = Request::new(first_day(), pipeline.config()).with_mode(DisplayMode::Points);

    let outcome = pipeline.update(&points, &stats, &request).unwrap();
    let legend = outcome.legend.clone().unwrap();
    let MapLayer::Points(markers) = &outcome.layer else {
        panic!("expected markers");
    };

    // 700 valid samples, stride 3
    assert_eq!(markers.len(), 234);

    let band = |m: &PointMarker| legend.colors.iter().position(|c| *c == m.color).unwrap();
    assert!(markers.windows(2).all(|w| band(&w[0]) <= band(&w[1])));

    let mut map = RecordingSink::default();
    let mut diagram = RecordingSink::default();
    pipeline.render(&outcome, &mut map, &mut diagram).unwrap();
    assert_eq!(map.markers.len(), 1);
    assert!(map.regions.is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unknown_label_leaves_partition_unaugmented() {
    let mut points = synthetic_point_set(10, 5, 3, campaign_start());
    points.partition_mut(Provenance::Forward)[2].label = Some(999);

    assert_eq!(augment_derived(&mut points), 1);
    assert!(!points.partition(Provenance::Backward)[0].values.is_missing());
    assert!(points.partition(Provenance::Forward)[0].values.is_missing());
}

#[test]
fn test_sink_errors_propagate() {
    let (points, stats) = loaded();
    let pipeline = pipeline();
    let outcome = pipeline
        .update(&points, &stats, &Request::new(first_day(), pipeline.config()))
        .unwrap();

    let mut map = RecordingSink::default();
    let result = pipeline.render(&outcome, &mut map, &mut FailingSink);
    assert!(matches!(result, Err(PipelineError::Sink(_))));
}

use crate::algorithms::combiner::combine_estimates;
use crate::algorithms::partition::{partition_stations, PartitionBucket};
use crate::algorithms::triangulation::Triangulator;
use crate::core::{GeoRegion, PartialEstimate, Quadrant, StationReport};
use crate::utils::config::LocatorConfig;
use crate::validation::data::StationValidator;
use crate::validation::error::ValidationError;
use tracing::{debug, warn};

/// Why the recursion stopped at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafReason {
    /// Station count at or below the base-case threshold
    BelowThreshold,
    /// Configured maximum depth reached
    DepthLimit,
    /// Region too small to split further in floating point
    Unsplittable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(LeafReason),
    Split {
        /// One child per non-empty quadrant, in SW, SE, NW, NE order
        children: Vec<PartitionNode>,
        /// Stations outside this node's region
        dropped: usize,
    },
}

/// One step of the quadrant decomposition and its estimate
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    /// `None` for the root
    pub quadrant: Option<Quadrant>,
    pub region: GeoRegion,
    pub depth: usize,
    pub station_count: usize,
    pub estimate: PartialEstimate,
    pub kind: NodeKind,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn children(&self) -> &[PartitionNode] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Split { children, .. } => children,
        }
    }

    /// Number of base-case evaluations below this node
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Split { children, .. } => children.iter().map(PartitionNode::leaf_count).sum(),
        }
    }

    /// Deepest level reached below this node
    pub fn max_depth(&self) -> usize {
        self.children()
            .iter()
            .map(PartitionNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Total stations dropped for lying outside their region
    pub fn dropped_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 0,
            NodeKind::Split { children, dropped } => {
                dropped + children.iter().map(PartitionNode::dropped_count).sum::<usize>()
            }
        }
    }
}

/// Divide-and-conquer epicenter locator.
///
/// Regions with more stations than the base-case threshold are split into
/// quadrants, each non-empty quadrant is solved recursively, and the partial
/// estimates are merged by confidence.
#[derive(Debug, Clone)]
pub struct Locator {
    config: LocatorConfig,
    triangulator: Triangulator,
}

impl Default for Locator {
    fn default() -> Self {
        Self::with_config(LocatorConfig::default())
    }
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator with custom parameters
    pub fn with_config(config: LocatorConfig) -> Self {
        let config = LocatorConfig {
            base_case_threshold: config.base_case_threshold.max(1),
            max_depth: config.max_depth.max(1),
            ..config
        };
        Self {
            triangulator: Triangulator::new(config.wave_velocity),
            config,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn triangulator(&self) -> &Triangulator {
        &self.triangulator
    }

    /// Estimate the epicenter for `stations` inside `region`
    pub fn locate(&self, stations: &[StationReport], region: &GeoRegion) -> PartialEstimate {
        self.locate_with_tree(stations, region).estimate
    }

    /// Estimate the epicenter and return the full decomposition tree
    pub fn locate_with_tree(&self, stations: &[StationReport], region: &GeoRegion) -> PartitionNode {
        let root = self.solve(stations, *region, 0, None);
        if root.dropped_count() > 0 {
            warn!(
                dropped = root.dropped_count(),
                total = stations.len(),
                "stations outside the search region were ignored"
            );
        }
        debug!(
            stations = stations.len(),
            leaves = root.leaf_count(),
            depth = root.max_depth(),
            confidence = root.estimate.confidence,
            "epicenter located"
        );
        root
    }

    /// Validate inputs, then locate
    pub fn locate_validated(
        &self,
        stations: &[StationReport],
        region: &GeoRegion,
    ) -> Result<PartialEstimate, ValidationError> {
        StationValidator::default().validate(stations, region)?;
        Ok(self.locate(stations, region))
    }

    fn solve(
        &self,
        stations: &[StationReport],
        region: GeoRegion,
        depth: usize,
        quadrant: Option<Quadrant>,
    ) -> PartitionNode {
        let leaf = |reason| PartitionNode {
            quadrant,
            region,
            depth,
            station_count: stations.len(),
            estimate: self.triangulator.estimate(stations),
            kind: NodeKind::Leaf(reason),
        };

        if stations.len() <= self.config.base_case_threshold {
            return leaf(LeafReason::BelowThreshold);
        }
        if depth >= self.config.max_depth {
            warn!(depth, stations = stations.len(), "maximum partition depth reached, triangulating directly");
            return leaf(LeafReason::DepthLimit);
        }
        if !region.is_splittable() {
            warn!(depth, stations = stations.len(), "region can no longer be split, triangulating directly");
            return leaf(LeafReason::Unsplittable);
        }

        let partition = partition_stations(&region, stations);
        let buckets: Vec<&PartitionBucket> = partition.non_empty().collect();

        debug!(
            depth,
            stations = stations.len(),
            quadrants = buckets.len(),
            dropped = partition.dropped.len(),
            "splitting region"
        );

        let children = self.solve_buckets(&buckets, depth + 1);
        let sub_estimates: Vec<PartialEstimate> = children.iter().map(|child| child.estimate).collect();

        PartitionNode {
            quadrant,
            region,
            depth,
            station_count: stations.len(),
            estimate: combine_estimates(&sub_estimates),
            kind: NodeKind::Split {
                children,
                dropped: partition.dropped.len(),
            },
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn solve_buckets(&self, buckets: &[&PartitionBucket], depth: usize) -> Vec<PartitionNode> {
        buckets
            .iter()
            .map(|bucket| self.solve(&bucket.stations, bucket.region, depth, Some(bucket.quadrant)))
            .collect()
    }

    /// Sibling quadrants are independent; the indexed collect keeps the
    /// SW, SE, NW, NE order so the combined result matches sequential runs.
    #[cfg(feature = "parallel")]
    fn solve_buckets(&self, buckets: &[&PartitionBucket], depth: usize) -> Vec<PartitionNode> {
        use rayon::prelude::*;

        buckets
            .par_iter()
            .map(|bucket| self.solve(&bucket.stations, bucket.region, depth, Some(bucket.quadrant)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;
    use crate::synthetic::SyntheticScenario;

    fn california() -> GeoRegion {
        GeoRegion::new(32.0, 42.0, -125.0, -114.0)
    }

    #[test]
    fn test_single_station() {
        let stations = vec![StationReport::new(1, 10.0, 20.0, 5.0)];
        let region = GeoRegion::new(0.0, 30.0, 0.0, 30.0);
        let estimate = Locator::new().locate(&stations, &region);
        assert_eq!(estimate.location, Point::new(10.0, 20.0));
        assert_eq!(estimate.confidence, 1.0);
        assert_eq!(estimate.error, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let estimate = Locator::new().locate(&[], &california());
        assert_eq!(estimate.location, Point::new(0.0, 0.0));
        assert_eq!(estimate.confidence, 0.0);
        assert_eq!(estimate.error, 1e9);
    }

    #[test]
    fn test_two_equal_time_stations() {
        let stations = vec![
            StationReport::new(1, 0.0, 0.0, 2.0),
            StationReport::new(2, 0.0, 10.0, 2.0),
        ];
        let region = GeoRegion::new(-1.0, 1.0, 0.0, 10.0);
        let estimate = Locator::new().locate(&stations, &region);
        assert!((estimate.location.x - 0.0).abs() < 1e-12);
        assert!((estimate.location.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_count_matches_base_case() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 8)
            .with_seed(11)
            .generate();
        let locator = Locator::new();
        let tree = locator.locate_with_tree(&stations, &california());

        assert_eq!(tree.kind, NodeKind::Leaf(LeafReason::BelowThreshold));
        assert_eq!(tree.estimate, locator.triangulator().estimate(&stations));
    }

    #[test]
    fn test_nine_stations_take_recursive_path() {
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let stations = vec![
            StationReport::new(0, 1.0, 1.0, 0.4),
            StationReport::new(1, 2.0, 3.0, 0.6),
            StationReport::new(2, 1.5, 7.0, 0.9),
            StationReport::new(3, 3.0, 8.0, 1.0),
            StationReport::new(4, 7.0, 2.0, 1.1),
            StationReport::new(5, 8.0, 1.0, 1.3),
            StationReport::new(6, 6.0, 6.0, 0.2),
            StationReport::new(7, 9.0, 9.0, 1.4),
            StationReport::new(8, 7.5, 8.5, 0.8),
        ];
        let locator = Locator::new();
        let tree = locator.locate_with_tree(&stations, &region);

        let children = tree.children();
        assert!(!tree.is_leaf());
        assert_eq!(children.len(), 4);
        assert!(children.iter().all(|c| c.is_leaf()));
        assert_eq!(children.iter().map(|c| c.station_count).sum::<usize>(), 9);

        let sub: Vec<PartialEstimate> = children.iter().map(|c| c.estimate).collect();
        assert_eq!(tree.estimate, combine_estimates(&sub));
        assert_ne!(tree.estimate, locator.triangulator().estimate(&stations));
    }

    #[test]
    fn test_empty_quadrants_skipped() {
        // Two clusters of five in opposite corners
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let mut stations = Vec::new();
        for i in 0..5 {
            stations.push(StationReport::new(i, 1.0 + i as f64 * 0.1, 1.0, i as f64 * 0.1));
            stations.push(StationReport::new(10 + i, 9.0, 9.0 - i as f64 * 0.1, i as f64 * 0.2));
        }
        let tree = Locator::new().locate_with_tree(&stations, &region);
        let quadrants: Vec<Option<Quadrant>> = tree.children().iter().map(|c| c.quadrant).collect();
        assert_eq!(quadrants, vec![Some(Quadrant::SouthWest), Some(Quadrant::NorthEast)]);
    }

    #[test]
    fn test_threshold_override() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 40)
            .with_seed(3)
            .generate();
        let config = LocatorConfig {
            base_case_threshold: 100,
            ..LocatorConfig::default()
        };
        let locator = Locator::with_config(config);
        let tree = locator.locate_with_tree(&stations, &california());
        assert!(tree.is_leaf());
        assert_eq!(tree.estimate, locator.triangulator().estimate(&stations));

        let recursive = Locator::new().locate_with_tree(&stations, &california());
        assert!(!recursive.is_leaf());
        assert!(recursive.max_depth() >= 1);
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let config = LocatorConfig {
            base_case_threshold: 0,
            ..LocatorConfig::default()
        };
        let locator = Locator::with_config(config);
        assert_eq!(locator.config().base_case_threshold, 1);

        let stations = vec![StationReport::new(1, 3.0, 4.0, 0.0)];
        let estimate = locator.locate(&stations, &GeoRegion::new(0.0, 10.0, 0.0, 10.0));
        assert_eq!(estimate.location, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_coincident_stations_terminate() {
        let stations: Vec<StationReport> = (0..20)
            .map(|i| StationReport::new(i, 5.0, 5.0, i as f64 * 0.01))
            .collect();
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let locator = Locator::new();
        let tree = locator.locate_with_tree(&stations, &region);

        assert!(tree.max_depth() <= locator.config().max_depth);
        assert!((tree.estimate.location.x - 5.0).abs() < 1e-12);
        assert!((tree.estimate.location.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_region_stops_splitting() {
        let stations: Vec<StationReport> = (0..12)
            .map(|i| StationReport::new(i, 2.0, 3.0, i as f64))
            .collect();
        let region = GeoRegion::new(2.0, 2.0, 3.0, 3.0);
        let tree = Locator::new().locate_with_tree(&stations, &region);
        assert_eq!(tree.kind, NodeKind::Leaf(LeafReason::Unsplittable));
    }

    #[test]
    fn test_depth_limit() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 200)
            .with_seed(5)
            .generate();
        let config = LocatorConfig {
            max_depth: 1,
            ..LocatorConfig::default()
        };
        let tree = Locator::with_config(config).locate_with_tree(&stations, &california());
        assert_eq!(tree.max_depth(), 1);
        assert!(tree
            .children()
            .iter()
            .all(|c| c.kind == NodeKind::Leaf(LeafReason::DepthLimit) || c.station_count <= 8));
    }

    #[test]
    fn test_outside_stations_reported_as_dropped() {
        let mut stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 30)
            .with_seed(9)
            .generate();
        stations.push(StationReport::new(999, 60.0, -120.0, 0.0));
        let tree = Locator::new().locate_with_tree(&stations, &california());
        assert_eq!(tree.dropped_count(), 1);
        assert_eq!(tree.station_count, 31);
    }

    #[test]
    fn test_deterministic() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 500)
            .with_seed(21)
            .generate();
        let locator = Locator::new();
        let first = locator.locate(&stations, &california());
        let second = locator.locate(&stations, &california());
        assert_eq!(first.location.x.to_bits(), second.location.x.to_bits());
        assert_eq!(first.location.y.to_bits(), second.location.y.to_bits());
        assert_eq!(first.error.to_bits(), second.error.to_bits());
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    }

    #[test]
    fn test_estimate_inside_region() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 1000)
            .with_seed(42)
            .generate();
        let estimate = Locator::new().locate(&stations, &california());
        assert!(california().contains_point(&estimate.location));
        assert!(estimate.confidence > 0.0 && estimate.confidence <= 1.0);
        assert!(estimate.error >= 0.0);
    }

    #[test]
    fn test_locate_validated_rejects_nan() {
        let stations = vec![
            StationReport::new(1, 1.0, 1.0, 0.0),
            StationReport::new(2, f64::NAN, 1.0, 0.0),
        ];
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let result = Locator::new().locate_validated(&stations, &region);
        assert!(matches!(result, Err(ValidationError::NonFiniteStation { id: 2, .. })));
    }

    #[test]
    fn test_nan_propagates_through_core() {
        let stations = vec![
            StationReport::new(1, 1.0, 1.0, 0.0),
            StationReport::new(2, 2.0, 2.0, f64::NAN),
        ];
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let estimate = Locator::new().locate(&stations, &region);
        assert!(estimate.location.x.is_nan() || estimate.error.is_nan());
    }
}

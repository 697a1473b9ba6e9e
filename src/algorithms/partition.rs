use crate::core::{GeoRegion, Quadrant, StationReport};

/// A quadrant region paired with the stations assigned to it
#[derive(Debug, Clone)]
pub struct PartitionBucket {
    pub quadrant: Quadrant,
    pub region: GeoRegion,
    pub stations: Vec<StationReport>,
}

impl PartitionBucket {
    fn new(parent: &GeoRegion, quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            region: parent.quadrant(quadrant),
            stations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Result of one partitioning step
#[derive(Debug, Clone)]
pub struct Partition {
    /// Buckets in SW, SE, NW, NE order
    pub buckets: [PartitionBucket; 4],
    /// Stations that fell outside the parent region
    pub dropped: Vec<StationReport>,
}

impl Partition {
    /// Buckets holding at least one station, in fixed quadrant order
    pub fn non_empty(&self) -> impl Iterator<Item = &PartitionBucket> {
        self.buckets.iter().filter(|bucket| !bucket.is_empty())
    }

    pub fn non_empty_count(&self) -> usize {
        self.non_empty().count()
    }

    pub fn assigned_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.stations.len()).sum()
    }
}

/// Split `region` at its midpoint lines and bucket each station into exactly
/// one quadrant. Stations on a split line go to the northern / eastern side.
pub fn partition_stations(region: &GeoRegion, stations: &[StationReport]) -> Partition {
    let mut buckets = Quadrant::ALL.map(|quadrant| PartitionBucket::new(region, quadrant));
    let mut dropped = Vec::new();

    for station in stations {
        match region.quadrant_of(station) {
            Some(quadrant) => buckets[quadrant.index()].stations.push(*station),
            None => dropped.push(*station),
        }
    }

    Partition { buckets, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(region: &GeoRegion, per_axis: usize) -> Vec<StationReport> {
        let mut stations = Vec::new();
        let mut id = 0;
        for i in 0..=per_axis {
            for j in 0..=per_axis {
                let lat = region.min_lat + region.lat_span() * i as f64 / per_axis as f64;
                let lon = region.min_lon + region.lon_span() * j as f64 / per_axis as f64;
                stations.push(StationReport::new(id, lat, lon, 0.0));
                id += 1;
            }
        }
        stations
    }

    #[test]
    fn test_station_conservation() {
        let region = GeoRegion::new(32.0, 42.0, -125.0, -114.0);
        let stations = grid(&region, 10);
        let partition = partition_stations(&region, &stations);

        assert!(partition.dropped.is_empty());
        assert_eq!(partition.assigned_count(), stations.len());

        let mut ids: Vec<i64> = partition
            .buckets
            .iter()
            .flat_map(|bucket| bucket.stations.iter().map(|s| s.id))
            .collect();
        ids.sort_unstable();
        let expected: Vec<i64> = (0..stations.len() as i64).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_bucket_regions_follow_split() {
        let region = GeoRegion::new(0.0, 4.0, 0.0, 8.0);
        let partition = partition_stations(&region, &[]);
        let split = region.split();
        for (bucket, (expected_quadrant, expected_region)) in
            partition.buckets.iter().zip(Quadrant::ALL.iter().zip(split.iter()))
        {
            assert_eq!(bucket.quadrant, *expected_quadrant);
            assert_eq!(bucket.region, *expected_region);
            assert!(bucket.is_empty());
        }
        assert_eq!(partition.non_empty_count(), 0);
    }

    #[test]
    fn test_stations_inside_assigned_bucket() {
        let region = GeoRegion::new(-5.0, 5.0, -5.0, 5.0);
        let stations = grid(&region, 6);
        let partition = partition_stations(&region, &stations);
        for bucket in &partition.buckets {
            for station in &bucket.stations {
                assert!(bucket.region.contains(station));
            }
        }
    }

    #[test]
    fn test_outside_stations_dropped() {
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let stations = vec![
            StationReport::new(1, 2.0, 2.0, 0.0),
            StationReport::new(2, 20.0, 2.0, 0.0),
            StationReport::new(3, 8.0, -1.0, 0.0),
        ];
        let partition = partition_stations(&region, &stations);
        assert_eq!(partition.assigned_count(), 1);
        assert_eq!(partition.dropped.len(), 2);
        assert_eq!(partition.buckets[Quadrant::SouthWest.index()].stations[0].id, 1);
    }

    #[test]
    fn test_non_empty_in_fixed_order() {
        let region = GeoRegion::new(0.0, 10.0, 0.0, 10.0);
        let stations = vec![
            StationReport::new(1, 9.0, 9.0, 0.0),
            StationReport::new(2, 1.0, 9.0, 0.0),
        ];
        let partition = partition_stations(&region, &stations);
        let order: Vec<Quadrant> = partition.non_empty().map(|b| b.quadrant).collect();
        assert_eq!(order, vec![Quadrant::SouthEast, Quadrant::NorthEast]);
    }
}

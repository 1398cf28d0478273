//! Cluster Statistics Module
//! Per-cluster centroids and sizes, joined back onto the rows they summarize.

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

pub const LATITUDE_COL: &str = "Latitude";
pub const LONGITUDE_COL: &str = "Longitude";
pub const CLUSTER_COL: &str = "cluster";

pub const CENTROID_LAT_COL: &str = "centroid_lat";
pub const CENTROID_LON_COL: &str = "centroid_lon";
pub const CLUSTER_SIZE_COL: &str = "cluster_size";

/// Cluster label as supplied by the upload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterKey::Int(v) => write!(f, "{}", v),
            ClusterKey::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the cluster summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub cluster: ClusterKey,
    /// None when no row of the cluster has a usable latitude.
    pub centroid_lat: Option<f64>,
    pub centroid_lon: Option<f64>,
    pub cluster_size: usize,
}

/// Headline numbers for the selected state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total_points: usize,
    pub cluster_count: usize,
}

/// Cluster key and coordinates pulled out of each row, in row order.
#[derive(Debug, Clone, Default)]
pub struct ClusterRows {
    pub keys: Vec<Option<ClusterKey>>,
    pub lats: Vec<Option<f64>>,
    pub lons: Vec<Option<f64>>,
}

impl ClusterRows {
    pub fn extract(df: &DataFrame) -> PolarsResult<Self> {
        let cluster = df.column(CLUSTER_COL)?;
        let mut keys: Vec<Option<ClusterKey>> = Vec::with_capacity(df.height());
        if cluster.dtype().is_integer() {
            let ints = cluster.cast(&DataType::Int64)?;
            keys.extend(ints.i64()?.into_iter().map(|v| v.map(ClusterKey::Int)));
        } else {
            let texts = cluster.cast(&DataType::String)?;
            keys.extend(
                texts
                    .str()?
                    .into_iter()
                    .map(|v| v.map(|s| ClusterKey::Text(s.to_string()))),
            );
        }

        Ok(Self {
            keys,
            lats: Self::coordinates(df, LATITUDE_COL)?,
            lons: Self::coordinates(df, LONGITUDE_COL)?,
        })
    }

    /// Numeric view of a coordinate column; unparseable values and NaN are None.
    fn coordinates(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        let coords: Vec<Option<f64>> = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|f| !f.is_nan()))
            .collect();
        Ok(coords)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Rows with both coordinates, as (key, lat, lon).
    pub fn located(&self) -> impl Iterator<Item = (Option<&ClusterKey>, f64, f64)> + '_ {
        self.keys
            .iter()
            .zip(self.lats.iter().zip(self.lons.iter()))
            .filter_map(|(key, (lat, lon))| Some((key.as_ref(), (*lat)?, (*lon)?)))
    }
}

#[derive(Default)]
struct Accumulator {
    lat_sum: f64,
    lat_n: usize,
    lon_sum: f64,
    lon_n: usize,
    size: usize,
}

fn mean(sum: f64, n: usize) -> Option<f64> {
    (n > 0).then(|| sum / n as f64)
}

/// Handles cluster aggregation.
pub struct ClusterStatsCalculator;

impl ClusterStatsCalculator {
    /// Row count and distinct non-null cluster count.
    pub fn metrics(rows: &ClusterRows) -> Metrics {
        let distinct: BTreeSet<&ClusterKey> = rows.keys.iter().flatten().collect();
        Metrics {
            total_points: rows.len(),
            cluster_count: distinct.len(),
        }
    }

    /// Group by cluster: mean latitude, mean longitude and row count, ordered by key.
    pub fn compute_summary(rows: &ClusterRows) -> Vec<ClusterSummary> {
        let mut groups: BTreeMap<&ClusterKey, Accumulator> = BTreeMap::new();

        for (i, key) in rows.keys.iter().enumerate() {
            let Some(key) = key else {
                continue;
            };
            let acc = groups.entry(key).or_default();
            acc.size += 1;
            if let Some(lat) = rows.lats[i] {
                acc.lat_sum += lat;
                acc.lat_n += 1;
            }
            if let Some(lon) = rows.lons[i] {
                acc.lon_sum += lon;
                acc.lon_n += 1;
            }
        }

        let summary: Vec<ClusterSummary> = groups
            .into_iter()
            .map(|(key, acc)| ClusterSummary {
                cluster: key.clone(),
                centroid_lat: mean(acc.lat_sum, acc.lat_n),
                centroid_lon: mean(acc.lon_sum, acc.lon_n),
                cluster_size: acc.size,
            })
            .collect();

        debug!(clusters = summary.len(), "computed cluster summary");
        summary
    }

    /// Broadcast join: every row gets its cluster's centroid and size.
    pub fn enrich(
        df: &DataFrame,
        rows: &ClusterRows,
        summary: &[ClusterSummary],
    ) -> PolarsResult<DataFrame> {
        let by_key: BTreeMap<&ClusterKey, &ClusterSummary> =
            summary.iter().map(|s| (&s.cluster, s)).collect();

        let matched: Vec<Option<&ClusterSummary>> = rows
            .keys
            .iter()
            .map(|key| key.as_ref().and_then(|k| by_key.get(k).copied()))
            .collect();

        let centroid_lat: Vec<Option<f64>> = matched
            .iter()
            .map(|s| s.and_then(|s| s.centroid_lat))
            .collect();
        let centroid_lon: Vec<Option<f64>> = matched
            .iter()
            .map(|s| s.and_then(|s| s.centroid_lon))
            .collect();
        let cluster_size: Vec<Option<u64>> = matched
            .iter()
            .map(|s| s.and_then(|s| u64::try_from(s.cluster_size).ok()))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(CENTROID_LAT_COL.into(), centroid_lat))?;
        out.with_column(Column::new(CENTROID_LON_COL.into(), centroid_lon))?;
        out.with_column(Column::new(CLUSTER_SIZE_COL.into(), cluster_size))?;
        Ok(out)
    }

    /// Mean position of every located row; None for an empty subset.
    pub fn map_center(rows: &ClusterRows) -> Option<(f64, f64)> {
        let lats: Vec<f64> = rows.lats.iter().flatten().copied().collect();
        let lons: Vec<f64> = rows.lons.iter().flatten().copied().collect();
        Some((
            mean(lats.iter().sum(), lats.len())?,
            mean(lons.iter().sum(), lons.len())?,
        ))
    }

    /// Count rows whose coordinates fall outside the valid ranges.
    pub fn count_out_of_range(rows: &ClusterRows) -> usize {
        let bad_lat = rows
            .lats
            .iter()
            .flatten()
            .filter(|lat| !(-90.0..=90.0).contains(*lat))
            .count();
        let bad_lon = rows
            .lons
            .iter()
            .flatten()
            .filter(|lon| !(-180.0..=180.0).contains(*lon))
            .count();

        let total = bad_lat + bad_lon;
        if total > 0 {
            warn!(
                latitude = bad_lat,
                longitude = bad_lon,
                "coordinates outside valid range"
            );
        }
        total
    }
}

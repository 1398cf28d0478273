//! Stats module - cluster aggregation

mod calculator;

pub use calculator::{
    ClusterKey, ClusterRows, ClusterStatsCalculator, ClusterSummary, Metrics, CENTROID_LAT_COL,
    CENTROID_LON_COL, CLUSTER_COL, CLUSTER_SIZE_COL, LATITUDE_COL, LONGITUDE_COL,
};

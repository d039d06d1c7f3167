pub const DEFAULT_C: f64 = 10.0;
pub const DEFAULT_MAX_ITERS: usize = 10;
pub const DEFAULT_GAMMA: f64 = 0.01;
pub const DEFAULT_HEATMAP_ITER: usize = 1;
pub const DEFAULT_HEATMAP_ETA: f64 = 0.2;
pub const DEFAULT_HEATMAP_DIR: &str = "viz/heatmaps";
/// Number of protected attributes drawn on a heat map.
pub const HEATMAP_ATTRIBUTES: usize = 2;

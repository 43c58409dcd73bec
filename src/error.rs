use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Every entry of one dataset must carry the same number of values.
    #[error(
        "the number of values is not homogeneous: entry {index} has {found} values, expected {expected}"
    )]
    NonHomogeneousValues {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("not enough legend keys: {required} value slots need keys, {available} provided")]
    MissingLegendKeys { required: usize, available: usize },

    #[error("invalid plot data: {0}")]
    InvalidPlotData(String),
}

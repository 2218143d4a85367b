use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// An indicator was asked for more lookback than the history holds.
    #[error("Insufficient history for {indicator}: need {required} prices, have {available}")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl AnalysisError {
    pub fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        AnalysisError::InsufficientHistory {
            indicator,
            required,
            available,
        }
    }
}

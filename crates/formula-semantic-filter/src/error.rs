pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid filter json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("value tuple is missing entry {index} (expected {arity} values)")]
    MissingTupleValue { index: usize, arity: usize },

    #[error("membership condition compares no columns")]
    EmptyScope,

    #[error("identity construction failed: {0}")]
    Identity(String),
}

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error(
        "Track pool exhausted: requested {requested} rounds, built {built} ({thin_rounds} short of options)"
    )]
    PoolExhausted {
        requested: usize,
        built: usize,
        thin_rounds: usize,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

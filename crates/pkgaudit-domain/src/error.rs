#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid tag filter glob {pattern:?}")]
    InvalidTagFilter {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

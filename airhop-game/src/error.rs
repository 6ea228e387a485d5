//! Error taxonomy shared by players, airports and the engine.
use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while loading, mutating or persisting game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{entity} not found for `{key}`")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} lookup for `{key}` matched {count} rows, expected exactly one")]
    Ambiguous {
        entity: &'static str,
        key: String,
        count: usize,
    },
    #[error("required field `{field}` is absent")]
    MissingField { field: &'static str },
    #[error("field `{field}` has an unusable value `{value}`")]
    InvalidField { field: &'static str, value: String },
    #[error("player `{name}` has no time left in this round")]
    RoundOver { name: String },
    #[error("store unavailable: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl GameError {
    /// Wrap a store failure so it propagates to the caller untouched.
    pub fn store<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn ambiguous(entity: &'static str, key: impl Into<String>, count: usize) -> Self {
        Self::Ambiguous {
            entity,
            key: key.into(),
            count,
        }
    }

    /// True when the failure came from the store rather than game data.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type GameResult<T> = Result<T, GameError>;

/// Pick the single row out of a lookup that must match exactly once.
///
/// # Errors
///
/// Returns [`GameError::NotFound`] for zero rows and [`GameError::Ambiguous`]
/// for more than one.
pub(crate) fn exactly_one<T>(rows: Vec<T>, entity: &'static str, key: &str) -> GameResult<T> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(GameError::not_found(entity, key)),
        (Some(_), _) => Err(GameError::ambiguous(entity, key, count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_branches_on_count() {
        assert_eq!(exactly_one(vec![7], "thing", "k").unwrap(), 7);
        assert!(matches!(
            exactly_one(Vec::<u8>::new(), "thing", "k"),
            Err(GameError::NotFound { entity: "thing", .. })
        ));
        assert!(matches!(
            exactly_one(vec![1, 2, 3], "thing", "k"),
            Err(GameError::Ambiguous { count: 3, .. })
        ));
    }

    #[test]
    fn store_errors_keep_their_source() {
        let err = GameError::store(std::io::Error::other("disk gone"));
        assert!(err.is_store());
        assert!(err.to_string().contains("disk gone"));
        assert!(StdError::source(&err).is_some());
    }
}

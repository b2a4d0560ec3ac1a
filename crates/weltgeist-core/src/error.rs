use std::fmt;

/// Which collection an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Category,
    Relationship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Event => "event",
            Self::Category => "category",
            Self::Relationship => "relationship",
        };
        f.write_str(s)
    }
}

/// Rejections raised by the store, hierarchy and layout.
///
/// Every variant is recoverable: the rejected operation leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{kind} already exists: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("invalid date: {raw:?}")]
    InvalidDate { raw: String },

    #[error("{field} must be within 0..=100, got {value}")]
    OutOfRange { field: &'static str, value: u8 },

    #[error("invalid category hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("invalid time range: {start} is not before {end}")]
    InvalidTimeRange { start: String, end: String },
}

impl CoreError {
    pub fn duplicate(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn check_percent(field: &'static str, value: u8) -> CoreResult<u8> {
    if value > 100 {
        return Err(CoreError::OutOfRange { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_collection() {
        let err = CoreError::not_found(EntityKind::Relationship, "edge-9");
        assert_eq!(err.to_string(), "relationship not found: edge-9");
        assert!(err.is_not_found());

        let err = CoreError::duplicate(EntityKind::Event, "event-politics-1");
        assert_eq!(err.to_string(), "event already exists: event-politics-1");
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(check_percent("strength", 100), Ok(100));
        assert_eq!(
            check_percent("impact", 101),
            Err(CoreError::OutOfRange {
                field: "impact",
                value: 101
            })
        );
    }
}

//! Error kinds shared by every layer.
//!
//! Nothing here is retried or recovered internally; every failure is handed
//! back to the caller with enough context (operation, bound, capability) to
//! diagnose it without looking at container internals.

/// Which bound or rule a precondition failure broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("cursor is already at end")]
    PastEnd,

    #[error("cursor is already at begin")]
    BeforeBegin,

    #[error("the before-begin position holds no element")]
    NotDereferenceable,

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    #[error("{width}-byte access at offset {offset} exceeds length {len}")]
    OffsetOutOfBounds { offset: usize, width: usize, len: usize },

    #[error("unsupported integer width of {0} bytes (expected 1, 2 or 4)")]
    UnsupportedWidth(usize),

    #[error("value {value} does not fit in {width} bytes")]
    ValueOutOfRange { value: i64, width: usize },

    #[error("cursor outlived a mutation of its container")]
    StaleCursor,

    #[error("container has been released")]
    ContainerReleased,

    #[error("cursors belong to different containers")]
    ForeignCursor,

    #[error("end position was never reached")]
    Unreachable,

    #[error("buffer is borrowed by a live byte view")]
    BufferBorrowed,

    #[error("cannot allocate {requested} bytes")]
    CapacityOverflow { requested: usize },

    #[error("requested capacity {requested} is below the current length {len}")]
    ShrinkBelowLength { requested: usize, len: usize },
}

/// Runtime failures of cursors, containers and algorithms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("precondition violated in `{operation}`: {violation}")]
    Precondition {
        operation: &'static str,
        violation: Violation,
    },

    #[error("`{operation}` called on an empty container")]
    EmptyContainer { operation: &'static str },

    #[error("`{operation}` is not supported by {type_name}")]
    Unsupported {
        operation: &'static str,
        type_name: &'static str,
    },

    #[error("{type_name} does not conform to `{concept}`: missing {missing:?}")]
    CapabilityMismatch {
        type_name: &'static str,
        concept: &'static str,
        missing: Vec<String>,
    },

    #[error("output adaptor misuse in `{operation}`: {reason}")]
    Misuse {
        operation: &'static str,
        reason: &'static str,
    },
}

impl CursorError {
    pub(crate) fn precondition(operation: &'static str, violation: Violation) -> Self {
        Self::Precondition { operation, violation }
    }

    pub(crate) fn empty(operation: &'static str) -> Self {
        Self::EmptyContainer { operation }
    }

    /// Failure raised by a stub member.
    #[must_use]
    pub fn unsupported<T: ?Sized>(operation: &'static str) -> Self {
        Self::Unsupported {
            operation,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub(crate) fn misuse(operation: &'static str, reason: &'static str) -> Self {
        Self::Misuse { operation, reason }
    }

    /// The violated bound, if this is a precondition failure.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Precondition { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// Failures raised while declaring concepts or composing capability bundles.
///
/// These surface once, when a type's shape is built, never per call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("concept refinement cycle: {}", path.join(" -> "))]
    CyclicConcept { path: Vec<&'static str> },

    #[error("member `{member}` already has a concrete implementation on {target}")]
    Overwrite {
        member: &'static str,
        target: &'static str,
    },

    #[error("member `{member}` is not declared by concept `{concept}`")]
    UndeclaredMember {
        member: &'static str,
        concept: &'static str,
    },

    #[error(transparent)]
    Mismatch(#[from] CursorError),
}

/// Failures while loading a [`crate::config::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

pub type Result<T, E = CursorError> = core::result::Result<T, E>;

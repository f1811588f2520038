use thiserror::Error;

/// Problems found while turning a configuration into operation and binding
/// tables. All of these surface at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid keychord {spec:?}: {reason}")]
    Keychord { spec: String, reason: String },

    #[error("invalid formula {formula:?} at offset {offset}: {reason}")]
    Formula {
        formula: String,
        offset: usize,
        reason: String,
    },

    #[error("operation {operation:?} has unknown kind {kind:?} (expected move or push)")]
    UnknownKind { operation: String, kind: String },

    #[error("operation {operation:?} is missing parameter {parameter:?}")]
    MissingParameter {
        operation: String,
        parameter: &'static str,
    },

    #[error("unknown push direction {0:?}")]
    UnknownDirection(String),

    #[error("unknown push style {0:?}")]
    UnknownStyle(String),

    #[error("keychord {keychord} is bound to both {first:?} and {second:?}")]
    DuplicateBinding {
        keychord: String,
        first: String,
        second: String,
    },

    #[error("keychord {keychord} refers to undeclared operation {operation:?}")]
    UnknownOperation { keychord: String, operation: String },
}

/// Arithmetic failures while evaluating a formula against live metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero in {0:?}")]
    DivisionByZero(String),

    #[error("formula {0:?} produced a non-finite value")]
    NonFinite(String),
}

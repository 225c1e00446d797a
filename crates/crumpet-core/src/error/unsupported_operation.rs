use super::Error;

/// Error when a SQL flavor has no rendering rule for a statement.
#[derive(Debug)]
pub(super) struct UnsupportedOperationError {
    flavor: &'static str,
    operation: Box<str>,
}

impl std::error::Error for UnsupportedOperationError {}

impl core::fmt::Display for UnsupportedOperationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported operation: {} is not supported by the {} grammar",
            self.operation, self.flavor
        )
    }
}

impl Error {
    /// Creates an unsupported operation error.
    ///
    /// Raised by the serializer when the target flavor cannot render the
    /// requested command.
    pub fn unsupported_operation(flavor: &'static str, operation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedOperation(
            UnsupportedOperationError {
                flavor,
                operation: operation.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported operation error.
    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedOperation(_))
    }
}

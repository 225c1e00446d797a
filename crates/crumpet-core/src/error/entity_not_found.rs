use super::Error;

/// Error when a lookup that requires a row finds none.
#[derive(Debug)]
pub(super) struct EntityNotFoundError {
    pub(super) context: Option<Box<str>>,
}

impl std::error::Error for EntityNotFoundError {}

impl core::fmt::Display for EntityNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("entity not found")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an entity not found error.
    ///
    /// The context parameter describes what was looked up, e.g.
    /// `"table=users key=1"`.
    pub fn entity_not_found(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EntityNotFound(EntityNotFoundError {
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error is an entity not found error.
    pub fn is_entity_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EntityNotFound(_))
    }
}

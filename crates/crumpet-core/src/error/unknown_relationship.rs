use super::Error;

/// Error when a relationship name is not declared on a model.
#[derive(Debug)]
pub(super) struct UnknownRelationshipError {
    model: Box<str>,
    relationship: Box<str>,
}

impl std::error::Error for UnknownRelationshipError {}

impl core::fmt::Display for UnknownRelationshipError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown relationship: model `{}` does not declare `{}`",
            self.model, self.relationship
        )
    }
}

impl Error {
    pub fn unknown_relationship(model: impl Into<String>, relationship: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownRelationship(
            UnknownRelationshipError {
                model: model.into().into(),
                relationship: relationship.into().into(),
            },
        ))
    }

    pub fn is_unknown_relationship(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownRelationship(_))
    }
}

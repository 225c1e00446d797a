use super::Error;

/// Error when relationship dependencies cannot be ordered.
#[derive(Debug)]
pub(super) struct InvalidRelationshipDependencyError {
    model: Box<str>,
    relationship: Box<str>,
    dependency: Box<str>,
}

impl std::error::Error for InvalidRelationshipDependencyError {}

impl core::fmt::Display for InvalidRelationshipDependencyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.relationship == self.dependency {
            write!(
                f,
                "invalid relationship dependency: `{}.{}` depends on itself",
                self.model, self.relationship
            )
        } else {
            write!(
                f,
                "invalid relationship dependency: `{}.{}` and `{}.{}` depend on each other",
                self.model, self.relationship, self.model, self.dependency
            )
        }
    }
}

impl Error {
    /// Creates an invalid relationship dependency error.
    ///
    /// When `relationship` and `dependency` are equal the relationship
    /// depends on itself, otherwise the two form a cycle.
    pub fn invalid_relationship_dependency(
        model: impl Into<String>,
        relationship: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidRelationshipDependency(
            InvalidRelationshipDependencyError {
                model: model.into().into(),
                relationship: relationship.into().into(),
                dependency: dependency.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid relationship dependency error.
    pub fn is_invalid_relationship_dependency(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::InvalidRelationshipDependency(_)
        )
    }
}

use crate::{schema::ModelBuilder, Entity, Result};

/// A declared entity type.
///
/// Implementations name the model and declare its table, attributes and
/// relationships. Entities themselves are untyped [`Entity`] values; the
/// type only selects which schema entry they belong to.
///
/// ```
/// use crumpet::{schema::ModelBuilder, Model};
///
/// struct Post;
/// struct Comment;
///
/// impl Model for Post {
///     const NAME: &'static str = "Post";
///
///     fn declare(model: &mut ModelBuilder) {
///         model.timestamps().fillable(["title", "body"]);
///         model.has_many::<Comment>("comments");
///     }
/// }
///
/// impl Model for Comment {
///     const NAME: &'static str = "Comment";
/// }
/// ```
pub trait Model: 'static {
    /// Unique model name. Table and key conventions derive from it.
    const NAME: &'static str;

    fn declare(model: &mut ModelBuilder) {
        let _ = model;
    }

    /// Runs before an entity is written. Returning an error aborts the save.
    fn saving(entity: &mut Entity) -> Result<()> {
        let _ = entity;
        Ok(())
    }

    fn saved(entity: &Entity) -> Result<()> {
        let _ = entity;
        Ok(())
    }

    /// Runs before an entity is deleted. Returning an error aborts the
    /// delete.
    fn deleting(entity: &Entity) -> Result<()> {
        let _ = entity;
        Ok(())
    }

    fn deleted(entity: &Entity) -> Result<()> {
        let _ = entity;
        Ok(())
    }
}

/// Lifecycle hooks of a registered model, captured at registration.
#[derive(Clone, Copy)]
pub(crate) struct Hooks {
    pub(crate) saving: fn(&mut Entity) -> Result<()>,
    pub(crate) saved: fn(&Entity) -> Result<()>,
    pub(crate) deleting: fn(&Entity) -> Result<()>,
    pub(crate) deleted: fn(&Entity) -> Result<()>,
}

impl Hooks {
    pub(crate) fn of<M: Model>() -> Hooks {
        Hooks {
            saving: M::saving,
            saved: M::saved,
            deleting: M::deleting,
            deleted: M::deleted,
        }
    }

    /// Hooks that do nothing, for entities with no registered model.
    pub(crate) fn none() -> Hooks {
        Hooks {
            saving: |_| Ok(()),
            saved: |_| Ok(()),
            deleting: |_| Ok(()),
            deleted: |_| Ok(()),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

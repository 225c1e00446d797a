use super::ModelId;

/// A named edge from one model to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Name the relationship is declared and loaded under
    pub name: String,

    /// Related model
    pub target: ModelId,

    pub kind: RelationKind,

    /// Relationships of the same model that must be eager loaded first
    pub after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelationKind {
    BelongsTo(BelongsTo),
    HasOne(HasOne),
    HasMany(HasMany),
    HasManyAndBelongsTo(HasManyAndBelongsTo),
}

/// n:1, the foreign key lives on the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct BelongsTo {
    pub foreign_key: String,
}

/// 1:1, the foreign key lives on the related model.
#[derive(Debug, Clone, PartialEq)]
pub struct HasOne {
    pub foreign_key: String,
}

/// 1:n, the foreign key lives on the related model.
#[derive(Debug, Clone, PartialEq)]
pub struct HasMany {
    pub foreign_key: String,
}

/// n:m through a join table.
#[derive(Debug, Clone, PartialEq)]
pub struct HasManyAndBelongsTo {
    /// The join table
    pub table: String,

    /// Join table column holding the owner's key
    pub foreign_key: String,

    /// Join table column holding the related model's key
    pub other_key: String,

    /// Extra join table columns surfaced on the pivot entity
    pub pivot_columns: Vec<String>,
}

impl Relation {
    /// True when the relationship resolves to at most one entity.
    pub fn is_single(&self) -> bool {
        match self.kind {
            RelationKind::BelongsTo(_) | RelationKind::HasOne(_) => true,
            RelationKind::HasMany(_) | RelationKind::HasManyAndBelongsTo(_) => false,
        }
    }

    pub fn foreign_key(&self) -> &str {
        match &self.kind {
            RelationKind::BelongsTo(rel) => &rel.foreign_key,
            RelationKind::HasOne(rel) => &rel.foreign_key,
            RelationKind::HasMany(rel) => &rel.foreign_key,
            RelationKind::HasManyAndBelongsTo(rel) => &rel.foreign_key,
        }
    }
}

/// Which kind of relationship a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationDecl {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyAndBelongsTo,
}

/// A relationship declaration with its unresolved names.
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    pub name: String,

    /// Name of the related model
    pub target: &'static str,

    pub decl: RelationDecl,

    pub foreign_key: Option<String>,

    /// Join table, many-to-many only
    pub table: Option<String>,

    /// Join table column pointing at the related model, many-to-many only
    pub other_key: Option<String>,

    pub pivot_columns: Vec<String>,

    pub after: Vec<String>,
}

impl RelationBuilder {
    pub(crate) fn new(name: &str, target: &'static str, decl: RelationDecl) -> RelationBuilder {
        RelationBuilder {
            name: name.to_string(),
            target,
            decl,
            foreign_key: None,
            table: None,
            other_key: None,
            pivot_columns: vec![],
            after: vec![],
        }
    }

    pub fn foreign_key(&mut self, column: impl Into<String>) -> &mut Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn other_key(&mut self, column: impl Into<String>) -> &mut Self {
        self.other_key = Some(column.into());
        self
    }

    /// Extra join table columns to load onto each related entity's pivot.
    pub fn with_pivot<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if !self.pivot_columns.contains(&column) {
                self.pivot_columns.push(column);
            }
        }
        self
    }

    /// Load and stamp `created_at` / `updated_at` on join rows.
    pub fn with_timestamps(&mut self) -> &mut Self {
        self.with_pivot(["created_at", "updated_at"])
    }

    /// Relationships of the same model to eager load before this one.
    pub fn after<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }
}

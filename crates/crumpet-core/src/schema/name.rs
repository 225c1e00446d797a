use heck::ToSnakeCase;

/// A model name and the naming conventions derived from it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(src: impl Into<String>) -> Name {
        Name(src.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `BlogPost` → `blog_post`
    pub fn snake_case(&self) -> String {
        self.0.to_snake_case()
    }

    /// Default table: `BlogPost` → `blog_posts`
    pub fn table_name(&self) -> String {
        pluralizer::pluralize(&self.snake_case(), 2, false)
    }

    /// Default key pointing at this model: `BlogPost` → `blog_post_id`
    pub fn foreign_key(&self) -> String {
        format!("{}_id", self.snake_case())
    }

    /// Default join table between two models: the snake-cased names, sorted,
    /// joined by `_`.
    pub fn join_table(&self, other: &Name) -> String {
        let mut names = [self.snake_case(), other.snake_case()];
        names.sort();
        names.join("_")
    }
}

use super::Raw;

/// A column (or table) reference inside a statement.
///
/// Names may be qualified (`"users.name"`) and may use the `*` wildcard.
/// Strings of the form `"name as alias"` are split into an aliased column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Name(String),
    Aliased { name: String, alias: String },
    Raw(Raw),
}

impl Column {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Aliased {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    fn parse(src: &str) -> Self {
        match find_alias(src) {
            Some(at) => Self::aliased(src[..at].trim(), src[at + 4..].trim()),
            None => Self::Name(src.trim().to_string()),
        }
    }
}

/// Byte offset of a case-insensitive `" as "` separator.
fn find_alias(src: &str) -> Option<usize> {
    src.as_bytes()
        .windows(4)
        .position(|window| window.eq_ignore_ascii_case(b" as "))
}

impl From<&str> for Column {
    fn from(src: &str) -> Self {
        Self::parse(src)
    }
}

impl From<&String> for Column {
    fn from(src: &String) -> Self {
        Self::parse(src)
    }
}

impl From<String> for Column {
    fn from(src: String) -> Self {
        Self::parse(&src)
    }
}

impl From<Raw> for Column {
    fn from(src: Raw) -> Self {
        Self::Raw(src)
    }
}

impl From<&Column> for Column {
    fn from(src: &Column) -> Self {
        src.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_qualified() {
        assert_eq!(Column::from("name"), Column::Name("name".into()));
        assert_eq!(Column::from("users.name"), Column::Name("users.name".into()));
    }

    #[test]
    fn parse_alias_any_case() {
        assert_eq!(
            Column::from("post_tag.created_at AS pivot_created_at"),
            Column::aliased("post_tag.created_at", "pivot_created_at")
        );
        assert_eq!(Column::from("id as key"), Column::aliased("id", "key"));
    }
}

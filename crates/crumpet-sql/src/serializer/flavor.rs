use super::Serializer;

use crumpet_core::driver::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Generic,
    Postgresql,
    Mysql,
    Sqlite,
    SqlServer,
}

impl Flavor {
    pub(super) fn name(self) -> &'static str {
        match self {
            Flavor::Generic => "generic",
            Flavor::Postgresql => "postgresql",
            Flavor::Mysql => "mysql",
            Flavor::Sqlite => "sqlite",
            Flavor::SqlServer => "sqlserver",
        }
    }

    /// Opening and closing identifier quotes.
    pub(super) fn quotes(self) -> (char, char) {
        match self {
            Flavor::Mysql => ('`', '`'),
            Flavor::SqlServer => ('[', ']'),
            Flavor::Generic | Flavor::Postgresql | Flavor::Sqlite => ('"', '"'),
        }
    }

    pub(super) fn datetime_format(self) -> &'static str {
        match self {
            Flavor::SqlServer => "%Y-%m-%d %H:%M:%S%.3f",
            _ => "%Y-%m-%d %H:%M:%S",
        }
    }

    pub(super) fn supports_returning(self) -> bool {
        matches!(self, Flavor::Postgresql)
    }
}

impl From<Dialect> for Flavor {
    fn from(value: Dialect) -> Flavor {
        match value {
            Dialect::Generic => Flavor::Generic,
            Dialect::Postgresql => Flavor::Postgresql,
            Dialect::Mysql => Flavor::Mysql,
            Dialect::Sqlite => Flavor::Sqlite,
            Dialect::SqlServer => Flavor::SqlServer,
        }
    }
}

impl Serializer {
    pub fn new(dialect: Dialect) -> Serializer {
        Serializer {
            flavor: dialect.into(),
        }
    }

    pub fn generic() -> Serializer {
        Serializer {
            flavor: Flavor::Generic,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }

    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn sql_server() -> Serializer {
        Serializer {
            flavor: Flavor::SqlServer,
        }
    }

    pub(super) fn is_mysql(&self) -> bool {
        matches!(self.flavor, Flavor::Mysql)
    }

    pub(super) fn is_sqlite(&self) -> bool {
        matches!(self.flavor, Flavor::Sqlite)
    }

    pub(super) fn is_sql_server(&self) -> bool {
        matches!(self.flavor, Flavor::SqlServer)
    }
}

/// SQL dialect spoken by a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// ANSI-ish SQL with `"` quoting and `?` placeholders
    Generic,
    Postgresql,
    Mysql,
    Sqlite,
    SqlServer,
}

#[derive(Debug)]
pub struct Capability {
    /// Dialect statements are compiled for.
    pub dialect: Dialect,

    /// Inserts can return the generated key with `RETURNING`. When false the
    /// driver reports the key itself (e.g. `last_insert_rowid()`).
    pub insert_returning: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        insert_returning: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgresql,
        insert_returning: true,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        ..Self::SQLITE
    };

    /// SQL Server capabilities
    pub const SQL_SERVER: Self = Self {
        dialect: Dialect::SqlServer,
        ..Self::SQLITE
    };

    /// Generic SQL capabilities
    pub const GENERIC: Self = Self {
        dialect: Dialect::Generic,
        ..Self::SQLITE
    };
}

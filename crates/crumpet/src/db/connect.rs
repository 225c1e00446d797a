use crate::{Error, Result};

use crumpet_core::{
    async_trait,
    driver::{Capability, Connection, Driver},
};

use url::Url;

/// A driver selected by the scheme of a connection URL.
#[derive(Debug)]
pub struct Connect {
    url: Url,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|err| Error::from(anyhow::Error::from(err)))?;
        Ok(Self { url })
    }
}

#[async_trait]
impl Driver for Connect {
    fn capability(&self) -> &'static Capability {
        match self.url.scheme() {
            "sqlite" => &Capability::SQLITE,
            "postgres" | "postgresql" => &Capability::POSTGRESQL,
            "mysql" => &Capability::MYSQL,
            "mssql" | "sqlserver" => &Capability::SQL_SERVER,
            _ => &Capability::GENERIC,
        }
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        match self.url.scheme() {
            "sqlite" => connect_sqlite(&self.url).await,
            scheme => Err(crate::err!(
                "unsupported database; scheme={scheme}; url={}",
                self.url
            )),
        }
    }
}

#[cfg(feature = "sqlite")]
async fn connect_sqlite(url: &Url) -> Result<Box<dyn Connection>> {
    crumpet_driver_sqlite::Sqlite::new(url.as_str())?
        .connect()
        .await
}

#[cfg(not(feature = "sqlite"))]
async fn connect_sqlite(_url: &Url) -> Result<Box<dyn Connection>> {
    Err(crate::err!("`sqlite` feature not enabled"))
}

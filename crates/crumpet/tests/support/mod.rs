#![allow(dead_code)]

pub mod models;

use crumpet::{db::Builder, stmt::Value, Attributes, Db, Result};
use crumpet_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Operation, Response, Row},
};

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A driver whose connection answers from a script and records every
/// operation it is handed.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    log: Vec<Operation>,

    /// Answers, in order. When empty, queries return no rows and writes
    /// affect one row.
    responses: VecDeque<Result<Response>>,

    next_key: i64,
}

impl Scripted {
    pub fn new() -> Scripted {
        Scripted::default()
    }

    /// Answer the next operation with `rows`.
    pub fn rows(&self, rows: Vec<Row>) -> &Self {
        self.push(Ok(Response::values(rows)))
    }

    pub fn count(&self, count: u64) -> &Self {
        self.push(Ok(Response::count(count)))
    }

    pub fn fail(&self, message: &str) -> &Self {
        let err = std::io::Error::new(std::io::ErrorKind::Other, message.to_string());
        self.push(Err(crumpet::Error::driver(err)))
    }

    fn push(&self, response: Result<Response>) -> &Self {
        self.state.lock().unwrap().responses.push_back(response);
        self
    }

    pub fn log(&self) -> ExecLog {
        ExecLog {
            state: self.state.clone(),
        }
    }

    /// A handle over this driver with every test model registered.
    pub async fn db(&self) -> Db {
        self.db_with(|_| {}).await
    }

    pub async fn db_with(&self, f: impl FnOnce(&mut Builder)) -> Db {
        let mut builder = models::builder();
        f(&mut builder);
        builder.build(self.clone()).await.unwrap()
    }
}

#[async_trait]
impl Driver for Scripted {
    fn capability(&self) -> &'static Capability {
        &Capability::GENERIC
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl Connection for Scripted {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        state.log.push(op.clone());

        if let Some(response) = state.responses.pop_front() {
            return response;
        }

        Ok(match op {
            Operation::QuerySql(_) => Response::values(vec![]),
            Operation::ExecSql(op) if op.generated_key => {
                state.next_key += 1;
                Response::inserted(1, Value::I64(state.next_key))
            }
            Operation::ExecSql(_) => Response::count(1),
            Operation::Transaction(_) => Response::count(0),
        })
    }
}

/// Operations a [`Scripted`] connection received.
pub struct ExecLog {
    state: Arc<Mutex<State>>,
}

impl ExecLog {
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().log.clear();
    }

    /// Remove and return the first logged operation.
    pub fn pop(&self) -> Option<Operation> {
        let mut state = self.state.lock().unwrap();
        if state.log.is_empty() {
            None
        } else {
            Some(state.log.remove(0))
        }
    }

    /// SQL of every logged operation; transaction control shows as
    /// `BEGIN`, `COMMIT` or `ROLLBACK`.
    pub fn statements(&self) -> Vec<String> {
        use crumpet_core::driver::operation::Transaction;

        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .map(|op| match op {
                Operation::QuerySql(op) => op.sql.clone(),
                Operation::ExecSql(op) => op.sql.clone(),
                Operation::Transaction(Transaction::Start) => "BEGIN".to_string(),
                Operation::Transaction(Transaction::Commit) => "COMMIT".to_string(),
                Operation::Transaction(Transaction::Rollback) => "ROLLBACK".to_string(),
            })
            .collect()
    }

    /// Bindings of the logged operation at `index`.
    pub fn bindings(&self, index: usize) -> Vec<Value> {
        self.state.lock().unwrap().log[index].bindings().to_vec()
    }
}

/// Build a row from column/value pairs.
pub fn row<const N: usize>(columns: [(&str, Value); N]) -> Row {
    columns
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn attributes<const N: usize>(columns: [(&str, Value); N]) -> Attributes {
    row(columns)
}

//! The boundary between the façade and whatever actually talks to
//! Snowflake.
//!
//! Result cells stay in the string form the server returns them in; the
//! façade's SHOW/DESC post-processing never needs typed cells.

use std::collections::HashMap;

use crate::errors::ConnectorError;

/// Executes SQL statements against a single logical Snowflake session.
///
/// Implementations must keep session state (current role, warehouse,
/// database, schema) alive across calls, since the façade drives context
/// through `use` statements.
pub trait QueryExecutor {
    /// Execute a single SQL statement.
    fn execute_query(&self, sql: &str) -> Result<ResultSet, ConnectorError>;

    /// Execute a script that may contain several `;`-separated statements,
    /// returning the last statement's result.
    fn execute_queries(&self, script: &str) -> Result<ResultSet, ConnectorError> {
        let mut last = ResultSet::empty();
        for statement in split_statements(script) {
            last = self.execute_query(&statement)?;
        }
        Ok(last)
    }
}

/// Splits a SQL script into statements on `;`, skipping separators inside
/// string literals, quoted identifiers, and `--` or `/* */` comments.
pub fn split_statements(script: &str) -> Vec<String> {
    let bytes = script.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 2,
                        b'\'' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'"' => {
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'"' if bytes.get(i + 1) == Some(&b'"') => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b';' => {
                let statement = script[start..i].trim();
                if !statement.is_empty() {
                    statements.push(statement.to_owned());
                }
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    let tail = script[start..].trim();
    if !tail.is_empty() {
        statements.push(tail.to_owned());
    }
    statements
}

/// A SHOW/DESC-style row rendered as a column-name → nullable-value map.
pub type RowMap = HashMap<String, Option<String>>;

/// The rows returned for one statement.
///
/// The row count is what the server *reported*; it can be unknown, which is
/// a different condition from zero.
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    row_count: Option<usize>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> ResultSet {
        let row_count = Some(rows.len());
        ResultSet {
            columns,
            rows,
            row_count,
        }
    }

    /// A result set whose reported row count differs from (or is unknown
    /// for) the rows actually fetched.
    pub fn with_row_count(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
        row_count: Option<usize>,
    ) -> ResultSet {
        ResultSet {
            columns,
            rows,
            row_count,
        }
    }

    pub fn empty() -> ResultSet {
        ResultSet::new(Vec::new(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The server-reported row count; `None` when the server did not say.
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<Row<'_>> {
        self.rows.first().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// The first row's first column, when present and non-NULL.
    pub fn scalar(&self) -> Option<&str> {
        self.rows.first()?.first()?.as_deref()
    }
}

/// One row of a [`ResultSet`], with positional and by-name access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Option<String>],
}

impl<'a> Row<'a> {
    /// The value under `column`, matched case-insensitively. `None` for an
    /// unknown column or a NULL cell.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self
            .columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))?;
        self.values.get(index)?.as_deref()
    }

    pub fn index(&self, index: usize) -> Option<&'a str> {
        self.values.get(index)?.as_deref()
    }

    pub fn to_map(&self) -> RowMap {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    use super::{QueryExecutor, ResultSet};
    use crate::errors::ConnectorError;

    /// Replays canned results keyed by exact statement text and records
    /// every statement it sees, so tests can assert the full sequence,
    /// restoration statements included. Statements with no canned entry get
    /// an empty result.
    #[derive(Default, Debug)]
    pub(crate) struct MockExecutor {
        responses: RefCell<HashMap<String, VecDeque<Result<ResultSet, ConnectorError>>>>,
        executed: RefCell<Vec<String>>,
    }

    impl MockExecutor {
        pub fn new() -> MockExecutor {
            MockExecutor::default()
        }

        pub fn respond(self, sql: &str, result: ResultSet) -> MockExecutor {
            self.push(sql, Ok(result));
            self
        }

        pub fn fail(self, sql: &str, error: ConnectorError) -> MockExecutor {
            self.push(sql, Err(error));
            self
        }

        pub fn executed(&self) -> Vec<String> {
            self.executed.borrow().clone()
        }

        fn push(&self, sql: &str, result: Result<ResultSet, ConnectorError>) {
            self.responses
                .borrow_mut()
                .entry(sql.to_owned())
                .or_default()
                .push_back(result);
        }
    }

    impl QueryExecutor for MockExecutor {
        fn execute_query(&self, sql: &str) -> Result<ResultSet, ConnectorError> {
            self.executed.borrow_mut().push(sql.to_owned());
            if let Some(queue) = self.responses.borrow_mut().get_mut(sql) {
                if let Some(result) = queue.pop_front() {
                    return result;
                }
            }
            Ok(ResultSet::empty())
        }
    }

    pub(crate) fn scalar(value: &str) -> ResultSet {
        ResultSet::new(vec![String::new()], vec![vec![Some(value.to_owned())]])
    }

    pub(crate) fn table(columns: &[&str], rows: &[&[&str]]) -> ResultSet {
        ResultSet::new(
            columns.iter().map(|c| (*c).to_owned()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| Some((*cell).to_owned())).collect())
                .collect(),
        )
    }
}

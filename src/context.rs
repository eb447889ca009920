//! Session context switching.
//!
//! Every switch follows the same protocol: probe the current value, skip
//! the whole dance if it already matches, otherwise issue `use` and arm a
//! guard that issues the reverse `use` on drop. Guards are acquired
//! outer-to-inner (role first, since later probes run under the switched
//! role) and Rust's reverse drop order restores inner-to-outer on every
//! exit path, `?` returns included.

use std::fmt;

use crate::errors::{
    unclassified_error, FacadeError, FacadeResult, DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED,
};
use crate::executor::QueryExecutor;
use crate::facade::SqlFacade;
use crate::identifier::{same_identifier, to_identifier};

/// A session dimension that can be switched with a `use` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseObjectType {
    Role,
    Warehouse,
    Database,
    Schema,
}

impl UseObjectType {
    fn current_query(self) -> &'static str {
        match self {
            UseObjectType::Role => "select current_role()",
            UseObjectType::Warehouse => "select current_warehouse()",
            UseObjectType::Database => "select current_database()",
            UseObjectType::Schema => "select current_schema()",
        }
    }
}

impl fmt::Display for UseObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UseObjectType::Role => "role",
            UseObjectType::Warehouse => "warehouse",
            UseObjectType::Database => "database",
            UseObjectType::Schema => "schema",
        })
    }
}

/// Switches one context dimension back when dropped.
///
/// The previous value is restored verbatim as the server reported it;
/// re-quoting could change which object it names. A restore failure cannot
/// propagate out of `Drop`, so it is logged instead.
#[must_use = "dropping the guard immediately restores the previous context before the operation runs"]
#[derive(Debug)]
pub(crate) struct ContextGuard<'a, E: QueryExecutor> {
    executor: &'a E,
    restore: Option<(UseObjectType, String)>,
}

impl<'a, E: QueryExecutor> ContextGuard<'a, E> {
    fn noop(executor: &'a E) -> ContextGuard<'a, E> {
        ContextGuard {
            executor,
            restore: None,
        }
    }
}

impl<E: QueryExecutor> Drop for ContextGuard<'_, E> {
    fn drop(&mut self) {
        if let Some((object_type, previous)) = self.restore.take() {
            log::debug!("Switching back to {object_type}: {previous}");
            if let Err(err) = self
                .executor
                .execute_query(&format!("use {object_type} {previous}"))
            {
                log::warn!("Failed to switch back to {object_type} {previous}: {err}");
            }
        }
    }
}

impl<E: QueryExecutor> SqlFacade<E> {
    /// Issues `use <dimension> <name>`; `name` must already be a valid
    /// identifier.
    pub(crate) fn use_object(&self, object_type: UseObjectType, name: &str) -> FacadeResult<()> {
        match self
            .executor()
            .execute_query(&format!("use {object_type} {name}"))
        {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED) => {
                Err(FacadeError::CouldNotUseObject {
                    object_type,
                    name: name.to_owned(),
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to use {object_type} {name}."),
            )),
        }
    }

    /// Switches a context dimension for the lifetime of the returned guard.
    ///
    /// No statements are issued when no override was requested or when the
    /// current value already names the same object. An empty probe result
    /// means there is nothing to restore; the switch still happens.
    pub(crate) fn use_object_optional(
        &self,
        object_type: UseObjectType,
        name: Option<&str>,
    ) -> FacadeResult<ContextGuard<'_, E>> {
        let Some(name) = name else {
            return Ok(ContextGuard::noop(self.executor()));
        };

        let current = self
            .executor()
            .execute_query(object_type.current_query())
            .map_err(|err| {
                unclassified_error(err, format!("Failed to select current {object_type}."))
            })?;
        let previous = current.scalar().map(str::to_owned);

        if let Some(previous) = &previous {
            if same_identifier(previous, name) {
                return Ok(ContextGuard::noop(self.executor()));
            }
        }

        log::debug!("Switching to {object_type}: {name}");
        self.use_object(object_type, &to_identifier(name))?;
        Ok(ContextGuard {
            executor: self.executor(),
            restore: previous.map(|previous| (object_type, previous)),
        })
    }

    pub(crate) fn use_role_optional(&self, role: Option<&str>) -> FacadeResult<ContextGuard<'_, E>> {
        self.use_object_optional(UseObjectType::Role, role)
    }

    pub(crate) fn use_warehouse_optional(
        &self,
        warehouse: Option<&str>,
    ) -> FacadeResult<ContextGuard<'_, E>> {
        self.use_object_optional(UseObjectType::Warehouse, warehouse)
    }

    pub(crate) fn use_database_optional(
        &self,
        database: Option<&str>,
    ) -> FacadeResult<ContextGuard<'_, E>> {
        self.use_object_optional(UseObjectType::Database, database)
    }

    pub(crate) fn use_schema_optional(
        &self,
        schema: Option<&str>,
    ) -> FacadeResult<ContextGuard<'_, E>> {
        self.use_object_optional(UseObjectType::Schema, schema)
    }
}

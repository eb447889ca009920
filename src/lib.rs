//! SQL façade for managing Snowflake Native Application objects.
//!
//! This crate turns high-level actions on application packages,
//! applications, versions/patches and their supporting objects (schemas,
//! stages, grants) into SQL statements, runs them through a
//! [`QueryExecutor`], and translates raw connector failures into a closed
//! set of user-facing error kinds.
//!
//! Operations that need a different role, warehouse, database or schema
//! switch the session context for just their own duration: the previous
//! value is probed first, switching is skipped when the target already
//! matches, and the prior context is restored in reverse order on every
//! exit path.
//!
//! Example usage:
//!
//! ```rust,no_run
//! use snowflake_nativeapp_facade::{
//!     Distribution, FacadeError, RestExecutor, SqlFacade, DEFAULT_STAGE_ENCRYPTION,
//! };
//! use snowflake_nativeapp_facade::jwt_simple::algorithms::RS256KeyPair;
//!
//! fn main() -> Result<(), FacadeError> {
//!     let key_pair = RS256KeyPair::generate(2048).expect("key generation");
//!     let facade = SqlFacade::new(RestExecutor::new("ACCOUNT", "USER", key_pair));
//!
//!     facade.create_application_package(
//!         "my_app_pkg",
//!         Distribution::Internal,
//!         None,
//!         Some("package_role"),
//!     )?;
//!
//!     facade.create_schema("my_app_pkg.app_src", Some("package_role"), None)?;
//!     if !facade.stage_exists("my_app_pkg.app_src.stage", Some("package_role"), None, None)? {
//!         facade.create_stage(
//!             "my_app_pkg.app_src.stage",
//!             DEFAULT_STAGE_ENCRYPTION,
//!             true,
//!             Some("package_role"),
//!             None,
//!             None,
//!         )?;
//!     }
//!
//!     let patch = facade.add_patch_to_package_version(
//!         "my_app_pkg",
//!         "my_app_pkg.app_src.stage",
//!         "v1",
//!         None,
//!         None,
//!         Some("package_role"),
//!     )?;
//!     println!("server assigned patch {patch}");
//!     Ok(())
//! }
//! ```

mod context;
mod errors;
mod executor;
mod facade;
mod identifier;
mod install;
#[cfg(test)]
#[cfg(feature = "live-tests")]
mod live_tests;
mod logs;
mod rest;

pub use context::UseObjectType;
pub use errors::{
    unclassified_error, ConnectorError, FacadeError, FacadeResult,
    APPLICATION_INSTANCE_FAILED_TO_RUN_SETUP_SCRIPT, APPLICATION_NO_LONGER_AVAILABLE,
    APPLICATION_REQUIRES_TELEMETRY_SHARING, CANNOT_DISABLE_MANDATORY_TELEMETRY,
    CANNOT_UPGRADE_FROM_LOOSE_FILES_TO_VERSION, CANNOT_UPGRADE_FROM_VERSION_TO_LOOSE_FILES,
    CREATE_OR_UPGRADE_APPLICATION_EXPECTED_USER_ERROR_CODES, DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED,
    DOES_NOT_EXIST_OR_NOT_AUTHORIZED, INSUFFICIENT_PRIVILEGES, NOT_SUPPORTED_ON_DEV_MODE_APPLICATIONS,
    NO_WAREHOUSE_SELECTED_IN_SESSION, ONLY_SUPPORTED_ON_DEV_MODE_APPLICATIONS, SQL_COMPILATION_ERROR,
    UPGRADE_RESTRICTION_CODES,
};
pub use executor::{split_statements, QueryExecutor, ResultSet, Row, RowMap};
pub use facade::{
    ApplicationParams, Distribution, SecurableType, SqlFacade, UiParameter,
    DEFAULT_STAGE_ENCRYPTION, SPECIAL_COMMENT,
};
pub use identifier::{
    identifier_to_show_like_pattern, is_valid_identifier, is_valid_quoted_identifier,
    is_valid_unquoted_identifier, same_identifier, to_identifier, to_quoted_identifier,
    to_string_literal, unquote_identifier, Fqn,
};
pub use install::InstallMethod;
pub use jwt_simple;
pub use logs::{filter_log_timestamp, new_logs_only};
pub use rest::RestExecutor;

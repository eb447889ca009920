//! High-level operations for managing Native Application objects.
//!
//! Every operation follows the same template: canonicalize user-supplied
//! identifiers, open context guards in the fixed role → warehouse →
//! database → schema order, issue one logical statement (or a short fixed
//! sequence), post-process the rows, and classify failures with an
//! operation-specific context message. Operation-specific error-code
//! tables are consulted before the generic classification ladder.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::errors::{
    unclassified_error, ConnectorError, FacadeError, FacadeResult,
    APPLICATION_REQUIRES_TELEMETRY_SHARING, CANNOT_DISABLE_MANDATORY_TELEMETRY,
    CREATE_OR_UPGRADE_APPLICATION_EXPECTED_USER_ERROR_CODES, DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED,
    INSUFFICIENT_PRIVILEGES, NO_WAREHOUSE_SELECTED_IN_SESSION, UPGRADE_RESTRICTION_CODES,
};
use crate::executor::{QueryExecutor, ResultSet, RowMap};
use crate::identifier::{
    identifier_to_show_like_pattern, same_identifier, to_identifier, to_string_literal, Fqn,
};
use crate::install::InstallMethod;

/// Comment stamped on objects this tool creates, so later runs can tell
/// them apart from objects made by hand.
pub const SPECIAL_COMMENT: &str = "GENERATED_BY_NATIVEAPP_CLI";

/// Default server-side encryption for stages this tool creates.
pub const DEFAULT_STAGE_ENCRYPTION: &str = "SNOWFLAKE_SSE";

pub(crate) const NAME_COL: &str = "name";
pub(crate) const COMMENT_COL: &str = "comment";
pub(crate) const AUTHORIZE_TELEMETRY_COL: &str = "authorize_telemetry_event_sharing";
const PATCH_COL: &str = "patch";
const EVENT_TABLE_KEY: &str = "EVENT_TABLE";

/// Distribution scope of an application package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Internal,
    External,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Distribution::Internal => "INTERNAL",
            Distribution::External => "EXTERNAL",
        })
    }
}

/// Securable object types this tool grants privileges on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurableType {
    Application,
    ApplicationPackage,
    Database,
    Schema,
    Stage,
    Warehouse,
}

impl fmt::Display for SecurableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecurableType::Application => "application",
            SecurableType::ApplicationPackage => "application package",
            SecurableType::Database => "database",
            SecurableType::Schema => "schema",
            SecurableType::Stage => "stage",
            SecurableType::Warehouse => "warehouse",
        })
    }
}

/// Account-level UI parameters consulted before enabling optional features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiParameter {
    ReleaseChannels,
    EventSharingV2,
}

impl UiParameter {
    fn key(self) -> &'static str {
        match self {
            UiParameter::ReleaseChannels => "FEATURE_RELEASE_CHANNELS",
            UiParameter::EventSharingV2 => "ENABLE_EVENT_SHARING_V2",
        }
    }
}

/// Inputs shared by application create and upgrade.
#[derive(Debug, Clone)]
pub struct ApplicationParams<'a> {
    pub name: &'a str,
    /// Stage holding the uploaded application artifacts.
    pub stage_fqn: &'a str,
    pub role: &'a str,
    /// Required to run the application's setup script.
    pub warehouse: &'a str,
    /// `None` means not explicitly enabled or disabled.
    pub debug_mode: Option<bool>,
    /// `None` means not explicitly enabled or disabled.
    pub authorize_event_sharing: Option<bool>,
}

/// The catalog of high-level database actions, layered over a
/// [`QueryExecutor`] session.
pub struct SqlFacade<E> {
    executor: E,
}

impl<E: QueryExecutor> SqlFacade<E> {
    pub fn new(executor: E) -> SqlFacade<E> {
        SqlFacade { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Grants access privileges on a securable object to a role.
    pub fn grant_privileges_to_role(
        &self,
        privileges: &[&str],
        object_type: SecurableType,
        object_identifier: &str,
        role_to_grant: &str,
        role_to_use: Option<&str>,
    ) -> FacadeResult<()> {
        let privileges = privileges.join(", ");
        let object = format!("{object_type} {object_identifier}");
        let _role = self.use_role_optional(role_to_use)?;
        self.executor
            .execute_query(&format!(
                "grant {privileges} on {object} to role {role_to_grant}"
            ))
            .map_err(|err| {
                unclassified_error(
                    err,
                    format!("Failed to grant {privileges} on {object} to role {role_to_grant}."),
                )
            })?;
        Ok(())
    }

    /// Runs a user-provided SQL script under the requested session context.
    ///
    /// `script_name` is only used for error reporting.
    pub fn execute_user_script(
        &self,
        queries: &str,
        script_name: &str,
        role: Option<&str>,
        warehouse: Option<&str>,
        database: Option<&str>,
    ) -> FacadeResult<()> {
        let _role = self.use_role_optional(role)?;
        let _warehouse = self.use_warehouse_optional(warehouse)?;
        let _database = self.use_database_optional(database)?;
        match self.executor.execute_queries(queries) {
            Ok(_) => Ok(()),
            Err(err @ ConnectorError::Programming { .. }) => {
                let message = if err.code() == Some(NO_WAREHOUSE_SELECTED_IN_SESSION) {
                    format!(
                        "{err}. Please provide a warehouse in your project definition file, \
                         config.toml file, or via command line"
                    )
                } else {
                    err.to_string()
                };
                Err(FacadeError::UserScript {
                    script_name: script_name.to_owned(),
                    message,
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to run script {script_name}."),
            )),
        }
    }

    /// The account's event table, or `None` when unset or set to `NONE`.
    pub fn get_account_event_table(&self, role: Option<&str>) -> FacadeResult<Option<String>> {
        let _role = self.use_role_optional(role)?;
        let results = self
            .executor
            .execute_query("show parameters like 'event_table' in account")
            .map_err(|err| unclassified_error(err, "Failed to get event table."))?;
        let table = results
            .rows()
            .find(|row| row.get("key") == Some(EVENT_TABLE_KEY))
            .and_then(|row| row.get("value").map(str::to_owned));
        Ok(table.filter(|table| table != "NONE"))
    }

    /// Creates a new version in an existing application package from the
    /// artifacts on the stage.
    pub fn create_version_in_package(
        &self,
        package_name: &str,
        stage_fqn: &str,
        version: &str,
        label: Option<&str>,
        role: Option<&str>,
    ) -> FacadeResult<()> {
        let package_name = to_identifier(package_name);
        let version = to_identifier(version);
        let mut query = format!(
            "alter application package {package_name} add version {version} using @{stage_fqn}"
        );
        if let Some(label) = label {
            query.push_str(&format!(" label = {}", to_string_literal(label)));
        }
        let _role = self.use_role_optional(role)?;
        self.executor.execute_query(&query).map_err(|err| {
            unclassified_error(
                err,
                format!("Failed to add version {version} to application package {package_name}."),
            )
        })?;
        Ok(())
    }

    /// Adds a patch to an existing version, returning the patch number the
    /// server assigned (or confirmed, when one was requested explicitly).
    pub fn add_patch_to_package_version(
        &self,
        package_name: &str,
        stage_fqn: &str,
        version: &str,
        patch: Option<i64>,
        label: Option<&str>,
        role: Option<&str>,
    ) -> FacadeResult<i64> {
        let package_name = to_identifier(package_name);
        let version = to_identifier(version);
        let patch_clause = match patch {
            Some(patch) => format!("add patch {patch}"),
            None => "add patch".to_owned(),
        };
        let mut query = format!(
            "alter application package {package_name} {patch_clause} for version {version} using @{stage_fqn}"
        );
        if let Some(label) = label {
            query.push_str(&format!(" label = {}", to_string_literal(label)));
        }

        let _role = self.use_role_optional(role)?;
        let results = self.executor.execute_query(&query).map_err(|err| {
            unclassified_error(
                err,
                format!(
                    "Failed to create patch for version {version} in application package {package_name}."
                ),
            )
        })?;
        // The server assigns the patch number; it must come back in the row.
        let row = results.first().ok_or_else(|| FacadeError::UnexpectedResult {
            message: "Expected to receive the new patch but the result is empty".to_owned(),
        })?;
        row.get(PATCH_COL)
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| FacadeError::UnexpectedResult {
                message: "Expected the first row to contain the new patch number".to_owned(),
            })
    }

    /// Telemetry event definitions declared by an application.
    pub fn get_event_definitions(
        &self,
        app_name: &str,
        role: Option<&str>,
    ) -> FacadeResult<Vec<RowMap>> {
        let app_name = to_identifier(app_name);
        let _role = self.use_role_optional(role)?;
        let results = self
            .executor
            .execute_query(&format!(
                "show telemetry event definitions in application {app_name}"
            ))
            .map_err(|err| {
                unclassified_error(
                    err,
                    format!("Failed to get event definitions for application {app_name}."),
                )
            })?;
        Ok(results.rows().map(|row| row.to_map()).collect())
    }

    /// The properties of an application object, from `desc application`.
    pub fn get_app_properties(
        &self,
        app_name: &str,
        role: Option<&str>,
    ) -> FacadeResult<HashMap<String, String>> {
        let app_name = to_identifier(app_name);
        let _role = self.use_role_optional(role)?;
        let results = self
            .executor
            .execute_query(&format!("desc application {app_name}"))
            .map_err(|err| {
                unclassified_error(err, format!("Failed to describe application {app_name}."))
            })?;
        Ok(results
            .rows()
            .filter_map(|row| {
                let property = row.get("property")?.to_owned();
                let value = row.get("value").unwrap_or_default().to_owned();
                Some((property, value))
            })
            .collect())
    }

    /// Shares the named telemetry events with the application's provider.
    pub fn share_telemetry_events(
        &self,
        app_name: &str,
        event_names: &[&str],
        role: Option<&str>,
    ) -> FacadeResult<()> {
        let app_name = to_identifier(app_name);
        log::info!("sharing events {event_names:?}");
        let events = event_names
            .iter()
            .map(|name| to_string_literal(name))
            .collect::<Vec<_>>()
            .join(", ");
        let _role = self.use_role_optional(role)?;
        self.executor
            .execute_query(&format!(
                "alter application {app_name} set shared telemetry events ({events})"
            ))
            .map_err(|err| {
                unclassified_error(
                    err,
                    format!("Failed to share telemetry events for application {app_name}."),
                )
            })?;
        Ok(())
    }

    /// Creates a schema if it does not exist. A database-qualified name
    /// overrides the separately passed database.
    pub fn create_schema(
        &self,
        name: &str,
        role: Option<&str>,
        database: Option<&str>,
    ) -> FacadeResult<()> {
        let fqn = Fqn::parse(name);
        let identifier = to_identifier(fqn.name());
        let database = fqn.prefix().or(database);

        let _role = self.use_role_optional(role)?;
        let _database = self.use_database_optional(database)?;
        match self
            .executor
            .execute_query(&format!("create schema if not exists {identifier}"))
        {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                Err(FacadeError::InsufficientPrivileges {
                    message: format!("Insufficient privileges to create schema {name}"),
                    role: role.map(str::to_owned),
                    database: database.map(str::to_owned),
                    schema: None,
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to create schema {name}."),
            )),
        }
    }

    /// Whether a stage exists and is visible to the active (or given) role.
    ///
    /// A database or schema that does not exist trivially means the stage
    /// does not exist there, so those conditions report `false` instead of
    /// failing; privilege errors still propagate.
    pub fn stage_exists(
        &self,
        name: &str,
        role: Option<&str>,
        database: Option<&str>,
        schema: Option<&str>,
    ) -> FacadeResult<bool> {
        let fqn = Fqn::parse(name);
        let identifier = to_identifier(fqn.name());
        let database = fqn.database().or(database);
        let schema = fqn.schema().or(schema);

        let pattern = identifier_to_show_like_pattern(&identifier);
        let in_clause = match (database, schema) {
            (Some(database), Some(schema)) => format!(" in schema {database}.{schema}"),
            (None, Some(schema)) => format!(" in schema {schema}"),
            (Some(database), None) => format!(" in database {database}"),
            (None, None) => String::new(),
        };

        let result: FacadeResult<Option<ResultSet>> = (|| {
            let _role = self.use_role_optional(role)?;
            match self
                .executor
                .execute_query(&format!("show stages like {pattern}{in_clause}"))
            {
                Ok(results) => Ok(Some(results)),
                Err(err) if err.code() == Some(DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED) => Ok(None),
                Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                    Err(FacadeError::InsufficientPrivileges {
                        message: format!("Insufficient privileges to check if stage {name} exists"),
                        role: role.map(str::to_owned),
                        database: database.map(str::to_owned),
                        schema: schema.map(str::to_owned),
                        source: err,
                    })
                }
                Err(err) => Err(unclassified_error(
                    err,
                    format!("Failed to check if stage {name} exists."),
                )),
            }
        })();

        match result {
            Ok(Some(results)) => Ok(match results.row_count() {
                Some(count) => count > 0,
                // count unknown: fall back to the rows actually fetched
                None => results.first().is_some(),
            }),
            Ok(None) => Ok(false),
            Err(FacadeError::CouldNotUseObject { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Creates a stage if it does not exist. Pass an empty
    /// `encryption_type` to disable encryption; see
    /// [`DEFAULT_STAGE_ENCRYPTION`] for the usual value.
    pub fn create_stage(
        &self,
        name: &str,
        encryption_type: &str,
        enable_directory: bool,
        role: Option<&str>,
        database: Option<&str>,
        schema: Option<&str>,
    ) -> FacadeResult<()> {
        let fqn = Fqn::parse(name);
        let identifier = to_identifier(fqn.name());
        let database = fqn.database().or(database);
        let schema = fqn.schema().or(schema);

        let mut query = format!("create stage if not exists {identifier}");
        if !encryption_type.is_empty() {
            query.push_str(&format!(" encryption = (type = '{encryption_type}')"));
        }
        if enable_directory {
            query.push_str(" directory = (enable = true)");
        }

        let _role = self.use_role_optional(role)?;
        let _database = self.use_database_optional(database)?;
        let _schema = self.use_schema_optional(schema)?;
        match self.executor.execute_query(&query) {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                Err(FacadeError::InsufficientPrivileges {
                    message: format!("Insufficient privileges to create stage {name}"),
                    role: role.map(str::to_owned),
                    database: database.map(str::to_owned),
                    schema: schema.map(str::to_owned),
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to create stage {name}."),
            )),
        }
    }

    /// Release directives currently set on an application package.
    pub fn show_release_directives(
        &self,
        package_name: &str,
        role: Option<&str>,
    ) -> FacadeResult<Vec<RowMap>> {
        let package_identifier = to_identifier(package_name);
        let _role = self.use_role_optional(role)?;
        match self.executor.execute_query(&format!(
            "show release directives in application package {package_identifier}"
        )) {
            Ok(results) => Ok(results.rows().map(|row| row.to_map()).collect()),
            Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                Err(FacadeError::InsufficientPrivileges {
                    message: format!(
                        "Insufficient privileges to show release directives for package {package_name}"
                    ),
                    role: role.map(str::to_owned),
                    database: None,
                    schema: None,
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to show release directives for package {package_name}."),
            )),
        }
    }

    /// Looks up an existing application object by name, returning its SHOW
    /// row when one matches.
    pub fn get_existing_app_info(
        &self,
        name: &str,
        role: Option<&str>,
    ) -> FacadeResult<Option<RowMap>> {
        let _role = self.use_role_optional(role)?;
        let results = self
            .executor
            .execute_query(&format!(
                "show applications like {}",
                identifier_to_show_like_pattern(name)
            ))
            .map_err(|err| {
                unclassified_error(
                    err,
                    format!("Unable to fetch information on application {name}."),
                )
            })?;
        let found = results
            .rows()
            .find(|row| {
                row.get(NAME_COL)
                    .is_some_and(|shown| same_identifier(shown, name))
            })
            .map(|row| row.to_map());
        Ok(found)
    }

    /// Upgrades an application object in place, keeping its debug-mode and
    /// event-sharing settings in line with the request.
    pub fn upgrade_application(
        &self,
        params: &ApplicationParams<'_>,
        install_method: &InstallMethod,
    ) -> FacadeResult<ResultSet> {
        let name = to_identifier(params.name);
        let existing = self.get_existing_app_info(params.name, Some(params.role))?;
        install_method.ensure_app_usable(params.name, existing.as_ref())?;

        let _role = self.use_role_optional(Some(params.role))?;
        let _warehouse = self.use_warehouse_optional(Some(params.warehouse))?;

        let using_clause = install_method.using_clause(params.stage_fqn);
        let mut query = format!("alter application {name} upgrade");
        if !using_clause.is_empty() {
            query.push(' ');
            query.push_str(&using_clause);
        }

        let upgraded: Result<ResultSet, ConnectorError> = (|| {
            let results = self.executor.execute_query(&query)?;
            // debug mode is only controlled for dev installs, and only when
            // the caller took a position
            if install_method.is_dev_mode() {
                if let Some(debug_mode) = params.debug_mode {
                    self.executor.execute_query(&format!(
                        "alter application {name} set debug_mode = {debug_mode}"
                    ))?;
                }
            }
            Ok(results)
        })();
        let results = upgraded.map_err(|err| {
            if let Some(code) = err.code() {
                if UPGRADE_RESTRICTION_CODES.contains(&code) {
                    return FacadeError::UpgradeRestriction {
                        message: err.to_string(),
                        source: err,
                    };
                }
                if CREATE_OR_UPGRADE_APPLICATION_EXPECTED_USER_ERROR_CODES.contains(&code) {
                    return FacadeError::UserInput {
                        message: format!(
                            "Failed to upgrade application {name} with the following error message:\n{err}"
                        ),
                        source: err,
                    };
                }
            }
            unclassified_error(err, format!("Failed to upgrade application {name}."))
        })?;

        if let Some(authorize) = params.authorize_event_sharing {
            self.sync_event_sharing(&name, params.role, authorize)?;
        }

        Ok(results)
    }

    /// Only update event sharing when the requested value differs from what
    /// the server reports.
    fn sync_event_sharing(&self, name: &str, role: &str, authorize: bool) -> FacadeResult<()> {
        let current = self
            .get_app_properties(name, Some(role))?
            .get(AUTHORIZE_TELEMETRY_COL)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if current == authorize {
            return Ok(());
        }

        log::info!("Setting telemetry sharing authorization to {authorize}");
        let setting = if authorize { "TRUE" } else { "FALSE" };
        match self.executor.execute_query(&format!(
            "alter application {name} set AUTHORIZE_TELEMETRY_EVENT_SHARING = {setting}"
        )) {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(CANNOT_DISABLE_MANDATORY_TELEMETRY) => {
                Err(FacadeError::UserInput {
                    message: "Could not disable telemetry event sharing for the application \
                              because it contains mandatory events. Please set \
                              'share_mandatory_events' to true in the application telemetry \
                              section of the project definition file."
                        .to_owned(),
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!(
                    "Failed to set AUTHORIZE_TELEMETRY_EVENT_SHARING when upgrading application {name}."
                ),
            )),
        }
    }

    /// Creates an application object from an application package, which
    /// runs the package's setup script.
    pub fn create_application(
        &self,
        params: &ApplicationParams<'_>,
        package_name: &str,
        install_method: &InstallMethod,
    ) -> FacadeResult<ResultSet> {
        let name = to_identifier(params.name);
        let package_name = to_identifier(package_name);

        let mut clauses = vec![format!("from application package {package_name}")];
        let using_clause = install_method.using_clause(params.stage_fqn);
        if !using_clause.is_empty() {
            clauses.push(using_clause);
        }
        // dev installs default to debug mode unless the caller disabled it
        if install_method.is_dev_mode() {
            clauses.push(format!(
                "debug_mode = {}",
                params.debug_mode.unwrap_or(true)
            ));
        }
        if let Some(authorize) = params.authorize_event_sharing {
            log::info!("Setting AUTHORIZE_TELEMETRY_EVENT_SHARING to {authorize}");
            clauses.push(format!(
                "AUTHORIZE_TELEMETRY_EVENT_SHARING = {}",
                if authorize { "TRUE" } else { "FALSE" }
            ));
        }
        clauses.push(format!("comment = {SPECIAL_COMMENT}"));
        let query = format!("create application {name} {}", clauses.join(" "));

        let _role = self.use_role_optional(Some(params.role))?;
        let _warehouse = self.use_warehouse_optional(Some(params.warehouse))?;
        match self.executor.execute_query(&query) {
            Ok(results) => Ok(results),
            Err(err) if err.code() == Some(APPLICATION_REQUIRES_TELEMETRY_SHARING) => {
                Err(FacadeError::UserInput {
                    message: "The application package requires event sharing to be authorized. \
                              Please set 'share_mandatory_events' to true in the application \
                              telemetry section of the project definition file."
                        .to_owned(),
                    source: err,
                })
            }
            Err(err)
                if err.code().is_some_and(|code| {
                    CREATE_OR_UPGRADE_APPLICATION_EXPECTED_USER_ERROR_CODES.contains(&code)
                }) =>
            {
                Err(FacadeError::UserInput {
                    message: format!(
                        "Failed to create application {name} with the following error message:\n{err}"
                    ),
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to create application {name}."),
            )),
        }
    }

    /// Creates an application package. The release-channel flag is
    /// tri-state: unset omits the clause entirely.
    pub fn create_application_package(
        &self,
        package_name: &str,
        distribution: Distribution,
        enable_release_channels: Option<bool>,
        role: Option<&str>,
    ) -> FacadeResult<()> {
        let package_name = to_identifier(package_name);
        let mut query = format!(
            "create application package {package_name} comment = {SPECIAL_COMMENT} distribution = {distribution}"
        );
        if let Some(enabled) = enable_release_channels {
            query.push_str(&format!(" enable_release_channels = {enabled}"));
        }

        let _role = self.use_role_optional(role)?;
        match self.executor.execute_query(&query) {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                Err(FacadeError::InsufficientPrivileges {
                    message: format!(
                        "Insufficient privileges to create application package {package_name}"
                    ),
                    role: role.map(str::to_owned),
                    database: None,
                    schema: None,
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!("Failed to create application package {package_name}."),
            )),
        }
    }

    /// Updates application package properties; a no-op when nothing was
    /// requested.
    pub fn alter_application_package_properties(
        &self,
        package_name: &str,
        enable_release_channels: Option<bool>,
        role: Option<&str>,
    ) -> FacadeResult<()> {
        let Some(enabled) = enable_release_channels else {
            return Ok(());
        };
        let package_name = to_identifier(package_name);
        let _role = self.use_role_optional(role)?;
        match self.executor.execute_query(&format!(
            "alter application package {package_name} set enable_release_channels = {enabled}"
        )) {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some(INSUFFICIENT_PRIVILEGES) => {
                Err(FacadeError::InsufficientPrivileges {
                    message: format!(
                        "Insufficient privileges to update enable_release_channels for application package {package_name}"
                    ),
                    role: role.map(str::to_owned),
                    database: None,
                    schema: None,
                    source: err,
                })
            }
            Err(err) => Err(unclassified_error(
                err,
                format!(
                    "Failed to update enable_release_channels for application package {package_name}."
                ),
            )),
        }
    }

    /// Reads one account UI parameter, falling back to `default` only when
    /// the parameter is absent (a present-but-empty value is returned
    /// as-is).
    pub fn get_ui_parameter(
        &self,
        parameter: UiParameter,
        default: serde_json::Value,
    ) -> FacadeResult<serde_json::Value> {
        let results = self
            .executor
            .execute_query("call system$bootstrap_data_request('CLIENT_PARAMS_INFO')")
            .map_err(|err| {
                unclassified_error(
                    err,
                    format!("Failed to read UI parameter {}.", parameter.key()),
                )
            })?;
        let payload = results
            .scalar()
            .ok_or_else(|| FacadeError::UnexpectedResult {
                message: "Expected a client parameters payload but the result is empty".to_owned(),
            })?;
        let info: ClientParamsInfo =
            serde_json::from_str(payload).map_err(|err| FacadeError::UnexpectedResult {
                message: format!("Could not parse the client parameters payload: {err}"),
            })?;
        Ok(info
            .client_params_info
            .into_iter()
            .find(|param| param.name == parameter.key())
            .map(|param| param.value)
            .unwrap_or(default))
    }

    /// Fetches recent log lines from one container of a service instance.
    /// Pair with [`crate::new_logs_only`] when polling.
    pub fn get_service_logs(
        &self,
        service_name: &str,
        instance_id: u32,
        container_name: &str,
        num_lines: u32,
        role: Option<&str>,
    ) -> FacadeResult<Vec<String>> {
        let query = format!(
            "call system$get_service_logs('{service_name}', '{instance_id}', '{container_name}', {num_lines})"
        );
        let _role = self.use_role_optional(role)?;
        let results = self.executor.execute_query(&query).map_err(|err| {
            unclassified_error(
                err,
                format!("Failed to retrieve logs for service {service_name}."),
            )
        })?;
        Ok(results
            .scalar()
            .map(|text| text.lines().map(str::to_owned).collect())
            .unwrap_or_default())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientParamsInfo {
    client_params_info: Vec<ClientParam>,
}

#[derive(Deserialize)]
struct ClientParam {
    name: String,
    value: serde_json::Value,
}

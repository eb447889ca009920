//! Error classification.
//!
//! Raw failures cross into façade code exactly once, at the executor
//! boundary, already sorted into the [`ConnectorError`] hierarchy. Façade
//! operations first consult their own expected-code tables and then fall
//! through to [`unclassified_error`], whose ladder runs most-specific to
//! least-specific because the connector categories nest: a programming
//! error is also a database error is also a connector error.

use crate::context::UseObjectType;

// Vendor error codes, as reported by the server.
pub const NO_WAREHOUSE_SELECTED_IN_SESSION: i64 = 606;
pub const SQL_COMPILATION_ERROR: i64 = 1003;
pub const DOES_NOT_EXIST_OR_NOT_AUTHORIZED: i64 = 2003;
pub const DOES_NOT_EXIST_OR_CANNOT_BE_PERFORMED: i64 = 2043;
pub const INSUFFICIENT_PRIVILEGES: i64 = 3001;
pub const CANNOT_UPGRADE_FROM_LOOSE_FILES_TO_VERSION: i64 = 93044;
pub const CANNOT_UPGRADE_FROM_VERSION_TO_LOOSE_FILES: i64 = 93045;
pub const ONLY_SUPPORTED_ON_DEV_MODE_APPLICATIONS: i64 = 93046;
pub const NOT_SUPPORTED_ON_DEV_MODE_APPLICATIONS: i64 = 93055;
pub const APPLICATION_NO_LONGER_AVAILABLE: i64 = 93079;
pub const APPLICATION_INSTANCE_FAILED_TO_RUN_SETUP_SCRIPT: i64 = 93082;
pub const APPLICATION_REQUIRES_TELEMETRY_SHARING: i64 = 93321;
pub const CANNOT_DISABLE_MANDATORY_TELEMETRY: i64 = 93329;

/// Server-side compatibility restrictions that block an
/// `alter application ... upgrade`.
pub const UPGRADE_RESTRICTION_CODES: [i64; 5] = [
    CANNOT_UPGRADE_FROM_LOOSE_FILES_TO_VERSION,
    CANNOT_UPGRADE_FROM_VERSION_TO_LOOSE_FILES,
    ONLY_SUPPORTED_ON_DEV_MODE_APPLICATIONS,
    NOT_SUPPORTED_ON_DEV_MODE_APPLICATIONS,
    APPLICATION_NO_LONGER_AVAILABLE,
];

/// Codes meaning the application create/upgrade failed because of how the
/// user set their project up, not because the generated SQL was wrong.
pub const CREATE_OR_UPGRADE_APPLICATION_EXPECTED_USER_ERROR_CODES: [i64; 2] = [
    APPLICATION_INSTANCE_FAILED_TO_RUN_SETUP_SCRIPT,
    APPLICATION_REQUIRES_TELEMETRY_SHARING,
];

/// A failure raised by a [`crate::QueryExecutor`].
///
/// The variant is decided where the failure is first observed; nothing
/// downstream re-probes the error for capabilities.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The server evaluated the statement and rejected it, usually with a
    /// numeric error code.
    #[error("{message}")]
    Programming { code: Option<i64>, message: String },
    /// The database service failed in a way not attributable to the
    /// statement itself.
    #[error("{message}")]
    Database { message: String },
    /// The connector or transport failed before a server verdict.
    #[error("{}", connector_detail(.http_status, .message))]
    Connector {
        http_status: Option<u16>,
        message: String,
    },
    /// Anything outside the connector's own hierarchy.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ConnectorError {
    /// The vendor error code, when the server reported one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ConnectorError::Programming { code, .. } => *code,
            _ => None,
        }
    }
}

fn connector_detail(http_status: &Option<u16>, message: &str) -> String {
    match http_status {
        Some(status) => format!("HTTP {status}: {message}"),
        None => message.to_owned(),
    }
}

pub type FacadeResult<T> = Result<T, FacadeError>;

/// The closed taxonomy of errors this crate surfaces to callers.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// A `use <dimension> <name>` failed because the object is missing or
    /// the active role cannot see it. Distinct from a generic privilege
    /// error because it happens specifically while switching context.
    #[error("Could not use {object_type} {name}. Object does not exist, or operation cannot be performed.")]
    CouldNotUseObject {
        object_type: UseObjectType,
        name: String,
        #[source]
        source: ConnectorError,
    },

    /// Carries the attempted role/database/schema for diagnostics.
    #[error("{message}")]
    InsufficientPrivileges {
        message: String,
        role: Option<String>,
        database: Option<String>,
        schema: Option<String>,
        #[source]
        source: ConnectorError,
    },

    /// A server-reported condition the user can fix, with the remediation
    /// baked into the message.
    #[error("{message}")]
    UserInput {
        message: String,
        #[source]
        source: ConnectorError,
    },

    /// An existing application object carries someone else's comment, so a
    /// loose-files install refuses to touch it.
    #[error("Application {name} was not created by this tool. Drop the application object first, or choose a different application name.")]
    ApplicationCreatedExternally { name: String },

    /// The upgrade was blocked by a server-side compatibility restriction.
    #[error("{message}")]
    UpgradeRestriction {
        message: String,
        #[source]
        source: ConnectorError,
    },

    /// A user-provided SQL script failed.
    #[error("Failed to run script {script_name}. {message}")]
    UserScript {
        script_name: String,
        message: String,
        #[source]
        source: ConnectorError,
    },

    /// A response that should have carried data came back without it.
    #[error("Received unexpected result from the server. {message}")]
    UnexpectedResult { message: String },

    #[error("Invalid SQL error occurred. {context} {source}")]
    InvalidSql {
        context: String,
        #[source]
        source: ConnectorError,
    },

    #[error("Unknown SQL error occurred. {context} {source}")]
    UnknownSql {
        context: String,
        #[source]
        source: ConnectorError,
    },

    #[error("Unknown error occurred. {context} {source}")]
    UnknownConnector {
        context: String,
        #[source]
        source: ConnectorError,
    },

    /// An error outside the connector hierarchy, decorated with the
    /// operation that was being attempted so callers still see what failed.
    #[error("{context}")]
    Unclassified {
        context: String,
        #[source]
        source: ConnectorError,
    },
}

/// Routes an error no operation-specific table claimed, most specific tier
/// first.
pub fn unclassified_error(err: ConnectorError, context: impl Into<String>) -> FacadeError {
    let context = context.into();
    match err {
        err @ ConnectorError::Programming { .. } => FacadeError::InvalidSql {
            context,
            source: err,
        },
        err @ ConnectorError::Database { .. } => FacadeError::UnknownSql {
            context,
            source: err,
        },
        err @ ConnectorError::Connector { .. } => FacadeError::UnknownConnector {
            context,
            source: err,
        },
        err @ ConnectorError::Other(_) => FacadeError::Unclassified {
            context,
            source: err,
        },
    }
}

//! Install methods for application objects.

use crate::errors::{FacadeError, FacadeResult};
use crate::executor::RowMap;
use crate::facade::{COMMENT_COL, SPECIAL_COMMENT};
use crate::identifier::to_identifier;

/// How an application object gets its content when it is created or
/// upgraded in the same account as its application package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallMethod {
    /// Straight from the files currently uploaded to the stage.
    UnversionedDev,
    /// From a previously created version, optionally pinned to a patch.
    VersionedDev {
        version: String,
        patch: Option<i64>,
    },
    /// From whatever the package's release directive points at.
    ReleaseDirective,
}

impl InstallMethod {
    pub fn unversioned_dev() -> InstallMethod {
        InstallMethod::UnversionedDev
    }

    pub fn versioned_dev(version: impl Into<String>, patch: Option<i64>) -> InstallMethod {
        InstallMethod::VersionedDev {
            version: version.into(),
            patch,
        }
    }

    pub fn release_directive() -> InstallMethod {
        InstallMethod::ReleaseDirective
    }

    /// Debug mode only applies to applications installed for development.
    pub fn is_dev_mode(&self) -> bool {
        !matches!(self, InstallMethod::ReleaseDirective)
    }

    /// The `using` clause for create/upgrade statements. Empty for
    /// release-directive installs, where the server picks the content.
    pub fn using_clause(&self, stage_fqn: &str) -> String {
        match self {
            InstallMethod::UnversionedDev => format!("using @{stage_fqn}"),
            InstallMethod::VersionedDev { version, patch } => {
                // versions like "3" need quoting to survive as identifiers
                let version = to_identifier(version);
                match patch {
                    Some(patch) => format!("using version {version} patch {patch}"),
                    None => format!("using version {version}"),
                }
            }
            InstallMethod::ReleaseDirective => String::new(),
        }
    }

    /// Loose-file installs refuse to touch an application object some other
    /// tool created, recognized by the comment this tool stamps on its own
    /// objects.
    pub(crate) fn ensure_app_usable(
        &self,
        app_name: &str,
        existing_app: Option<&RowMap>,
    ) -> FacadeResult<()> {
        if !matches!(self, InstallMethod::UnversionedDev) {
            return Ok(());
        }
        if let Some(row) = existing_app {
            let comment = row
                .get(COMMENT_COL)
                .and_then(|value| value.as_deref())
                .unwrap_or_default();
            if comment != SPECIAL_COMMENT {
                return Err(FacadeError::ApplicationCreatedExternally {
                    name: app_name.to_owned(),
                });
            }
        }
        Ok(())
    }
}

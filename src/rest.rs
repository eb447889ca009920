//! A key-pair-authenticated [`QueryExecutor`] over Snowflake's REST
//! endpoints.
//!
//! This speaks the sessionful login + query-request protocol rather than
//! the stateless v2 statements API: the façade drives session context with
//! `use` statements, which only mean something when consecutive statements
//! share a session.

use std::cell::{Cell, RefCell};

use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ConnectorError;
use crate::executor::{QueryExecutor, ResultSet};

const CLIENT_APP_ID: &str = env!("CARGO_PKG_NAME");
const CLIENT_APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Blocking executor bound to one Snowflake account and user.
///
/// The session is opened lazily on the first statement and kept for the
/// lifetime of the executor. Single-threaded by design; statement execution
/// is strictly call/response.
pub struct RestExecutor {
    key_pair: RS256KeyPair,
    account: String,
    user: String,
    host: String,
    timeout_seconds: u64,
    session_token: RefCell<Option<String>>,
    sequence_id: Cell<u64>,
}

impl RestExecutor {
    pub fn new(account: &str, user: &str, key_pair: RS256KeyPair) -> RestExecutor {
        RestExecutor {
            host: format!(
                "https://{}.snowflakecomputing.com",
                account.to_ascii_lowercase()
            ),
            account: account.to_owned(),
            user: user.to_owned(),
            key_pair,
            timeout_seconds: 45,
            session_token: RefCell::new(None),
            sequence_id: Cell::new(0),
        }
    }

    /// Set the client-side timeout per request, in seconds (default 45).
    pub fn with_timeout(mut self, timeout_seconds: u64) -> RestExecutor {
        self.timeout_seconds = timeout_seconds;
        self
    }

    fn client(&self) -> Result<reqwest::blocking::Client, ConnectorError> {
        use reqwest::header::*;
        let mut headers = HeaderMap::with_capacity(3);
        headers.append(CONTENT_TYPE, "application/json".parse().map_err(other)?);
        headers.append(ACCEPT, "application/json".parse().map_err(other)?);
        headers.append(
            USER_AGENT,
            concat!(env!("CARGO_PKG_NAME"), '/', env!("CARGO_PKG_VERSION"))
                .parse()
                .map_err(other)?,
        );
        reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .build()
            .map_err(transport_error)
    }

    /// The key-pair JWT used to open a session: subject `ACCOUNT.USER`,
    /// issuer `ACCOUNT.USER.SHA256:<public key thumbprint>`.
    fn auth_token(&self) -> Result<String, ConnectorError> {
        // a region suffix (ACCOUNT.us-east-1) is not part of the claims
        let account = self
            .account
            .split('.')
            .next()
            .unwrap_or(&self.account)
            .to_ascii_uppercase();
        let user = self.user.to_ascii_uppercase();
        let qualified_username = format!("{account}.{user}");

        let mut fingerprint = self.key_pair.public_key().sha256_thumbprint();
        // the thumbprint is URL-safe base64; Snowflake expects standard
        fingerprint = fingerprint.replace('-', "+").replace('_', "/");
        for _ in 0..fingerprint.len() % 3 {
            fingerprint.push('=');
        }

        let claims = Claims::create(Duration::from_mins(59))
            .with_issuer(format!("{qualified_username}.SHA256:{fingerprint}"))
            .with_subject(qualified_username);
        self.key_pair
            .sign(claims)
            .map_err(|err| ConnectorError::Other(err.into()))
    }

    fn login(&self) -> Result<String, ConnectorError> {
        let request = LoginRequest {
            data: LoginData {
                account_name: self.account.to_ascii_uppercase(),
                login_name: self.user.to_ascii_uppercase(),
                authenticator: "SNOWFLAKE_JWT".to_owned(),
                token: self.auth_token()?,
                client_app_id: CLIENT_APP_ID.to_owned(),
                client_app_version: CLIENT_APP_VERSION.to_owned(),
            },
        };
        log::debug!("Opening session for account {}", self.account);
        let response = self
            .client()?
            .post(format!(
                "{}/session/v1/login-request?requestId={}",
                self.host,
                uuid::Uuid::new_v4()
            ))
            .json(&request)
            .send()
            .map_err(transport_error)?;
        let payload: WireResponse<LoginResult> = read_json(response)?;
        if !payload.success {
            return Err(ConnectorError::Database {
                message: payload
                    .message
                    .unwrap_or_else(|| "login request was rejected".to_owned()),
            });
        }
        match payload.data {
            Some(data) => Ok(data.token),
            None => Err(ConnectorError::Database {
                message: "login response carried no session token".to_owned(),
            }),
        }
    }

    fn session_token(&self) -> Result<String, ConnectorError> {
        if let Some(token) = self.session_token.borrow().as_ref() {
            return Ok(token.clone());
        }
        let token = self.login()?;
        *self.session_token.borrow_mut() = Some(token.clone());
        Ok(token)
    }
}

impl QueryExecutor for RestExecutor {
    fn execute_query(&self, sql: &str) -> Result<ResultSet, ConnectorError> {
        let token = self.session_token()?;
        let sequence_id = self.sequence_id.get() + 1;
        self.sequence_id.set(sequence_id);
        log::debug!("Executing statement: {sql}");

        let response = self
            .client()?
            .post(format!(
                "{}/queries/v1/query-request?requestId={}",
                self.host,
                uuid::Uuid::new_v4()
            ))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Snowflake Token=\"{token}\""),
            )
            .json(&QueryRequest {
                sql_text: sql.to_owned(),
                sequence_id,
                async_exec: false,
            })
            .send()
            .map_err(transport_error)?;

        let payload: WireResponse<QueryResult> = read_json(response)?;
        if !payload.success {
            let code = payload
                .code
                .as_deref()
                .and_then(|code| code.parse::<i64>().ok());
            return Err(ConnectorError::Programming {
                code,
                message: payload
                    .message
                    .unwrap_or_else(|| "Unknown error".to_owned()),
            });
        }
        Ok(payload.data.unwrap_or_default().into_result_set())
    }
}

fn transport_error(err: reqwest::Error) -> ConnectorError {
    ConnectorError::Connector {
        http_status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}

fn other<E: std::error::Error + Send + Sync + 'static>(err: E) -> ConnectorError {
    ConnectorError::Other(Box::new(err))
}

fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, ConnectorError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ConnectorError::Connector {
            http_status: Some(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected HTTP status")
                .to_owned(),
        });
    }
    let text = response.text().map_err(transport_error)?;
    serde_json::from_str(&text).map_err(other)
}

//
// Wire types
//

#[derive(Serialize, Debug)]
struct LoginRequest {
    data: LoginData,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LoginData {
    account_name: String,
    login_name: String,
    authenticator: String,
    token: String,
    client_app_id: String,
    client_app_version: String,
}

#[derive(Deserialize, Debug)]
struct WireResponse<T> {
    data: Option<T>,
    success: bool,
    message: Option<String>,
    code: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LoginResult {
    token: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    sql_text: String,
    sequence_id: u64,
    async_exec: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct QueryResult {
    rowtype: Vec<WireColumn>,
    rowset: Vec<Vec<Option<String>>>,
    total: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct WireColumn {
    name: String,
}

impl QueryResult {
    fn into_result_set(self) -> ResultSet {
        let columns = self.rowtype.into_iter().map(|column| column.name).collect();
        let row_count = self.total.map(|total| total as usize);
        ResultSet::with_row_count(columns, self.rowset, row_count)
    }
}

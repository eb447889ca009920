//! Smoke tests against a real account, gated behind the `live-tests`
//! feature. Configure with environment variables:
//!
//! - `SNOWFLAKE_ACCOUNT`, `SNOWFLAKE_USER`, `SNOWFLAKE_RSA_KEY_PATH`
//! - `SNOWFLAKE_DATABASE`: a database the user may create schemas in

use jwt_simple::algorithms::RS256KeyPair;

use crate::{RestExecutor, SqlFacade, DEFAULT_STAGE_ENCRYPTION};

fn live_facade() -> SqlFacade<RestExecutor> {
    let _ = env_logger::try_init();
    let require = |name: &str| std::env::var(name).unwrap_or_else(|_| panic!("{name} not set"));
    let key_content =
        std::fs::read_to_string(require("SNOWFLAKE_RSA_KEY_PATH")).expect("failed to read key file");
    let key_pair = RS256KeyPair::from_pem(&key_content).expect("failed to parse key");
    SqlFacade::new(RestExecutor::new(
        &require("SNOWFLAKE_ACCOUNT"),
        &require("SNOWFLAKE_USER"),
        key_pair,
    ))
}

#[test]
fn can_read_account_event_table() {
    // just exercises login + a SHOW round trip; any value is acceptable
    live_facade().get_account_event_table(None).unwrap();
}

#[test]
fn schema_and_stage_round_trip() {
    let facade = live_facade();
    let database = std::env::var("SNOWFLAKE_DATABASE").expect("SNOWFLAKE_DATABASE not set");

    let schema = format!("{database}.nativeapp_facade_live_test");
    facade.create_schema(&schema, None, None).unwrap();

    let stage = format!("{schema}.artifacts");
    facade
        .create_stage(&stage, DEFAULT_STAGE_ENCRYPTION, true, None, None, None)
        .unwrap();

    assert!(facade.stage_exists(&stage, None, None, None).unwrap());
    assert!(!facade
        .stage_exists(&format!("{schema}.no_such_stage"), None, None, None)
        .unwrap());
}

#[test]
fn missing_database_means_stage_does_not_exist() {
    let facade = live_facade();
    let exists = facade
        .stage_exists("stage", None, Some("db_that_does_not_exist_12345"), None)
        .unwrap();
    assert!(!exists);
}

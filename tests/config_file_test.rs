use anyhow::Result;
use bench_bindings::{connect, BindingConfig, BindingKind, Fields};
use httpmock::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_connect_from_toml_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let config_content = format!(
        r#"
[binding]
kind = "rest"

[rest]
profile = "log_service"
base_url = "{}"
timeout_seconds = 5

[rest.params]
SvId = "replica"
"#,
        server.base_url()
    );
    let config_path = temp_dir.path().join("binding.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let read_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/readLog")
            .query_param("SvId", "replica")
            .query_param("key", "user1");
        then.status(200).body(r#"{"field1":"value1"}"#);
    });

    let config = BindingConfig::from_file(&config_path)?;
    assert_eq!(config.binding.kind, BindingKind::Rest);

    let mut db = connect(&config).await?;
    let record = db.read("usertable", "user1", None).await?;

    let expected: Fields = [("field1".to_string(), "value1".to_string())].into_iter().collect();
    assert_eq!(record, expected);
    read_mock.assert();

    db.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn test_function_profile_from_file_with_memory_index() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    std::env::set_var("BENCH_BINDINGS_FN_URL", server.url("/function-1"));
    let config_path = temp_dir.path().join("function.toml");
    tokio::fs::write(
        &config_path,
        r#"
[binding]
kind = "rest"

[rest]
profile = "function"
base_url = "${BENCH_BINDINGS_FN_URL}"

[index]
backend = "memory"
"#,
    )
    .await?;

    let insert_mock = server.mock(|when, then| {
        when.method(POST).path("/function-1/insert");
        then.status(200);
    });
    let read_mock = server.mock(|when, then| {
        when.method(GET).path("/function-1").query_param("key", "user9");
        then.status(200).body(r#"{"Message":{"field0":"v0"}}"#);
    });

    let config = BindingConfig::from_file(&config_path)?;
    let db = connect(&config).await?;

    let values: Fields = [("field0".to_string(), "v0".to_string())].into_iter().collect();
    db.insert("usertable", "user9", &values).await?;
    let records = db.scan("usertable", "user9", 1, None).await?;

    assert_eq!(records, vec![values]);
    insert_mock.assert();
    read_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let result = BindingConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(bench_bindings::BindingError::IoError(_))));
}

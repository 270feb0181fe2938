use bench_bindings::{report, BindingError, Db, FieldSet, Fields, Operation, RestConfig, RestDb, Status};
use httpmock::prelude::*;

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn log_service(server: &MockServer) -> RestDb {
    RestDb::new(RestConfig::log_service(server.base_url())).unwrap()
}

#[tokio::test]
async fn test_read_populates_result() {
    let server = MockServer::start();
    let read_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/readLog")
            .query_param("SvId", "primary")
            .query_param("type", "log")
            .query_param("table", "usertable")
            .query_param("key", "user1")
            .header("accept", "application/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{\"field1\":\"value1\"}\n");
    });

    let db = log_service(&server);
    let result = db.read("usertable", "user1", None).await;

    assert_eq!(report(Operation::Read, &result), Status::Ok);
    assert_eq!(result.unwrap(), fields(&[("field1", "value1")]));
    read_mock.assert();
}

#[tokio::test]
async fn test_read_sends_field_filter() {
    let server = MockServer::start();
    let read_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/readLog")
            .query_param("key", "user1")
            .query_param("fields", "field0");
        then.status(200).body(r#"{"field0":"value0"}"#);
    });

    let filter: FieldSet = ["field0".to_string()].into_iter().collect();
    let db = log_service(&server);
    let record = db.read("usertable", "user1", Some(&filter)).await.unwrap();

    assert_eq!(record, fields(&[("field0", "value0")]));
    read_mock.assert();
}

#[tokio::test]
async fn test_read_http_error_is_reported() {
    let server = MockServer::start();
    let read_mock = server.mock(|when, then| {
        when.method(GET).path("/readLog");
        then.status(404);
    });

    let db = log_service(&server);
    let result = db.read("usertable", "missing", None).await;

    assert!(matches!(result, Err(BindingError::StatusError { status: 404, .. })));
    assert_eq!(report(Operation::Read, &result), Status::Error);
    read_mock.assert();
}

#[tokio::test]
async fn test_read_malformed_json_is_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/readLog");
        then.status(200).body("<html>oops</html>");
    });

    let db = log_service(&server);
    let result = db.read("usertable", "user1", None).await;

    assert!(matches!(result, Err(BindingError::DecodeError(_))));
}

#[tokio::test]
async fn test_insert_sends_key_and_all_fields_once() {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/insertLog")
            .query_param("SvId", "primary")
            .query_param("table", "usertable")
            .query_param("key", "user1")
            .query_param("field0", "value0")
            .query_param("field1", "value1");
        then.status(200).body(r#"{"status":"ok"}"#);
    });

    let db = log_service(&server);
    let values = fields(&[("field0", "value0"), ("field1", "value1")]);
    let result = db.insert("usertable", "user1", &values).await;

    assert_eq!(report(Operation::Insert, &result), Status::Ok);
    insert_mock.assert_hits(1);
}

#[tokio::test]
async fn test_insert_network_failure_is_error() {
    // nothing listens on port 1
    let db = RestDb::new(RestConfig::log_service("http://127.0.0.1:1")).unwrap();
    let values = fields(&[("field0", "value0")]);
    let result = db.insert("usertable", "user1", &values).await;

    assert!(matches!(result, Err(BindingError::HttpError(_))));
    assert_eq!(report(Operation::Insert, &result), Status::Error);
}

#[tokio::test]
async fn test_update_targets_update_endpoint() {
    let server = MockServer::start();
    let update_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/updateLog")
            .query_param("key", "user1")
            .query_param("field0", "changed");
        then.status(200);
    });
    let insert_mock = server.mock(|when, then| {
        when.method(GET).path("/insertLog");
        then.status(200);
    });

    let db = log_service(&server);
    db.update("usertable", "user1", &fields(&[("field0", "changed")]))
        .await
        .unwrap();

    update_mock.assert();
    insert_mock.assert_hits(0);
}

#[tokio::test]
async fn test_delete_without_index() {
    let server = MockServer::start();
    let delete_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/deleteLog")
            .query_param("table", "usertable")
            .query_param("key", "user1");
        then.status(200);
    });

    let db = log_service(&server);
    let result = db.delete("usertable", "user1").await;

    assert_eq!(report(Operation::Delete, &result), Status::Ok);
    delete_mock.assert();
}

#[tokio::test]
async fn test_remote_scan_returns_at_most_count_in_order() {
    let server = MockServer::start();
    let scan_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/scanLog")
            .query_param("key", "user1")
            .query_param("recordCount", "2");
        then.status(200).body(
            r#"[{"id":"user1","field0":"a"},{"id":"user2","field0":"b"},{"id":"user3","field0":"c"}]"#,
        );
    });

    let db = log_service(&server);
    let records = db.scan("usertable", "user1", 2, None).await.unwrap();

    assert_eq!(
        records,
        vec![
            fields(&[("id", "user1"), ("field0", "a")]),
            fields(&[("id", "user2"), ("field0", "b")]),
        ]
    );
    scan_mock.assert();
}

#[tokio::test]
async fn test_remote_scan_with_zero_count_sends_nothing() {
    let server = MockServer::start();
    let scan_mock = server.mock(|when, then| {
        when.method(GET).path("/scanLog");
        then.status(200).body("[]");
    });

    let db = log_service(&server);
    let records = db.scan("usertable", "user1", 0, None).await.unwrap();

    assert!(records.is_empty());
    scan_mock.assert_hits(0);
}

#[tokio::test]
async fn test_remote_scan_bad_record_fails_whole_scan() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/scanLog");
        then.status(200).body(r#"[{"id":"user1"},"not-a-record"]"#);
    });

    let db = log_service(&server);
    let result = db.scan("usertable", "user1", 10, None).await;

    assert!(matches!(result, Err(BindingError::ResponseError { .. })));
}

#[tokio::test]
async fn test_timeout_is_applied() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/readLog");
        then.status(200)
            .delay(std::time::Duration::from_millis(2500))
            .body(r#"{"field1":"value1"}"#);
    });

    let mut config = RestConfig::log_service(server.base_url());
    config.timeout_seconds = Some(1);
    let db = RestDb::new(config).unwrap();

    let result = db.read("usertable", "user1", None).await;
    assert!(matches!(result, Err(BindingError::HttpError(_))));
}

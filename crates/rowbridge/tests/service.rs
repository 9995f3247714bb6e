mod common;

use common::{harness, Student};
use pretty_assertions::assert_eq;
use rowbridge::{
    driver::Sql,
    stmt::Value,
    wire::{self, SqlRequest, ValueResponse},
    Cipher, Client, Config, Executor, Registry, Schema, Service, Transport,
};
use rowbridge_driver_sqlite::Sqlite;
use std::{sync::Arc, time::Duration};

fn insert(age: i64) -> Sql {
    Sql::new(format!(r#"INSERT INTO "Student" ("Age") VALUES ({age})"#))
}

#[tokio::test]
async fn failed_transaction_leaves_store_unchanged() {
    let h = harness().await;

    let ok = h
        .client
        .transaction(vec![
            insert(1),
            Sql::new(r#"INSERT INTO "Missing" ("Age") VALUES (2)"#),
            insert(3),
        ])
        .await
        .unwrap();
    assert!(!ok);

    let count = h.client.scalar(r#"SELECT COUNT(*) FROM "Student""#).await.unwrap();
    assert_eq!(count.as_deref(), Some("0"));

    let ok = h.client.transaction(vec![insert(1), insert(3)]).await.unwrap();
    assert!(ok);
    let count = h.client.scalar(r#"SELECT COUNT(*) FROM "Student""#).await.unwrap();
    assert_eq!(count.as_deref(), Some("2"));
}

#[tokio::test]
async fn query_returns_ordered_rows_as_plain_json() {
    let h = harness().await;
    h.client.non_query(insert(20)).await.unwrap();

    let request = SqlRequest::new(
        Cipher::default().encrypt(r#"SELECT "Id", "Age", "Genders" FROM "Student""#),
        vec![],
    );
    let reply = h
        .service
        .dispatch(wire::QUERY, &serde_json::to_string(&request).unwrap())
        .await
        .unwrap();
    let response: ValueResponse = serde_json::from_str(&reply).unwrap();
    assert_eq!(
        response.value.as_deref(),
        Some(r#"[{"Id":1,"Age":20,"Genders":null}]"#)
    );
}

#[tokio::test]
async fn query_with_no_rows_is_an_empty_list() {
    let h = harness().await;
    let rows = h
        .client
        .query(r#"SELECT * FROM "Student" WHERE "Age" > 100"#)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn query_failures_surface() {
    let h = harness().await;
    let err = h.client.query(r#"SELECT * FROM "Missing""#).await.unwrap_err();
    assert!(err.is_driver());
    assert!(err.to_string().starts_with("handling Generic/Query"));
}

#[tokio::test]
async fn bound_parameters_travel_with_the_statement() {
    let h = harness().await;
    h.client
        .non_query(Sql::with_params(
            r#"INSERT INTO "Student" ("Age", "Genders") VALUES (?1, ?2)"#,
            vec![Value::I64(33), Value::from("x")],
        ))
        .await
        .unwrap();

    let rows = h
        .client
        .query(Sql::with_params(
            r#"SELECT "Genders" FROM "Student" WHERE "Age" = ?1"#,
            vec![Value::I64(33)],
        ))
        .await
        .unwrap();
    assert_eq!(rows[0]["Genders"], Value::from("x"));
}

#[tokio::test]
async fn queries_are_parallel_to_input() {
    let h = harness().await;
    h.client.transaction(vec![insert(1), insert(2)]).await.unwrap();

    let results = h
        .client
        .queries(vec![
            Sql::new(r#"SELECT "Age" FROM "Student" ORDER BY "Age""#),
            Sql::new(r#"SELECT "Age" FROM "Student" WHERE "Age" > 5"#),
        ])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].len(), 2);
    assert!(results[1].is_empty());
}

#[tokio::test]
async fn non_query_reports_whether_rows_changed() {
    let h = harness().await;
    h.client.non_query(insert(1)).await.unwrap();

    let changed = h
        .client
        .non_query(r#"UPDATE "Student" SET "Age" = 2"#)
        .await
        .unwrap();
    assert!(changed);

    let changed = h
        .client
        .non_query(r#"UPDATE "Student" SET "Age" = 2 WHERE "Id" = 99"#)
        .await
        .unwrap();
    assert!(!changed);
}

#[tokio::test]
async fn scalar_is_null_without_rows() {
    let h = harness().await;
    let value = h
        .client
        .scalar(r#"SELECT "Age" FROM "Student" WHERE "Id" = 1"#)
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn schema_is_served_encrypted() {
    let h = harness().await;

    let response = h.service.get_schema().await.unwrap();
    let ciphertext = response.value.unwrap();
    assert!(!ciphertext.contains("Student"));

    let schema: Schema =
        serde_json::from_str(&Cipher::default().decrypt(&ciphertext).unwrap()).unwrap();
    assert_eq!(
        schema.table_fields("student"),
        ["Id", "CreatedDate", "ModifiedDate", "IsDeleted", "Age", "Genders", "Tags"]
    );

    let fields = h.client.table_fields("fdb.Student").await.unwrap();
    assert_eq!(fields.len(), 7);
    assert!(h.client.table_fields("Teacher").await.unwrap().is_empty());
}

#[tokio::test]
async fn undecryptable_statement_is_rejected() {
    let h = harness().await;

    let request = SqlRequest::new("bm90IGNpcGhlcnRleHQ=".into(), vec![]);
    let err = h
        .service
        .dispatch(wire::NON_QUERY, &serde_json::to_string(&request).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_crypto());

    let stranger = Client::new(
        h.transport.clone(),
        Config {
            key: "0123456789abcdef".into(),
            ..Config::default()
        },
    )
    .unwrap();
    let err = stranger.query("SELECT 1").await.unwrap_err();
    assert!(err.is_crypto());
}

#[tokio::test]
async fn bulk_insert_of_unknown_entity_fails() {
    let h = harness().await;
    let err = h
        .client
        .bulk_insert("Teacher", vec!["{}".into()])
        .await
        .unwrap_err();
    assert!(err.is_unknown_entity());

    assert!(h.client.bulk_insert("student", vec![]).await.unwrap());
}

#[tokio::test]
async fn bulk_insert_maps_records_onto_table_columns() {
    let h = harness().await;

    let jsons = vec![
        r#"{"Age":7,"Gender":"female","Tags":["x","y"]}"#.to_string(),
        r#"{"age":"8","gender":"male","Qqqqqqqq":1}"#.to_string(),
    ];
    assert!(h.client.bulk_insert("Student", jsons).await.unwrap());

    let rows = h
        .client
        .query(r#"SELECT "Age", "Genders", "Tags" FROM "Student" ORDER BY "Id""#)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Genders"], Value::from("female"));
    assert_eq!(rows[0]["Tags"], Value::from("x,y"));
    assert_eq!(rows[1]["Age"], Value::I64(8));
    assert_eq!(rows[1]["Tags"], Value::from(""));
}

#[tokio::test]
async fn unknown_route_is_an_error() {
    let h = harness().await;
    assert!(h.service.dispatch("Generic/Nope", "{}").await.is_err());
}

#[tokio::test]
async fn service_reads_schema_once_per_interval() {
    let executor = Executor::new(Sqlite::in_memory()).unwrap();
    executor.non_query(common::CREATE_STUDENT).await.unwrap();

    let config = Config {
        schema_refresh_ms: 60_000,
        ..Config::default()
    };
    let service = Arc::new(
        Service::new(executor.clone(), Registry::new().with::<Student>(), config).unwrap(),
    );
    assert_eq!(service.schema().await.unwrap().tables.len(), 1);

    executor
        .non_query(r#"CREATE TABLE "Quiz" ("Id" INTEGER PRIMARY KEY, "Title" TEXT)"#)
        .await
        .unwrap();
    assert_eq!(service.schema().await.unwrap().tables.len(), 1);

    service.invalidate_schema();
    assert_eq!(service.schema().await.unwrap().tables.len(), 2);

    let reply = service.post(wire::GET_SCHEMA, String::new()).await.unwrap();
    assert!(reply.starts_with(r#"{"Value":"#));
}

#[tokio::test]
async fn statement_ceiling_fails_the_transaction() {
    let driver = Sqlite::in_memory().with_statement_timeout(Duration::from_millis(20));
    let executor = Executor::new(driver).unwrap();

    let spin = Sql::new(
        "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n) SELECT COUNT(*) FROM n",
    );
    assert!(!executor.transaction(vec![spin]).await.unwrap());
    assert!(executor.scalar("SELECT 1").await.unwrap().is_some());
}

#[cfg(feature = "sqlite")]
#[test]
fn connect_picks_driver_by_scheme() {
    assert!(Executor::connect("sqlite::memory:", &Config::default()).is_ok());
    assert!(Executor::connect("mysql://localhost/db", &Config::default())
        .unwrap_err()
        .is_invalid_config());
}

use pretty_assertions::assert_eq;
use rowbridge_core::{
    driver::{
        operation::{BulkInsert, Operation, Sql},
        Connection, Driver,
    },
    stmt::Value,
};
use rowbridge_driver_sqlite::Sqlite;
use std::time::Duration;

const CREATE: &str = r#"CREATE TABLE "Student" (
    "Id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "CreatedDate" INTEGER NOT NULL DEFAULT 0,
    "ModifiedDate" INTEGER NOT NULL DEFAULT 0,
    "IsDeleted" INTEGER NOT NULL DEFAULT 0,
    "Name" TEXT NOT NULL,
    "Age" INTEGER
)"#;

async fn connect() -> Box<dyn Connection> {
    let mut connection = Sqlite::in_memory().connect().await.unwrap();
    connection
        .exec(Operation::NonQuery(CREATE.into()))
        .await
        .unwrap();
    connection
}

async fn count(connection: &mut Box<dyn Connection>) -> Option<Value> {
    connection
        .exec(Operation::Scalar(r#"SELECT COUNT(*) FROM "Student""#.into()))
        .await
        .unwrap()
        .into_scalar()
        .unwrap()
}

#[test]
fn url_selects_location() {
    assert_eq!(Sqlite::new("sqlite::memory:").unwrap().url(), "sqlite::memory:");
    assert_eq!(Sqlite::new("sqlite::memory:").unwrap().max_connections(), Some(1));
    assert_eq!(Sqlite::new("sqlite:/tmp/rb.db").unwrap().max_connections(), None);
    assert!(Sqlite::new("postgres://localhost").unwrap_err().is_invalid_config());
}

#[tokio::test]
async fn rows_keep_column_order_and_types() {
    let mut connection = connect().await;

    let inserted = connection
        .exec(Operation::Query(Sql::with_params(
            r#"INSERT INTO "Student" ("Name", "Age") VALUES (?1, ?2) RETURNING "Id";"#,
            vec!["ann".into(), 20.into()],
        )))
        .await
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(inserted[0]["Id"], Value::I64(1));

    let rows = connection
        .exec(Operation::Query(r#"SELECT "Name", "Age", "IsDeleted" FROM "Student";"#.into()))
        .await
        .unwrap()
        .into_rows()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].keys().map(String::as_str).collect::<Vec<_>>(),
        ["Name", "Age", "IsDeleted"]
    );
    assert_eq!(rows[0]["Name"], Value::from("ann"));
    assert_eq!(rows[0]["Age"], Value::I64(20));
}

#[tokio::test]
async fn empty_query_is_not_an_error() {
    let mut connection = connect().await;
    let rows = connection
        .exec(Operation::Query(r#"SELECT * FROM "Student";"#.into()))
        .await
        .unwrap()
        .into_rows()
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn scalar_of_nothing_is_none() {
    let mut connection = connect().await;
    let value = connection
        .exec(Operation::Scalar(r#"SELECT "Name" FROM "Student";"#.into()))
        .await
        .unwrap()
        .into_scalar()
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn non_query_reports_affected_rows() {
    let mut connection = connect().await;

    let affected = connection
        .exec(Operation::NonQuery(
            r#"INSERT INTO "Student" ("Name") VALUES ('a'), ('b');"#.into(),
        ))
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(affected, 2);

    let affected = connection
        .exec(Operation::NonQuery(
            r#"UPDATE "Student" SET "Age" = 3 WHERE "Name" = 'zed';"#.into(),
        ))
        .await
        .unwrap()
        .into_count()
        .unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn failed_transaction_leaves_store_untouched() {
    let mut connection = connect().await;

    let err = connection
        .exec(Operation::Transaction(vec![
            r#"INSERT INTO "Student" ("Name") VALUES ('a');"#.into(),
            r#"INSERT INTO "Missing" ("Name") VALUES ('b');"#.into(),
            r#"INSERT INTO "Student" ("Name") VALUES ('c');"#.into(),
        ]))
        .await
        .unwrap_err();

    assert!(err.is_driver());
    assert!(err.to_string().contains("transaction statement #1"));
    assert_eq!(count(&mut connection).await, Some(Value::I64(0)));

    // The connection is usable again after the rollback.
    connection
        .exec(Operation::Transaction(vec![
            r#"INSERT INTO "Student" ("Name") VALUES ('a');"#.into(),
            r#"UPDATE "Student" SET "Age" = 9 RETURNING "Id";"#.into(),
        ]))
        .await
        .unwrap();
    assert_eq!(count(&mut connection).await, Some(Value::I64(1)));
}

#[tokio::test]
async fn bulk_insert_loads_every_row() {
    let mut connection = connect().await;

    let rows = (0..25)
        .map(|i| vec![Value::from(format!("s{i}")), Value::I64(i)])
        .collect::<Vec<_>>();

    let loaded = connection
        .exec(Operation::BulkInsert(BulkInsert {
            table: "Student".into(),
            columns: vec!["Name".into(), "Age".into()],
            rows,
            batch_size: 10,
        }))
        .await
        .unwrap()
        .into_count()
        .unwrap();

    assert_eq!(loaded, 25);
    assert_eq!(count(&mut connection).await, Some(Value::I64(25)));
}

#[tokio::test]
async fn failed_bulk_insert_is_rolled_back() {
    let mut connection = connect().await;

    let err = connection
        .exec(Operation::BulkInsert(BulkInsert {
            table: "Student".into(),
            columns: vec!["Name".into()],
            rows: vec![vec!["ok".into()], vec![Value::Null]],
            batch_size: 1,
        }))
        .await
        .unwrap_err();

    assert!(err.is_driver());
    assert_eq!(count(&mut connection).await, Some(Value::I64(0)));
}

#[tokio::test]
async fn catalog_becomes_schema() {
    let mut connection = connect().await;
    connection
        .exec(Operation::NonQuery(
            r#"CREATE TABLE "Class" ("Id" INTEGER PRIMARY KEY, "Title" TEXT);"#.into(),
        ))
        .await
        .unwrap();

    let schema = connection
        .exec(Operation::ReadSchema)
        .await
        .unwrap()
        .into_schema()
        .unwrap();

    assert_eq!(
        schema.table_fields("student"),
        ["Id", "CreatedDate", "ModifiedDate", "IsDeleted", "Name", "Age"]
    );
    assert_eq!(schema.table_fields("Class"), ["Id", "Title"]);
    assert!(schema.table("sqlite_sequence").is_none());
}

#[tokio::test]
async fn long_statement_hits_the_ceiling() {
    let mut connection = Sqlite::in_memory()
        .with_statement_timeout(Duration::from_millis(20))
        .connect()
        .await
        .unwrap();

    let err = connection
        .exec(Operation::Scalar(
            "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT COUNT(*) FROM c;"
                .into(),
        ))
        .await
        .unwrap_err();

    assert!(err.is_statement_timeout());

    let value = connection
        .exec(Operation::Scalar("SELECT 1;".into()))
        .await
        .unwrap()
        .into_scalar()
        .unwrap();
    assert_eq!(value, Some(Value::I64(1)));
}

use pretty_assertions::assert_eq;
use rowbridge_sql::{
    stmt::{Arg, Condition, Select, Value},
    Serializer,
};

fn cond(text: &str) -> Arg {
    Condition::new(text).unwrap().into()
}

fn mssql(select: Select) -> String {
    Serializer::mssql().inline(&select.into())
}

fn sqlite(select: Select) -> String {
    Serializer::sqlite().inline(&select.into())
}

#[test]
fn equality_fields_are_anded_after_tautology() {
    let select = Select::from_fields("Student", &["Age", "Gender"], [20.into(), "male".into()]);

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] = 20 AND [Gender] = N'male' AND [IsDeleted] = 0;"
    );
}

#[test]
fn condition_is_appended_without_equals() {
    let select = Select::from_fields("Student", &["Age"], [cond(">20")]);

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] >20 AND [IsDeleted] = 0;"
    );
}

#[test]
fn null_and_missing_values_become_is_null() {
    let select = Select::from_fields("Student", &["Email", "Phone"], [Value::Null.into()]);

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Email] IS NULL AND [Phone] IS NULL AND [IsDeleted] = 0;"
    );
}

#[test]
fn pagination_injects_default_order() {
    let select = Select::from_fields("Student", &["ClassId"], ["cls-12".into()]).paginate(20, 10);

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [ClassId] = N'cls-12' AND [IsDeleted] = 0 \
         ORDER BY [Id] DESC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
}

#[test]
fn explicit_order_suppresses_default_order() {
    let select = Select::from_fields(
        "Student",
        &["ClassId"],
        ["cls-12".into(), cond("ORDER BY [CreatedDate] ASC")],
    )
    .paginate(20, 10);

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [ClassId] = N'cls-12' AND [IsDeleted] = 0 \
         ORDER BY [CreatedDate] ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
}

#[test]
fn lowercase_order_by_is_recognized() {
    let select = Select::from_fields("Student", &[], [cond("order by [Name]")]).paginate(0, 5);

    assert_eq!(
        sqlite(select),
        r#"SELECT * FROM "Student" WHERE 1 = 1 AND "IsDeleted" = 0 order by [Name] LIMIT 5 OFFSET 0;"#
    );
}

#[test]
fn pagination_requires_offset_and_positive_count() {
    let plain = "SELECT * FROM [Student] WHERE 1 = 1 AND [IsDeleted] = 0;";

    assert_eq!(mssql(Select::new("Student").paginate(-1, 10)), plain);
    assert_eq!(mssql(Select::new("Student").paginate(10, 0)), plain);
}

#[test]
fn trailing_literals_are_ignored() {
    let select = Select::from_fields(
        "Student",
        &["Age"],
        [20.into(), "stray".into(), cond("ORDER BY [Age] DESC")],
    );

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] = 20 AND [IsDeleted] = 0 ORDER BY [Age] DESC;"
    );
}

#[test]
fn deleted_rows_can_be_included() {
    let select = Select::new("Student").filter("Age", 20).include_deleted(true);

    assert_eq!(mssql(select), "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] = 20;");
}

#[test]
fn restricted_columns_and_count() {
    assert_eq!(
        mssql(Select::new("Student").columns(["Id", "Name"])),
        "SELECT [Id], [Name] FROM [Student] WHERE 1 = 1 AND [IsDeleted] = 0;"
    );
    assert_eq!(
        mssql(Select::new("Student").columns(["Id"]).count()),
        "SELECT COUNT(*) FROM [Student] WHERE 1 = 1 AND [IsDeleted] = 0;"
    );
}

#[test]
fn qualified_fields_quote_each_part() {
    let select = Select::new("fdb.Student")
        .columns(["Student.Id"])
        .filter("Student.Age", 20)
        .filter("Student.Gender", Condition::new("LIKE 'm%'").unwrap());

    assert_eq!(
        mssql(select.clone()),
        "SELECT [Student].[Id] FROM [fdb].[Student] WHERE 1 = 1 AND [Student].[Age] = 20 \
         AND [Student].[Gender] LIKE 'm%' AND [IsDeleted] = 0;"
    );
    assert_eq!(
        sqlite(select),
        r#"SELECT "Student"."Id" FROM "fdb"."Student" WHERE 1 = 1 AND "Student"."Age" = 20 AND "Student"."Gender" LIKE 'm%' AND "IsDeleted" = 0;"#
    );
}

#[test]
fn literals_are_escaped_per_dialect() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let select = Select::new("Student")
        .filter("Name", "O'Brien")
        .filter("Active", true)
        .filter("Born", date);

    assert_eq!(
        mssql(select.clone()),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Name] = N'O''Brien' AND [Active] = 1 \
         AND [Born] = N'2024-03-09' AND [IsDeleted] = 0;"
    );
    assert_eq!(
        sqlite(select),
        r#"SELECT * FROM "Student" WHERE 1 = 1 AND "Name" = 'O''Brien' AND "Active" = 1 AND "Born" = '2024-03-09' AND "IsDeleted" = 0;"#
    );
}

#[test]
fn schema_qualified_table() {
    assert_eq!(
        mssql(Select::new("fdb.Student")),
        "SELECT * FROM [fdb].[Student] WHERE 1 = 1 AND [IsDeleted] = 0;"
    );
}

#[test]
fn values_become_placeholders_when_collected() {
    let select: rowbridge_sql::Statement = Select::from_fields(
        "Student",
        &["Age", "Gender", "Score"],
        [20.into(), "male".into(), cond("> 8.5")],
    )
    .into();

    let mut params: Vec<Value> = vec![];
    let sql = Serializer::sqlite().serialize(&select, &mut params);
    assert_eq!(
        sql,
        r#"SELECT * FROM "Student" WHERE 1 = 1 AND "Age" = ?1 AND "Gender" = ?2 AND "Score" > 8.5 AND "IsDeleted" = 0;"#
    );
    assert_eq!(params, vec![Value::I64(20), Value::from("male")]);

    let mut params: Vec<Value> = vec![];
    let sql = Serializer::mssql().serialize(&select, &mut params);
    assert_eq!(
        sql,
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Age] = @p1 AND [Gender] = @p2 AND [Score] > 8.5 AND [IsDeleted] = 0;"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn set_membership_condition() {
    let select = Select::new("Student").filter("Name", Condition::is_in(["ann", "o'neil"]).unwrap());

    assert_eq!(
        mssql(select),
        "SELECT * FROM [Student] WHERE 1 = 1 AND [Name] IN ('ann','o''neil') AND [IsDeleted] = 0;"
    );
}

#![allow(dead_code)]

use rowbridge::{
    async_trait,
    entity::{Base, Field},
    field,
    stmt::{ScalarTy, Type},
    Client, Config, Entity, Executor, Flavor, Registry, Result, Service, Transport,
};
use chrono::NaiveDateTime;
use rowbridge_driver_sqlite::Sqlite;
use std::sync::{Arc, Mutex};

/// The gender column is spelled differently from the entity field, so
/// every load and push goes through fuzzy reconciliation.
pub const CREATE_STUDENT: &str = r#"CREATE TABLE "Student" (
    "Id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "CreatedDate" INTEGER NOT NULL DEFAULT 0,
    "ModifiedDate" INTEGER NOT NULL DEFAULT 0,
    "IsDeleted" INTEGER NOT NULL DEFAULT 0,
    "Age" INTEGER NOT NULL DEFAULT 0,
    "Genders" TEXT,
    "Tags" TEXT
)"#;

pub const CREATE_EXAM: &str = r#"CREATE TABLE "Exam" (
    "Id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "CreatedDate" INTEGER NOT NULL DEFAULT 0,
    "ModifiedDate" INTEGER NOT NULL DEFAULT 0,
    "IsDeleted" INTEGER NOT NULL DEFAULT 0,
    "Due" TEXT
)"#;

#[derive(Debug, Default)]
pub struct Student {
    pub base: Base,
    pub age: i64,
    pub gender: String,
    pub tags: Vec<String>,
}

impl Entity for Student {
    const NAME: &'static str = "Student";
    const TABLE: &'static str = "Student";

    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn own_fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Student>] = &[
            field!(Student, "Age", age, Type::I64),
            field!(Student, "Gender", gender, Type::STRING),
            field!(Student, "Tags", tags, Type::List(ScalarTy::String)),
        ];
        FIELDS
    }
}

pub fn student(age: i64, gender: &str) -> Student {
    Student {
        age,
        gender: gender.into(),
        tags: vec!["a".into(), "b".into()],
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct Exam {
    pub base: Base,
    pub due: Option<NaiveDateTime>,
}

impl Entity for Exam {
    const NAME: &'static str = "Exam";
    const TABLE: &'static str = "Exam";

    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn own_fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Exam>] = &[field!(Exam, "Due", due, Type::DATE_TIME)];
        FIELDS
    }
}

pub fn exam(due: NaiveDateTime) -> Exam {
    Exam {
        due: Some(due),
        ..Default::default()
    }
}

/// Forwards to the service and remembers every route it was asked for.
#[derive(Debug)]
pub struct Recording {
    service: Arc<Service>,
    routes: Mutex<Vec<String>>,
}

impl Recording {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.routes.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for Recording {
    async fn post(&self, route: &str, body: String) -> Result<String> {
        self.routes.lock().unwrap().push(route.to_string());
        self.service.dispatch(route, &body).await
    }
}

pub struct Harness {
    pub service: Arc<Service>,
    pub transport: Arc<Recording>,
    pub client: Client,
}

pub async fn harness() -> Harness {
    harness_with(Config::default()).await
}

pub async fn harness_with(config: Config) -> Harness {
    let executor = Executor::new(Sqlite::in_memory()).unwrap();
    executor.non_query(CREATE_STUDENT).await.unwrap();
    executor.non_query(CREATE_EXAM).await.unwrap();

    let registry = Registry::new().with::<Student>().with::<Exam>();
    let service = Arc::new(Service::new(executor, registry, Config::default()).unwrap());

    let transport = Arc::new(Recording {
        service: service.clone(),
        routes: Mutex::new(vec![]),
    });

    let client = Client::new(transport.clone(), config)
        .unwrap()
        .with_flavor(Flavor::Sqlite);

    Harness {
        service,
        transport,
        client,
    }
}

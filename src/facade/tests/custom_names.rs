//! Renamed members and classes along an inheritance chain.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use crate::{DeclaredType, MemberOptions, ObjectOptions, Reflect, TypedJson};

trait Person: Reflect {
    fn full_name(&self) -> String;
}

trait Staff: Person {}

macro_rules! impl_person {
    ($($ty:ty),*) => {$(
        impl Person for $ty {
            fn full_name(&self) -> String {
                format!("{} {}", self.first_name, self.last_name)
            }
        }
    )*};
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Person))]
struct Individual {
    first_name: String,
    last_name: String,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Person, dyn Staff))]
struct Employee {
    first_name: String,
    last_name: String,
    salary: u32,
    joined: Option<DateTime<Utc>>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Person, dyn Staff))]
struct PartTimeEmployee {
    first_name: String,
    last_name: String,
    salary: u32,
    joined: Option<DateTime<Utc>>,
    work_hours: u8,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Person))]
struct Investor {
    first_name: String,
    last_name: String,
    invest_amount: u64,
}

impl_person!(Individual, Employee, PartTimeEmployee, Investor);

impl Staff for Employee {}
impl Staff for PartTimeEmployee {}

#[derive(Reflect, Default)]
struct Company {
    name: String,
    employees: Vec<Box<dyn Staff>>,
    owner: Option<Box<dyn Person>>,
}

fn typed_json() -> TypedJson {
    let json = TypedJson::new();
    {
        let mut registry = json.registry().write();

        registry
            .register_abstract::<dyn Person>(ObjectOptions::new())
            .member(
                "first_name",
                MemberOptions::new().name("first-name").ty(DeclaredType::String),
            )
            .unwrap()
            .member(
                "last_name",
                MemberOptions::new().name("last-name").ty(DeclaredType::String),
            )
            .unwrap();
        registry
            .register_abstract::<dyn Staff>(ObjectOptions::new().extends::<dyn Person>())
            .member("salary", DeclaredType::Number.into())
            .unwrap()
            .member("joined", DeclaredType::Date.into())
            .unwrap();

        registry.register::<Individual>(ObjectOptions::new().extends::<dyn Person>());
        registry.register::<Employee>(ObjectOptions::new().extends::<dyn Staff>());
        registry
            .register::<PartTimeEmployee>(
                ObjectOptions::new()
                    .name("part-time-employee")
                    .extends::<Employee>(),
            )
            .member("work_hours", MemberOptions::new().name("work-hours"))
            .unwrap();
        registry
            .register::<Investor>(ObjectOptions::new().extends::<dyn Person>())
            .member("invest_amount", MemberOptions::new().name("invest-amount"))
            .unwrap();

        let registration = registry
            .register::<Company>(
                ObjectOptions::new()
                    .name("company")
                    .known_type::<Individual>()
                    .known_type::<Employee>()
                    .known_type::<PartTimeEmployee>()
                    .known_type::<Investor>(),
            )
            .member("name", MemberOptions::new())
            .unwrap()
            .member("employees", MemberOptions::new())
            .unwrap()
            .member("owner", MemberOptions::new())
            .unwrap();
        assert!(registration.reported().is_empty());
    }
    json
}

fn joined(day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(1992, 6, day, 9, 30, 0).single()
}

fn sample_company() -> Company {
    let mut company = Company {
        name: String::from("Json Types"),
        employees: Vec::new(),
        owner: Some(Box::new(PartTimeEmployee {
            first_name: String::from("John"),
            last_name: String::from("White"),
            salary: 160_000,
            joined: joined(27),
            work_hours: 12,
        })),
    };
    for j in 0..20_u32 {
        let first_name = format!("firstname_{j}");
        let last_name = format!("lastname_{j}");
        let employee: Box<dyn Staff> = if j % 5 == 0 {
            Box::new(PartTimeEmployee {
                first_name,
                last_name,
                salary: 1000 * j,
                joined: joined(1 + j),
                work_hours: 20,
            })
        } else {
            Box::new(Employee {
                first_name,
                last_name,
                salary: 2000 * j,
                joined: joined(1 + j),
            })
        };
        company.employees.push(employee);
    }
    company
}

#[test]
fn round_trip() {
    let json = typed_json();
    let company = sample_company();

    let text = json.serialize(&company, None).unwrap();
    let reparsed: Company = json.deserialize(&text, None).unwrap();

    assert_eq!(reparsed.name, "Json Types");
    assert_eq!(reparsed.employees.len(), 20);

    let first = (&*reparsed.employees[0] as &dyn Reflect)
        .downcast_ref::<PartTimeEmployee>()
        .unwrap();
    assert_eq!(first.joined, joined(1));
    assert_eq!(first.work_hours, 20);

    let second = (&*reparsed.employees[1] as &dyn Reflect)
        .downcast_ref::<Employee>()
        .unwrap();
    assert_eq!(second.full_name(), "firstname_1 lastname_1");
    assert_eq!(second.salary, 2000);

    let owner = reparsed.owner.as_deref().unwrap();
    assert_eq!(owner.full_name(), "John White");
    assert!((owner as &dyn Reflect).is::<PartTimeEmployee>());

    assert_eq!(json.serialize(&reparsed, None).unwrap(), text);
}

#[test]
fn custom_names_are_written() {
    let json = typed_json();
    let company = Company {
        name: String::from("Acme"),
        employees: Vec::new(),
        owner: Some(Box::new(Investor {
            first_name: String::from("Ada"),
            last_name: String::from("King"),
            invest_amount: 1_700_000,
        })),
    };

    assert_eq!(
        json.to_value(&company, None),
        json!({
            "employees": [],
            "name": "Acme",
            "owner": {
                "__type": "Investor",
                "first-name": "Ada",
                "invest-amount": 1_700_000,
                "last-name": "King",
            },
        })
    );
}

#[test]
fn renamed_class_is_the_hint() {
    let json = typed_json();
    let text = r#"{
        "name": "Acme",
        "employees": [{
            "__type": "part-time-employee",
            "first-name": "Grace",
            "last-name": "Hopper",
            "joined": "1992-06-27T09:30:00.000Z",
            "work-hours": 30
        }]
    }"#;

    let company: Company = json.deserialize(text, None).unwrap();
    let employee = (&*company.employees[0] as &dyn Reflect)
        .downcast_ref::<PartTimeEmployee>()
        .unwrap();
    assert_eq!(
        employee,
        &PartTimeEmployee {
            first_name: String::from("Grace"),
            last_name: String::from("Hopper"),
            salary: 0,
            joined: joined(27),
            work_hours: 30,
        }
    );
    assert!(company.owner.is_none());

    let value = json.to_value(&company, None);
    assert_eq!(value["employees"][0]["__type"], "part-time-employee");
    assert_eq!(value["employees"][0]["joined"], "1992-06-27T09:30:00.000Z");
}

//! People/pets data for the operator scenarios.

use lazyseq_operators::Seq;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    pub first: String,
    pub last: String,
}

impl Person {
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Owner identity used by pets: "Last, First".
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub name: String,
    pub owner: String,
    pub age: i32,
}

impl Pet {
    pub fn new(name: &str, owner: &str, age: i32) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            age,
        }
    }
}

pub fn people() -> Seq<Person> {
    Seq::from_vec(vec![
        Person::new("Magnus", "Hedlund"),
        Person::new("Terry", "Adams"),
        Person::new("Charlotte", "Weiss"),
        Person::new("Ann", "Adams"),
    ])
}

/// Owner names deliberately vary in case.
pub fn pets() -> Seq<Pet> {
    Seq::from_vec(vec![
        Pet::new("Barley", "adams, terry", 8),
        Pet::new("Boots", "Adams, Terry", 4),
        Pet::new("Whiskers", "WEISS, CHARLOTTE", 1),
        Pet::new("Daisy", "Hedlund, Magnus", 4),
        Pet::new("Rover", "Unknown, Nobody", 2),
    ])
}

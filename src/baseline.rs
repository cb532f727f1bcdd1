//! Comparison based reference sort for `"first last"` names.

use std::cmp::Ordering;

/// Sort names by surname, then by first name, keeping `"first last"` order in the result.
///
/// Names without a surname sort first. Names with more than two fields are ordered by their first
/// two fields and returned whole. The sort is stable.
///
/// # Examples
/// ```
/// use radix_name_sort::baseline::sort_by_surname;
///
/// let names = vec!["Bob Stone".to_string(), "Ann Lee".to_string()];
/// assert_eq!(sort_by_surname(&names), vec!["Ann Lee", "Bob Stone"]);
/// ```
pub fn sort_by_surname(names: &[String]) -> Vec<String> {
    let mut people: Vec<Person> = names.iter().map(|name| Person::new(name)).collect();
    people.sort();
    people.into_iter().map(|person| person.to_string()).collect()
}

#[derive(Debug)]
struct Person<'a> {
    name: &'a str,
    first_name: &'a str,
    last_name: Option<&'a str>,
}

impl<'a> Person<'a> {
    fn new(name: &'a str) -> Person<'a> {
        let mut fields = name.split_whitespace();
        Person {
            name,
            first_name: fields.next().unwrap_or(""),
            last_name: fields.next(),
        }
    }
}

impl<'a> Eq for Person<'a> {}

impl<'a> PartialEq<Self> for Person<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.last_name == other.last_name && self.first_name == other.first_name
    }
}

impl<'a> PartialOrd<Self> for Person<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Person<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_name
            .cmp(&other.last_name)
            .then_with(|| self.first_name.cmp(other.first_name))
    }
}

impl<'a> std::fmt::Display for Person<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

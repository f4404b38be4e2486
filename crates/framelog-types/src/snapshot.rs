use facet::Facet;

use crate::Value;

/// One named scalar property and its value at capture time.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// Ordered mapping from property name to scalar value, taken at a point in time.
///
/// Every snapshot taken within one session carries the same set of names;
/// only the values vary.
#[derive(Facet, Debug, Clone, PartialEq, Default)]
pub struct StateSnapshot {
    pub fields: Vec<Field>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push(Field {
            name: name.into(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Fields of `self` whose value differs from `previous`, or that `previous`
    /// does not have at all. Yields in `self`'s order.
    pub fn changed_since<'a>(&'a self, previous: &'a StateSnapshot) -> Vec<&'a Field> {
        let aligned = self.fields.len() == previous.fields.len()
            && self
                .fields
                .iter()
                .zip(&previous.fields)
                .all(|(a, b)| a.name == b.name);

        if aligned {
            return self
                .fields
                .iter()
                .zip(&previous.fields)
                .filter(|(now, before)| now.value != before.value)
                .map(|(now, _)| now)
                .collect();
        }

        self.fields
            .iter()
            .filter(|field| previous.get(&field.name) != Some(&field.value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a StateSnapshot {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

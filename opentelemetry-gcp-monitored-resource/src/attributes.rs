//! Read-only access to resource attributes.
//!
//! The mapping logic only ever needs two things from a resource: looking up
//! a single attribute as a string, and walking every attribute as a string.
//! [`ResourceAttributes`] captures exactly that, so the same resolver and
//! filter work on an SDK [`Resource`] as well as on plain maps.
use opentelemetry::{Key, Value};
use opentelemetry_sdk::Resource;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// A set of uniquely keyed resource attributes whose values can be read as strings.
///
/// Non-string values are rendered with their canonical string form
/// (`true`, `42`, `[a,b]`, ...). Iteration order is unspecified.
pub trait ResourceAttributes {
    /// Returns the string form of the attribute stored under `key`.
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Iterates over every attribute as a `(key, string value)` pair.
    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_>;
}

impl ResourceAttributes for Resource {
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(&Key::new(key.to_owned()))
            .map(|value| Cow::Owned(value.as_str().into_owned()))
    }

    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl ResourceAttributes for HashMap<Key, Value> {
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(Value::as_str)
    }

    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl ResourceAttributes for HashMap<String, String> {
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str()))))
    }
}

impl ResourceAttributes for BTreeMap<String, String> {
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str()))))
    }
}

impl<T: ResourceAttributes + ?Sized> ResourceAttributes for &T {
    fn get_string(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).get_string(key)
    }

    fn string_attributes(&self) -> Box<dyn Iterator<Item = (&str, Cow<'_, str>)> + '_> {
        (**self).string_attributes()
    }
}

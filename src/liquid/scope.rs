use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use liquid::model::{
    ArrayView, DisplayCow, KStringCow, ObjectView, ScalarCow, State, Value, ValueView,
};
use liquid::Object;

static NIL: Value = Value::Nil;

/// Template scope value. Objects answer every key, with `nil` for the ones
/// they do not hold, so `{{ page.title }}` on an untitled page renders empty
/// instead of failing the page.
#[derive(Debug, Clone)]
pub enum ScopeValue {
    /// Scalars, nil and states
    Value(Value),
    Array(Vec<ScopeValue>),
    Object(Arc<ScopeObject>),
}

impl ScopeValue {
    fn view(&self) -> &dyn ValueView {
        match self {
            ScopeValue::Value(value) => value,
            ScopeValue::Array(items) => items,
            ScopeValue::Object(object) => &**object,
        }
    }
}

impl From<&Value> for ScopeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(items) => ScopeValue::Array(items.iter().map(ScopeValue::from).collect()),
            Value::Object(object) => ScopeValue::Object(Arc::new(ScopeObject::from(object))),
            other => ScopeValue::Value(other.clone()),
        }
    }
}

impl From<ScopeObject> for ScopeValue {
    fn from(object: ScopeObject) -> Self {
        ScopeValue::Object(Arc::new(object))
    }
}

impl ValueView for ScopeValue {
    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        self.view().render()
    }

    fn source(&self) -> DisplayCow<'_> {
        self.view().source()
    }

    fn type_name(&self) -> &'static str {
        self.view().type_name()
    }

    fn query_state(&self, state: State) -> bool {
        self.view().query_state(state)
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        self.view().to_kstr()
    }

    fn to_value(&self) -> Value {
        self.view().to_value()
    }

    fn as_scalar(&self) -> Option<ScalarCow<'_>> {
        self.view().as_scalar()
    }

    fn as_array(&self) -> Option<&dyn ArrayView> {
        self.view().as_array()
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        self.view().as_object()
    }

    fn as_state(&self) -> Option<State> {
        self.view().as_state()
    }

    fn is_nil(&self) -> bool {
        self.view().is_nil()
    }
}

/// Object in a template scope, keys kept sorted
#[derive(Debug, Clone, Default)]
pub struct ScopeObject {
    fields: BTreeMap<String, ScopeValue>,
}

impl ScopeObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ScopeValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn to_object(&self) -> Object {
        let mut object = Object::new();
        for (key, value) in &self.fields {
            object.insert(key.clone().into(), value.to_value());
        }
        object
    }
}

impl From<&Object> for ScopeObject {
    fn from(object: &Object) -> Self {
        ScopeObject {
            fields: object
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), ScopeValue::from(value)))
                .collect(),
        }
    }
}

impl ValueView for ScopeObject {
    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(self.to_object().render().to_string()))
    }

    fn source(&self) -> DisplayCow<'_> {
        DisplayCow::Owned(Box::new(self.to_object().source().to_string()))
    }

    fn type_name(&self) -> &'static str {
        "object"
    }

    fn query_state(&self, state: State) -> bool {
        match state {
            State::Truthy => true,
            State::DefaultValue | State::Empty | State::Blank => self.fields.is_empty(),
        }
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        KStringCow::from_string(self.to_object().render().to_string())
    }

    fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        Some(self)
    }
}

impl ObjectView for ScopeObject {
    fn as_value(&self) -> &dyn ValueView {
        self
    }

    fn size(&self) -> i64 {
        self.fields.len() as i64
    }

    fn keys<'k>(&'k self) -> Box<dyn Iterator<Item = KStringCow<'k>> + 'k> {
        Box::new(self.fields.keys().map(|key| KStringCow::from_ref(key.as_str())))
    }

    fn values<'k>(&'k self) -> Box<dyn Iterator<Item = &'k dyn ValueView> + 'k> {
        Box::new(self.fields.values().map(|value| value as &dyn ValueView))
    }

    fn iter<'k>(&'k self) -> Box<dyn Iterator<Item = (KStringCow<'k>, &'k dyn ValueView)> + 'k> {
        Box::new(
            self.fields
                .iter()
                .map(|(key, value)| (KStringCow::from_ref(key.as_str()), value as &dyn ValueView)),
        )
    }

    // Every key resolves; `size` is left to liquid's own lookup.
    fn contains_key(&self, index: &str) -> bool {
        index != "size" || self.fields.contains_key(index)
    }

    fn get<'s>(&'s self, index: &str) -> Option<&'s dyn ValueView> {
        match self.fields.get(index) {
            Some(value) => Some(value),
            None if index == "size" => None,
            None => Some(&NIL),
        }
    }
}

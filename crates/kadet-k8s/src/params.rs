//! Keyword arguments and their values, as passed to [`K8sObj`] and [`ResourceKind`] builders.
use std::fmt::{self, Display};

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use snafu::{OptionExt, Snafu, ensure};

use crate::{object::K8sObj, resource::ResourceKind};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Parameter names and their values, in insertion order.
pub type Params = IndexMap<String, ParamValue>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("missing required param {key:?}: {hint}"))]
    MissingParam { key: String, hint: String },

    #[snafu(display("param {key:?} must be {expected}, got {found}"))]
    WrongType {
        key: String,
        expected: ParamType,
        found: String,
    },
}

/// Parameter names which do not turn into the right model key by camel casing them.
const KEY_OVERRIDES: &[(&str, &str)] = &[
    ("_continue", "continue"),
    ("_not", "not"),
    ("_ref", "$ref"),
    ("cluster_ip", "clusterIP"),
    ("cluster_ips", "clusterIPs"),
    ("external_ips", "externalIPs"),
    ("host_ip", "hostIP"),
    ("host_ipc", "hostIPC"),
    ("host_ips", "hostIPs"),
    ("host_pid", "hostPID"),
    ("load_balancer_ip", "loadBalancerIP"),
    ("pod_ip", "podIP"),
    ("pod_ips", "podIPs"),
];

/// Returns the key Kubernetes expects for the parameter `name`.
///
/// snake_case names are camel cased (`match_labels` becomes `matchLabels`), names without an
/// underscore are used verbatim.
pub fn to_model_key(name: &str) -> String {
    if let Some((_, key)) = KEY_OVERRIDES.iter().find(|(param, _)| *param == name) {
        return (*key).to_owned();
    }

    if name.contains('_') {
        name.to_case(Case::Camel)
    } else {
        name.to_owned()
    }
}

/// A single parameter value.
///
/// Nested builder objects can be passed as [`ParamValue::Object`], also inside mappings and
/// lists. They are flattened into their rendered manifest by [`ParamValue::to_value`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Value(Value),
    Object(K8sObj),
    Mapping(Params),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Recursively flattens `self` into a plain value. Keys of nested mappings are kept as-is.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Object(obj) => obj.dump(),
            Self::Mapping(mapping) => Value::Object(
                mapping
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect::<Map<_, _>>(),
            ),
            Self::List(list) => Value::Array(list.iter().map(Self::to_value).collect()),
        }
    }

    /// Describes the type of `self` for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::Value(Value::Null) => "null".to_owned(),
            Self::Value(Value::Bool(_)) => "a boolean".to_owned(),
            Self::Value(Value::Number(number)) if number.is_f64() => "a float".to_owned(),
            Self::Value(Value::Number(_)) => "an integer".to_owned(),
            Self::Value(Value::String(_)) => "a string".to_owned(),
            Self::Value(Value::Array(_)) | Self::List(_) => "a list".to_owned(),
            Self::Value(Value::Object(_)) | Self::Mapping(_) => "a mapping".to_owned(),
            Self::Object(obj) => match obj.kind() {
                Some(kind) => object_name(kind.into()),
                None => object_name(obj.model().into()),
            },
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<K8sObj> for ParamValue {
    fn from(obj: K8sObj) -> Self {
        Self::Object(obj)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_owned()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(list: Vec<ParamValue>) -> Self {
        Self::List(list)
    }
}

impl From<Params> for ParamValue {
    fn from(mapping: Params) -> Self {
        Self::Mapping(mapping)
    }
}

/// The type a parameter is required to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Mapping,
    List,
    Any,

    /// A builder object produced by the given [`ResourceKind`].
    Object(ResourceKind),
}

impl ParamType {
    pub fn matches(self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::String, ParamValue::Value(Value::String(_)))
            | (Self::Boolean, ParamValue::Value(Value::Bool(_)))
            | (Self::Mapping, ParamValue::Value(Value::Object(_)) | ParamValue::Mapping(_))
            | (Self::List, ParamValue::Value(Value::Array(_)) | ParamValue::List(_)) => true,
            (Self::Integer, ParamValue::Value(Value::Number(number))) => !number.is_f64(),
            (Self::Object(kind), ParamValue::Object(obj)) => obj.kind() == Some(kind),
            _ => false,
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("a string"),
            Self::Integer => f.write_str("an integer"),
            Self::Boolean => f.write_str("a boolean"),
            Self::Mapping => f.write_str("a mapping"),
            Self::List => f.write_str("a list"),
            Self::Any => f.write_str("any value"),
            Self::Object(kind) => f.write_str(&object_name((*kind).into())),
        }
    }
}

/// The keyword arguments a builder object is constructed from.
///
/// Values are taken out with [`Self::need`] and [`Self::optional`], so whatever is left over
/// afterwards was not asked for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kwargs(Params);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single keyword argument, overriding any previous value for the same key.
    pub fn with(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Takes out the required keyword argument `key` and checks that it has type `ty`.
    ///
    /// `hint` is shown to the user if `key` is missing.
    pub fn need(&mut self, key: &str, ty: ParamType, hint: &str) -> Result<ParamValue> {
        let value = self
            .0
            .shift_remove(key)
            .context(MissingParamSnafu { key, hint })?;
        check_type(key, ty, value)
    }

    /// Takes out the keyword argument `key` if it is set and checks that it has type `ty`.
    pub fn optional(&mut self, key: &str, ty: ParamType) -> Result<Option<ParamValue>> {
        self.0
            .shift_remove(key)
            .map(|value| check_type(key, ty, value))
            .transpose()
    }

    pub fn into_params(self) -> Params {
        self.0
    }
}

impl From<Params> for Kwargs {
    fn from(params: Params) -> Self {
        Self(params)
    }
}

impl<K, V> FromIterator<(K, V)> for Kwargs
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Names a builder object in error messages, e.g. `an ObjectMeta object`.
fn object_name(name: &str) -> String {
    let article = match name.chars().next() {
        Some('A' | 'E' | 'I' | 'O' | 'U') => "an",
        _ => "a",
    };
    format!("{article} {name} object")
}

fn check_type(key: &str, ty: ParamType, value: ParamValue) -> Result<ParamValue> {
    ensure!(
        ty.matches(&value),
        WrongTypeSnafu {
            key,
            expected: ty,
            found: value.type_name(),
        }
    );
    Ok(value)
}

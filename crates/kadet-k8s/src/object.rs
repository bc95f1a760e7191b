use serde::Serialize;
use serde_json::{Map, Value};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument, warn};

use crate::{
    model::{self, Model},
    params::{self, Kwargs, ParamType, ParamValue, Params, to_model_key},
    resource::ResourceKind,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid params for {target}"))]
    InvalidParams {
        source: params::Error,
        target: String,
    },

    #[snafu(display("unknown model"))]
    UnknownModel { source: model::Error },

    #[snafu(display("failed to render {target}"))]
    Render {
        source: model::Error,
        target: String,
    },
}

/// A Kubernetes object built from a [`Model`] and its params.
///
/// The object is rendered when it is constructed: nested objects in the params are flattened,
/// snake_case param names are turned into camelCase keys and the result is run through the
/// model, so invalid params are reported right away. [`Self::dump`] returns the rendered
/// manifest.
///
/// ```
/// # use kadet_k8s::{model::Model, object::K8sObj, params::{ParamValue, Params}};
/// # use serde_json::json;
/// let mut params = Params::new();
/// params.insert("match_labels".to_owned(), ParamValue::from(json!({"app": "web"})));
///
/// let selector = K8sObj::new(Model::V1LabelSelector, params).unwrap();
/// assert_eq!(selector.dump(), json!({"matchLabels": {"app": "web"}}));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct K8sObj {
    model: Model,
    kind: Option<ResourceKind>,
    root: Map<String, Value>,
}

impl K8sObj {
    pub fn new(model: Model, params: Params) -> Result<Self> {
        Self::instantiate(model, None, params)
    }

    /// Builds an object from generic kwargs: `model` names the model (e.g. `V1Service`) and
    /// `params` holds its params.
    pub fn from_kwargs(mut kwargs: Kwargs) -> Result<Self> {
        let model = kwargs
            .need(
                "model",
                ParamType::String,
                "need a kubernetes model name, `k8sdet models` lists them",
            )
            .context(InvalidParamsSnafu { target: "K8sObj" })?;
        let params = kwargs
            .need("params", ParamType::Mapping, "need kubernetes model params")
            .context(InvalidParamsSnafu { target: "K8sObj" })?;

        if !kwargs.is_empty() {
            let ignored: Vec<&str> = kwargs.keys().collect();
            warn!(?ignored, "ignoring kwargs besides model and params");
        }

        let model = Model::parse(model.to_value().as_str().unwrap_or_default())
            .context(UnknownModelSnafu)?;
        let params = match params {
            ParamValue::Mapping(params) => params,
            ParamValue::Value(Value::Object(params)) => params
                .into_iter()
                .map(|(name, value)| (name, ParamValue::Value(value)))
                .collect(),
            _ => Params::new(),
        };

        Self::new(model, params)
    }

    #[instrument(level = "debug", skip(params))]
    pub(crate) fn instantiate(
        model: Model,
        kind: Option<ResourceKind>,
        params: Params,
    ) -> Result<Self> {
        let params: Map<String, Value> = params
            .iter()
            .map(|(name, value)| (to_model_key(name), value.to_value()))
            .collect();
        debug!(?params, "using model params");

        let root = model.render(params).context(RenderSnafu {
            target: kind.map_or_else(|| model.to_string(), |kind| kind.to_string()),
        })?;

        Ok(Self { model, kind, root })
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// The [`ResourceKind`] which built this object, [`None`] for generic objects.
    pub fn kind(&self) -> Option<ResourceKind> {
        self.kind
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Returns the rendered manifest as a plain mapping.
    pub fn dump(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.root.get("apiVersion").and_then(Value::as_str)
    }

    /// The `kind` of the rendered manifest, as opposed to the [`ResourceKind`] from [`Self::kind`].
    pub fn object_kind(&self) -> Option<&str> {
        self.root.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.root
            .get("metadata")
            .and_then(|metadata| metadata.get("name"))
            .or_else(|| self.root.get("name"))
            .and_then(Value::as_str)
    }
}

impl Serialize for K8sObj {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.root.serialize(serializer)
    }
}

use crate::{
    object::{self, K8sObj},
    params::{Kwargs, ParamValue},
    resource::ResourceKind,
};

#[derive(Clone, Debug, PartialEq)]
enum Target {
    Resource(ResourceKind),
    Model(String),
}

/// A builder to build [`K8sObj`] objects, either from a [`ResourceKind`] or from a model name.
///
/// ```
/// # use kadet_k8s::{builder::ObjectBuilder, resource::ResourceKind};
/// # use serde_json::json;
/// let selector = ObjectBuilder::resource(ResourceKind::LabelSelector)
///     .with("match_labels", json!({"app": "web"}))
///     .build()
///     .unwrap();
///
/// let service = ObjectBuilder::model("V1Service")
///     .with("metadata", json!({"name": "web"}))
///     .with("spec", json!({"selector": {"app": "web"}}))
///     .build()
///     .unwrap();
///
/// assert_eq!(selector.dump(), json!({"matchLabels": {"app": "web"}}));
/// assert_eq!(service.object_kind(), Some("Service"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectBuilder {
    target: Target,
    kwargs: Kwargs,
}

impl ObjectBuilder {
    pub fn resource(kind: ResourceKind) -> Self {
        Self {
            target: Target::Resource(kind),
            kwargs: Kwargs::new(),
        }
    }

    pub fn model(model: impl Into<String>) -> Self {
        Self {
            target: Target::Model(model.into()),
            kwargs: Kwargs::new(),
        }
    }

    /// Sets a single param. It'll override a param with the same name.
    pub fn with(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.kwargs.with(name, value);
        self
    }

    pub fn with_opt(
        &mut self,
        name: impl Into<String>,
        value: Option<impl Into<ParamValue>>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.kwargs.with(name, value);
        }
        self
    }

    pub fn build(&self) -> Result<K8sObj, object::Error> {
        match &self.target {
            Target::Resource(kind) => kind.build(self.kwargs.clone()),
            Target::Model(model) => {
                let mut kwargs = Kwargs::new();
                kwargs
                    .with("model", model.as_str())
                    .with("params", ParamValue::Mapping(self.kwargs.clone().into_params()));
                K8sObj::from_kwargs(kwargs)
            }
        }
    }
}

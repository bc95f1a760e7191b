//! Resource kinds: declarations of the params a Kubernetes model is built from.
//!
//! Every [`ResourceKind`] names the [`Model`] it targets, params it always sets (such as
//! `api_version` and `kind`) and the fields it accepts, each with a [`ParamType`] and whether it
//! is required. Building a resource kind validates the kwargs against that [`Schema`] and hands
//! the result to [`K8sObj`].
use snafu::ResultExt;
use tracing::{instrument, warn};

use crate::{
    model::Model,
    object::{self, InvalidParamsSnafu, K8sObj},
    params::{Kwargs, ParamType, ParamValue, Params},
};

mod apps;
mod meta;
mod pod;

type Result<T, E = object::Error> = std::result::Result<T, E>;

/// A field a [`ResourceKind`] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Which [`Model`] a [`ResourceKind`] builds and from which params.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub model: Model,

    /// Params which are always set, regardless of the kwargs.
    pub fixed: &'static [(&'static str, &'static str)],
    pub fields: &'static [Field],
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ResourceKind {
    Deployment,
    DeploymentSpec,
    LabelSelector,
    PodTemplateSpec,
    ObjectMeta,
    PodSpec,
}

impl ResourceKind {
    pub fn schema(self) -> &'static Schema {
        match self {
            Self::Deployment => &apps::DEPLOYMENT,
            Self::DeploymentSpec => &apps::DEPLOYMENT_SPEC,
            Self::LabelSelector => &meta::LABEL_SELECTOR,
            Self::PodTemplateSpec => &pod::POD_TEMPLATE_SPEC,
            Self::ObjectMeta => &meta::OBJECT_META,
            Self::PodSpec => &pod::POD_SPEC,
        }
    }

    /// Builds a [`K8sObj`] of this kind from `kwargs`.
    ///
    /// Kwargs which the kind does not declare are ignored with a warning.
    #[instrument(skip(kwargs), fields(kind = %self))]
    pub fn build(self, mut kwargs: Kwargs) -> Result<K8sObj> {
        let schema = self.schema();
        let mut params = Params::new();

        for (name, value) in schema.fixed {
            params.insert((*name).to_owned(), ParamValue::from(*value));
        }

        for field in schema.fields {
            let value = if field.required {
                let hint = format!("{kind} needs {ty}", kind = self, ty = field.ty);
                Some(kwargs.need(field.name, field.ty, &hint))
            } else {
                kwargs.optional(field.name, field.ty).transpose()
            };

            if let Some(value) = value {
                let value = value.context(InvalidParamsSnafu {
                    target: self.to_string(),
                })?;
                params.insert(field.name.to_owned(), value);
            }
        }

        if !kwargs.is_empty() {
            let ignored: Vec<&str> = kwargs.keys().collect();
            warn!(?ignored, "ignoring params the resource kind does not declare");
        }

        K8sObj::instantiate(schema.model, Some(self), params)
    }
}

use super::{Field, ResourceKind, Schema};
use crate::{model::Model, params::ParamType};

pub(super) static DEPLOYMENT: Schema = Schema {
    model: Model::V1Deployment,
    fixed: &[("api_version", "apps/v1"), ("kind", "Deployment")],
    fields: &[
        Field::required("spec", ParamType::Object(ResourceKind::DeploymentSpec)),
        Field::optional("metadata", ParamType::Object(ResourceKind::ObjectMeta)),
    ],
};

pub(super) static DEPLOYMENT_SPEC: Schema = Schema {
    model: Model::V1DeploymentSpec,
    fixed: &[],
    fields: &[
        Field::required("selector", ParamType::Object(ResourceKind::LabelSelector)),
        Field::required("template", ParamType::Object(ResourceKind::PodTemplateSpec)),
        Field::optional("replicas", ParamType::Integer),
        Field::optional("strategy", ParamType::Mapping),
        Field::optional("revision_history_limit", ParamType::Integer),
        Field::optional("min_ready_seconds", ParamType::Integer),
        Field::optional("paused", ParamType::Boolean),
    ],
};

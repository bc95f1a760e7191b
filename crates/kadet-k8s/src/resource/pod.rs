use super::{Field, ResourceKind, Schema};
use crate::{model::Model, params::ParamType};

pub(super) static POD_TEMPLATE_SPEC: Schema = Schema {
    model: Model::V1PodTemplateSpec,
    fixed: &[],
    fields: &[
        Field::required("metadata", ParamType::Object(ResourceKind::ObjectMeta)),
        Field::required("spec", ParamType::Object(ResourceKind::PodSpec)),
    ],
};

pub(super) static POD_SPEC: Schema = Schema {
    model: Model::V1PodSpec,
    fixed: &[],
    fields: &[
        Field::required("containers", ParamType::List),
        Field::optional("node_selector", ParamType::Mapping),
        Field::optional("init_containers", ParamType::List),
        Field::optional("volumes", ParamType::List),
        Field::optional("service_account_name", ParamType::String),
        Field::optional("restart_policy", ParamType::String),
        Field::optional("tolerations", ParamType::List),
        Field::optional("affinity", ParamType::Mapping),
        Field::optional("image_pull_secrets", ParamType::List),
        Field::optional("termination_grace_period_seconds", ParamType::Integer),
    ],
};

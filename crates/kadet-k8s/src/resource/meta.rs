use super::{Field, Schema};
use crate::{model::Model, params::ParamType};

pub(super) static LABEL_SELECTOR: Schema = Schema {
    model: Model::V1LabelSelector,
    fixed: &[],
    fields: &[
        Field::required("match_labels", ParamType::Mapping),
        Field::optional("match_expressions", ParamType::List),
    ],
};

pub(super) static OBJECT_META: Schema = Schema {
    model: Model::V1ObjectMeta,
    fixed: &[],
    fields: &[
        Field::required("name", ParamType::String),
        Field::required("annotations", ParamType::Mapping),
        Field::required("namespace", ParamType::String),
        Field::required("labels", ParamType::Mapping),
    ],
};

//! Loads builder objects from YAML parameter documents.
//!
//! Builder objects are written as tagged mappings. The tag selects what is built:
//!
//! - a [`ResourceKind`] (`!Deployment`, `!PodSpec`, ...) builds that resource kind from the
//!   mapping as kwargs,
//! - `!K8sObj` builds a generic object and needs the `model` and `params` keys,
//! - a [`Model`] name (`!V1Service`, ...) builds a generic object with the mapping as params.
//!
//! Tagged values can be nested anywhere inside mappings and lists.
//!
//! ```
//! # use kadet_k8s::document;
//! let objects = document::from_str("
//! --- !LabelSelector
//! match_labels:
//!   app: web
//! ").unwrap();
//!
//! assert_eq!(objects[0].dump(), serde_json::json!({"matchLabels": {"app": "web"}}));
//! ```
use std::str::FromStr;

use serde::Deserialize;
use serde_yaml::{Value as YamlValue, value::TaggedValue};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    model::Model,
    object::{self, K8sObj},
    params::{Kwargs, ParamValue, Params},
    resource::ResourceKind,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// The tag for generic objects which name their model in the `model` key.
pub const GENERIC_TAG: &str = "K8sObj";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse YAML document {index}"))]
    ParseYaml {
        source: serde_yaml::Error,
        index: usize,
    },

    #[snafu(display("document {index} is not a tagged builder object, e.g. `--- !Deployment`"))]
    UntaggedDocument { index: usize },

    #[snafu(display(
        "unknown tag {tag:?}, expected a resource kind, {generic:?} or a model name",
        generic = GENERIC_TAG
    ))]
    UnknownTag { tag: String },

    #[snafu(display("the value tagged {tag:?} must be a mapping"))]
    ExpectedMapping { tag: String },

    #[snafu(display("mapping keys must be strings, got {key:?}"))]
    NonStringKey { key: YamlValue },

    #[snafu(display("failed to convert YAML value {value:?}"))]
    ConvertValue {
        source: serde_json::Error,
        value: YamlValue,
    },

    #[snafu(display("failed to build {tag:?}"))]
    Build { source: object::Error, tag: String },

    #[snafu(display("invalid object in document {index}"))]
    Document {
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
        index: usize,
    },
}

/// What a tag builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Resource(ResourceKind),
    Generic,
    Model(Model),
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        if let Ok(kind) = ResourceKind::from_str(tag) {
            return Ok(Self::Resource(kind));
        }
        if tag == GENERIC_TAG {
            return Ok(Self::Generic);
        }
        Model::from_str(tag)
            .map(Self::Model)
            .map_err(|_| Error::UnknownTag {
                tag: tag.to_owned(),
            })
    }
}

impl Target {
    pub fn build(self, kwargs: Kwargs) -> Result<K8sObj, object::Error> {
        match self {
            Self::Resource(kind) => kind.build(kwargs),
            Self::Generic => K8sObj::from_kwargs(kwargs),
            Self::Model(model) => K8sObj::new(model, kwargs.into_params()),
        }
    }
}

/// Loads one builder object per YAML document in `input`.
#[instrument(skip(input))]
pub fn from_str(input: &str) -> Result<Vec<K8sObj>> {
    let mut objects = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value = YamlValue::deserialize(document).context(ParseYamlSnafu { index })?;
        // Empty documents, e.g. a trailing `---`
        if value.is_null() {
            continue;
        }

        let YamlValue::Tagged(tagged) = value else {
            return UntaggedDocumentSnafu { index }.fail();
        };
        let object = build_tagged(*tagged).context(DocumentSnafu { index })?;
        debug!(index, model = %object.model(), name = object.name(), "loaded object");
        objects.push(object);
    }

    Ok(objects)
}

fn build_tagged(tagged: TaggedValue) -> Result<K8sObj> {
    let tag = tagged.tag.to_string();
    let tag = tag.trim_start_matches('!');
    let target = Target::from_str(tag)?;

    let YamlValue::Mapping(mapping) = tagged.value else {
        return ExpectedMappingSnafu { tag }.fail();
    };
    let kwargs = Kwargs::from(to_params(mapping)?);

    target.build(kwargs).context(BuildSnafu { tag })
}

fn to_params(mapping: serde_yaml::Mapping) -> Result<Params> {
    mapping
        .into_iter()
        .map(|(key, value)| {
            let YamlValue::String(key) = key else {
                return NonStringKeySnafu { key }.fail();
            };
            Ok((key, to_param_value(value)?))
        })
        .collect()
}

fn to_param_value(value: YamlValue) -> Result<ParamValue> {
    match value {
        YamlValue::Tagged(tagged) => build_tagged(*tagged).map(ParamValue::Object),
        YamlValue::Mapping(mapping) => to_params(mapping).map(ParamValue::Mapping),
        YamlValue::Sequence(sequence) => sequence
            .into_iter()
            .map(to_param_value)
            .collect::<Result<Vec<_>>>()
            .map(ParamValue::List),
        scalar => serde_json::to_value(&scalar)
            .map(ParamValue::Value)
            .context(ConvertValueSnafu { value: scalar }),
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;
    use crate::{model, params};

    const DEPLOYMENT: &str = indoc! {"
        --- !Deployment
        metadata: !ObjectMeta
          name: web
          namespace: default
          labels: {app: web}
          annotations: {}
        spec: !DeploymentSpec
          replicas: 3
          selector: !LabelSelector
            match_labels: {app: web}
          template: !PodTemplateSpec
            metadata: !ObjectMeta
              name: web
              namespace: default
              labels: {app: web}
              annotations: {}
            spec: !PodSpec
              containers:
                - !V1Container
                  name: web
                  image: nginx:1.27
                  ports:
                    - containerPort: 80
              node_selector: {disktype: ssd}
    "};

    #[test]
    fn deployment_document() {
        let objects = from_str(DEPLOYMENT).unwrap();
        assert_eq!(objects.len(), 1);

        let deployment = &objects[0];
        assert_eq!(deployment.kind(), Some(ResourceKind::Deployment));

        let dump = deployment.dump();
        assert_eq!(dump["apiVersion"], json!("apps/v1"));
        assert_eq!(dump["metadata"]["name"], json!("web"));
        assert_eq!(dump["spec"]["replicas"], json!(3));
        assert_eq!(dump["spec"]["selector"]["matchLabels"], json!({"app": "web"}));

        let pod_spec = &dump["spec"]["template"]["spec"];
        assert_eq!(pod_spec["nodeSelector"], json!({"disktype": "ssd"}));
        assert_eq!(
            pod_spec["containers"],
            json!([{"name": "web", "image": "nginx:1.27", "ports": [{"containerPort": 80}]}])
        );
    }

    #[test]
    fn multiple_documents() {
        let objects = from_str(indoc! {"
            --- !K8sObj
            model: V1Service
            params:
              metadata: {name: web}
              spec:
                selector: {app: web}
                ports: [{port: 80, targetPort: 8080}]
            --- !V1ConfigMap
            metadata: {name: cfg}
            data: {key: value}
            ---
        "})
        .unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].object_kind(), Some("Service"));
        assert_eq!(
            objects[0].dump()["spec"]["ports"],
            json!([{"port": 80, "targetPort": 8080}])
        );
        assert_eq!(objects[1].dump()["data"], json!({"key": "value"}));
    }

    #[test]
    fn nested_keys_are_not_cased() {
        let err = from_str(indoc! {"
            --- !V1Service
            metadata: {name: web}
            spec:
              ports: [{port: 80, target_port: 8080}]
        "})
        .unwrap_err();

        let Error::Document { source, index } = err else {
            panic!("expected a document error, got {err:?}");
        };
        assert_eq!(index, 0);
        assert!(matches!(
            *source,
            Error::Build {
                source: object::Error::Render {
                    source: model::Error::UnknownParam { ref key, .. },
                    ..
                },
                ..
            } if key == "spec.ports[0].target_port"
        ));
    }

    #[test]
    fn missing_field_required_by_model() {
        let err = from_str(indoc! {"
            --- !PodSpec
            containers:
              - !V1Container {image: nginx}
        "})
        .unwrap_err();

        let Error::Document { source, .. } = err else {
            panic!("expected a document error, got {err:?}");
        };
        let Error::Build { source, tag } = *source else {
            panic!("expected a build error");
        };
        assert_eq!(tag, "V1Container");
        assert!(matches!(
            source,
            object::Error::Render {
                source: model::Error::MissingModelField { ref key, .. },
                ..
            } if key == "name"
        ));
    }

    #[test]
    fn untagged_document() {
        let err = from_str("metadata: {name: web}").unwrap_err();

        assert!(matches!(err, Error::UntaggedDocument { index: 0 }));
    }

    #[test]
    fn unknown_tag() {
        let err = from_str("--- !Deploymnet\nspec: {}").unwrap_err();

        let Error::Document { source, index } = err else {
            panic!("expected a document error, got {err:?}");
        };
        assert_eq!(index, 0);
        assert!(matches!(*source, Error::UnknownTag { ref tag } if tag == "Deploymnet"));
    }

    #[test]
    fn tagged_scalar() {
        let err = from_str("--- !PodSpec containers").unwrap_err();

        let Error::Document { source, .. } = err else {
            panic!("expected a document error, got {err:?}");
        };
        assert!(matches!(*source, Error::ExpectedMapping { ref tag } if tag == "PodSpec"));
    }

    #[test]
    fn missing_required_param_in_nested_object() {
        let err = from_str(indoc! {"
            --- !Deployment
            spec: !DeploymentSpec
              selector: !LabelSelector {}
        "})
        .unwrap_err();

        let Error::Document { source, .. } = err else {
            panic!("expected a document error, got {err:?}");
        };
        let Error::Build { source, tag } = *source else {
            panic!("expected a build error");
        };
        assert_eq!(tag, "LabelSelector");
        assert!(matches!(
            source,
            object::Error::InvalidParams {
                source: params::Error::MissingParam { ref key, .. },
                ..
            } if key == "match_labels"
        ));
    }

    #[test]
    fn unknown_model_in_generic_object() {
        let err = from_str("--- !K8sObj\nmodel: V1Nothing\nparams: {}").unwrap_err();

        let Error::Document { source, .. } = err else {
            panic!("expected a document error, got {err:?}");
        };
        assert!(matches!(
            *source,
            Error::Build {
                source: object::Error::UnknownModel {
                    source: model::Error::UnknownModel { .. }
                },
                ..
            }
        ));
    }

    #[test]
    fn target_resolution_order() {
        assert_eq!(
            Target::from_str("PodSpec").unwrap(),
            Target::Resource(ResourceKind::PodSpec)
        );
        assert_eq!(Target::from_str("K8sObj").unwrap(), Target::Generic);
        assert_eq!(
            Target::from_str("V1PodSpec").unwrap(),
            Target::Model(Model::V1PodSpec)
        );
    }
}

//! The registry of Kubernetes models a [`K8sObj`](crate::object::K8sObj) can target.
//!
//! Model names follow the naming of the generated Kubernetes client models (`V1Deployment`,
//! `V1PodSpec`, ...). Every name is backed by the matching [`k8s_openapi`] type, which owns the
//! schema, the field names and the serialized key casing.
use std::str::FromStr;

use k8s_openapi::{
    api::{
        apps::v1 as apps, autoscaling::v1 as autoscaling_v1, autoscaling::v2 as autoscaling,
        batch::v1 as batch, coordination::v1 as coordination, core::v1 as core_v1,
        discovery::v1 as discovery, networking::v1 as networking, policy::v1 as policy,
        rbac::v1 as rbac, scheduling::v1 as scheduling, storage::v1 as storage,
    },
    apimachinery::pkg::apis::meta::v1 as meta,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::trace;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "could not load kubernetes model {model:?}, run `k8sdet models` to list the supported models"
    ))]
    UnknownModel { model: String },

    #[snafu(display("failed to instantiate {model} from the given params"))]
    InstantiateModel {
        source: serde_json::Error,
        model: Model,
    },

    #[snafu(display("failed to serialize {model}"))]
    SerializeModel {
        source: serde_json::Error,
        model: Model,
    },

    #[snafu(display("{model} has no param {key:?}"))]
    UnknownParam { key: String, model: Model },

    #[snafu(display("{model} requires field {key:?}"))]
    MissingModelField { key: String, model: Model },

    #[snafu(display("{model} did not serialize to a mapping"))]
    NotAMapping { model: Model },
}

macro_rules! models {
    ($($model:ident => $ty:ty),+ $(,)?) => {
        /// A Kubernetes model, named the way the Kubernetes client libraries name them.
        ///
        /// Use [`Model::parse`] to look up a model by name and [`Model::render`] to turn a
        /// camelCase parameter mapping into its serialized form.
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
        pub enum Model {
            $($model),+
        }

        impl Model {
            fn instantiate(self, params: Value) -> Result<Value> {
                match self {
                    $(Self::$model => roundtrip::<$ty>(self, params)),+
                }
            }
        }
    };
}

models! {
    // apps/v1
    V1ControllerRevision => apps::ControllerRevision,
    V1DaemonSet => apps::DaemonSet,
    V1DaemonSetSpec => apps::DaemonSetSpec,
    V1DaemonSetUpdateStrategy => apps::DaemonSetUpdateStrategy,
    V1Deployment => apps::Deployment,
    V1DeploymentSpec => apps::DeploymentSpec,
    V1DeploymentStrategy => apps::DeploymentStrategy,
    V1ReplicaSet => apps::ReplicaSet,
    V1ReplicaSetSpec => apps::ReplicaSetSpec,
    V1RollingUpdateDaemonSet => apps::RollingUpdateDaemonSet,
    V1RollingUpdateDeployment => apps::RollingUpdateDeployment,
    V1RollingUpdateStatefulSetStrategy => apps::RollingUpdateStatefulSetStrategy,
    V1StatefulSet => apps::StatefulSet,
    V1StatefulSetSpec => apps::StatefulSetSpec,
    V1StatefulSetUpdateStrategy => apps::StatefulSetUpdateStrategy,

    // autoscaling/v1
    V1HorizontalPodAutoscaler => autoscaling_v1::HorizontalPodAutoscaler,
    V1HorizontalPodAutoscalerSpec => autoscaling_v1::HorizontalPodAutoscalerSpec,

    // autoscaling/v2
    V2CrossVersionObjectReference => autoscaling::CrossVersionObjectReference,
    V2HorizontalPodAutoscaler => autoscaling::HorizontalPodAutoscaler,
    V2HorizontalPodAutoscalerBehavior => autoscaling::HorizontalPodAutoscalerBehavior,
    V2HorizontalPodAutoscalerSpec => autoscaling::HorizontalPodAutoscalerSpec,
    V2MetricSpec => autoscaling::MetricSpec,
    V2MetricTarget => autoscaling::MetricTarget,
    V2ResourceMetricSource => autoscaling::ResourceMetricSource,

    // batch/v1
    V1CronJob => batch::CronJob,
    V1CronJobSpec => batch::CronJobSpec,
    V1Job => batch::Job,
    V1JobSpec => batch::JobSpec,
    V1JobTemplateSpec => batch::JobTemplateSpec,

    // coordination.k8s.io/v1
    V1Lease => coordination::Lease,
    V1LeaseSpec => coordination::LeaseSpec,

    // core/v1
    V1Affinity => core_v1::Affinity,
    V1Capabilities => core_v1::Capabilities,
    V1ConfigMap => core_v1::ConfigMap,
    V1ConfigMapEnvSource => core_v1::ConfigMapEnvSource,
    V1ConfigMapKeySelector => core_v1::ConfigMapKeySelector,
    V1ConfigMapProjection => core_v1::ConfigMapProjection,
    V1ConfigMapVolumeSource => core_v1::ConfigMapVolumeSource,
    V1Container => core_v1::Container,
    V1ContainerPort => core_v1::ContainerPort,
    V1CSIVolumeSource => core_v1::CSIVolumeSource,
    V1DownwardAPIProjection => core_v1::DownwardAPIProjection,
    V1DownwardAPIVolumeFile => core_v1::DownwardAPIVolumeFile,
    V1DownwardAPIVolumeSource => core_v1::DownwardAPIVolumeSource,
    V1EmptyDirVolumeSource => core_v1::EmptyDirVolumeSource,
    V1EndpointAddress => core_v1::EndpointAddress,
    V1EndpointSubset => core_v1::EndpointSubset,
    V1Endpoints => core_v1::Endpoints,
    V1EnvFromSource => core_v1::EnvFromSource,
    V1EnvVar => core_v1::EnvVar,
    V1EnvVarSource => core_v1::EnvVarSource,
    V1EphemeralVolumeSource => core_v1::EphemeralVolumeSource,
    V1ExecAction => core_v1::ExecAction,
    V1GRPCAction => core_v1::GRPCAction,
    V1HostAlias => core_v1::HostAlias,
    V1HostPathVolumeSource => core_v1::HostPathVolumeSource,
    V1HTTPGetAction => core_v1::HTTPGetAction,
    V1HTTPHeader => core_v1::HTTPHeader,
    V1KeyToPath => core_v1::KeyToPath,
    V1Lifecycle => core_v1::Lifecycle,
    V1LifecycleHandler => core_v1::LifecycleHandler,
    V1LimitRange => core_v1::LimitRange,
    V1LimitRangeItem => core_v1::LimitRangeItem,
    V1LimitRangeSpec => core_v1::LimitRangeSpec,
    V1LocalObjectReference => core_v1::LocalObjectReference,
    V1Namespace => core_v1::Namespace,
    V1NFSVolumeSource => core_v1::NFSVolumeSource,
    V1Node => core_v1::Node,
    V1NodeAffinity => core_v1::NodeAffinity,
    V1NodeSelector => core_v1::NodeSelector,
    V1NodeSelectorRequirement => core_v1::NodeSelectorRequirement,
    V1NodeSelectorTerm => core_v1::NodeSelectorTerm,
    V1ObjectFieldSelector => core_v1::ObjectFieldSelector,
    V1PersistentVolume => core_v1::PersistentVolume,
    V1PersistentVolumeClaim => core_v1::PersistentVolumeClaim,
    V1PersistentVolumeClaimSpec => core_v1::PersistentVolumeClaimSpec,
    V1PersistentVolumeClaimTemplate => core_v1::PersistentVolumeClaimTemplate,
    V1PersistentVolumeClaimVolumeSource => core_v1::PersistentVolumeClaimVolumeSource,
    V1PersistentVolumeSpec => core_v1::PersistentVolumeSpec,
    V1Pod => core_v1::Pod,
    V1PodAffinity => core_v1::PodAffinity,
    V1PodAffinityTerm => core_v1::PodAffinityTerm,
    V1PodAntiAffinity => core_v1::PodAntiAffinity,
    V1PodDNSConfig => core_v1::PodDNSConfig,
    V1PodSecurityContext => core_v1::PodSecurityContext,
    V1PodSpec => core_v1::PodSpec,
    V1PodTemplate => core_v1::PodTemplate,
    V1PodTemplateSpec => core_v1::PodTemplateSpec,
    V1Probe => core_v1::Probe,
    V1ProjectedVolumeSource => core_v1::ProjectedVolumeSource,
    V1ReplicationController => core_v1::ReplicationController,
    V1ReplicationControllerSpec => core_v1::ReplicationControllerSpec,
    V1ResourceFieldSelector => core_v1::ResourceFieldSelector,
    V1ResourceQuota => core_v1::ResourceQuota,
    V1ResourceQuotaSpec => core_v1::ResourceQuotaSpec,
    V1ResourceRequirements => core_v1::ResourceRequirements,
    V1SeccompProfile => core_v1::SeccompProfile,
    V1Secret => core_v1::Secret,
    V1SecretEnvSource => core_v1::SecretEnvSource,
    V1SecretKeySelector => core_v1::SecretKeySelector,
    V1SecretProjection => core_v1::SecretProjection,
    V1SecretVolumeSource => core_v1::SecretVolumeSource,
    V1SecurityContext => core_v1::SecurityContext,
    V1SELinuxOptions => core_v1::SELinuxOptions,
    V1Service => core_v1::Service,
    V1ServiceAccount => core_v1::ServiceAccount,
    V1ServiceAccountTokenProjection => core_v1::ServiceAccountTokenProjection,
    V1ServicePort => core_v1::ServicePort,
    V1ServiceSpec => core_v1::ServiceSpec,
    V1Sysctl => core_v1::Sysctl,
    V1TCPSocketAction => core_v1::TCPSocketAction,
    V1Toleration => core_v1::Toleration,
    V1TopologySpreadConstraint => core_v1::TopologySpreadConstraint,
    V1Volume => core_v1::Volume,
    V1VolumeMount => core_v1::VolumeMount,
    V1VolumeProjection => core_v1::VolumeProjection,
    V1VolumeResourceRequirements => core_v1::VolumeResourceRequirements,
    V1WeightedPodAffinityTerm => core_v1::WeightedPodAffinityTerm,

    // discovery.k8s.io/v1
    V1EndpointSlice => discovery::EndpointSlice,

    // meta/v1
    V1LabelSelector => meta::LabelSelector,
    V1LabelSelectorRequirement => meta::LabelSelectorRequirement,
    V1ObjectMeta => meta::ObjectMeta,
    V1OwnerReference => meta::OwnerReference,

    // networking.k8s.io/v1
    V1HTTPIngressPath => networking::HTTPIngressPath,
    V1HTTPIngressRuleValue => networking::HTTPIngressRuleValue,
    V1Ingress => networking::Ingress,
    V1IngressBackend => networking::IngressBackend,
    V1IngressClass => networking::IngressClass,
    V1IngressClassSpec => networking::IngressClassSpec,
    V1IngressRule => networking::IngressRule,
    V1IngressServiceBackend => networking::IngressServiceBackend,
    V1IngressSpec => networking::IngressSpec,
    V1IngressTLS => networking::IngressTLS,
    V1IPBlock => networking::IPBlock,
    V1NetworkPolicy => networking::NetworkPolicy,
    V1NetworkPolicyEgressRule => networking::NetworkPolicyEgressRule,
    V1NetworkPolicyIngressRule => networking::NetworkPolicyIngressRule,
    V1NetworkPolicyPeer => networking::NetworkPolicyPeer,
    V1NetworkPolicyPort => networking::NetworkPolicyPort,
    V1NetworkPolicySpec => networking::NetworkPolicySpec,
    V1ServiceBackendPort => networking::ServiceBackendPort,

    // policy/v1
    V1Eviction => policy::Eviction,
    V1PodDisruptionBudget => policy::PodDisruptionBudget,
    V1PodDisruptionBudgetSpec => policy::PodDisruptionBudgetSpec,

    // rbac.authorization.k8s.io/v1
    V1AggregationRule => rbac::AggregationRule,
    V1ClusterRole => rbac::ClusterRole,
    V1ClusterRoleBinding => rbac::ClusterRoleBinding,
    V1PolicyRule => rbac::PolicyRule,
    V1Role => rbac::Role,
    V1RoleBinding => rbac::RoleBinding,
    V1RoleRef => rbac::RoleRef,
    RbacV1Subject => rbac::Subject,

    // scheduling.k8s.io/v1
    V1PriorityClass => scheduling::PriorityClass,

    // storage.k8s.io/v1
    V1CSIDriver => storage::CSIDriver,
    V1CSIDriverSpec => storage::CSIDriverSpec,
    V1CSINode => storage::CSINode,
    V1CSIStorageCapacity => storage::CSIStorageCapacity,
    V1StorageClass => storage::StorageClass,
    V1VolumeAttachment => storage::VolumeAttachment,
    V1VolumeAttachmentSpec => storage::VolumeAttachmentSpec,
}

impl Model {
    /// Looks up a model by its client library name, e.g. `V1Deployment`.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name)
            .ok()
            .context(UnknownModelSnafu { model: name })
    }

    /// Instantiates the model from camelCase `params` and serializes it again.
    ///
    /// Optional fields which are not set are omitted from the result. Every non-null param has
    /// to be known to the model, otherwise [`Error::UnknownParam`] is returned. Fields the model
    /// requires have to be set, otherwise [`Error::MissingModelField`] is returned. Both checks
    /// descend into nested mappings and lists.
    pub fn render(self, params: Map<String, Value>) -> Result<Map<String, Value>> {
        let params = Value::Object(params);
        let rendered = self.instantiate(params.clone())?;

        self.check_rendered(&params, &rendered, "")?;

        match rendered {
            Value::Object(rendered) => Ok(rendered),
            _ => NotAMappingSnafu { model: self }.fail(),
        }
    }

    /// Compares the params with what the model made of them.
    ///
    /// The model drops keys it does not know and fills in defaults for required fields that are
    /// missing, so both show up as a difference in keys.
    fn check_rendered(self, params: &Value, rendered: &Value, path: &str) -> Result<()> {
        match (params, rendered) {
            (Value::Object(params), Value::Object(rendered)) => {
                for (key, value) in params.iter().filter(|(_, value)| !value.is_null()) {
                    let path = field_path(path, key);
                    let rendered = rendered.get(key).context(UnknownParamSnafu {
                        key: path.as_str(),
                        model: self,
                    })?;
                    self.check_rendered(value, rendered, &path)?;
                }

                for (key, value) in rendered.iter().filter(|(_, value)| !value.is_null()) {
                    let supplied = params.get(key).is_some_and(|value| !value.is_null());
                    if !supplied && !(path.is_empty() && is_type_meta(key, value)) {
                        return MissingModelFieldSnafu {
                            key: field_path(path, key),
                            model: self,
                        }
                        .fail();
                    }
                }
                Ok(())
            }
            (Value::Array(params), Value::Array(rendered)) => {
                for (index, (value, rendered)) in params.iter().zip(rendered).enumerate() {
                    self.check_rendered(value, rendered, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

/// Top-level resources fill in their own `apiVersion` and `kind`, and always carry `metadata`.
fn is_type_meta(key: &str, value: &Value) -> bool {
    match key {
        "apiVersion" | "kind" => value.as_str().is_some_and(|value| !value.is_empty()),
        "metadata" => value.as_object().is_some_and(Map::is_empty),
        _ => false,
    }
}

fn roundtrip<T>(model: Model, params: Value) -> Result<Value>
where
    T: DeserializeOwned + Serialize,
{
    trace!(%model, "instantiating model");
    let instance: T = serde_json::from_value(params).context(InstantiateModelSnafu { model })?;
    serde_json::to_value(instance).context(SerializeModelSnafu { model })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    fn mapping(value: Value) -> Map<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case("V1Deployment", Model::V1Deployment)]
    #[case("V1PodSpec", Model::V1PodSpec)]
    #[case("V1ObjectMeta", Model::V1ObjectMeta)]
    #[case("V2HorizontalPodAutoscaler", Model::V2HorizontalPodAutoscaler)]
    fn parse_known_model(#[case] input: &str, #[case] expected: Model) {
        assert_eq!(Model::parse(input).unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("V1Deploymnet")]
    #[case("v1deployment")]
    #[case("")]
    fn parse_unknown_model(#[case] input: &str) {
        let err = Model::parse(input).unwrap_err();
        assert!(matches!(err, Error::UnknownModel { ref model } if model == input));
        assert!(err.to_string().contains("k8sdet models"));
    }

    #[test]
    fn every_model_parses_from_its_name() {
        for model in Model::iter() {
            let name: &'static str = model.into();
            assert_eq!(Model::parse(name).unwrap(), model);
        }
    }

    #[test]
    fn render_label_selector() {
        let rendered = Model::V1LabelSelector
            .render(mapping(json!({"matchLabels": {"app": "web"}})))
            .unwrap();

        assert_eq!(Value::Object(rendered), json!({"matchLabels": {"app": "web"}}));
    }

    #[test]
    fn render_omits_null_params() {
        let rendered = Model::V1ObjectMeta
            .render(mapping(json!({"name": "web", "namespace": null})))
            .unwrap();

        assert_eq!(Value::Object(rendered), json!({"name": "web"}));
    }

    #[test]
    fn render_top_level_resource_sets_type_meta() {
        let rendered = Model::V1ConfigMap
            .render(mapping(json!({"metadata": {"name": "cfg"}, "data": {"a": "b"}})))
            .unwrap();

        assert_eq!(rendered["apiVersion"], json!("v1"));
        assert_eq!(rendered["kind"], json!("ConfigMap"));
        assert_eq!(rendered["data"], json!({"a": "b"}));
    }

    #[test]
    fn render_rejects_unknown_param() {
        let err = Model::V1LabelSelector
            .render(mapping(json!({"matchLabels": {}, "matchLabelz": {}})))
            .unwrap_err();

        assert!(matches!(err, Error::UnknownParam { ref key, .. } if key == "matchLabelz"));
    }

    #[rstest]
    #[case::container_name(Model::V1Container, json!({"image": "nginx"}), "name")]
    #[case::pod_containers(Model::V1PodSpec, json!({"restartPolicy": "Always"}), "containers")]
    #[case::role_ref(Model::V1RoleRef, json!({"kind": "Role"}), "apiGroup")]
    #[case::service_port(Model::V1ServicePort, json!({"name": "http"}), "port")]
    #[case::owner_reference(
        Model::V1OwnerReference,
        json!({"kind": "Deployment", "name": "web", "uid": "1"}),
        "apiVersion"
    )]
    #[case::nested_container_port(
        Model::V1PodSpec,
        json!({"containers": [{"name": "web", "ports": [{"name": "http"}]}]}),
        "containers[0].ports[0].containerPort"
    )]
    fn render_rejects_missing_required_model_field(
        #[case] model: Model,
        #[case] params: Value,
        #[case] expected: &str,
    ) {
        let err = model.render(mapping(params)).unwrap_err();

        assert!(
            matches!(err, Error::MissingModelField { ref key, model: m } if key == expected && m == model),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    #[case::container_field(
        json!({"containers": [{"name": "web", "image_pull_policy": "Always"}]}),
        "containers[0].image_pull_policy"
    )]
    #[case::container_port(
        json!({"containers": [{"name": "web", "ports": [{"container_port": 8080}]}]}),
        "containers[0].ports[0].container_port"
    )]
    #[case::mapping(json!({"containers": [], "securityContext": {"run_as_user": 1000}}), "securityContext.run_as_user")]
    fn render_rejects_unknown_nested_param(#[case] params: Value, #[case] expected: &str) {
        let err = Model::V1PodSpec.render(mapping(params)).unwrap_err();

        assert!(
            matches!(err, Error::UnknownParam { ref key, .. } if key == expected),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn render_keeps_free_form_mappings() {
        let params = json!({
            "containers": [{
                "name": "web",
                "resources": {"limits": {"cpu": "500m", "memory": "1Gi"}},
            }],
            "nodeSelector": {"kubernetes.io/os": "linux", "disk_type": "ssd"},
        });

        let rendered = Model::V1PodSpec.render(mapping(params.clone())).unwrap();

        assert_eq!(Value::Object(rendered), params);
    }

    #[test]
    fn render_fills_in_type_meta_only_at_the_top() {
        let rendered = Model::V1Namespace.render(Map::new()).unwrap();

        assert_eq!(
            Value::Object(rendered),
            json!({"apiVersion": "v1", "kind": "Namespace", "metadata": {}})
        );
    }

    #[rstest]
    #[case("V1StorageClass", Model::V1StorageClass)]
    #[case("V1Endpoints", Model::V1Endpoints)]
    #[case("V1HTTPGetAction", Model::V1HTTPGetAction)]
    #[case("V1ConfigMapVolumeSource", Model::V1ConfigMapVolumeSource)]
    #[case("V1PersistentVolume", Model::V1PersistentVolume)]
    #[case("V1EnvVarSource", Model::V1EnvVarSource)]
    #[case("V1ResourceQuota", Model::V1ResourceQuota)]
    fn parse_common_models(#[case] input: &str, #[case] expected: Model) {
        assert_eq!(Model::parse(input).unwrap(), expected);
    }

    #[test]
    fn render_rejects_mismatched_api_version() {
        let err = Model::V1Deployment
            .render(mapping(json!({"apiVersion": "v1", "kind": "Deployment"})))
            .unwrap_err();

        assert!(matches!(err, Error::InstantiateModel { model: Model::V1Deployment, .. }));
    }

    #[test]
    fn render_rejects_mistyped_nested_field() {
        let err = Model::V1PodSpec
            .render(mapping(json!({"containers": [{"name": 5}]})))
            .unwrap_err();

        assert!(matches!(err, Error::InstantiateModel { model: Model::V1PodSpec, .. }));
    }
}

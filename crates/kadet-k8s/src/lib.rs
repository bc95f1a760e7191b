//! Build Kubernetes manifests from keyword-style parameter sets.
//!
//! A [`K8sObj`](object::K8sObj) targets a [`Model`](model::Model), validates its params, flattens
//! nested objects into plain mappings and renders the camelCase manifest Kubernetes expects.
//! [`ResourceKind`](resource::ResourceKind)s declare which params common resources like
//! `Deployment` or `PodSpec` require.
//!
//! ```
//! use kadet_k8s::{params::Kwargs, resource::ResourceKind};
//! use serde_json::json;
//!
//! let mut kwargs = Kwargs::new();
//! kwargs.with("match_labels", json!({"app": "web"}));
//!
//! let selector = ResourceKind::LabelSelector.build(kwargs).unwrap();
//! assert_eq!(selector.dump(), json!({"matchLabels": {"app": "web"}}));
//! ```
pub mod builder;
pub mod document;
pub mod logging;
pub mod model;
pub mod object;
pub mod output;
pub mod params;
pub mod resource;

// External re-exports
pub use k8s_openapi;
pub use serde_json;

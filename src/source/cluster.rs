//! Lists PrometheusRule resources through the Kubernetes API.

use super::RuleSource;
use crate::errors::ExtractError;
use crate::rules::{API_GROUP, API_VERSION, KIND, ObjectMetadata, PrometheusRule, PrometheusRuleSpec};
use async_trait::async_trait;
use kube::Client;
use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use tracing::debug;

const VERSION: &str = "v1";
const PLURAL: &str = "prometheusrules";

/// Cluster-wide listing of `monitoring.coreos.com/v1` PrometheusRules.
#[derive(Clone)]
pub struct ClusterSource {
    client: Client,
    resource: ApiResource,
}

impl ClusterSource {
    /// Connect using the local kubeconfig or the in-cluster service account.
    pub async fn connect() -> Result<Self, ExtractError> {
        let client = Client::try_default().await?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            resource: api_resource(),
        }
    }
}

#[async_trait]
impl RuleSource for ClusterSource {
    async fn list(&self) -> Result<Vec<PrometheusRule>, ExtractError> {
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &self.resource);
        let list = api.list(&ListParams::default()).await?;
        debug!("API server returned [{}] objects", list.items.len());

        list.items.into_iter().map(from_dynamic).collect()
    }

    fn describe(&self) -> String {
        format!("{} resources in all namespaces", self.resource.api_version)
    }
}

/// Type information for the PrometheusRule custom resource.
pub fn api_resource() -> ApiResource {
    ApiResource {
        group: API_GROUP.to_string(),
        version: VERSION.to_string(),
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        plural: PLURAL.to_string(),
    }
}

/// Convert an untyped API object into a validated [`PrometheusRule`].
pub fn from_dynamic(object: DynamicObject) -> Result<PrometheusRule, ExtractError> {
    let spec = match object.data.get("spec") {
        Some(spec) if !spec.is_null() => {
            serde_json::from_value::<PrometheusRuleSpec>(spec.clone())?
        }
        _ => PrometheusRuleSpec::default(),
    };

    let resource = PrometheusRule {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: ObjectMetadata {
            name: object.metadata.name.unwrap_or_default(),
            namespace: object.metadata.namespace.unwrap_or_default(),
        },
        spec,
    };
    resource.validate()?;
    Ok(resource)
}

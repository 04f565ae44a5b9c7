use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::api::{
    apps::v1::Deployment,
    autoscaling::v1::HorizontalPodAutoscaler,
    batch::v1::{CronJob, Job},
    core::v1::{ConfigMap, PersistentVolumeClaim, Service},
    networking::v1::Ingress,
};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{Api, DeleteParams},
    core::{ApiResource, DynamicObject, GroupVersionKind},
    Client, Resource,
};
use log::debug;
use serde::de::DeserializeOwned;

use crate::cluster::ResourceClient;
use crate::errors::Error;
use crate::model::{custom_resource_api_version, ResourceKind};
use crate::utils::title_case;

const EXTERNAL_SECRET_GROUP: &str = "kubernetes-client.io";
const EXTERNAL_SECRET_VERSION: &str = "v1";
const EXTERNAL_SECRET_KIND: &str = "ExternalSecret";

/// `ResourceClient` backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeResourceClient {
    client: Client,
}

impl KubeResourceClient {
    pub fn new(client: Client) -> Self {
        KubeResourceClient { client }
    }

    fn dynamic_api(&self, kind: &ResourceKind, namespace: &str) -> Option<Api<DynamicObject>> {
        let gvk = match kind {
            ResourceKind::ExternalSecret => {
                GroupVersionKind::gvk(EXTERNAL_SECRET_GROUP, EXTERNAL_SECRET_VERSION, EXTERNAL_SECRET_KIND)
            }
            ResourceKind::CustomResource(type_name) => {
                let (group, version) = split_api_version(custom_resource_api_version(type_name));
                GroupVersionKind::gvk(group, version, &title_case(type_name))
            }
            _ => return None,
        };
        let api_resource = ApiResource::from_gvk(&gvk);
        Some(Api::namespaced_with(self.client.clone(), namespace, &api_resource))
    }

    fn typed_api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn split_api_version(api_version: &str) -> (&str, &str) {
    api_version.split_once('/').unwrap_or(("", api_version))
}

async fn object_exists<K>(api: Api<K>, name: &str) -> Result<bool, Error>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    match api.get(name).await {
        Ok(_) => Ok(true),
        Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn delete_object<K>(api: Api<K>, name: &str) -> Result<(), Error>
where
    K: Resource + Clone + DeserializeOwned + Debug,
{
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            debug!("{} not found (already deleted)", name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    async fn exists(&self, kind: &ResourceKind, name: &str, namespace: &str) -> Result<bool, Error> {
        match kind {
            ResourceKind::Ingress => object_exists(self.typed_api::<Ingress>(namespace), name).await,
            ResourceKind::Deployment => object_exists(self.typed_api::<Deployment>(namespace), name).await,
            ResourceKind::Service => object_exists(self.typed_api::<Service>(namespace), name).await,
            ResourceKind::HorizontalPodAutoscaler => {
                object_exists(self.typed_api::<HorizontalPodAutoscaler>(namespace), name).await
            }
            ResourceKind::PersistentVolumeClaim => {
                object_exists(self.typed_api::<PersistentVolumeClaim>(namespace), name).await
            }
            ResourceKind::ConfigMap => object_exists(self.typed_api::<ConfigMap>(namespace), name).await,
            ResourceKind::Job => object_exists(self.typed_api::<Job>(namespace), name).await,
            ResourceKind::CronJob => object_exists(self.typed_api::<CronJob>(namespace), name).await,
            ResourceKind::ExternalSecret | ResourceKind::CustomResource(_) => match self.dynamic_api(kind, namespace) {
                Some(api) => object_exists(api, name).await,
                None => Ok(false),
            },
        }
    }

    async fn delete(&self, kind: &ResourceKind, name: &str, namespace: &str) -> Result<(), Error> {
        debug!("Deleting {} {} in namespace {}", kind, name, namespace);
        match kind {
            ResourceKind::Ingress => delete_object(self.typed_api::<Ingress>(namespace), name).await,
            ResourceKind::Deployment => delete_object(self.typed_api::<Deployment>(namespace), name).await,
            ResourceKind::Service => delete_object(self.typed_api::<Service>(namespace), name).await,
            ResourceKind::HorizontalPodAutoscaler => {
                delete_object(self.typed_api::<HorizontalPodAutoscaler>(namespace), name).await
            }
            ResourceKind::PersistentVolumeClaim => {
                delete_object(self.typed_api::<PersistentVolumeClaim>(namespace), name).await
            }
            ResourceKind::ConfigMap => delete_object(self.typed_api::<ConfigMap>(namespace), name).await,
            ResourceKind::Job => delete_object(self.typed_api::<Job>(namespace), name).await,
            ResourceKind::CronJob => delete_object(self.typed_api::<CronJob>(namespace), name).await,
            ResourceKind::ExternalSecret | ResourceKind::CustomResource(_) => match self.dynamic_api(kind, namespace) {
                Some(api) => delete_object(api, name).await,
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_api_version() {
        assert_eq!(split_api_version("prsn.io/v1"), ("prsn.io", "v1"));
        assert_eq!(split_api_version("networking.istio.io/v1alpha3"), ("networking.istio.io", "v1alpha3"));
        assert_eq!(split_api_version("v1"), ("", "v1"));
    }
}

//! Deletes cluster objects the environment config no longer declares.
//!
//! Deletions are best-effort: a failure is logged and recorded in the
//! returned `CleanupReport`, and the pass carries on with the rest.
//! Only a missing desired environment or a failure to load the
//! observed one aborts a pass.

use log::{debug, error, info};

use crate::cluster::{EnvironmentLoader, ResourceClient};
use crate::errors::Error;
use crate::model::{Deployable, Environment, Gists, ResourceKind, Service};

mod report;
pub use report::{CleanupReport, DeletionFailure};

pub struct Reaper<'a> {
    loader: &'a dyn EnvironmentLoader,
    client: &'a dyn ResourceClient,
    namespace: String,
    external_secrets_enabled: bool,
}

impl<'a> Reaper<'a> {
    pub fn new(
        loader: &'a dyn EnvironmentLoader,
        client: &'a dyn ResourceClient,
        namespace: &str,
        external_secrets_enabled: bool,
    ) -> Self {
        Reaper {
            loader,
            client,
            namespace: namespace.to_owned(),
            external_secrets_enabled,
        }
    }

    /// Delete every observed service, and every imported resource, that
    /// `desired` does not mention.
    pub async fn cleanup(&self, desired: Option<&Environment>) -> Result<CleanupReport, Error> {
        // an empty service list orphans every observed service
        let desired = desired.ok_or_else(|| {
            Error::Configuration("REAPER: error with environment config, configuration is missing".to_owned())
        })?;

        let observed = self
            .loader
            .load_environment(&self.namespace)
            .await
            .map_err(|e| Error::load(&self.namespace, e))?;

        let mut report = CleanupReport::new();

        for service in &observed.services {
            let config = desired.services.find_by_name(&service.name);

            match config {
                None => {
                    info!("REAPER: found orphan service {}, deleting.", service.name);
                    self.delete_service(service, &mut report).await;
                }
                Some(config) if config.is_blue_green_parent_deployment() => {
                    self.destroy_deployment(&service.name, &mut report).await;
                }
                Some(_) => {}
            }

            report.merge(self.cleanup_ingress(config, service).await);
            report.merge(self.cleanup_hpa(config, service).await);
        }

        report.merge(self.cleanup_gists(&desired.gists, &observed.gists).await);

        if !report.is_clean() {
            error!(
                "REAPER: {} of {} deletions failed in namespace {}",
                report.failures.len(),
                report.failures.len() + report.deleted.len(),
                self.namespace
            );
        }
        Ok(report)
    }

    /// Delete the ingress of a service whose config dropped its external url.
    pub async fn cleanup_ingress(&self, config: Option<&Service>, observed: &Service) -> CleanupReport {
        let mut report = CleanupReport::new();
        if let Some(config) = config {
            if !config.has_external_url() && observed.has_external_url() {
                info!(
                    "REAPER: deleting ingress {} because it was removed from the service config",
                    observed.name
                );
                self.destroy_ingress(&observed.name, &mut report).await;
            }
        }
        report
    }

    /// Delete the HPA of a service whose config dropped autoscaling.
    pub async fn cleanup_hpa(&self, config: Option<&Service>, observed: &Service) -> CleanupReport {
        let mut report = CleanupReport::new();
        if let Some(config) = config {
            if !config.hpa.is_active() && observed.hpa.is_active() {
                info!(
                    "REAPER: deleting hpa {} because it was removed from the service config",
                    observed.name
                );
                self.destroy(ResourceKind::HorizontalPodAutoscaler, &observed.name, &mut report)
                    .await;
            }
        }
        report
    }

    /// Delete imported resources whose name no longer appears in the config.
    pub async fn cleanup_gists(&self, desired: &Gists, observed: &Gists) -> CleanupReport {
        let mut report = CleanupReport::new();
        for gist in observed {
            if desired.contains_name(&gist.name) {
                continue;
            }
            match gist.gist_type.resource_kind() {
                Some(kind) => {
                    info!("REAPER: found orphan resource {}, type {}, deleting.", gist.name, kind);
                    self.destroy(kind, &gist.name, &mut report).await;
                }
                None => debug!("REAPER: leaving imported secret {} in place", gist.name),
            }
        }
        report
    }

    async fn delete_service(&self, service: &Service, report: &mut CleanupReport) {
        for (kind, name) in service.owned_resources() {
            match kind {
                ResourceKind::Ingress => self.destroy_ingress(&name, report).await,
                ResourceKind::Deployment => self.destroy_deployment(&name, report).await,
                kind => self.destroy(kind, &name, report).await,
            }
        }
    }

    async fn destroy_ingress(&self, name: &str, report: &mut CleanupReport) {
        if self.external_secrets_enabled {
            self.destroy(ResourceKind::ExternalSecret, name, report).await;
        }
        self.destroy(ResourceKind::Ingress, name, report).await;
    }

    async fn destroy_deployment(&self, name: &str, report: &mut CleanupReport) {
        match self.client.exists(&ResourceKind::Deployment, name, &self.namespace).await {
            Ok(true) => self.destroy(ResourceKind::Deployment, name, report).await,
            Ok(false) => debug!("REAPER: no deployment {} to delete", name),
            Err(e) => {
                error!("REAPER: failed to look up deployment {}: {}", name, e);
                report.record(ResourceKind::Deployment, name, Err(e));
            }
        }
    }

    async fn destroy(&self, kind: ResourceKind, name: &str, report: &mut CleanupReport) {
        let result = self.client.delete(&kind, name, &self.namespace).await;
        match &result {
            Ok(()) => info!("REAPER: deleted {} {}", kind, name),
            Err(e) => error!("REAPER: failed to destroy {} {}: {}", kind, name, e),
        }
        report.record(kind, name, result);
    }
}

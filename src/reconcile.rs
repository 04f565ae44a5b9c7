use std::collections::BTreeSet;

use log::{error, info, warn};

use crate::bluegreen::expand_blue_green_services;
use crate::cluster::{ConfigLoader, EnvironmentLoader, ResourceClient, ServiceApplier};
use crate::diff::{compare, ChangeSet, CompareOptions};
use crate::errors::Error;
use crate::model::{Environment, ResourceKind};
use crate::reaper::{CleanupReport, Reaper};
use crate::utils::{plural_str, quoted_names};
use crate::OperatorConfig;

/// What one reconciliation tick decided and did.
#[derive(Debug, Default)]
pub struct TickReport {
    pub changes: ChangeSet,
    /// Services applied successfully, in change set order.
    pub applied: Vec<String>,
    pub apply_failures: Vec<(String, Error)>,
    /// `Err` when the reaper refused to run; the tick itself still succeeds.
    pub cleanup: Option<Result<CleanupReport, Error>>,
}

/// Converge the namespace toward the environment config once.
///
/// Fails only when either environment cannot be loaded. Apply and
/// deletion failures are collected into the report.
pub async fn reconcile_once(
    config_loader: &dyn ConfigLoader,
    environment_loader: &dyn EnvironmentLoader,
    client: &dyn ResourceClient,
    applier: &dyn ServiceApplier,
    config: &OperatorConfig,
) -> Result<TickReport, Error> {
    let namespace = config.namespace.as_str();

    let mut desired = config_loader
        .load_desired()
        .await
        .map_err(|e| Error::load(namespace, e))?;
    expand_blue_green_services(&mut desired);

    let observed = environment_loader
        .load_environment(namespace)
        .await
        .map_err(|e| Error::load(namespace, e))?;

    let options = CompareOptions {
        external_secrets_enabled: config.external_secrets_enabled,
        existing_external_secrets: existing_external_secrets(client, &desired, config).await,
    };

    let (changes, changed) = compare(&desired, &observed, &options);
    let mut report = TickReport::default();

    if changed {
        info!(
            "Detected changes for {}: {}",
            plural_str(changes.len(), "services", Some(format!("{} ", changes.len()))),
            quoted_names(changes.service_names())
        );
        for (name, diff) in changes.iter() {
            info!("Changes for {}:\n{}", name, diff);
        }
        apply_changes(applier, &desired, &changes, &mut report).await;
    }

    let reaper = Reaper::new(environment_loader, client, namespace, config.external_secrets_enabled);
    let cleanup = reaper.cleanup(Some(&desired)).await;
    if let Err(e) = &cleanup {
        error!("{}", e);
    }

    report.changes = changes;
    report.cleanup = Some(cleanup);
    Ok(report)
}

async fn existing_external_secrets(
    client: &dyn ResourceClient,
    desired: &Environment,
    config: &OperatorConfig,
) -> BTreeSet<String> {
    let mut existing = BTreeSet::new();
    if !config.external_secrets_enabled {
        return existing;
    }

    for service in desired.services.iter().filter(|s| s.is_tls_enabled()) {
        match client
            .exists(&ResourceKind::ExternalSecret, &service.name, &config.namespace)
            .await
        {
            Ok(true) => {
                existing.insert(service.name.clone());
            }
            Ok(false) => {}
            // an unknown state is treated as missing, so the service gets applied
            Err(e) => warn!("Unable to look up external secret {}: {}", service.name, e),
        }
    }
    existing
}

async fn apply_changes(applier: &dyn ServiceApplier, desired: &Environment, changes: &ChangeSet, report: &mut TickReport) {
    for name in changes.service_names() {
        let service = match desired.services.find_by_name(name) {
            Some(service) => service,
            None => {
                warn!("Service {} has changes but is not in the environment config", name);
                continue;
            }
        };

        match applier.apply_service(desired, service).await {
            Ok(()) => {
                info!("Applied changes for service {}", name);
                report.applied.push(name.to_owned());
            }
            Err(e) => {
                error!("Failed to apply service {}: {}", name, e);
                report.apply_failures.push((name.to_owned(), e));
            }
        }
    }
}

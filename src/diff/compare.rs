use std::collections::BTreeSet;

use log::{debug, trace};

use crate::diff::{align::align_services, pretty, ChangeSet};
use crate::model::{Deployable, Environment, Service};
use crate::utils::plural_str;

/// Inputs to `compare` beyond the two environments.
#[derive(Clone, Debug, Default)]
pub struct CompareOptions {
    pub external_secrets_enabled: bool,
    /// Names of the external secrets already present in the namespace.
    pub existing_external_secrets: BTreeSet<String>,
}

/// Work out which desired services need a deploy to match what is running.
///
/// Returns the change set and whether it holds anything. Services are
/// judged independently of each other; neither argument is modified.
pub fn compare(desired: &Environment, observed: &Environment, options: &CompareOptions) -> (ChangeSet, bool) {
    trace!("Desired environment config: {:?}", desired);
    trace!("Existing environment config: {:?}", observed);

    let mut changes = ChangeSet::new();

    for desired_svc in &desired.services {
        let name = desired_svc.name.as_str();
        debug!("Checking desired configuration against running service {}", name);
        let observed_svc = observed.services.find_by_name(name);

        compare_service(desired_svc, observed_svc, options, &mut changes);
    }

    if changes.is_empty() {
        debug!("No changes detected for environment");
    } else {
        debug!(
            "Detected {} in environment",
            plural_str(changes.len(), "changes", Some(format!("{} ", changes.len())))
        );
    }
    let changed = !changes.is_empty();
    (changes, changed)
}

fn compare_service(desired: &Service, observed: Option<&Service>, options: &CompareOptions, changes: &mut ChangeSet) {
    let name = desired.name.as_str();

    if observed.is_none() && desired.is_blue_green_parent_deployment() {
        debug!("Forcing change for blue/green \"parent\" service {}", name);
        changes.add(name, format!("name: +{}", name));
    }

    if desired.is_active_blue_green_deployment() {
        debug!("Ignore changes for active blue/green deployment {}", name);
        return;
    }

    if desired.is_blue_green_parent_deployment() {
        let observed = match observed {
            Some(observed) => observed,
            None => {
                debug!("Applying changes for blue/green \"parent\" service {}", name);
                changes.add(name, pretty::compare(None, Some(desired)));
                return;
            }
        };

        let url_diff = pretty::compare(Some(&observed.external_url), Some(&desired.external_url));
        if !url_diff.is_empty() {
            debug!("Change detected for blue/green service external_url {}", name);
            trace!("external_url change: {}", url_diff);
            changes.add(name, url_diff);
            return;
        }

        let active_diff = pretty::compare(
            Some(observed.active_deployment_name().as_str()),
            Some(desired.active_deployment_name().as_str()),
        );
        if !active_diff.is_empty() {
            debug!("Change detected for blue/green service active deployment {}", name);
            trace!("active deployment change: {}", active_diff);
            changes.add(name, active_diff);
            return;
        }
    }

    let deployed_has_version = observed.map_or(false, |observed| observed.is_deployable());
    if desired.is_deployable() || deployed_has_version {
        compare_deployed(desired, observed, changes);
    } else {
        debug!("\"version\" field not set for service {}. Skipping deployment.", name);
    }

    // the active child and already recorded parents never get here
    if options.external_secrets_enabled
        && desired.is_tls_enabled()
        && !options.existing_external_secrets.contains(name)
    {
        debug!("Changes detected for external secrets of {}", name);
        changes.add(name, format!("ExternalSecrets: +{}", name));
    }
}

fn compare_deployed(desired: &Service, observed: Option<&Service>, changes: &mut ChangeSet) {
    let name = desired.name.as_str();
    let mut desired = desired.clone();
    let service_diff = match observed {
        Some(observed) => {
            let mut observed = observed.clone();
            observed.status = Default::default();
            align_services(&mut desired, &mut observed);
            pretty::compare(Some(&observed), Some(&desired))
        }
        None => {
            // status is never desired intent
            desired.status = Default::default();
            pretty::compare(None, Some(&desired))
        }
    };

    if service_diff.is_empty() {
        debug!("No changes detected for service {}", name);
    } else {
        debug!("Change detected for service {}", name);
        trace!("Service changes for {}: {}", name, service_diff);
        changes.add(name, service_diff);
    }
}

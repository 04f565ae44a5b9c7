use log::trace;

use crate::model::{equivalent_quantities, ContainerResources, Probe, Service, ServiceKind};

/// Bring a working copy of the desired service in line with what is
/// running wherever a difference would not be a real change: fields the
/// cluster owns, values the config leaves unset, and equivalent spellings.
///
/// Both arguments are working copies; `current` loses its blue/green
/// bookkeeping too.
pub fn align_services(desired: &mut Service, current: &mut Service) {
    trace!("Aligning service {} to {:?}", desired.name, current);

    if desired.version.is_empty() {
        desired.version = current.version.clone();
    }

    if desired.application.is_empty() && !current.application.is_empty() {
        desired.application = current.application.clone();
    }

    desired.status = current.status.clone();

    if let Some(deployment) = desired.deployment.as_mut() {
        deployment.blue_green = None;
    }
    if let Some(deployment) = current.deployment.as_mut() {
        deployment.blue_green = None;
    }

    // limits are not applied to the resource behind a typed service
    if let ServiceKind::ExternalResource(desired_type) = &mut desired.kind {
        desired.limits = current.limits.clone();
        if let ServiceKind::ExternalResource(current_type) = &current.kind {
            if desired_type.eq_ignore_ascii_case(current_type) {
                *desired_type = current_type.clone();
            }
        }
    }

    align_quantities(&mut desired.requests, &current.requests);
    align_quantities(&mut desired.limits, &current.limits);

    // an active HPA owns the replica count
    if current.hpa.is_active() {
        desired.replicas = current.replicas;
    }

    align_probe(desired.liveness_probe.as_mut(), current.liveness_probe.as_ref());
    align_probe(desired.readiness_probe.as_mut(), current.readiness_probe.as_ref());

    if current.version.is_empty() {
        // annotations only land on the deployment object, which doesn't exist yet
        desired.annotations = current.annotations.clone();
    } else {
        for (key, value) in &current.annotations {
            let missing = desired.annotations.get(key).map_or(true, |v| v.is_empty());
            if missing {
                desired.annotations.insert(key.clone(), value.clone());
            }
        }
    }
}

fn align_quantities(desired: &mut ContainerResources, current: &ContainerResources) {
    if equivalent_quantities(&desired.cpu, &current.cpu) {
        desired.cpu = current.cpu.clone();
    }
    if equivalent_quantities(&desired.memory, &current.memory) {
        desired.memory = current.memory.clone();
    }
}

fn fill_zero(desired: &mut i32, current: i32) {
    if *desired == 0 {
        *desired = current;
    }
}

fn fill_empty<T: Clone>(desired: &mut T, current: &T, is_empty: impl Fn(&T) -> bool) {
    if is_empty(desired) {
        *desired = current.clone();
    }
}

fn align_probe(desired: Option<&mut Probe>, current: Option<&Probe>) {
    let (desired, current) = match (desired, current) {
        (Some(desired), Some(current)) => (desired, current),
        _ => return,
    };

    fill_zero(&mut desired.initial_delay_seconds, current.initial_delay_seconds);
    fill_zero(&mut desired.timeout_seconds, current.timeout_seconds);
    fill_zero(&mut desired.period_seconds, current.period_seconds);
    fill_zero(&mut desired.success_threshold, current.success_threshold);
    fill_zero(&mut desired.failure_threshold, current.failure_threshold);

    if let (Some(desired), Some(current)) = (desired.http_get.as_mut(), current.http_get.as_ref()) {
        fill_empty(&mut desired.path, &current.path, String::is_empty);
        fill_empty(&mut desired.host, &current.host, String::is_empty);
        fill_empty(&mut desired.scheme, &current.scheme, String::is_empty);
        fill_empty(&mut desired.http_headers, &current.http_headers, Vec::is_empty);
    }
}

use tokio_test::block_on;

use environment_operator::model::{Environment, ResourceKind};
use environment_operator::{reconcile_once, Error, OperatorConfig, TickReport};

mod helpers;

use helpers::{FakeCluster, NAMESPACE};

fn config(external_secrets_enabled: bool) -> OperatorConfig {
    OperatorConfig {
        namespace: NAMESPACE.to_string(),
        external_secrets_enabled,
    }
}

fn tick(cluster: &FakeCluster, config: &OperatorConfig) -> Result<TickReport, Error> {
    block_on(reconcile_once(cluster, cluster, cluster, cluster, config))
}

fn fixtures() -> (Environment, Environment) {
    (
        helpers::example_environment("desired-environment.yaml"),
        helpers::example_environment("observed-environment.yaml"),
    )
}

#[test]
fn test_tick_in_sync_only_reaps() {
    helpers::init_logger();
    let (desired, observed) = fixtures();
    let cluster = FakeCluster::new(desired, observed);

    let report = tick(&cluster, &config(false)).unwrap();

    assert!(report.changes.is_empty());
    assert!(report.applied.is_empty());
    assert!(cluster.applied().is_empty());
    let cleanup = report.cleanup.unwrap().unwrap();
    assert!(cleanup.is_clean());
    assert!(cleanup.was_deleted(&ResourceKind::Service, "legacy-search"));
    assert!(cleanup.was_deleted(&ResourceKind::Job, "weekly-cleanup"));
}

#[test]
fn test_tick_applies_changed_services() {
    let (mut desired, observed) = fixtures();
    desired.services.find_by_name_mut("api").unwrap().version = "1.5.0".to_string();
    desired.services.find_by_name_mut("reports").unwrap().version = "1.0.0".to_string();
    let cluster = FakeCluster::new(desired, observed);

    let report = tick(&cluster, &config(false)).unwrap();

    assert_eq!(report.changes.len(), 2);
    assert_eq!(report.applied, vec!["api", "reports"]);
    assert_eq!(cluster.applied(), vec!["api", "reports"]);
    assert!(report.apply_failures.is_empty());
}

#[test]
fn test_tick_collects_apply_failures() {
    let (mut desired, observed) = fixtures();
    desired.services.find_by_name_mut("api").unwrap().version = "1.5.0".to_string();
    desired.services.find_by_name_mut("reports").unwrap().version = "1.0.0".to_string();
    let cluster = FakeCluster::new(desired, observed).failing_apply_of("api");

    let report = tick(&cluster, &config(false)).unwrap();

    assert_eq!(report.applied, vec!["reports"]);
    assert_eq!(report.apply_failures.len(), 1);
    match &report.apply_failures[0] {
        (name, Error::Apply { .. }) => assert_eq!(name, "api"),
        other => panic!("Unexpected apply failure {:?}", other),
    }
    // the reaper still ran
    assert!(report.cleanup.unwrap().is_ok());
}

#[test]
fn test_tick_fails_when_desired_cannot_load() {
    let (desired, observed) = fixtures();
    let cluster = FakeCluster::new(desired, observed).failing_desired_load();

    assert!(matches!(
        tick(&cluster, &config(false)),
        Err(Error::EnvironmentLoad { .. })
    ));
    assert!(cluster.deleted().is_empty());
    assert!(cluster.applied().is_empty());
}

#[test]
fn test_tick_fails_when_observed_cannot_load() {
    let (desired, observed) = fixtures();
    let cluster = FakeCluster::new(desired, observed).failing_observed_load();

    assert!(matches!(
        tick(&cluster, &config(false)),
        Err(Error::EnvironmentLoad { .. })
    ));
    assert!(cluster.deleted().is_empty());
}

#[test]
fn test_tick_with_no_services_reaps_everything() {
    let (_, observed) = fixtures();
    let cluster = FakeCluster::new(Environment::default(), observed);

    let report = tick(&cluster, &config(false)).unwrap();
    assert!(report.changes.is_empty());
    let cleanup = report.cleanup.unwrap().unwrap();
    for name in &["api", "legacy-search", "reports", "worker"] {
        assert!(cleanup.was_deleted(&ResourceKind::Service, name), "{} not reaped", name);
    }
    assert!(cleanup.was_deleted(&ResourceKind::CustomResource("Mongo".to_string()), "sessions"));
    assert!(cleanup.was_deleted(&ResourceKind::ConfigMap, "nginx-conf"));
    assert!(cleanup.was_deleted(&ResourceKind::Job, "weekly-cleanup"));
    assert!(!cluster.deleted_names().contains("registry-credentials"));
}

#[test]
fn test_tick_creates_missing_external_secrets() {
    let (desired, observed) = fixtures();
    let cluster = FakeCluster::new(desired.clone(), observed.clone());

    let report = tick(&cluster, &config(true)).unwrap();
    assert_eq!(report.changes.get("api"), Some("ExternalSecrets: +api"));
    assert_eq!(report.applied, vec!["api"]);

    let cluster = FakeCluster::new(desired, observed).with_existing(ResourceKind::ExternalSecret, "api");
    let report = tick(&cluster, &config(true)).unwrap();
    assert!(report.changes.is_empty());
}

#[test]
fn test_tick_deploys_new_blue_green_service() {
    let desired = helpers::environment(
        r#"
        services:
          - name: svc
            version: "1.0"
            deployment:
              method: bluegreen
              blue_green:
                active: blue
        "#,
    );
    let cluster = FakeCluster::new(desired, Environment::default());

    let report = tick(&cluster, &config(false)).unwrap();
    assert_eq!(report.applied, vec!["svc", "svc-green"]);
}

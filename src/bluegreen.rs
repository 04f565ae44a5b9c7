//! Blue/green coordination.
//!
//! A blue/green "parent" service is never deployed itself. It is expanded
//! into two colored "child" services (`<name>-blue`, `<name>-green`) and
//! the parent only records which of the two serves traffic.

use log::debug;

use crate::model::{
    BlueGreenColour, BlueGreenSettings, DeploymentMethod, DeploymentSettings, Environment, Service,
};

impl Service {
    fn blue_green_settings(&self) -> Option<&BlueGreenSettings> {
        self.deployment.as_ref().and_then(|deployment| deployment.blue_green.as_ref())
    }

    pub fn is_blue_green_parent_deployment(&self) -> bool {
        self.deployment_method() == DeploymentMethod::BlueGreen
    }

    pub fn is_blue_green_child_deployment(&self) -> bool {
        self.blue_green_settings()
            .map_or(false, |settings| settings.deployment_colour.is_some())
    }

    /// Colour currently serving traffic, as recorded on the parent.
    pub fn active_deployment_tag(&self) -> Option<BlueGreenColour> {
        self.blue_green_settings().and_then(|settings| settings.active)
    }

    /// Colour not serving traffic; `None` whenever the active colour is unknown.
    pub fn inactive_deployment_tag(&self) -> Option<BlueGreenColour> {
        self.active_deployment_tag().map(BlueGreenColour::opposite)
    }

    pub fn active_deployment_name(&self) -> String {
        match (self.is_blue_green_parent_deployment(), self.active_deployment_tag()) {
            (true, Some(colour)) => colour_name(&self.name, colour),
            _ => self.name.clone(),
        }
    }

    pub fn inactive_deployment_name(&self) -> String {
        match (self.is_blue_green_parent_deployment(), self.inactive_deployment_tag()) {
            (true, Some(colour)) => colour_name(&self.name, colour),
            _ => String::new(),
        }
    }

    /// True for the colored child currently serving traffic.
    pub fn is_active_blue_green_deployment(&self) -> bool {
        self.blue_green_settings().map_or(false, |settings| settings.active_flag)
    }
}

fn colour_name(name: &str, colour: BlueGreenColour) -> String {
    format!("{}-{}", name, colour)
}

/// Insert `-<colour>` after the first label of a host name:
/// `www.some.url` -> `www-blue.some.url`, `www` -> `www-blue`.
pub fn blue_green_url_for_kind(url: &str, colour: BlueGreenColour) -> String {
    match url.split_once('.') {
        Some((first, rest)) => format!("{}-{}.{}", first, colour, rest),
        None => format!("{}-{}", url, colour),
    }
}

fn copy_blue_green_service(parent: &Service, colour: BlueGreenColour) -> Service {
    let mut child = parent.clone();
    child.name = colour_name(&parent.name, colour);
    child.deployment = Some(DeploymentSettings {
        method: DeploymentMethod::RollingUpgrade,
        blue_green: Some(BlueGreenSettings {
            active: None,
            deployment_colour: Some(colour),
            active_flag: parent.active_deployment_tag() == Some(colour),
        }),
        ..DeploymentSettings::default()
    });

    // custom urls win over generated ones
    let custom_urls = parent
        .deployment
        .as_ref()
        .and_then(|deployment| deployment.custom_urls.get(&colour))
        .filter(|urls| !urls.is_empty());
    child.external_url = match custom_urls {
        Some(urls) => urls.clone(),
        None => parent
            .external_url
            .iter()
            .map(|url| blue_green_url_for_kind(url, colour))
            .collect(),
    };
    child
}

/// Derive the blue and green children of a blue/green parent service.
pub fn expand_parent(parent: &Service) -> (Service, Service) {
    (
        copy_blue_green_service(parent, BlueGreenColour::Blue),
        copy_blue_green_service(parent, BlueGreenColour::Green),
    )
}

/// Add the colored children of every blue/green parent to a desired
/// environment. Parents are kept; services stay sorted by name.
pub fn expand_blue_green_services(environment: &mut Environment) {
    let children: Vec<Service> = environment
        .services
        .iter()
        .filter(|service| service.is_blue_green_parent_deployment())
        .flat_map(|parent| {
            let (blue, green) = expand_parent(parent);
            debug!(
                "Expanded blue/green service {} into {} and {} (active: {})",
                parent.name,
                blue.name,
                green.name,
                parent.active_deployment_name()
            );
            vec![blue, green]
        })
        .collect();

    for child in children {
        if environment.services.find_by_name(&child.name).is_none() {
            environment.services.push(child);
        }
    }
    environment.services.sort_by_name();
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Error loading environment for namespace '{namespace}': {source}")]
    EnvironmentLoad {
        namespace: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Kube API Error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Environment config error: {0}")]
    EnvyError(#[from] envy::Error),

    #[error("Unknown blue/green colour '{0}'")]
    InvalidColour(String),

    #[error("Invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("Failed to apply service '{name}': {reason}")]
    Apply { name: String, reason: String },
}

impl Error {
    pub fn load(namespace: &str, source: Error) -> Self {
        Error::EnvironmentLoad {
            namespace: namespace.to_owned(),
            source: Box::new(source),
        }
    }
}

#[cfg(feature = "docker")]
mod docker;

#[cfg(feature = "docker")]
pub use docker::DockerClient;

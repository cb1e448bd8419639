#![cfg(feature = "docker")]

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions,
    RemoveContainerOptions, RenameContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::{
    CommitContainerOptions, CreateImageOptions, ImportImageOptions, ListImagesOptions,
    PushImageOptions,
};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions, ListNetworksOptions};
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions, RemoveVolumeOptions};
use futures_util::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncWriteExt;

use dockui_core::ClientError;
use dockui_core::client::ContainerClient;
use dockui_core::config::DockerConfig;
use dockui_core::resource::{
    CommitContainerParams, ContainerSummary, CreateContainerParams, CreateNetworkParams,
    CreateVolumeParams, ExportContainerParams, ExportImageParams, ImageSummary,
    ImportImageParams, LoadImageParams, NetworkSummary, PullImageParams, RenameContainerParams,
    ResourceKind, VolumeSummary,
};

/// Container client backed by the Docker Engine API.
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connect and ping. `endpoint` may be `unix://...`, `http://...` or
    /// `tcp://...`; without one the local defaults (`DOCKER_HOST` or the
    /// standard socket) are used.
    pub async fn connect(config: &DockerConfig) -> Result<Self, ClientError> {
        let connection = |e: BollardError| ClientError::Connection {
            message: e.to_string(),
        };
        let docker = match config.endpoint.as_deref() {
            Some(endpoint) if endpoint.starts_with("unix://") => Docker::connect_with_unix(
                endpoint,
                config.timeout_secs,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(connection)?,
            Some(endpoint) => Docker::connect_with_http(
                endpoint,
                config.timeout_secs,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(connection)?,
            None => Docker::connect_with_local_defaults()
                .map_err(connection)?
                .with_timeout(Duration::from_secs(config.timeout_secs)),
        };

        docker.ping().await.map_err(connection)?;
        log::info!(
            "connected to docker at {}",
            config.endpoint.as_deref().unwrap_or("local defaults")
        );
        Ok(Self { docker })
    }
}

/// Drain a byte stream from the engine into a file.
async fn write_stream<S, B>(path: &Path, stream: S, op: &str) -> Result<(), ClientError>
where
    S: Stream<Item = Result<B, BollardError>>,
    B: AsRef<[u8]>,
{
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| io_error(path, e))?;
    let mut stream = Box::pin(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ClientError::operation(op, e))?;
        file.write_all(chunk.as_ref())
            .await
            .map_err(|e| io_error(path, e))?;
    }
    file.flush().await.map_err(|e| io_error(path, e))
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ClientError> {
    tokio::fs::read(path).await.map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> ClientError {
    ClientError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn engine_error(op: &str, id: &str, e: BollardError) -> ClientError {
    match e {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => ClientError::NotFound { id: id.to_string() },
        other => ClientError::operation(op, other),
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::operation("inspect", e))
}

/// `repo:tag` into its parts; a colon inside a registry host is not a tag.
fn split_reference(name: &str) -> (&str, &str) {
    match name.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (name, "latest"),
    }
}

#[async_trait]
impl ContainerClient for DockerClient {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, ClientError> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String> {
                all: false,
                ..Default::default()
            }))
            .await
            .map_err(|e| engine_error("list images", "", e))?;
        Ok(images
            .into_iter()
            .map(|i| ImageSummary {
                id: i.id,
                repo_tags: i.repo_tags,
                size: i.size,
            })
            .collect())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ClientError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: true,
                ..Default::default()
            }))
            .await
            .map_err(|e| engine_error("list containers", "", e))?;
        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: c.id.unwrap_or_default(),
                name: c
                    .names
                    .and_then(|names| names.into_iter().next())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                status: c.status.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, ClientError> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await
            .map_err(|e| engine_error("list volumes", "", e))?;
        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeSummary {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
            })
            .collect())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, ClientError> {
        let networks = self
            .docker
            .list_networks(None::<ListNetworksOptions<String>>)
            .await
            .map_err(|e| engine_error("list networks", "", e))?;
        Ok(networks
            .into_iter()
            .map(|n| NetworkSummary {
                id: n.id.unwrap_or_default(),
                name: n.name.unwrap_or_default(),
                driver: n.driver.unwrap_or_default(),
                scope: n.scope.unwrap_or_default(),
            })
            .collect())
    }

    async fn inspect(&self, kind: ResourceKind, id: &str) -> Result<serde_json::Value, ClientError> {
        let op = "inspect";
        match kind {
            ResourceKind::Image => to_json(
                self.docker
                    .inspect_image(id)
                    .await
                    .map_err(|e| engine_error(op, id, e))?,
            ),
            ResourceKind::Container => to_json(
                self.docker
                    .inspect_container(id, None::<InspectContainerOptions>)
                    .await
                    .map_err(|e| engine_error(op, id, e))?,
            ),
            ResourceKind::Volume => to_json(
                self.docker
                    .inspect_volume(id)
                    .await
                    .map_err(|e| engine_error(op, id, e))?,
            ),
            ResourceKind::Network => to_json(
                self.docker
                    .inspect_network(id, None::<InspectNetworkOptions<String>>)
                    .await
                    .map_err(|e| engine_error(op, id, e))?,
            ),
        }
    }

    async fn remove(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError> {
        let op = format!("remove {}", kind.label());
        let result = match kind {
            ResourceKind::Image => self.docker.remove_image(id, None, None).await.map(|_| ()),
            ResourceKind::Container => {
                self.docker
                    .remove_container(id, None::<RemoveContainerOptions>)
                    .await
            }
            ResourceKind::Volume => {
                self.docker
                    .remove_volume(id, None::<RemoveVolumeOptions>)
                    .await
            }
            ResourceKind::Network => self.docker.remove_network(id).await,
        };
        result.map_err(|e| engine_error(&op, id, e))
    }

    async fn create_container(&self, params: CreateContainerParams) -> Result<(), ClientError> {
        let options = params.name.map(|name| CreateContainerOptions {
            name,
            platform: None,
        });
        let config = Config {
            image: Some(params.image.clone()),
            cmd: (!params.cmd.is_empty()).then_some(params.cmd),
            env: (!params.env.is_empty()).then_some(params.env),
            ..Default::default()
        };
        let created = self
            .docker
            .create_container(options, config)
            .await
            .map_err(|e| engine_error("create container", &params.image, e))?;
        for warning in created.warnings {
            log::warn!("create container: {}", warning);
        }
        Ok(())
    }

    async fn start_container(&self, id: &str) -> Result<(), ClientError> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| engine_error("start container", id, e))
    }

    async fn stop_container(&self, id: &str) -> Result<(), ClientError> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await
            .map_err(|e| engine_error("stop container", id, e))
    }

    async fn rename_container(&self, params: RenameContainerParams) -> Result<(), ClientError> {
        self.docker
            .rename_container(&params.id, RenameContainerOptions { name: params.name })
            .await
            .map_err(|e| engine_error("rename container", &params.id, e))
    }

    async fn commit_container(&self, params: CommitContainerParams) -> Result<(), ClientError> {
        let options = CommitContainerOptions {
            container: params.container.clone(),
            repo: params.repository,
            tag: params.tag,
            pause: true,
            ..Default::default()
        };
        self.docker
            .commit_container(options, Config::<String>::default())
            .await
            .map(|_| ())
            .map_err(|e| engine_error("commit container", &params.container, e))
    }

    async fn export_container(&self, params: ExportContainerParams) -> Result<(), ClientError> {
        let stream = self.docker.export_container(&params.id);
        write_stream(&params.path, stream, "export container").await
    }

    async fn pull_image(&self, params: PullImageParams) -> Result<(), ClientError> {
        let reference = format!("{}:{}", params.image, params.tag);
        let options = CreateImageOptions {
            from_image: params.image.clone(),
            tag: params.tag.clone(),
            ..Default::default()
        };
        self.docker
            .create_image(Some(options), None, None)
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(|e| engine_error("pull image", &reference, e))
    }

    async fn push_image(&self, name: &str) -> Result<(), ClientError> {
        let (repo, tag) = split_reference(name);
        self.docker
            .push_image(repo, Some(PushImageOptions { tag }), None)
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(|e| engine_error("push image", name, e))
    }

    async fn export_image(&self, params: ExportImageParams) -> Result<(), ClientError> {
        let stream = self.docker.export_image(&params.name);
        write_stream(&params.path, stream, "export image").await
    }

    async fn import_image(&self, params: ImportImageParams) -> Result<(), ClientError> {
        let contents = read_file(&params.source).await?;
        let options = CreateImageOptions {
            from_src: "-".to_string(),
            repo: params.repository.clone(),
            tag: params.tag,
            ..Default::default()
        };
        self.docker
            .create_image(Some(options), Some(contents.into()), None)
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(|e| engine_error("import image", &params.repository, e))
    }

    async fn load_image(&self, params: LoadImageParams) -> Result<(), ClientError> {
        let contents = read_file(&params.path).await?;
        self.docker
            .import_image(ImportImageOptions { quiet: true }, contents.into(), None)
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(|e| ClientError::operation("load image", e))
    }

    async fn create_volume(&self, params: CreateVolumeParams) -> Result<(), ClientError> {
        let options = CreateVolumeOptions {
            name: params.name.clone(),
            driver: params.driver,
            ..Default::default()
        };
        self.docker
            .create_volume(options)
            .await
            .map(|_| ())
            .map_err(|e| engine_error("create volume", &params.name, e))
    }

    async fn create_network(&self, params: CreateNetworkParams) -> Result<(), ClientError> {
        let options = CreateNetworkOptions {
            name: params.name.clone(),
            driver: params.driver,
            ..Default::default()
        };
        self.docker
            .create_network(options)
            .await
            .map(|_| ())
            .map_err(|e| engine_error("create network", &params.name, e))
    }
}

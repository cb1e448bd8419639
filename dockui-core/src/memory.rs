use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::client::ContainerClient;
use crate::error::ClientError;
use crate::resource::{
    CommitContainerParams, ContainerSummary, CreateContainerParams, CreateNetworkParams,
    CreateVolumeParams, ExportContainerParams, ExportImageParams, ImageSummary,
    ImportImageParams, LoadImageParams, NetworkSummary, PullImageParams, RenameContainerParams,
    ResourceKind, VolumeSummary, short_id,
};

#[derive(Debug, Default)]
struct Inner {
    images: Vec<ImageSummary>,
    containers: Vec<ContainerSummary>,
    volumes: Vec<VolumeSummary>,
    networks: Vec<NetworkSummary>,
    calls: Vec<String>,
    fail_next: Option<ClientError>,
    next_id: u64,
}

impl Inner {
    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:012x}{:052x}", 0xd0c0_0000_0000_u64 + self.next_id, self.next_id)
    }
}

/// In-memory container engine.
///
/// Mutations really change the listings, so the dashboard behaves the same
/// way it does against a live engine. Every call is recorded, and
/// [`MemoryClient::fail_next`] makes the next call return an error.
#[derive(Debug, Default)]
pub struct MemoryClient {
    inner: Mutex<Inner>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small, plausible engine for `--demo` runs.
    pub fn seeded() -> Self {
        Self::new()
            .with_images(vec![
                ImageSummary {
                    id: "sha256:4e5021d210f65ebe915670c7089120120bc0a303b90208592851708c1b8c04bd"
                        .into(),
                    repo_tags: vec!["nginx:latest".into()],
                    size: 187_694_648,
                },
                ImageSummary {
                    id: "sha256:9c7a54a9a43cca047013b82af109fe963fde787f63f9e016fdc3384500c2823d"
                        .into(),
                    repo_tags: vec!["alpine:3.19".into(), "alpine:latest".into()],
                    size: 7_377_361,
                },
                ImageSummary {
                    id: "sha256:f6d0b4767a6c466c178bf718f99bea0d3742b26679081e52dbf8e0c7c4c42d74"
                        .into(),
                    repo_tags: vec!["postgres:16".into()],
                    size: 431_926_302,
                },
            ])
            .with_containers(vec![
                ContainerSummary {
                    id: "3f4e8a1c2b7d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f".into(),
                    name: "web".into(),
                    image: "nginx:latest".into(),
                    status: "Up 2 hours".into(),
                },
                ContainerSummary {
                    id: "8b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c".into(),
                    name: "db".into(),
                    image: "postgres:16".into(),
                    status: "Exited (0) 3 days ago".into(),
                },
            ])
            .with_volumes(vec![VolumeSummary {
                name: "pgdata".into(),
                driver: "local".into(),
                mountpoint: "/var/lib/docker/volumes/pgdata/_data".into(),
            }])
            .with_networks(vec![
                NetworkSummary {
                    id: "a7d3f0e9c1b24d5e8f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e".into(),
                    name: "bridge".into(),
                    driver: "bridge".into(),
                    scope: "local".into(),
                },
                NetworkSummary {
                    id: "c2e4a6b8d0f1e3a5c7b9d1f3e5a7c9b1d3f5e7a9c1b3d5f7e9a1c3b5d7f9e1a3".into(),
                    name: "host".into(),
                    driver: "host".into(),
                    scope: "local".into(),
                },
            ])
    }

    pub fn with_images(self, images: Vec<ImageSummary>) -> Self {
        self.lock().images = images;
        self
    }

    pub fn with_containers(self, containers: Vec<ContainerSummary>) -> Self {
        self.lock().containers = containers;
        self
    }

    pub fn with_volumes(self, volumes: Vec<VolumeSummary>) -> Self {
        self.lock().volumes = volumes;
        self
    }

    pub fn with_networks(self, networks: Vec<NetworkSummary>) -> Self {
        self.lock().networks = networks;
        self
    }

    /// Make the next call, whatever it is, fail with `error`.
    pub fn fail_next(&self, error: ClientError) {
        self.lock().fail_next = Some(error);
    }

    /// Every call made so far, oldest first, e.g. `"remove image 4e5021d210f6"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Recorded calls that changed something (everything but list/inspect).
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("list ") && !c.starts_with("inspect "))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a call and consume a pending failure, if any.
    fn begin(&self, call: String) -> Result<MutexGuard<'_, Inner>, ClientError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

fn matches_id(full: &str, wanted: &str) -> bool {
    full == wanted || short_id(full) == wanted
}

#[async_trait]
impl ContainerClient for MemoryClient {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, ClientError> {
        Ok(self.begin("list images".into())?.images.clone())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ClientError> {
        Ok(self.begin("list containers".into())?.containers.clone())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, ClientError> {
        Ok(self.begin("list volumes".into())?.volumes.clone())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, ClientError> {
        Ok(self.begin("list networks".into())?.networks.clone())
    }

    async fn inspect(&self, kind: ResourceKind, id: &str) -> Result<serde_json::Value, ClientError> {
        let inner = self.begin(format!("inspect {} {}", kind.label(), id))?;
        let found = match kind {
            ResourceKind::Image => inner
                .images
                .iter()
                .find(|i| matches_id(&i.id, id) || i.repo_tags.iter().any(|t| t == id))
                .map(serde_json::to_value),
            ResourceKind::Container => inner
                .containers
                .iter()
                .find(|c| matches_id(&c.id, id) || c.name == id)
                .map(serde_json::to_value),
            ResourceKind::Volume => inner
                .volumes
                .iter()
                .find(|v| v.name == id)
                .map(serde_json::to_value),
            ResourceKind::Network => inner
                .networks
                .iter()
                .find(|n| matches_id(&n.id, id) || n.name == id)
                .map(serde_json::to_value),
        };
        match found {
            Some(value) => value.map_err(|e| ClientError::operation("inspect", e)),
            None => Err(ClientError::NotFound { id: id.to_string() }),
        }
    }

    async fn remove(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("remove {} {}", kind.label(), id))?;
        let removed = match kind {
            ResourceKind::Image => {
                let before = inner.images.len();
                inner.images.retain(|i| !matches_id(&i.id, id));
                before - inner.images.len()
            }
            ResourceKind::Container => {
                let before = inner.containers.len();
                inner.containers.retain(|c| !matches_id(&c.id, id));
                before - inner.containers.len()
            }
            ResourceKind::Volume => {
                let before = inner.volumes.len();
                inner.volumes.retain(|v| v.name != id);
                before - inner.volumes.len()
            }
            ResourceKind::Network => {
                let before = inner.networks.len();
                inner.networks.retain(|n| !matches_id(&n.id, id));
                before - inner.networks.len()
            }
        };
        if removed == 0 {
            return Err(ClientError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    async fn create_container(&self, params: CreateContainerParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("create container {}", params.image))?;
        let id = inner.mint_id();
        let name = params
            .name
            .unwrap_or_else(|| format!("{}-{}", params.image.replace([':', '/'], "-"), short_id(&id)));
        inner.containers.push(ContainerSummary {
            id,
            name,
            image: params.image,
            status: "Created".into(),
        });
        Ok(())
    }

    async fn start_container(&self, id: &str) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("start container {}", id))?;
        let container = inner
            .containers
            .iter_mut()
            .find(|c| matches_id(&c.id, id))
            .ok_or_else(|| ClientError::NotFound { id: id.to_string() })?;
        container.status = "Up Less than a second".into();
        Ok(())
    }

    async fn stop_container(&self, id: &str) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("stop container {}", id))?;
        let container = inner
            .containers
            .iter_mut()
            .find(|c| matches_id(&c.id, id))
            .ok_or_else(|| ClientError::NotFound { id: id.to_string() })?;
        container.status = "Exited (0) Less than a second ago".into();
        Ok(())
    }

    async fn rename_container(&self, params: RenameContainerParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("rename container {} {}", params.id, params.name))?;
        let container = inner
            .containers
            .iter_mut()
            .find(|c| matches_id(&c.id, &params.id))
            .ok_or_else(|| ClientError::NotFound { id: params.id.clone() })?;
        container.name = params.name;
        Ok(())
    }

    async fn commit_container(&self, params: CommitContainerParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!(
            "commit container {} {}:{}",
            params.container, params.repository, params.tag
        ))?;
        let id = format!("sha256:{}", inner.mint_id());
        inner.images.push(ImageSummary {
            id,
            repo_tags: vec![format!("{}:{}", params.repository, params.tag)],
            size: 0,
        });
        Ok(())
    }

    async fn export_container(&self, params: ExportContainerParams) -> Result<(), ClientError> {
        self.begin(format!(
            "export container {} {}",
            params.id,
            params.path.display()
        ))?;
        Ok(())
    }

    async fn pull_image(&self, params: PullImageParams) -> Result<(), ClientError> {
        let reference = format!("{}:{}", params.image, params.tag);
        let mut inner = self.begin(format!("pull image {}", reference))?;
        if !inner.images.iter().any(|i| i.repo_tags.contains(&reference)) {
            let id = format!("sha256:{}", inner.mint_id());
            inner.images.push(ImageSummary {
                id,
                repo_tags: vec![reference],
                size: 0,
            });
        }
        Ok(())
    }

    async fn push_image(&self, name: &str) -> Result<(), ClientError> {
        self.begin(format!("push image {}", name))?;
        Ok(())
    }

    async fn export_image(&self, params: ExportImageParams) -> Result<(), ClientError> {
        self.begin(format!(
            "export image {} {}",
            params.name,
            params.path.display()
        ))?;
        Ok(())
    }

    async fn import_image(&self, params: ImportImageParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!(
            "import image {} {}:{}",
            params.source.display(),
            params.repository,
            params.tag
        ))?;
        let id = format!("sha256:{}", inner.mint_id());
        inner.images.push(ImageSummary {
            id,
            repo_tags: vec![format!("{}:{}", params.repository, params.tag)],
            size: 0,
        });
        Ok(())
    }

    async fn load_image(&self, params: LoadImageParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("load image {}", params.path.display()))?;
        let id = format!("sha256:{}", inner.mint_id());
        inner.images.push(ImageSummary {
            id,
            repo_tags: Vec::new(),
            size: 0,
        });
        Ok(())
    }

    async fn create_volume(&self, params: CreateVolumeParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("create volume {}", params.name))?;
        if inner.volumes.iter().any(|v| v.name == params.name) {
            return Err(ClientError::operation(
                "create volume",
                format!("volume {} already exists", params.name),
            ));
        }
        inner.volumes.push(VolumeSummary {
            mountpoint: format!("/var/lib/docker/volumes/{}/_data", params.name),
            name: params.name,
            driver: params.driver,
        });
        Ok(())
    }

    async fn create_network(&self, params: CreateNetworkParams) -> Result<(), ClientError> {
        let mut inner = self.begin(format!("create network {}", params.name))?;
        let id = inner.mint_id();
        inner.networks.push(NetworkSummary {
            id,
            name: params.name,
            driver: params.driver,
            scope: "local".into(),
        });
        Ok(())
    }
}

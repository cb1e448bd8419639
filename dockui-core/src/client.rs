use async_trait::async_trait;

use crate::error::ClientError;
use crate::resource::{
    CommitContainerParams, ContainerSummary, CreateContainerParams, CreateNetworkParams,
    CreateVolumeParams, ExportContainerParams, ExportImageParams, ImageSummary,
    ImportImageParams, LoadImageParams, NetworkSummary, PullImageParams, RenameContainerParams,
    ResourceKind, VolumeSummary,
};

/// The container-engine backend the dashboard drives.
///
/// Implementations:
/// - `MemoryClient`: seeded in-memory engine for demos and tests
/// - `DockerClient` (cli, `docker` feature): talks to the Docker API
///
/// Every call may fail; callers never assume success.
#[async_trait]
pub trait ContainerClient: Send + Sync {
    /// Name of this client implementation
    fn name(&self) -> &'static str;

    async fn list_images(&self) -> Result<Vec<ImageSummary>, ClientError>;
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ClientError>;
    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, ClientError>;
    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, ClientError>;

    /// Full engine description of one resource, as JSON.
    async fn inspect(&self, kind: ResourceKind, id: &str) -> Result<serde_json::Value, ClientError>;

    async fn remove(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError>;

    async fn create_container(&self, params: CreateContainerParams) -> Result<(), ClientError>;
    async fn start_container(&self, id: &str) -> Result<(), ClientError>;
    async fn stop_container(&self, id: &str) -> Result<(), ClientError>;
    async fn rename_container(&self, params: RenameContainerParams) -> Result<(), ClientError>;
    async fn commit_container(&self, params: CommitContainerParams) -> Result<(), ClientError>;
    async fn export_container(&self, params: ExportContainerParams) -> Result<(), ClientError>;

    async fn pull_image(&self, params: PullImageParams) -> Result<(), ClientError>;
    async fn push_image(&self, name: &str) -> Result<(), ClientError>;
    async fn export_image(&self, params: ExportImageParams) -> Result<(), ClientError>;
    async fn import_image(&self, params: ImportImageParams) -> Result<(), ClientError>;
    async fn load_image(&self, params: LoadImageParams) -> Result<(), ClientError>;

    async fn create_volume(&self, params: CreateVolumeParams) -> Result<(), ClientError>;
    async fn create_network(&self, params: CreateNetworkParams) -> Result<(), ClientError>;
}

/// A mutating client call held as data until the user commits to it.
///
/// Confirm dialogs carry the command they will run on "y"; input forms build
/// one from their field values on submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    Remove { kind: ResourceKind, id: String },
    CreateContainer(CreateContainerParams),
    StartContainer { id: String },
    StopContainer { id: String },
    RenameContainer(RenameContainerParams),
    CommitContainer(CommitContainerParams),
    ExportContainer(ExportContainerParams),
    PullImage(PullImageParams),
    PushImage { name: String },
    ExportImage(ExportImageParams),
    ImportImage(ImportImageParams),
    LoadImage(LoadImageParams),
    CreateVolume(CreateVolumeParams),
    CreateNetwork(CreateNetworkParams),
}

impl ClientCommand {
    pub fn label(&self) -> &'static str {
        match self {
            ClientCommand::Remove { .. } => "remove",
            ClientCommand::CreateContainer(_) => "create container",
            ClientCommand::StartContainer { .. } => "start container",
            ClientCommand::StopContainer { .. } => "stop container",
            ClientCommand::RenameContainer(_) => "rename container",
            ClientCommand::CommitContainer(_) => "commit container",
            ClientCommand::ExportContainer(_) => "export container",
            ClientCommand::PullImage(_) => "pull image",
            ClientCommand::PushImage { .. } => "push image",
            ClientCommand::ExportImage(_) => "export image",
            ClientCommand::ImportImage(_) => "import image",
            ClientCommand::LoadImage(_) => "load image",
            ClientCommand::CreateVolume(_) => "create volume",
            ClientCommand::CreateNetwork(_) => "create network",
        }
    }

    /// Resource lists whose contents change when this command succeeds.
    pub fn affects(&self) -> &'static [ResourceKind] {
        match self {
            ClientCommand::Remove { kind, .. } => match kind {
                ResourceKind::Image => &[ResourceKind::Image],
                ResourceKind::Container => &[ResourceKind::Container],
                ResourceKind::Volume => &[ResourceKind::Volume],
                ResourceKind::Network => &[ResourceKind::Network],
            },
            ClientCommand::CreateContainer(_)
            | ClientCommand::StartContainer { .. }
            | ClientCommand::StopContainer { .. }
            | ClientCommand::RenameContainer(_) => &[ResourceKind::Container],
            ClientCommand::CommitContainer(_)
            | ClientCommand::PullImage(_)
            | ClientCommand::ImportImage(_)
            | ClientCommand::LoadImage(_) => &[ResourceKind::Image],
            ClientCommand::CreateVolume(_) => &[ResourceKind::Volume],
            ClientCommand::CreateNetwork(_) => &[ResourceKind::Network],
            ClientCommand::ExportContainer(_)
            | ClientCommand::PushImage { .. }
            | ClientCommand::ExportImage(_) => &[],
        }
    }

    pub async fn execute(self, client: &dyn ContainerClient) -> Result<(), ClientError> {
        match self {
            ClientCommand::Remove { kind, id } => client.remove(kind, &id).await,
            ClientCommand::CreateContainer(params) => client.create_container(params).await,
            ClientCommand::StartContainer { id } => client.start_container(&id).await,
            ClientCommand::StopContainer { id } => client.stop_container(&id).await,
            ClientCommand::RenameContainer(params) => client.rename_container(params).await,
            ClientCommand::CommitContainer(params) => client.commit_container(params).await,
            ClientCommand::ExportContainer(params) => client.export_container(params).await,
            ClientCommand::PullImage(params) => client.pull_image(params).await,
            ClientCommand::PushImage { name } => client.push_image(&name).await,
            ClientCommand::ExportImage(params) => client.export_image(params).await,
            ClientCommand::ImportImage(params) => client.import_image(params).await,
            ClientCommand::LoadImage(params) => client.load_image(params).await,
            ClientCommand::CreateVolume(params) => client.create_volume(params).await,
            ClientCommand::CreateNetwork(params) => client.create_network(params).await,
        }
    }
}

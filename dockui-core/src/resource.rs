//! Container-engine resources as the dashboard lists them, and the parameter
//! sets the input forms collect for each command.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Container,
    Volume,
    Network,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Image,
        ResourceKind::Container,
        ResourceKind::Volume,
        ResourceKind::Network,
    ];

    /// Singular noun used in prompts ("Do you want delete this image?")
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Container => "container",
            ResourceKind::Volume => "volume",
            ResourceKind::Network => "network",
        }
    }

    /// Panel title
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Image => "Images",
            ResourceKind::Container => "Containers",
            ResourceKind::Volume => "Volumes",
            ResourceKind::Network => "Networks",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub size: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VolumeSummary {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
}

/// Twelve-character form of an engine id, with any `sha256:` prefix dropped.
pub fn short_id(id: &str) -> &str {
    let bare = id.strip_prefix("sha256:").unwrap_or(id);
    bare.get(..12).unwrap_or(bare)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateContainerParams {
    pub name: Option<String>,
    pub image: String,
    pub cmd: Vec<String>,
    pub env: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullImageParams {
    pub image: String,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportImageParams {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportImageParams {
    pub source: PathBuf,
    pub repository: String,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadImageParams {
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportContainerParams {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitContainerParams {
    pub container: String,
    pub repository: String,
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameContainerParams {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateVolumeParams {
    pub name: String,
    pub driver: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateNetworkParams {
    pub name: String,
    pub driver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(
            short_id("sha256:4e5021d210f65ebe915670c7089120120bc0a303b90208592851708c1b8c04bd"),
            "4e5021d210f6"
        );
        assert_eq!(short_id("a1b2c3d4e5f6a7b8c9"), "a1b2c3d4e5f6");
        assert_eq!(short_id("abc"), "abc");
    }
}

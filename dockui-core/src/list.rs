use crate::client::ContainerClient;
use crate::error::ClientError;
use crate::panel::PanelId;
use crate::position::Position;
use crate::resource::{ResourceKind, short_id};
use crate::view::View;

/// One rendered resource row, as remembered at render time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRow {
    /// Identifier commands are issued against
    pub id: String,
    /// Human name: first repo tag, container/volume/network name
    pub name: String,
}

/// Tabular listing of one resource kind.
///
/// Row 0 of the view is the column header. `rows[i]` describes view line
/// `i + 1`, so the selection never depends on parsing rendered text.
#[derive(Clone, Debug)]
pub struct ListPanel {
    id: PanelId,
    kind: ResourceKind,
    view: View,
    rows: Vec<ListRow>,
}

impl ListPanel {
    pub fn new(kind: ResourceKind, position: Position) -> Self {
        Self {
            id: PanelId::list(kind),
            kind,
            view: View::new(kind.title(), position),
            rows: Vec::new(),
        }
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    /// Re-fetch and re-render. The view is only touched once the fetch has
    /// succeeded; on failure the previous listing stays on screen.
    pub async fn refresh(&mut self, client: &dyn ContainerClient) -> Result<(), ClientError> {
        let (header, rendered) = fetch(self.kind, client).await?;

        self.view.clear();
        self.view.write_line(header);
        self.rows.clear();
        for (line, row) in rendered {
            self.view.write_line(line);
            self.rows.push(row);
        }
        // re-clamp after the row count changed; never rest on the header
        // once there is a row to select
        let cursor = self.view.cursor();
        if cursor == 0 && !self.rows.is_empty() {
            self.view.set_cursor(1);
        } else {
            self.view.set_cursor(cursor);
        }

        log::debug!("{}: {} rows", self.id, self.rows.len());
        Ok(())
    }

    /// Resource under the cursor; `None` on the header row or an empty list.
    pub fn current_selection(&self) -> Option<&ListRow> {
        let line = self.view.cursor();
        if line == 0 {
            return None;
        }
        self.rows.get(line - 1)
    }
}

type Rendered = (String, Vec<(String, ListRow)>);

async fn fetch(kind: ResourceKind, client: &dyn ContainerClient) -> Result<Rendered, ClientError> {
    match kind {
        ResourceKind::Image => {
            let images = client.list_images().await?;
            let header = format!("{:<15} {:<20}", "ID", "NAME");
            let rows = images
                .into_iter()
                .map(|image| {
                    let line = format!(
                        "{:<15} {:<20}",
                        short_id(&image.id),
                        format!("[{}]", image.repo_tags.join(" "))
                    );
                    let name = image
                        .repo_tags
                        .first()
                        .cloned()
                        .unwrap_or_else(|| short_id(&image.id).to_string());
                    (line, ListRow { id: image.id, name })
                })
                .collect();
            Ok((header, rows))
        }
        ResourceKind::Container => {
            let containers = client.list_containers().await?;
            let header = format!(
                "{:<15} {:<25} {:<25} {:<20}",
                "ID", "NAME", "IMAGE", "STATUS"
            );
            let rows = containers
                .into_iter()
                .map(|c| {
                    let line = format!(
                        "{:<15} {:<25} {:<25} {:<20}",
                        short_id(&c.id),
                        c.name,
                        c.image,
                        c.status
                    );
                    (line, ListRow { id: c.id, name: c.name })
                })
                .collect();
            Ok((header, rows))
        }
        ResourceKind::Volume => {
            let volumes = client.list_volumes().await?;
            let header = format!("{:<20} {:<10} {:<40}", "NAME", "DRIVER", "MOUNTPOINT");
            let rows = volumes
                .into_iter()
                .map(|v| {
                    let line = format!("{:<20} {:<10} {:<40}", v.name, v.driver, v.mountpoint);
                    (
                        line,
                        ListRow {
                            id: v.name.clone(),
                            name: v.name,
                        },
                    )
                })
                .collect();
            Ok((header, rows))
        }
        ResourceKind::Network => {
            let networks = client.list_networks().await?;
            let header = format!(
                "{:<15} {:<25} {:<10} {:<10}",
                "ID", "NAME", "DRIVER", "SCOPE"
            );
            let rows = networks
                .into_iter()
                .map(|n| {
                    let line = format!(
                        "{:<15} {:<25} {:<10} {:<10}",
                        short_id(&n.id),
                        n.name,
                        n.driver,
                        n.scope
                    );
                    (line, ListRow { id: n.id, name: n.name })
                })
                .collect();
            Ok((header, rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryClient;
    use crate::resource::ImageSummary;

    fn panel(kind: ResourceKind) -> ListPanel {
        ListPanel::new(kind, Position::new(0, 0, 80, 10).unwrap())
    }

    #[tokio::test]
    async fn test_header_only_has_no_selection() {
        let client = MemoryClient::new();
        let mut list = panel(ResourceKind::Image);
        list.refresh(&client).await.unwrap();
        assert_eq!(list.view().lines().len(), 1);
        list.view_mut().set_cursor(1);
        assert_eq!(list.current_selection(), None);
    }

    #[tokio::test]
    async fn test_first_row_selected_once_list_fills() {
        let client = MemoryClient::new();
        let mut list = panel(ResourceKind::Image);
        list.refresh(&client).await.unwrap();
        assert_eq!(list.view().cursor(), 0);

        client
            .pull_image(crate::resource::PullImageParams {
                image: "redis".into(),
                tag: "latest".into(),
            })
            .await
            .unwrap();
        list.refresh(&client).await.unwrap();
        assert_eq!(list.view().cursor(), 1);
        assert_eq!(list.current_selection().unwrap().name, "redis:latest");
    }

    #[tokio::test]
    async fn test_never_rendered_has_no_selection() {
        let list = panel(ResourceKind::Container);
        assert!(list.view().is_empty());
        assert_eq!(list.current_selection(), None);
    }

    #[tokio::test]
    async fn test_selection_follows_cursor() {
        let client = MemoryClient::seeded();
        let mut list = panel(ResourceKind::Image);
        list.refresh(&client).await.unwrap();

        list.view_mut().set_cursor(0);
        assert_eq!(list.current_selection(), None);

        list.view_mut().set_cursor(2);
        let row = list.current_selection().unwrap();
        assert_eq!(row.name, "alpine:3.19");
        assert!(row.id.starts_with("sha256:9c7a54a9a43c"));
    }

    #[tokio::test]
    async fn test_image_rows_are_fixed_width() {
        let client = MemoryClient::new().with_images(vec![ImageSummary {
            id: "sha256:0123456789abcdef0123".into(),
            repo_tags: vec!["busybox:1".into()],
            size: 1,
        }]);
        let mut list = panel(ResourceKind::Image);
        list.refresh(&client).await.unwrap();
        assert_eq!(list.view().lines()[0], format!("{:<15} {:<20}", "ID", "NAME"));
        assert_eq!(
            list.view().lines()[1],
            format!("{:<15} {:<20}", "0123456789ab", "[busybox:1]")
        );
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let client = MemoryClient::seeded();
        let mut list = panel(ResourceKind::Network);
        list.refresh(&client).await.unwrap();
        list.view_mut().set_cursor(2);
        let first = list.view().clone();
        let rows = list.rows().to_vec();

        list.refresh(&client).await.unwrap();
        assert_eq!(list.view(), &first);
        assert_eq!(list.rows(), rows.as_slice());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_listing() {
        let client = MemoryClient::seeded();
        let mut list = panel(ResourceKind::Volume);
        list.refresh(&client).await.unwrap();
        let before = list.view().clone();

        client.fail_next(ClientError::Connection {
            message: "socket closed".into(),
        });
        assert!(list.refresh(&client).await.is_err());
        assert_eq!(list.view(), &before);
        assert_eq!(list.rows()[0].id, "pgdata");
    }

    #[tokio::test]
    async fn test_cursor_clamps_when_rows_disappear() {
        let client = MemoryClient::seeded();
        let mut list = panel(ResourceKind::Container);
        list.refresh(&client).await.unwrap();
        list.view_mut().set_cursor(2);
        let id = list.current_selection().unwrap().id.clone();
        client.remove(ResourceKind::Container, &id).await.unwrap();

        list.refresh(&client).await.unwrap();
        assert_eq!(list.view().cursor(), 1);
        assert_eq!(list.current_selection().unwrap().name, "web");
    }
}

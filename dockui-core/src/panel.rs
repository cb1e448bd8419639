//! Panels: named, positioned, focusable regions.
//!
//! The set of panel kinds is closed, so [`Panel`] is an enum rather than a
//! trait object. Lists and the detail view are persistent; the input and
//! confirm hosts are where overlays are drawn while the modal slot is busy.

use std::fmt;

use crate::client::ContainerClient;
use crate::detail::DetailPanel;
use crate::error::ClientError;
use crate::list::ListPanel;
use crate::position::Position;
use crate::resource::ResourceKind;
use crate::view::View;

pub const IMAGE_LIST: &str = "image list";
pub const CONTAINER_LIST: &str = "container list";
pub const VOLUME_LIST: &str = "volume list";
pub const NETWORK_LIST: &str = "network list";
pub const DETAIL: &str = "detail";
pub const INPUT: &str = "input";
pub const CONFIRM: &str = "confirm";

/// Every panel id the standard dashboard registers.
pub const STANDARD_IDS: [&str; 7] = [
    IMAGE_LIST,
    CONTAINER_LIST,
    VOLUME_LIST,
    NETWORK_LIST,
    DETAIL,
    INPUT,
    CONFIRM,
];

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the list panel showing `kind`.
    pub fn list(kind: ResourceKind) -> Self {
        Self::new(match kind {
            ResourceKind::Image => IMAGE_LIST,
            ResourceKind::Container => CONTAINER_LIST,
            ResourceKind::Volume => VOLUME_LIST,
            ResourceKind::Network => NETWORK_LIST,
        })
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<&str> for PanelId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    List(ResourceKind),
    Detail,
    Input,
    Confirm,
}

impl PanelKind {
    pub fn is_overlay(&self) -> bool {
        matches!(self, PanelKind::Input | PanelKind::Confirm)
    }
}

/// Drawing surface for one kind of overlay.
#[derive(Clone, Debug)]
pub struct OverlayHost {
    id: PanelId,
    view: View,
}

impl OverlayHost {
    pub fn new(id: impl Into<PanelId>, position: Position) -> Self {
        Self {
            id: id.into(),
            view: View::new("", position),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Panel {
    List(ListPanel),
    Detail(DetailPanel),
    Input(OverlayHost),
    Confirm(OverlayHost),
}

impl Panel {
    pub fn id(&self) -> &PanelId {
        match self {
            Panel::List(p) => p.id(),
            Panel::Detail(p) => p.id(),
            Panel::Input(h) | Panel::Confirm(h) => &h.id,
        }
    }

    pub fn kind(&self) -> PanelKind {
        match self {
            Panel::List(p) => PanelKind::List(p.kind()),
            Panel::Detail(_) => PanelKind::Detail,
            Panel::Input(_) => PanelKind::Input,
            Panel::Confirm(_) => PanelKind::Confirm,
        }
    }

    pub fn view(&self) -> &View {
        match self {
            Panel::List(p) => p.view(),
            Panel::Detail(p) => p.view(),
            Panel::Input(h) | Panel::Confirm(h) => &h.view,
        }
    }

    pub fn view_mut(&mut self) -> &mut View {
        match self {
            Panel::List(p) => p.view_mut(),
            Panel::Detail(p) => p.view_mut(),
            Panel::Input(h) | Panel::Confirm(h) => &mut h.view,
        }
    }

    pub fn position(&self) -> Position {
        self.view().position()
    }

    pub fn set_position(&mut self, position: Position) {
        self.view_mut().set_position(position);
    }

    /// First fill after registration.
    pub async fn initialize(&mut self, client: &dyn ContainerClient) -> Result<(), ClientError> {
        match self {
            Panel::List(p) => {
                p.refresh(client).await?;
                p.view_mut().set_cursor(1);
                Ok(())
            }
            Panel::Detail(p) => {
                p.reset();
                Ok(())
            }
            Panel::Input(h) | Panel::Confirm(h) => {
                h.view.clear();
                Ok(())
            }
        }
    }

    /// Re-render from the source of truth. Safe to call at any time.
    pub async fn refresh(&mut self, client: &dyn ContainerClient) -> Result<(), ClientError> {
        match self {
            Panel::List(p) => p.refresh(client).await,
            Panel::Detail(p) => {
                p.redraw();
                Ok(())
            }
            Panel::Input(_) | Panel::Confirm(_) => Ok(()),
        }
    }

    pub fn as_list(&self) -> Option<&ListPanel> {
        match self {
            Panel::List(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListPanel> {
        match self {
            Panel::List(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_detail_mut(&mut self) -> Option<&mut DetailPanel> {
        match self {
            Panel::Detail(p) => Some(p),
            _ => None,
        }
    }
}

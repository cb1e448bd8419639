//! Multi-field input forms that collect parameters for a client command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::client::ClientCommand;
use crate::error::UiError;
use crate::list::ListRow;
use crate::resource::{
    CommitContainerParams, CreateContainerParams, CreateNetworkParams, CreateVolumeParams,
    ExportContainerParams, ExportImageParams, ImportImageParams, LoadImageParams,
    PullImageParams, RenameContainerParams, ResourceKind,
};

/// Field values by label, auxiliary data included.
pub type FormValues = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

const fn field(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        required: false,
        default: None,
    }
}

const fn required(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        required: true,
        default: None,
    }
}

const fn defaulted(label: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        required: false,
        default: Some(default),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormKind {
    CreateContainer,
    PullImage,
    ExportImage,
    ImportImage,
    LoadImage,
    ExportContainer,
    CommitContainer,
    RenameContainer,
    CreateVolume,
    CreateNetwork,
}

impl FormKind {
    pub const ALL: [FormKind; 10] = [
        FormKind::CreateContainer,
        FormKind::PullImage,
        FormKind::ExportImage,
        FormKind::ImportImage,
        FormKind::LoadImage,
        FormKind::ExportContainer,
        FormKind::CommitContainer,
        FormKind::RenameContainer,
        FormKind::CreateVolume,
        FormKind::CreateNetwork,
    ];

    /// Snake-case name used in keybinding config, e.g. `pull_image`.
    pub fn name(&self) -> &'static str {
        match self {
            FormKind::CreateContainer => "create_container",
            FormKind::PullImage => "pull_image",
            FormKind::ExportImage => "export_image",
            FormKind::ImportImage => "import_image",
            FormKind::LoadImage => "load_image",
            FormKind::ExportContainer => "export_container",
            FormKind::CommitContainer => "commit_container",
            FormKind::RenameContainer => "rename_container",
            FormKind::CreateVolume => "create_volume",
            FormKind::CreateNetwork => "create_network",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormKind::CreateContainer => "Create container",
            FormKind::PullImage => "Pull image",
            FormKind::ExportImage => "Export image",
            FormKind::ImportImage => "Import image",
            FormKind::LoadImage => "Load image",
            FormKind::ExportContainer => "Export container",
            FormKind::CommitContainer => "Commit container",
            FormKind::RenameContainer => "Rename container",
            FormKind::CreateVolume => "Create volume",
            FormKind::CreateNetwork => "Create network",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        static CREATE_CONTAINER: [FieldSpec; 4] =
            [field("Name"), required("Image"), field("Cmd"), field("Env")];
        static PULL_IMAGE: [FieldSpec; 2] = [required("Image"), defaulted("Tag", "latest")];
        static PATH: [FieldSpec; 1] = [required("Path")];
        static IMPORT_IMAGE: [FieldSpec; 3] = [
            required("Source"),
            required("Repository"),
            defaulted("Tag", "latest"),
        ];
        static COMMIT: [FieldSpec; 2] = [required("Repository"), defaulted("Tag", "latest")];
        static RENAME: [FieldSpec; 1] = [required("Name")];
        static VOLUME: [FieldSpec; 2] = [required("Name"), defaulted("Driver", "local")];
        static NETWORK: [FieldSpec; 2] = [required("Name"), defaulted("Driver", "bridge")];

        match self {
            FormKind::CreateContainer => &CREATE_CONTAINER,
            FormKind::PullImage => &PULL_IMAGE,
            FormKind::ExportImage | FormKind::LoadImage | FormKind::ExportContainer => &PATH,
            FormKind::ImportImage => &IMPORT_IMAGE,
            FormKind::CommitContainer => &COMMIT,
            FormKind::RenameContainer => &RENAME,
            FormKind::CreateVolume => &VOLUME,
            FormKind::CreateNetwork => &NETWORK,
        }
    }

    /// Forms drawn in the large dialog instead of the small centered one.
    pub fn is_large(&self) -> bool {
        matches!(self, FormKind::CreateContainer)
    }

    /// Resource list this form must be opened from with a row selected.
    pub fn source(&self) -> Option<ResourceKind> {
        match self {
            FormKind::CreateContainer | FormKind::ExportImage => Some(ResourceKind::Image),
            FormKind::ExportContainer
            | FormKind::CommitContainer
            | FormKind::RenameContainer => Some(ResourceKind::Container),
            _ => None,
        }
    }

    /// Auxiliary values carried from the selected row into the form.
    pub fn aux_for(&self, row: &ListRow) -> FormValues {
        let (key, value) = match self {
            FormKind::CreateContainer => ("Image", &row.id),
            FormKind::ExportImage => ("ID", &row.name),
            FormKind::ExportContainer | FormKind::RenameContainer => ("ID", &row.id),
            FormKind::CommitContainer => ("Container", &row.id),
            _ => return FormValues::new(),
        };
        FormValues::from([(key.to_string(), value.clone())])
    }

    /// Turn collected values into the command this form runs.
    pub fn build(&self, values: &FormValues) -> Result<ClientCommand, UiError> {
        let command = match self {
            FormKind::CreateContainer => ClientCommand::CreateContainer(CreateContainerParams {
                name: optional(values, "Name"),
                image: require(values, "Image")?,
                cmd: optional(values, "Cmd")
                    .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                env: optional(values, "Env")
                    .map(|env| {
                        env.split(',')
                            .map(str::trim)
                            .filter(|pair| !pair.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
            FormKind::PullImage => ClientCommand::PullImage(PullImageParams {
                image: require(values, "Image")?,
                tag: or_default(self, values, "Tag"),
            }),
            FormKind::ExportImage => ClientCommand::ExportImage(ExportImageParams {
                name: require(values, "ID")?,
                path: PathBuf::from(require(values, "Path")?),
            }),
            FormKind::ImportImage => ClientCommand::ImportImage(ImportImageParams {
                source: PathBuf::from(require(values, "Source")?),
                repository: require(values, "Repository")?,
                tag: or_default(self, values, "Tag"),
            }),
            FormKind::LoadImage => ClientCommand::LoadImage(LoadImageParams {
                path: PathBuf::from(require(values, "Path")?),
            }),
            FormKind::ExportContainer => ClientCommand::ExportContainer(ExportContainerParams {
                id: require(values, "ID")?,
                path: PathBuf::from(require(values, "Path")?),
            }),
            FormKind::CommitContainer => ClientCommand::CommitContainer(CommitContainerParams {
                container: require(values, "Container")?,
                repository: require(values, "Repository")?,
                tag: or_default(self, values, "Tag"),
            }),
            FormKind::RenameContainer => ClientCommand::RenameContainer(RenameContainerParams {
                id: require(values, "ID")?,
                name: require(values, "Name")?,
            }),
            FormKind::CreateVolume => ClientCommand::CreateVolume(CreateVolumeParams {
                name: require(values, "Name")?,
                driver: or_default(self, values, "Driver"),
            }),
            FormKind::CreateNetwork => ClientCommand::CreateNetwork(CreateNetworkParams {
                name: require(values, "Name")?,
                driver: or_default(self, values, "Driver"),
            }),
        };
        Ok(command)
    }
}

fn optional(values: &FormValues, key: &str) -> Option<String> {
    values
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require(values: &FormValues, key: &str) -> Result<String, UiError> {
    optional(values, key).ok_or_else(|| UiError::MissingField {
        field: key.to_string(),
    })
}

fn or_default(kind: &FormKind, values: &FormValues, key: &str) -> String {
    optional(values, key).unwrap_or_else(|| {
        kind.fields()
            .iter()
            .find(|f| f.label == key)
            .and_then(|f| f.default)
            .unwrap_or_default()
            .to_string()
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

/// A form being filled in: editable fields plus pass-through aux data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputForm {
    kind: FormKind,
    fields: Vec<FormField>,
    focused: usize,
    aux: FormValues,
}

impl InputForm {
    /// Fields start with the matching aux value, else the field default.
    pub fn new(kind: FormKind, aux: FormValues) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|spec| FormField {
                label: spec.label,
                value: aux
                    .get(spec.label)
                    .map(String::as_str)
                    .or(spec.default)
                    .unwrap_or_default()
                    .to_string(),
                required: spec.required,
            })
            .collect();
        Self {
            kind,
            fields,
            focused: 0,
            aux,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert(&mut self, c: char) {
        if let Some(f) = self.fields.get_mut(self.focused) {
            f.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(f) = self.fields.get_mut(self.focused) {
            f.value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(f) = self.fields.get_mut(self.focused) {
            f.value.clear();
        }
    }

    /// Aux data overlaid with every non-empty field.
    pub fn values(&self) -> FormValues {
        let mut values = self.aux.clone();
        for f in &self.fields {
            let value = f.value.trim();
            if !value.is_empty() {
                values.insert(f.label.to_string(), value.to_string());
            }
        }
        values
    }

    pub fn submit(&self) -> Result<ClientCommand, UiError> {
        self.kind.build(&self.values())
    }

    /// Text drawn inside the dialog, one row per field plus a hint line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let marker = if i == self.focused { ">" } else { " " };
                let label = if f.required {
                    format!("{}*:", f.label)
                } else {
                    format!("{}:", f.label)
                };
                format!("{} {:<12} {}", marker, label, f.value)
            })
            .collect();
        lines.push(String::new());
        lines.push("Enter submit  Esc cancel  Tab next".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ListRow {
        ListRow {
            id: "sha256:abc".into(),
            name: "nginx:latest".into(),
        }
    }

    #[test]
    fn test_names_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FormKind::from_name("format_disk"), None);
    }

    #[test]
    fn test_fields_prefilled_from_aux_and_defaults() {
        let form = InputForm::new(FormKind::CreateContainer, FormKind::CreateContainer.aux_for(&row()));
        assert_eq!(form.fields()[1].label, "Image");
        assert_eq!(form.fields()[1].value, "sha256:abc");

        let pull = InputForm::new(FormKind::PullImage, FormValues::new());
        assert_eq!(pull.fields()[1].value, "latest");
    }

    #[test]
    fn test_create_container_splits_cmd_and_env() {
        let mut form = InputForm::new(FormKind::CreateContainer, FormKind::CreateContainer.aux_for(&row()));
        form.next_field();
        form.next_field();
        for c in "sh -c  true".chars() {
            form.insert(c);
        }
        form.next_field();
        for c in "A=1, B=2,".chars() {
            form.insert(c);
        }
        let command = form.submit().unwrap();
        assert_eq!(
            command,
            ClientCommand::CreateContainer(CreateContainerParams {
                name: None,
                image: "sha256:abc".into(),
                cmd: vec!["sh".into(), "-c".into(), "true".into()],
                env: vec!["A=1".into(), "B=2".into()],
            })
        );
    }

    #[test]
    fn test_missing_required_field() {
        let form = InputForm::new(FormKind::CreateVolume, FormValues::new());
        assert_eq!(
            form.submit().unwrap_err(),
            UiError::MissingField {
                field: "Name".into()
            }
        );
    }

    #[test]
    fn test_cleared_default_falls_back() {
        let mut form = InputForm::new(FormKind::CreateNetwork, FormValues::new());
        for c in "backend".chars() {
            form.insert(c);
        }
        form.next_field();
        form.clear_field();
        assert_eq!(
            form.submit().unwrap(),
            ClientCommand::CreateNetwork(CreateNetworkParams {
                name: "backend".into(),
                driver: "bridge".into(),
            })
        );
    }

    #[test]
    fn test_export_uses_selected_name() {
        let mut form = InputForm::new(FormKind::ExportImage, FormKind::ExportImage.aux_for(&row()));
        for c in "/tmp/nginx.tar".chars() {
            form.insert(c);
        }
        assert_eq!(
            form.submit().unwrap(),
            ClientCommand::ExportImage(ExportImageParams {
                name: "nginx:latest".into(),
                path: PathBuf::from("/tmp/nginx.tar"),
            })
        );
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = InputForm::new(FormKind::ImportImage, FormValues::new());
        form.prev_field();
        assert_eq!(form.focused(), 2);
        form.next_field();
        assert_eq!(form.focused(), 0);
        form.insert('x');
        form.backspace();
        form.backspace();
        assert_eq!(form.fields()[0].value, "");
    }

    #[test]
    fn test_lines_mark_focused_and_required() {
        let form = InputForm::new(FormKind::RenameContainer, FormValues::new());
        let lines = form.lines();
        assert_eq!(lines[0], format!("> {:<12} ", "Name*:"));
        assert_eq!(lines.len(), 3);
    }
}

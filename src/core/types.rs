use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::num::{NonZeroU32, NonZeroU64};

// Platform handles handed back by the inventory. `moref` is the platform's
// managed object reference, `name` the inventory display name.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub moref: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub moref: String,
    pub name: String,
    /// The implicit root pool of the host's compute resource.
    pub root_pool: ResourcePool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datastore {
    pub moref: String,
    pub name: String,
}

/// A customization spec that already exists on the platform, passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCustomizationSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAdapter {
    pub key: i32,
    pub label: String,
    pub network: String,
    #[serde(default = "default_adapter_type")]
    pub adapter_type: String,
}

pub const DEFAULT_ADAPTER_TYPE: &str = "vmxnet3";

fn default_adapter_type() -> String {
    DEFAULT_ADAPTER_TYPE.to_string()
}

/// The clone source: either a template or a regular (running or stopped) VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVm {
    pub moref: String,
    pub name: String,
    #[serde(default)]
    pub is_template: bool,
    /// Guest OS identifier reported by the platform, e.g. `windows9Server64Guest`.
    pub guest_id: String,
    #[serde(default)]
    pub nics: Vec<NetworkAdapter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DiskMoveMode {
    #[default]
    None,
    MoveChildMostDiskBacking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RelocationPlan {
    pub host: Option<Host>,
    pub pool: Option<ResourcePool>,
    pub datastore: Option<Datastore>,
    pub disk_move_mode: DiskMoveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOperation {
    Add,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceChange {
    pub operation: DeviceOperation,
    /// Device key; negative for devices that do not exist yet.
    pub key: i32,
    pub adapter_type: String,
    pub network: String,
}

/// Output of the network planner: new adapters and edits to existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceChanges {
    pub additions: Vec<DeviceChange>,
    pub changes: Vec<DeviceChange>,
}

impl DeviceChanges {
    /// Flattens into request order: edits first, then additions.
    pub fn into_ordered(self) -> Vec<DeviceChange> {
        self.changes.into_iter().chain(self.additions).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ConfigOverrides {
    pub annotation: Option<String>,
    pub num_cpus: Option<NonZeroU32>,
    pub memory_mb: Option<NonZeroU64>,
    pub device_changes: Vec<DeviceChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum IpAssignment {
    Dhcp,
    Static { ip: IpAddr, subnet_mask: IpAddr },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpSettings {
    pub assignment: IpAssignment,
    pub dns_server_list: Option<Vec<IpAddr>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalDns {
    pub dns_server_list: Vec<IpAddr>,
    pub dns_suffix_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinuxIdentity {
    pub domain: String,
    pub hostname: String,
    pub hw_clock_utc: Option<bool>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Password {
    pub value: String,
    pub plain_text: bool,
}

impl Password {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            plain_text: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Identification {
    #[serde(rename_all = "camelCase")]
    Domain {
        join_domain: String,
        domain_admin: Option<String>,
        domain_admin_password: Option<Password>,
    },
    #[serde(rename_all = "camelCase")]
    Workgroup { join_workgroup: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuiUnattended {
    pub auto_logon: bool,
    pub auto_logon_count: u32,
    pub password: Option<Password>,
    pub time_zone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub computer_name: String,
    pub full_name: Option<String>,
    pub org_name: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowsIdentity {
    pub gui_run_once: Option<Vec<String>>,
    pub identification: Identification,
    pub gui_unattended: GuiUnattended,
    pub user_data: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "os", rename_all = "lowercase")]
pub enum Identity {
    Linux(LinuxIdentity),
    Windows(WindowsIdentity),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomizationPayload {
    pub identity: Identity,
    pub ip_settings: IpSettings,
    pub global_dns: GlobalDns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestCustomization {
    /// A spec stored on the platform, referenced by name.
    Named(NamedCustomizationSpec),
    Built(CustomizationPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneRequest {
    pub placement: RelocationPlan,
    pub power_on: bool,
    pub template: bool,
    pub config: ConfigOverrides,
    pub customization: Option<GuestCustomization>,
}

use anyhow::{Context, Result};
use serde::de::{self, value::MapAccessDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::IpAddr;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::Path;

/// Everything a caller can ask for when cloning a VM.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloneOptions {
    pub host: Option<String>,
    pub resource_pool: Option<String>,
    pub datastore: Option<String>,
    #[serde(default)]
    pub use_linked_clone: bool,
    pub annotation: Option<String>,
    pub num_cpus: Option<NonZeroU32>,
    pub memory_mb: Option<NonZeroU64>,
    pub network_name: Option<String>,
    pub customization_spec: Option<CustomizationSpecRef>,
    pub hostname: Option<String>,
    pub ssh: Option<SshOptions>,
}

impl CloneOptions {
    /// Loads options from a `.json` file, or TOML for any other extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading clone options from {}", path.display()))?;

        let options = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("parsing {} as JSON", path.display()))?,
            _ => toml::from_str(&raw)
                .with_context(|| format!("parsing {} as TOML", path.display()))?,
        };
        Ok(options)
    }

    pub fn ssh_password(&self) -> Option<&str> {
        self.ssh.as_ref().and_then(|ssh| ssh.password.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshOptions {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// A customization request is either the name of a spec stored on the
/// platform or a structured description to build one from.
#[derive(Debug, Clone)]
pub enum CustomizationSpecRef {
    Named(String),
    Structured(StructuredSpec),
}

// A string is a name, a table is a structured spec. Dispatching on the input
// shape keeps field-level errors from the structured spec intact.
impl<'de> Deserialize<'de> for CustomizationSpecRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecRefVisitor;

        impl<'de> Visitor<'de> for SpecRefVisitor {
            type Value = CustomizationSpecRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a customization spec name or a table of customization settings")
            }

            fn visit_str<E: de::Error>(self, name: &str) -> Result<Self::Value, E> {
                Ok(CustomizationSpecRef::Named(name.to_string()))
            }

            fn visit_string<E: de::Error>(self, name: String) -> Result<Self::Value, E> {
                Ok(CustomizationSpecRef::Named(name))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                StructuredSpec::deserialize(MapAccessDeserializer::new(map))
                    .map(CustomizationSpecRef::Structured)
            }
        }

        deserializer.deserialize_any(SpecRefVisitor)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredSpec {
    pub domain: Option<String>,
    pub hostname: Option<String>,
    pub timezone: Option<String>,
    pub hw_clock_utc: Option<bool>,
    #[serde(default)]
    pub ip_settings: IpSettingsOptions,
    #[serde(rename = "domainAdmin", alias = "domain_admin")]
    pub domain_admin: Option<String>,
    #[serde(rename = "domainAdminPassword", alias = "domain_admin_password")]
    pub domain_admin_password: Option<String>,
    pub org_name: Option<String>,
    pub product_id: Option<String>,
    pub win_time_zone: Option<i32>,
    pub run_once: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpSettingsOptions {
    pub ip: Option<IpAddr>,
    #[serde(rename = "subnetMask", alias = "subnet_mask")]
    pub subnet_mask: Option<IpAddr>,
    #[serde(rename = "dnsServerList", alias = "dns_server_list")]
    pub dns_server_list: Option<Vec<IpAddr>>,
}

use tracing::debug;

use crate::core::errors::{BuildError, BuildResult};
use crate::core::hostname::hostname_for;
use crate::core::identity::{GuestFamily, IdentityContext};
use crate::core::inventory::Inventory;
use crate::core::options::{CloneOptions, CustomizationSpecRef, IpSettingsOptions, StructuredSpec};
use crate::core::progress::ProgressSink;
use crate::core::types::{
    CustomizationPayload, GlobalDns, GuestCustomization, IpAssignment, IpSettings, SourceVm,
};

pub const DOMAIN_REQUIRED: &str = "domain is required";
pub const SUBNET_MASK_REQUIRED: &str = "subnetMask is required for static ip";
pub const SUBNET_MASK_FAMILY: &str = "subnetMask must be the same address family as ip";

/// Builds the guest OS customization, or resolves a named one.
pub struct CustomizationPlanner<'a> {
    inventory: &'a dyn Inventory,
    progress: &'a dyn ProgressSink,
    admin_password_override: Option<&'a str>,
}

impl<'a> CustomizationPlanner<'a> {
    pub fn new(
        inventory: &'a dyn Inventory,
        progress: &'a dyn ProgressSink,
        admin_password_override: Option<&'a str>,
    ) -> Self {
        Self {
            inventory,
            progress,
            admin_password_override,
        }
    }

    pub fn plan(
        &self,
        template: &SourceVm,
        target_name: &str,
        options: &CloneOptions,
    ) -> BuildResult<Option<GuestCustomization>> {
        match &options.customization_spec {
            None => Ok(None),
            Some(CustomizationSpecRef::Named(name)) => {
                debug!(spec = %name, "using stored customization spec");
                let spec = self.inventory.find_customization_spec(name)?;
                Ok(Some(GuestCustomization::Named(spec)))
            }
            Some(CustomizationSpecRef::Structured(spec)) => self
                .build_payload(template, target_name, options, spec)
                .map(|payload| Some(GuestCustomization::Built(payload))),
        }
    }

    fn build_payload(
        &self,
        template: &SourceVm,
        target_name: &str,
        options: &CloneOptions,
        spec: &StructuredSpec,
    ) -> BuildResult<CustomizationPayload> {
        let domain = match spec.domain.as_deref() {
            Some(domain) if !domain.is_empty() => domain,
            _ => return Err(BuildError::validation(DOMAIN_REQUIRED)),
        };

        let ip_settings = ip_settings(&spec.ip_settings, self.progress)?;
        let global_dns = global_dns(&ip_settings, domain);

        let hostname = hostname_for(
            spec.hostname.as_deref().or(options.hostname.as_deref()),
            target_name,
        )?;

        let ctx = IdentityContext {
            spec,
            options,
            target_name,
            domain,
            hostname: &hostname,
            admin_password_override: self.admin_password_override,
            progress: self.progress,
        };
        let identity = GuestFamily::classify(&template.guest_id)
            .identity_builder()
            .build(template, &ctx)?;

        Ok(CustomizationPayload {
            identity,
            ip_settings,
            global_dns,
        })
    }
}

/// Static when an address is given (a mask of the same family is then
/// mandatory), DHCP otherwise.
pub fn ip_settings(options: &IpSettingsOptions, progress: &dyn ProgressSink) -> BuildResult<IpSettings> {
    let assignment = match options.ip {
        Some(ip) => {
            let subnet_mask = options
                .subnet_mask
                .ok_or_else(|| BuildError::validation(SUBNET_MASK_REQUIRED))?;
            if ip.is_ipv4() != subnet_mask.is_ipv4() {
                return Err(BuildError::validation(SUBNET_MASK_FAMILY));
            }
            progress.report(&format!("using static ip {ip} with subnet mask {subnet_mask}"));
            IpAssignment::Static { ip, subnet_mask }
        }
        None => IpAssignment::Dhcp,
    };

    if let Some(servers) = &options.dns_server_list {
        let listed: Vec<String> = servers.iter().map(ToString::to_string).collect();
        progress.report(&format!("using dns servers {}", listed.join(", ")));
    }

    Ok(IpSettings {
        assignment,
        dns_server_list: options.dns_server_list.clone(),
    })
}

pub fn global_dns(ip_settings: &IpSettings, domain: &str) -> GlobalDns {
    GlobalDns {
        dns_server_list: ip_settings.dns_server_list.clone().unwrap_or_default(),
        dns_suffix_list: vec![domain.to_string()],
    }
}

use tracing::debug;

use crate::core::errors::BuildResult;
use crate::core::hostname::hostname_for;
use crate::core::options::{CloneOptions, StructuredSpec};
use crate::core::progress::ProgressSink;
use crate::core::types::{
    GuiUnattended, Identification, Identity, LinuxIdentity, Password, SourceVm, UserData,
    WindowsIdentity,
};

/// Domain value meaning "do not join a domain".
pub const LOCAL_DOMAIN: &str = "local";
pub const DEFAULT_WORKGROUP: &str = "WORKGROUP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestFamily {
    Windows,
    Linux,
}

impl GuestFamily {
    /// The only place a guest OS id is inspected.
    pub fn classify(guest_id: &str) -> Self {
        if guest_id.starts_with("win") {
            GuestFamily::Windows
        } else {
            GuestFamily::Linux
        }
    }

    pub fn identity_builder(self) -> &'static dyn IdentityBuilder {
        match self {
            GuestFamily::Windows => &WindowsIdentityBuilder,
            GuestFamily::Linux => &LinuxIdentityBuilder,
        }
    }
}

/// Inputs shared by both identity flavours.
pub struct IdentityContext<'a> {
    pub spec: &'a StructuredSpec,
    pub options: &'a CloneOptions,
    pub target_name: &'a str,
    /// Already validated and non-empty.
    pub domain: &'a str,
    pub hostname: &'a str,
    /// Domain admin password supplied by the environment; beats `domainAdminPassword`.
    pub admin_password_override: Option<&'a str>,
    pub progress: &'a dyn ProgressSink,
}

pub trait IdentityBuilder {
    fn build(&self, template: &SourceVm, ctx: &IdentityContext<'_>) -> BuildResult<Identity>;
}

pub struct LinuxIdentityBuilder;

impl IdentityBuilder for LinuxIdentityBuilder {
    fn build(&self, template: &SourceVm, ctx: &IdentityContext<'_>) -> BuildResult<Identity> {
        debug!(template = %template.name, hostname = ctx.hostname, "building linux identity");
        Ok(Identity::Linux(LinuxIdentity {
            domain: ctx.domain.to_string(),
            hostname: ctx.hostname.to_string(),
            hw_clock_utc: ctx.spec.hw_clock_utc,
            timezone: ctx.spec.timezone.clone(),
        }))
    }
}

pub struct WindowsIdentityBuilder;

impl IdentityBuilder for WindowsIdentityBuilder {
    fn build(&self, template: &SourceVm, ctx: &IdentityContext<'_>) -> BuildResult<Identity> {
        debug!(template = %template.name, hostname = ctx.hostname, "building windows identity");
        Ok(Identity::Windows(sysprep_identity(
            ctx.spec,
            ctx.options,
            ctx.hostname.to_string(),
            ctx.admin_password_override,
            ctx.progress,
        )))
    }
}

/// Sysprep identity for a Windows guest. The computer name follows the
/// hostname rule; a missing domain or `local` means a workgroup join.
pub fn windows_identity(
    spec: &StructuredSpec,
    options: &CloneOptions,
    target_name: &str,
    admin_password_override: Option<&str>,
    progress: &dyn ProgressSink,
) -> BuildResult<WindowsIdentity> {
    let computer_name = hostname_for(
        spec.hostname.as_deref().or(options.hostname.as_deref()),
        target_name,
    )?;
    Ok(sysprep_identity(
        spec,
        options,
        computer_name,
        admin_password_override,
        progress,
    ))
}

// `computer_name` has already passed the hostname rule.
fn sysprep_identity(
    spec: &StructuredSpec,
    options: &CloneOptions,
    computer_name: String,
    admin_password_override: Option<&str>,
    progress: &dyn ProgressSink,
) -> WindowsIdentity {
    let password = options.ssh_password().map(Password::plain);

    let identification = match spec.domain.as_deref() {
        Some(domain) if domain != LOCAL_DOMAIN => {
            let admin_password = admin_password_override
                .or(spec.domain_admin_password.as_deref())
                .map(Password::plain);
            progress.report(&format!(
                "joining domain {} as {}",
                domain,
                spec.domain_admin.as_deref().unwrap_or("<unset>")
            ));
            Identification::Domain {
                join_domain: domain.to_string(),
                domain_admin: spec.domain_admin.clone(),
                domain_admin_password: admin_password,
            }
        }
        _ => Identification::Workgroup {
            join_workgroup: DEFAULT_WORKGROUP.to_string(),
        },
    };

    WindowsIdentity {
        gui_run_once: spec.run_once.clone(),
        identification,
        gui_unattended: GuiUnattended {
            auto_logon: true,
            auto_logon_count: 1,
            password,
            time_zone: spec.win_time_zone,
        },
        user_data: UserData {
            computer_name,
            full_name: spec.org_name.clone(),
            org_name: spec.org_name.clone(),
            product_id: spec.product_id.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::RecordingSink;
    use crate::core::types::SourceVm;

    fn windows_spec(domain: Option<&str>) -> StructuredSpec {
        StructuredSpec {
            domain: domain.map(String::from),
            domain_admin: Some("administrator".into()),
            domain_admin_password: Some("from-spec".into()),
            org_name: Some("Example Corp".into()),
            product_id: Some("XXXXX-XXXXX".into()),
            win_time_zone: Some(85),
            run_once: Some(vec!["cmd /c echo hi".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_guest_family() {
        assert_eq!(GuestFamily::classify("windows9Server64Guest"), GuestFamily::Windows);
        assert_eq!(GuestFamily::classify("win2000ServGuest"), GuestFamily::Windows);
        assert_eq!(GuestFamily::classify("otherLinux64Guest"), GuestFamily::Linux);
        assert_eq!(GuestFamily::classify("ubuntu64Guest"), GuestFamily::Linux);
    }

    #[test]
    fn test_domain_join() {
        let sink = RecordingSink::new();
        let identity = windows_identity(
            &windows_spec(Some("corp.example")),
            &CloneOptions::default(),
            "win-01",
            None,
            &sink,
        )
        .unwrap();

        assert_eq!(
            identity.identification,
            Identification::Domain {
                join_domain: "corp.example".into(),
                domain_admin: Some("administrator".into()),
                domain_admin_password: Some(Password::plain("from-spec")),
            }
        );
        assert!(sink.contains("corp.example"));
        assert!(sink.contains("administrator"));
    }

    #[test]
    fn test_environment_password_overrides_spec() {
        let identity = windows_identity(
            &windows_spec(Some("corp.example")),
            &CloneOptions::default(),
            "win-01",
            Some("from-env"),
            &RecordingSink::new(),
        )
        .unwrap();

        let Identification::Domain { domain_admin_password, .. } = identity.identification else {
            panic!("expected a domain join");
        };
        assert_eq!(domain_admin_password, Some(Password::plain("from-env")));
    }

    #[test]
    fn test_workgroup_for_local_or_missing_domain() {
        for domain in [None, Some(LOCAL_DOMAIN)] {
            let sink = RecordingSink::new();
            let identity = windows_identity(
                &windows_spec(domain),
                &CloneOptions::default(),
                "win-01",
                None,
                &sink,
            )
            .unwrap();
            assert_eq!(
                identity.identification,
                Identification::Workgroup {
                    join_workgroup: DEFAULT_WORKGROUP.into()
                }
            );
            assert!(sink.messages().is_empty());
        }
    }

    #[test]
    fn test_unattended_and_user_data() {
        let options: CloneOptions = toml::from_str(
            r#"
            [ssh]
            password = "s3cret"
            "#,
        )
        .unwrap();
        let identity = windows_identity(
            &windows_spec(None),
            &options,
            "win-01",
            None,
            &RecordingSink::new(),
        )
        .unwrap();

        assert_eq!(
            identity.gui_unattended,
            GuiUnattended {
                auto_logon: true,
                auto_logon_count: 1,
                password: Some(Password::plain("s3cret")),
                time_zone: Some(85),
            }
        );
        assert_eq!(identity.user_data.computer_name, "win-01");
        assert_eq!(identity.user_data.full_name.as_deref(), Some("Example Corp"));
        assert_eq!(identity.user_data.org_name.as_deref(), Some("Example Corp"));
        assert_eq!(identity.gui_run_once.map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_windows_computer_name_validated() {
        let spec = StructuredSpec {
            hostname: Some("bad_name".into()),
            ..Default::default()
        };
        let err = windows_identity(&spec, &CloneOptions::default(), "win-01", None, &RecordingSink::new())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_bad_computer_name_reports_nothing() {
        let spec = StructuredSpec {
            hostname: Some("-win01".into()),
            ..windows_spec(Some("corp.example"))
        };
        let sink = RecordingSink::new();
        let err = windows_identity(&spec, &CloneOptions::default(), "win-01", None, &sink).unwrap_err();
        assert!(err.is_validation());
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_windows_builder_uses_context_hostname() {
        let spec = windows_spec(Some("corp.example"));
        let options = CloneOptions::default();
        let sink = RecordingSink::new();
        let template = SourceVm {
            moref: "vm-7".into(),
            name: "win2019".into(),
            is_template: true,
            guest_id: "windows9Server64Guest".into(),
            nics: Vec::new(),
        };
        let ctx = IdentityContext {
            spec: &spec,
            options: &options,
            target_name: "win-01",
            domain: "corp.example",
            hostname: "app-07",
            admin_password_override: None,
            progress: &sink,
        };

        let Identity::Windows(identity) = WindowsIdentityBuilder.build(&template, &ctx).unwrap() else {
            panic!("expected a windows identity");
        };
        assert_eq!(identity.user_data.computer_name, "app-07");
        assert!(sink.contains("joining domain corp.example as administrator"));
    }

    #[test]
    fn test_linux_identity_passthrough() {
        let spec = StructuredSpec {
            timezone: Some("Etc/UTC".into()),
            hw_clock_utc: Some(true),
            ..Default::default()
        };
        let options = CloneOptions::default();
        let sink = RecordingSink::new();
        let template = SourceVm {
            moref: "vm-1".into(),
            name: "centos".into(),
            is_template: true,
            guest_id: "centos64Guest".into(),
            nics: Vec::new(),
        };
        let ctx = IdentityContext {
            spec: &spec,
            options: &options,
            target_name: "web-01",
            domain: "corp.example",
            hostname: "web-01",
            admin_password_override: None,
            progress: &sink,
        };

        let identity = GuestFamily::classify(&template.guest_id)
            .identity_builder()
            .build(&template, &ctx)
            .unwrap();
        assert_eq!(
            identity,
            Identity::Linux(LinuxIdentity {
                domain: "corp.example".into(),
                hostname: "web-01".into(),
                hw_clock_utc: Some(true),
                timezone: Some("Etc/UTC".into()),
            })
        );
    }
}

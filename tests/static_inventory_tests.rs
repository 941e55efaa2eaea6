use vsphere_clone_builder::core::types::{DeviceOperation, DiskMoveMode, DEFAULT_ADAPTER_TYPE};
use vsphere_clone_builder::core::{CloneOptions, CloneSpecBuilder, RecordingSink};
use vsphere_clone_builder::{PortgroupNetworkPlanner, StaticInventory};

const INVENTORY: &str = r#"
[[hosts]]
name = "esx01"
moref = "host-10"
root_pool = "resgroup-8"

[[resource_pools]]
name = "Resources"
moref = "resgroup-8"

[[datastores]]
name = "ds1"
moref = "datastore-11"

[[vms]]
name = "centos-tpl"
moref = "vm-42"
is_template = true
guest_id = "centos64Guest"

[[vms.nics]]
key = 4000
label = "Network adapter 1"
network = "VM Network"

[[vms]]
name = "build-box"
moref = "vm-43"
guest_id = "otherLinux64Guest"
"#;

#[test]
fn test_dry_run_build_from_template() {
    let inventory = StaticInventory::from_toml(INVENTORY).unwrap();
    let template = inventory.find_vm("centos-tpl").unwrap();
    let options: CloneOptions = toml::from_str(
        r#"
        host = "esx01"
        datastore = "ds1"
        network_name = "prod-vlan"

        [customization_spec]
        domain = "corp.example"
        timezone = "Etc/UTC"
        "#,
    )
    .unwrap();

    let sink = RecordingSink::new();
    let request = CloneSpecBuilder::new(&inventory, &PortgroupNetworkPlanner, &sink)
        .build(&template, "web-01", &options)
        .unwrap();

    assert_eq!(request.placement.pool.as_ref().map(|p| p.name.as_str()), Some("Resources"));
    assert_eq!(request.config.device_changes.len(), 1);
    assert_eq!(request.config.device_changes[0].operation, DeviceOperation::Edit);
    assert_eq!(request.config.device_changes[0].key, 4000);
    assert_eq!(request.config.device_changes[0].adapter_type, DEFAULT_ADAPTER_TYPE);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["power_on"], false);
    assert_eq!(json["placement"]["disk_move_mode"], "none");
    assert_eq!(json["customization"]["built"]["identity"]["os"], "linux");
    assert_eq!(json["customization"]["built"]["identity"]["hostname"], "web-01");
    assert_eq!(json["customization"]["built"]["ip_settings"]["assignment"]["mode"], "dhcp");
}

#[test]
fn test_dry_run_linked_clone_records_delta_disk() {
    let inventory = StaticInventory::from_toml(INVENTORY).unwrap();
    let source = inventory.find_vm("build-box").unwrap();
    let options: CloneOptions = toml::from_str("use_linked_clone = true").unwrap();

    let sink = RecordingSink::new();
    let builder = CloneSpecBuilder::new(&inventory, &PortgroupNetworkPlanner, &sink);
    let first = builder.build(&source, "ci-01", &options).unwrap();
    let second = builder.build(&source, "ci-01", &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.placement.disk_move_mode, DiskMoveMode::MoveChildMostDiskBacking);
    assert_eq!(inventory.prepared_sources(), vec!["vm-43".to_string()]);
}

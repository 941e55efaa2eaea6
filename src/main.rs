fn main() -> anyhow::Result<()> {
    vsphere_clone_builder::cli::run()
}

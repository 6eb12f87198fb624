#[derive(Clone, Debug)]
pub(crate) struct DumpConfig {
    /// Global configuration.
    pub(crate) global: ampscale_core::GlobalConfig,
}

impl ampscale_core::Configurable for DumpConfig {
    fn global(&self) -> &ampscale_core::GlobalConfig {
        &self.global
    }
}

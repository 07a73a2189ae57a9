use super::{PlatformDevice, PlatformResource, PropertyBag};

/// Platform device described by borrowed, board-static data
///
/// Boards without a device tree build one of these from const tables.
#[derive(Clone, Copy)]
pub struct StaticPlatform<'a> {
    resources: &'a [PlatformResource],
    node: Option<&'a dyn PropertyBag>,
    platform_data: Option<&'a [u8]>,
}

impl<'a> StaticPlatform<'a> {
    pub const fn new(resources: &'a [PlatformResource]) -> Self {
        Self {
            resources,
            node: None,
            platform_data: None,
        }
    }

    /// Attach a device-tree node
    pub fn with_node(mut self, node: &'a dyn PropertyBag) -> Self {
        self.node = Some(node);
        self
    }

    /// Attach a platform data blob
    pub fn with_platform_data(mut self, data: &'a [u8]) -> Self {
        self.platform_data = Some(data);
        self
    }
}

impl PlatformDevice for StaticPlatform<'_> {
    fn resources(&self) -> &[PlatformResource] {
        self.resources
    }

    fn of_node(&self) -> Option<&dyn PropertyBag> {
        self.node
    }

    fn platform_data(&self) -> Option<&[u8]> {
        self.platform_data
    }
}

//! Platform capabilities the driver consumes from its host
//!
//! The host kernel owns device enumeration. The driver only sees a bound
//! platform device through [`PlatformDevice`]: its resource list (register
//! windows and interrupt lines), its device-tree node as a [`PropertyBag`],
//! and an optional board-supplied platform data blob.

use bitflags::bitflags;

use crate::core::types::{IrqNumber, PhysAddr};

mod static_device;
#[cfg(feature = "alloc")]
mod property_map;

pub use static_device::StaticPlatform;
#[cfg(feature = "alloc")]
pub use property_map::PropertyMap;

bitflags! {
    /// Resource type flags, one bit per resource class
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceFlags: u32 {
        /// Memory-mapped register window
        const MEM = 0x0000_0200;
        /// Interrupt line
        const IRQ = 0x0000_0400;
    }
}

/// One entry of a platform device's resource list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformResource {
    /// Symbolic name from the device description, if any
    pub name: Option<&'static str>,
    /// First address, or the interrupt number for IRQ resources
    pub start: PhysAddr,
    /// Last address (inclusive); equals `start` for IRQ resources
    pub end: PhysAddr,
    /// Resource class
    pub flags: ResourceFlags,
}

impl PlatformResource {
    /// Memory window `[start, start + size)`
    pub const fn mem(name: Option<&'static str>, start: PhysAddr, size: usize) -> Self {
        Self {
            name,
            start,
            end: start + size.saturating_sub(1),
            flags: ResourceFlags::MEM,
        }
    }

    /// Named interrupt line
    pub const fn irq(name: &'static str, irq: IrqNumber) -> Self {
        Self {
            name: Some(name),
            start: irq as PhysAddr,
            end: irq as PhysAddr,
            flags: ResourceFlags::IRQ,
        }
    }

    /// Size of the resource in bytes
    pub const fn size(&self) -> usize {
        self.end - self.start + 1
    }

    /// Interrupt number if this is an IRQ resource
    pub fn irq_number(&self) -> Option<IrqNumber> {
        if self.flags.contains(ResourceFlags::IRQ) {
            IrqNumber::try_from(self.start).ok()
        } else {
            None
        }
    }
}

/// Read-only view of a device-tree node's properties
///
/// Integer properties are sequences of 32-bit cells.
pub trait PropertyBag {
    /// First cell of a property
    fn read_u32(&self, name: &str) -> Option<u32>;

    /// Number of 32-bit cells in a property
    fn count_u32(&self, name: &str) -> Option<usize>;

    /// Cell `index` of a property
    fn read_u32_index(&self, name: &str, index: usize) -> Option<u32>;
}

/// A platform device bound to the driver
pub trait PlatformDevice {
    /// Every resource the platform describes for the device, in order
    fn resources(&self) -> &[PlatformResource];

    /// Device-tree node backing the device
    fn of_node(&self) -> Option<&dyn PropertyBag>;

    /// Board-supplied platform data blob
    fn platform_data(&self) -> Option<&[u8]>;

    /// Number of resources the platform describes
    fn num_resources(&self) -> usize {
        self.resources().len()
    }

    /// First resource of class `flags` called `name`
    fn resource_by_name(&self, flags: ResourceFlags, name: &str) -> Option<&PlatformResource> {
        self.resources()
            .iter()
            .find(|res| res.flags.intersects(flags) && res.name == Some(name))
    }

    /// `index`-th resource of class `flags`
    fn resource(&self, flags: ResourceFlags, index: usize) -> Option<&PlatformResource> {
        self.resources()
            .iter()
            .filter(|res| res.flags.intersects(flags))
            .nth(index)
    }
}

impl<T: PlatformDevice + ?Sized> PlatformDevice for &T {
    fn resources(&self) -> &[PlatformResource] {
        (**self).resources()
    }

    fn of_node(&self) -> Option<&dyn PropertyBag> {
        (**self).of_node()
    }

    fn platform_data(&self) -> Option<&[u8]> {
        (**self).platform_data()
    }
}

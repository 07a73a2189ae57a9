//! Utgard OSK - OS abstraction for Mali Utgard GPU resources
//!
//! This crate resolves which register blocks and interrupt lines a probed
//! Mali-400 / Mali-450 device actually has, and forwards the board's GPU
//! configuration to the driver core.
//!
//! ```rust
//! use utgard_api::{PlatformResource, StaticPlatform};
//! use utgard_osk::{offsets, GpuVariant, ResourceBank};
//!
//! static RESOURCES: [PlatformResource; 5] = [
//!     PlatformResource::mem(None, 0x1300_0000, 0x1_0000),
//!     PlatformResource::irq("gp", 32),
//!     PlatformResource::irq("gpmmu", 33),
//!     PlatformResource::irq("pp0", 34),
//!     PlatformResource::irq("ppmmu0", 35),
//! ];
//!
//! let mut bank = ResourceBank::new(StaticPlatform::new(&RESOURCES));
//! bank.initialize().unwrap();
//!
//! assert_eq!(bank.variant(), Some(GpuVariant::Mali400));
//! assert_eq!(bank.find(offsets::PP0).unwrap().base, 0x1300_8000);
//! ```

#![no_std]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

mod logging;

pub mod device_data;
pub mod offsets;
pub mod resource;

// Re-export API types
pub use utgard_api::{Error, ErrorCode, Result};

pub use device_data::{DeviceData, PmuDomainConfig, DEVICE_DATA_SIZE, MAX_PMU_DOMAINS};
pub use resource::{
    GpuVariant, ResourceBank, ResourceDescriptor, ResourceInfo, ResourceState, Topology, MAX_PLATFORM_RESOURCES,
};

//! Utgard API - Platform capabilities and error types for the Mali Utgard driver
//!
//! This crate holds the pieces every part of the driver agrees on: the error
//! type handed back across the driver, and the traits through which the host
//! kernel exposes a bound platform device to it.
//!
//! # Architecture
//!
//! - **Core**: Address and interrupt aliases, numeric status codes
//! - **Error**: Common error type and result alias
//! - **Platform**: Platform device and device-tree property traits, plus a
//!   board-static device and (with `alloc`) a heap-backed property map
//!
//! # Usage
//!
//! ```rust
//! use utgard_api::platform::{PlatformDevice, PlatformResource, ResourceFlags, StaticPlatform};
//!
//! static RESOURCES: [PlatformResource; 2] = [
//!     PlatformResource::mem(None, 0x1300_0000, 0x1_0000),
//!     PlatformResource::irq("gp", 96),
//! ];
//!
//! let device = StaticPlatform::new(&RESOURCES);
//! let gp = device.resource_by_name(ResourceFlags::IRQ, "gp").unwrap();
//! assert_eq!(gp.irq_number(), Some(96));
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod core;
pub mod error;
pub mod platform;

// Re-export commonly used types
pub use crate::core::types::*;
pub use crate::error::{Error, Result};
pub use crate::platform::{PlatformDevice, PlatformResource, PropertyBag, ResourceFlags, StaticPlatform};
#[cfg(feature = "alloc")]
pub use crate::platform::PropertyMap;

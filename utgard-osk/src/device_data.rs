//! Board configuration handed to the driver by the platform
//!
//! Two sources exist. Device-tree properties on the GPU node carry the PMU
//! configuration, and boards may attach a [`DeviceData`] blob describing the
//! memory the GPU may use.

use core::mem::size_of;

use static_assertions::const_assert_eq;
use utgard_api::error::{self, Result};
use utgard_api::{PlatformDevice, PropertyBag};

use crate::logging::{osk_debug, osk_error};
use crate::resource::ResourceBank;

/// Property listing the PMU domain mask of every core group
pub const PMU_DOMAIN_CONFIG: &str = "pmu_domain_config";

/// Property holding the PMU power switch delay
pub const PMU_SWITCH_DELAY: &str = "pmu_switch_delay";

/// Number of PMU domains the driver core tracks; the usual slice length
/// handed to [`ResourceBank::pmu_domain_config`]
pub const MAX_PMU_DOMAINS: usize = 12;

/// Size of the platform data blob in bytes
pub const DEVICE_DATA_SIZE: usize = 56;

const DEVICE_DATA_WORDS: usize = DEVICE_DATA_SIZE / size_of::<u64>();

/// Memory and scheduling configuration supplied by the board
///
/// The platform blob has exactly this layout, native endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct DeviceData {
    /// Dedicated GPU memory window
    pub dedicated_mem_start: u64,
    pub dedicated_mem_size: u64,
    /// OS memory the GPU may allocate from
    pub shared_mem_size: u64,
    /// Framebuffer window the GPU may access
    pub fb_start: u64,
    pub fb_size: u64,
    /// Maximum job runtime in milliseconds
    pub max_job_runtime: u64,
    /// DVFS sampling interval in milliseconds
    pub control_interval: u64,
}

const_assert_eq!(size_of::<DeviceData>(), DEVICE_DATA_SIZE);

impl DeviceData {
    /// Copy a blob of exactly [`DEVICE_DATA_SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != DEVICE_DATA_SIZE {
            return None;
        }

        let mut words = [0u64; DEVICE_DATA_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(size_of::<u64>())) {
            let mut raw = [0u8; size_of::<u64>()];
            raw.copy_from_slice(chunk);
            *word = u64::from_ne_bytes(raw);
        }

        let [
            dedicated_mem_start,
            dedicated_mem_size,
            shared_mem_size,
            fb_start,
            fb_size,
            max_job_runtime,
            control_interval,
        ] = words;

        Some(Self {
            dedicated_mem_start,
            dedicated_mem_size,
            shared_mem_size,
            fb_start,
            fb_size,
            max_job_runtime,
            control_interval,
        })
    }

    /// The blob this value would be copied from
    pub fn to_bytes(&self) -> [u8; DEVICE_DATA_SIZE] {
        let words = [
            self.dedicated_mem_start,
            self.dedicated_mem_size,
            self.shared_mem_size,
            self.fb_start,
            self.fb_size,
            self.max_job_runtime,
            self.control_interval,
        ];

        let mut bytes = [0u8; DEVICE_DATA_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(size_of::<u64>()).zip(words) {
            chunk.copy_from_slice(&word.to_ne_bytes());
        }
        bytes
    }
}

/// Outcome of [`ResourceBank::pmu_domain_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmuDomainConfig {
    /// Every domain slot was filled from the device tree
    Applied,
    /// No device-tree node or no such property; output untouched
    Absent,
    /// Property length differs from the requested domain count, output
    /// untouched. Also reported, with `found` set to the failing index, when
    /// a cell the count promised cannot be read; earlier slots are filled.
    SizeMismatch { expected: usize, found: usize },
}

impl<D: PlatformDevice> ResourceBank<D> {
    fn of_node(&self) -> Option<&dyn PropertyBag> {
        self.device()?.of_node()
    }

    /// Fill `domains` from the `pmu_domain_config` property.
    ///
    /// Cells are truncated to 16 bits. A property whose length does not
    /// match `domains` is logged and otherwise ignored.
    pub fn pmu_domain_config(&self, domains: &mut [u16]) -> PmuDomainConfig {
        let Some(node) = self.of_node() else {
            osk_debug!("no device-tree node, PMU domain config left as is");
            return PmuDomainConfig::Absent;
        };
        let Some(found) = node.count_u32(PMU_DOMAIN_CONFIG) else {
            return PmuDomainConfig::Absent;
        };

        let expected = domains.len();
        if found != expected {
            osk_error!(
                "Wrong pmu domain config in device tree: {} cells, expected {}",
                found,
                expected
            );
            return PmuDomainConfig::SizeMismatch { expected, found };
        }

        for (index, slot) in domains.iter_mut().enumerate() {
            let Some(cell) = node.read_u32_index(PMU_DOMAIN_CONFIG, index) else {
                osk_error!("pmu domain config cell {} unreadable", index);
                return PmuDomainConfig::SizeMismatch { expected, found: index };
            };
            *slot = cell as u16;
        }

        PmuDomainConfig::Applied
    }

    /// PMU power switch delay, 0 when the device tree does not set one
    pub fn pmu_switch_delay(&self) -> u32 {
        match self.of_node().and_then(|node| node.read_u32(PMU_SWITCH_DELAY)) {
            Some(delay) => delay,
            None => {
                osk_debug!("Couldn't find pmu_switch_delay in device tree configuration");
                0
            }
        }
    }

    /// Copy of the board's platform data
    pub fn device_data(&self) -> Result<DeviceData> {
        let device = self
            .device()
            .ok_or_else(|| error::not_found("no platform device bound"))?;
        let blob = device
            .platform_data()
            .ok_or_else(|| error::not_found("no platform data attached"))?;

        DeviceData::from_bytes(blob)
            .ok_or_else(|| error::invalid_argument("platform data does not match the device data layout"))
    }
}

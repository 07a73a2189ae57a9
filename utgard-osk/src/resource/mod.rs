//! The GPU resource bank
//!
//! Every register block the driver may touch is listed once in a fixed,
//! ordered table. Probing narrows the table down to what the bound device
//! actually wires up; afterwards the rest of the driver resolves blocks by
//! offset through [`ResourceBank::find`].
//!
//! Table layout:
//!
//! - `[0, 20)`: blocks with a dedicated interrupt line
//! - `[2, 17]`: pixel processor cores, each followed by its MMU
//! - `[20, 22]`: L2 cache blocks
//! - `[23, 27)`: Mali-450 broadcast, DLBU and DMA blocks

use static_assertions::const_assert;
use utgard_api::{IrqNumber, PhysAddr, RegOffset};

use crate::offsets;

mod bank;

pub use bank::ResourceBank;

/// Number of entries in the resource bank
pub const MAX_RESOURCES: usize = 27;

/// Entries `[0, IRQ_RESOURCES)` resolve an interrupt line during probe
pub const IRQ_RESOURCES: usize = 20;

/// First and last index of the PP core/MMU region
pub const PP_START: usize = 2;
pub const PP_END: usize = 17;

/// First and last index of the L2 cache region
pub const L2_START: usize = 20;
pub const L2_END: usize = 22;

/// Highest number of platform resources `shared_interrupts` can scan
pub const MAX_PLATFORM_RESOURCES: usize = 128;

/// Description of the PP broadcast unit; seeing its interrupt means Mali-450
pub const PP_BROADCAST_DESCRIPTION: &str = "Mali_PP_Broadcast";

const_assert!(PP_END < IRQ_RESOURCES);
const_assert!((PP_END - PP_START + 1) % 2 == 0);
const_assert!(IRQ_RESOURCES <= L2_START);
const_assert!(L2_END < MAX_RESOURCES);

/// Whether a table entry is still backed by hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Block present at `offset` from the controller base
    Enabled { offset: RegOffset },
    /// Block absent on this device
    Disabled,
}

/// One entry of the resource bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Human readable block name; not unique
    pub description: &'static str,
    pub state: ResourceState,
    /// Interrupt resource name the block is wired to, if it has one
    pub irq_name: Option<&'static str>,
    /// Interrupt number, once `irq_name` resolved
    pub irq: Option<IrqNumber>,
}

impl ResourceDescriptor {
    const fn with_irq(description: &'static str, offset: RegOffset, irq_name: &'static str) -> Self {
        Self {
            description,
            state: ResourceState::Enabled { offset },
            irq_name: Some(irq_name),
            irq: None,
        }
    }

    const fn without_irq(description: &'static str, offset: RegOffset) -> Self {
        Self {
            description,
            state: ResourceState::Enabled { offset },
            irq_name: None,
            irq: None,
        }
    }

    /// Register offset while the entry is enabled
    pub fn offset(&self) -> Option<RegOffset> {
        match self.state {
            ResourceState::Enabled { offset } => Some(offset),
            ResourceState::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, ResourceState::Enabled { .. })
    }

    fn disable(&mut self) {
        self.state = ResourceState::Disabled;
    }
}

/// A resolved resource, as handed to core bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Absolute address of the register block
    pub base: PhysAddr,
    pub description: &'static str,
    pub irq: Option<IrqNumber>,
}

/// GPU family, told apart by the presence of the PP broadcast unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVariant {
    /// One L2 cache, no broadcast units
    Mali400,
    /// Two or three L2 caches plus broadcast, DLBU and DMA blocks
    Mali450,
}

/// Core topology derived during probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub variant: GpuVariant,
    /// Number of PP core/MMU pairs
    pub pp_cores: usize,
    /// Number of L2 cache blocks kept enabled
    pub l2_caches: usize,
}

impl Topology {
    /// L2 cache count for a variant with `pp_cores` pixel processors
    pub const fn l2_caches_for(variant: GpuVariant, pp_cores: usize) -> usize {
        match variant {
            GpuVariant::Mali450 if pp_cores > 4 => 3,
            GpuVariant::Mali450 => 2,
            GpuVariant::Mali400 => 1,
        }
    }
}

/// Table every bank starts from
pub const DEFAULT_RESOURCES: [ResourceDescriptor; MAX_RESOURCES] = [
    ResourceDescriptor::with_irq("Mali_GP", offsets::GP, "gp"),
    ResourceDescriptor::with_irq("Mali_GP_MMU", offsets::GP_MMU, "gpmmu"),
    ResourceDescriptor::with_irq("Mali_PP0", offsets::PP0, "pp0"),
    ResourceDescriptor::with_irq("Mali_PP0_MMU", offsets::PP0_MMU, "ppmmu0"),
    ResourceDescriptor::with_irq("Mali_PP1", offsets::PP1, "pp1"),
    ResourceDescriptor::with_irq("Mali_PP1_MMU", offsets::PP1_MMU, "ppmmu1"),
    ResourceDescriptor::with_irq("Mali_PP2", offsets::PP2, "pp2"),
    ResourceDescriptor::with_irq("Mali_PP2_MMU", offsets::PP2_MMU, "ppmmu2"),
    ResourceDescriptor::with_irq("Mali_PP3", offsets::PP3, "pp3"),
    ResourceDescriptor::with_irq("Mali_PP3_MMU", offsets::PP3_MMU, "ppmmu3"),
    ResourceDescriptor::with_irq("Mali_PP4", offsets::PP4, "pp4"),
    ResourceDescriptor::with_irq("Mali_PP4_MMU", offsets::PP4_MMU, "ppmmu4"),
    ResourceDescriptor::with_irq("Mali_PP5", offsets::PP5, "pp5"),
    // Interrupt names of PP5 and PP7 MMUs match the shipped device trees.
    ResourceDescriptor::with_irq("Mali_PP5_MMU", offsets::PP5_MMU, "ppmmu05"),
    ResourceDescriptor::with_irq("Mali_PP6", offsets::PP6, "pp6"),
    ResourceDescriptor::with_irq("Mali_PP6_MMU", offsets::PP6_MMU, "ppmmu6"),
    ResourceDescriptor::with_irq("Mali_PP7", offsets::PP7, "pp7"),
    ResourceDescriptor::with_irq("Mali_PP7_MMU", offsets::PP7_MMU, "ppmmu"),
    ResourceDescriptor::with_irq(PP_BROADCAST_DESCRIPTION, offsets::PP_BCAST, "pp"),
    ResourceDescriptor::with_irq("Mali_PMU", offsets::PMU, "pmu"),
    ResourceDescriptor::without_irq("Mali_L2", offsets::L2_RESOURCE0),
    ResourceDescriptor::without_irq("Mali_L2", offsets::L2_RESOURCE1),
    ResourceDescriptor::without_irq("Mali_L2", offsets::L2_RESOURCE2),
    ResourceDescriptor::without_irq("Mali_PP_MMU_Broadcast", offsets::PP_BCAST_MMU),
    ResourceDescriptor::without_irq("Mali_Broadcast", offsets::BCAST),
    ResourceDescriptor::without_irq("Mali_DLBU", offsets::DLBU),
    ResourceDescriptor::without_irq("Mali_DMA", offsets::DMA),
];

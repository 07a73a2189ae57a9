//! Register block offsets of the Utgard GPU, relative to the controller base
//!
//! One address map covers both Mali-400 and Mali-450; blocks that a given
//! part does not have are simply never enabled in the resource bank.

use utgard_api::RegOffset;

pub const GP: RegOffset = 0x00000;
pub const L2_RESOURCE0: RegOffset = 0x01000;
pub const PMU: RegOffset = 0x02000;
pub const GP_MMU: RegOffset = 0x03000;

pub const PP0_MMU: RegOffset = 0x04000;
pub const PP1_MMU: RegOffset = 0x05000;
pub const PP2_MMU: RegOffset = 0x06000;
pub const PP3_MMU: RegOffset = 0x07000;

pub const PP0: RegOffset = 0x08000;
pub const PP1: RegOffset = 0x0A000;
pub const PP2: RegOffset = 0x0C000;
pub const PP3: RegOffset = 0x0E000;

pub const L2_RESOURCE1: RegOffset = 0x10000;
pub const L2_RESOURCE2: RegOffset = 0x11000;

// Mali-450 only
pub const DMA: RegOffset = 0x12000;
pub const BCAST: RegOffset = 0x13000;
pub const DLBU: RegOffset = 0x14000;
pub const PP_BCAST_MMU: RegOffset = 0x15000;
pub const PP_BCAST: RegOffset = 0x16000;

pub const PP4_MMU: RegOffset = 0x1C000;
pub const PP5_MMU: RegOffset = 0x1D000;
pub const PP6_MMU: RegOffset = 0x1E000;
pub const PP7_MMU: RegOffset = 0x1F000;

pub const PP4: RegOffset = 0x28000;
pub const PP5: RegOffset = 0x2A000;
pub const PP6: RegOffset = 0x2C000;
pub const PP7: RegOffset = 0x2E000;

/// Offsets of the three possible L2 cache blocks, in bank order
pub const L2_RESOURCES: [RegOffset; 3] = [L2_RESOURCE0, L2_RESOURCE1, L2_RESOURCE2];

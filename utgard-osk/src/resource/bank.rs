use heapless::Vec;
use utgard_api::error::{self, Result};
use utgard_api::{PhysAddr, PlatformDevice, ResourceFlags, RegOffset};

use super::{
    GpuVariant, ResourceDescriptor, ResourceInfo, Topology, DEFAULT_RESOURCES, IRQ_RESOURCES, L2_END,
    L2_START, MAX_PLATFORM_RESOURCES, MAX_RESOURCES, PP_BROADCAST_DESCRIPTION, PP_END, PP_START,
};
use crate::logging::{osk_debug, osk_info, osk_warn};
use crate::offsets;

const PP_PAIRING_FAULT: &str = "inconsistent pixel-processor core/MMU pairing";

/// Outcome of the last [`ResourceBank::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Pending,
    Ready(Topology),
    /// Sticky; the table no longer describes the hardware
    Faulted,
}

/// Resource bank of one GPU device
///
/// Built at probe time around the bound platform device, narrowed once by
/// [`initialize`](Self::initialize), then shared by reference with the code
/// that brings up the individual cores.
#[derive(Debug, Clone)]
pub struct ResourceBank<D> {
    device: Option<D>,
    table: [ResourceDescriptor; MAX_RESOURCES],
    probe: Probe,
}

impl<D: PlatformDevice> ResourceBank<D> {
    /// Bank for `device`, starting from the full resource table
    pub fn new(device: D) -> Self {
        Self {
            device: Some(device),
            table: DEFAULT_RESOURCES,
            probe: Probe::Pending,
        }
    }

    /// Bank with no device bound; every lookup misses
    pub fn unbound() -> Self {
        Self {
            device: None,
            table: DEFAULT_RESOURCES,
            probe: Probe::Pending,
        }
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    /// Probe the bound device and prune the table to match it.
    ///
    /// Entries whose interrupt line is missing are disabled, the PP region
    /// must then hold whole core/MMU pairs, and the L2 and Mali-450-only
    /// regions are trimmed to the derived topology. An inconsistent PP
    /// region fails with [`Error::Fault`](utgard_api::Error::Fault) and
    /// leaves every entry disabled; every later call fails the same way.
    ///
    /// Meant to run once. A second call starts from the already pruned
    /// table and may derive a smaller topology.
    pub fn initialize(&mut self) -> Result<()> {
        let Some(device) = self.device.as_ref() else {
            return Err(error::fault("resource bank has no bound platform device"));
        };

        match self.probe {
            Probe::Pending => {}
            Probe::Ready(_) => {
                osk_warn!("resource bank initialized twice, re-deriving from the pruned table");
                self.probe = Probe::Pending;
            }
            Probe::Faulted => {
                osk_warn!("resource bank already failed to initialize");
                return Err(error::fault(PP_PAIRING_FAULT));
            }
        }

        let mut variant = GpuVariant::Mali400;
        for entry in self.table[..IRQ_RESOURCES].iter_mut() {
            let Some(irq_name) = entry.irq_name else {
                continue;
            };
            match device.resource_by_name(ResourceFlags::IRQ, irq_name) {
                Some(res) => {
                    entry.irq = res.irq_number();
                    if PP_BROADCAST_DESCRIPTION.starts_with(entry.description) {
                        variant = GpuVariant::Mali450;
                    }
                }
                None => {
                    osk_debug!("{}: no \"{}\" interrupt, resource disabled", entry.description, irq_name);
                    entry.disable();
                }
            }
        }

        let pp_entries = self.table[PP_START..=PP_END]
            .iter()
            .filter(|entry| entry.is_enabled())
            .count();
        if pp_entries % 2 != 0 {
            osk_debug!("odd number of pixel-processor resources: {}", pp_entries);
            self.table.iter_mut().for_each(ResourceDescriptor::disable);
            self.probe = Probe::Faulted;
            return Err(error::fault(PP_PAIRING_FAULT));
        }

        let pp_cores = pp_entries / 2;
        let l2_caches = Topology::l2_caches_for(variant, pp_cores);

        for entry in self.table[L2_START + l2_caches..=L2_END].iter_mut().rev() {
            entry.disable();
        }

        if variant == GpuVariant::Mali400 {
            self.table[L2_END + 1..].iter_mut().for_each(ResourceDescriptor::disable);
        }

        let topology = Topology {
            variant,
            pp_cores,
            l2_caches,
        };
        osk_info!(
            "{:?}: {} PP cores, {} L2 caches",
            topology.variant,
            topology.pp_cores,
            topology.l2_caches
        );
        self.probe = Probe::Ready(topology);

        Ok(())
    }

    /// Look up the enabled resource at `offset`.
    ///
    /// The returned base is absolute, i.e. `offset + base_address()`.
    pub fn find(&self, offset: RegOffset) -> Option<ResourceInfo> {
        self.device.as_ref()?;

        let entry = self.table.iter().find(|entry| entry.offset() == Some(offset))?;
        Some(ResourceInfo {
            base: self.base_address() + offset as PhysAddr,
            description: entry.description,
            irq: entry.irq,
        })
    }

    /// Start of the controller's first register window, or 0 if unknown
    pub fn base_address(&self) -> PhysAddr {
        self.device
            .as_ref()
            .and_then(|device| device.resource(ResourceFlags::MEM, 0))
            .map_or(0, |res| res.start)
    }

    /// Number of L2 cache blocks that resolve through [`find`](Self::find)
    pub fn l2_resource_count(&self) -> u32 {
        let count = offsets::L2_RESOURCES
            .iter()
            .filter(|&&offset| self.find(offset).is_some())
            .count() as u32;

        debug_assert!(!matches!(self.probe, Probe::Ready(_)) || count > 0);

        count
    }

    /// Whether two interrupt resources of the device share a line.
    ///
    /// # Panics
    ///
    /// If the device describes more than [`MAX_PLATFORM_RESOURCES`]
    /// resources. Fixed GPU hardware never does.
    pub fn shared_interrupts(&self) -> bool {
        let Some(device) = self.device.as_ref() else {
            return false;
        };

        let resources = device.resources();
        assert!(
            resources.len() <= MAX_PLATFORM_RESOURCES,
            "{} platform resources, at most {} supported",
            resources.len(),
            MAX_PLATFORM_RESOURCES
        );

        let mut seen: Vec<PhysAddr, MAX_PLATFORM_RESOURCES> = Vec::new();
        for res in resources.iter().filter(|res| res.flags.contains(ResourceFlags::IRQ)) {
            if seen.contains(&res.start) {
                return true;
            }
            // Cannot overflow, capacity is checked above.
            let _ = seen.push(res.start);
        }

        false
    }

    /// Topology derived by the last successful [`initialize`](Self::initialize)
    pub fn topology(&self) -> Option<Topology> {
        match self.probe {
            Probe::Ready(topology) => Some(topology),
            Probe::Pending | Probe::Faulted => None,
        }
    }

    pub fn variant(&self) -> Option<GpuVariant> {
        self.topology().map(|topology| topology.variant)
    }

    pub fn pp_core_count(&self) -> Option<usize> {
        self.topology().map(|topology| topology.pp_cores)
    }

    /// All table entries in bank order, enabled or not
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> + '_ {
        self.table.iter()
    }
}

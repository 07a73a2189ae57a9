//! Resource bank tests

use mockall::mock;
use proptest::prelude::*;

use utgard_api::{ErrorCode, PhysAddr, PlatformResource, PropertyBag, PropertyMap, StaticPlatform};
use utgard_osk::resource::{DEFAULT_RESOURCES, IRQ_RESOURCES, L2_END, L2_START, PP_END, PP_START};
use utgard_osk::{
    offsets, DeviceData, GpuVariant, PmuDomainConfig, ResourceBank, Topology, DEVICE_DATA_SIZE, MAX_PLATFORM_RESOURCES,
    MAX_PMU_DOMAINS,
};

mock! {
    pub Node {}

    impl PropertyBag for Node {
        fn read_u32(&self, name: &str) -> Option<u32>;
        fn count_u32(&self, name: &str) -> Option<usize>;
        fn read_u32_index(&self, name: &str, index: usize) -> Option<u32>;
    }
}

const GPU_BASE: PhysAddr = 0x1300_0000;
const BROADCAST_INDEX: usize = 18;

/// Platform resources for the interrupt-bearing entries selected by `mask`,
/// each on its own line starting at `first_irq`
fn resources_for(mask: u32, first_irq: u32) -> Vec<PlatformResource> {
    let mut resources = vec![PlatformResource::mem(None, GPU_BASE, 0x3_0000)];
    for (index, entry) in DEFAULT_RESOURCES[..IRQ_RESOURCES].iter().enumerate() {
        if mask & (1 << index) != 0 {
            let name = entry.irq_name.unwrap();
            resources.push(PlatformResource::irq(name, first_irq + index as u32));
        }
    }
    resources
}

/// Mask selecting GP, GP MMU, the first `pp_cores` PP pairs and optionally
/// the PP broadcast unit
fn gpu_mask(pp_cores: usize, broadcast: bool) -> u32 {
    let mut mask = 0b11;
    for core in 0..pp_cores {
        mask |= 0b11 << (PP_START + 2 * core);
    }
    if broadcast {
        mask |= 1 << BROADCAST_INDEX;
    }
    mask
}

fn enabled_set<D: utgard_api::PlatformDevice>(bank: &ResourceBank<D>) -> Vec<bool> {
    bank.resources().map(|entry| entry.is_enabled()).collect()
}

#[test]
fn test_mali450_mp6_topology() {
    let resources = resources_for(gpu_mask(6, true), 64);
    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.initialize().is_ok());

    assert_eq!(
        bank.topology(),
        Some(Topology {
            variant: GpuVariant::Mali450,
            pp_cores: 6,
            l2_caches: 3,
        })
    );
    assert_eq!(bank.l2_resource_count(), 3);

    for offset in [offsets::BCAST, offsets::DLBU, offsets::DMA, offsets::PP_BCAST_MMU] {
        assert!(bank.find(offset).is_some(), "offset {:#x}", offset);
    }
    let bcast = bank.find(offsets::PP_BCAST).unwrap();
    assert_eq!(bcast.description, "Mali_PP_Broadcast");
    assert_eq!(bcast.irq, Some(64 + BROADCAST_INDEX as u32));
}

#[test]
fn test_mali450_mp2_has_two_l2_caches() {
    let resources = resources_for(gpu_mask(2, true), 64);
    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.initialize().is_ok());

    assert_eq!(bank.l2_resource_count(), 2);
    assert!(bank.find(offsets::L2_RESOURCE0).is_some());
    assert!(bank.find(offsets::L2_RESOURCE1).is_some());
    assert!(bank.find(offsets::L2_RESOURCE2).is_none());
}

#[test]
fn test_mali400_prunes_broadcast_blocks() {
    let resources = resources_for(gpu_mask(4, false), 64);
    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.initialize().is_ok());

    assert_eq!(bank.variant(), Some(GpuVariant::Mali400));
    assert_eq!(bank.l2_resource_count(), 1);
    for offset in [offsets::BCAST, offsets::DLBU, offsets::DMA, offsets::PP_BCAST_MMU] {
        assert!(bank.find(offset).is_none(), "offset {:#x}", offset);
    }
}

#[test]
fn test_misspelled_mmu_interrupt_names() {
    // PP5 and PP7 MMUs resolve only under their device-tree spellings.
    let mut resources = resources_for(gpu_mask(8, true), 64);
    resources.retain(|res| res.name != Some("ppmmu05") && res.name != Some("ppmmu"));
    resources.push(PlatformResource::irq("ppmmu5", 200));
    resources.push(PlatformResource::irq("ppmmu7", 201));

    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.initialize().is_ok());
    // 16 PP entries minus the two unresolved MMUs still pair up evenly
    assert_eq!(bank.pp_core_count(), Some(7));
    assert!(bank.find(offsets::PP5_MMU).is_none());
    assert!(bank.find(offsets::PP7_MMU).is_none());
}

#[test]
fn test_second_initialize_is_narrowing() {
    let resources = resources_for(gpu_mask(6, true), 64);
    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.initialize().is_ok());
    let first = enabled_set(&bank);

    assert!(bank.initialize().is_ok());
    let second = enabled_set(&bank);
    for (before, after) in first.iter().zip(&second) {
        assert!(*before || !*after);
    }
    assert_eq!(bank.pp_core_count(), Some(6));
}

#[test]
fn test_initialize_after_fault_keeps_failing() {
    // Three PP entries plus the broadcast unit
    let mut resources = resources_for(gpu_mask(1, true), 64);
    resources.push(PlatformResource::irq("pp1", 100));
    let mut bank = ResourceBank::new(StaticPlatform::new(&resources));

    for _ in 0..3 {
        assert_eq!(bank.initialize().unwrap_err().code(), ErrorCode::Fault);
        assert_eq!(bank.topology(), None);
        assert_eq!(bank.l2_resource_count(), 0);
        assert!(bank.resources().all(|entry| !entry.is_enabled()));
    }
}

#[test]
fn test_shared_interrupts() {
    let distinct = resources_for(gpu_mask(4, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&distinct));
    assert!(!bank.shared_interrupts());

    let mut shared = distinct.clone();
    shared.push(PlatformResource::irq("pmu", 66));
    let bank = ResourceBank::new(StaticPlatform::new(&shared));
    assert!(bank.shared_interrupts());

    // Memory windows never count as interrupt lines
    let memory_only = [
        PlatformResource::mem(None, 0x40, 0x1000),
        PlatformResource::mem(None, 0x40, 0x1000),
    ];
    let bank = ResourceBank::new(StaticPlatform::new(&memory_only));
    assert!(!bank.shared_interrupts());
}

#[test]
fn test_shared_interrupts_at_capacity() {
    let resources: Vec<_> = (0..MAX_PLATFORM_RESOURCES as u32)
        .map(|irq| PlatformResource::irq("gp", irq))
        .collect();
    let bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(!bank.shared_interrupts());
}

#[test]
#[should_panic]
fn test_shared_interrupts_over_capacity() {
    let resources: Vec<_> = (0..=MAX_PLATFORM_RESOURCES as u32)
        .map(|irq| PlatformResource::irq("gp", irq))
        .collect();
    let bank = ResourceBank::new(StaticPlatform::new(&resources));
    bank.shared_interrupts();
}

#[test]
fn test_pmu_domain_config_applied() {
    let mut node = MockNode::new();
    node.expect_count_u32()
        .times(1)
        .returning(|name| (name == "pmu_domain_config").then_some(3));
    node.expect_read_u32_index()
        .times(3)
        .returning(|_, index| Some([0x1, 0x2, 0x1_0004][index]));

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));

    let mut domains = [0u16; 3];
    assert_eq!(bank.pmu_domain_config(&mut domains), PmuDomainConfig::Applied);
    assert_eq!(domains, [0x1, 0x2, 0x4]);
}

#[test]
fn test_pmu_domain_config_full_domain_set() {
    let cells: Vec<u32> = (0..MAX_PMU_DOMAINS as u32).map(|domain| 1 << domain).collect();
    let mut node = PropertyMap::new();
    node.insert_u32_array("pmu_domain_config", &cells);

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));

    let mut domains = [0u16; MAX_PMU_DOMAINS];
    assert_eq!(bank.pmu_domain_config(&mut domains), PmuDomainConfig::Applied);
    assert_eq!(domains[0], 0x1);
    assert_eq!(domains[MAX_PMU_DOMAINS - 1], 0x800);
}

#[test]
fn test_pmu_domain_config_more_domains_than_tracked() {
    let cells: Vec<u32> = (0..=MAX_PMU_DOMAINS as u32).map(|domain| 0x1_0000 | domain).collect();
    let mut node = PropertyMap::new();
    node.insert_u32_array("pmu_domain_config", &cells);

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));

    let mut domains = [0u16; MAX_PMU_DOMAINS + 1];
    assert_eq!(bank.pmu_domain_config(&mut domains), PmuDomainConfig::Applied);
    for (domain, value) in domains.iter().enumerate() {
        assert_eq!(*value as usize, domain);
    }

    // A shorter caller slice is still a mismatch
    let mut short = [0u16; MAX_PMU_DOMAINS];
    assert_eq!(
        bank.pmu_domain_config(&mut short),
        PmuDomainConfig::SizeMismatch {
            expected: MAX_PMU_DOMAINS,
            found: MAX_PMU_DOMAINS + 1,
        }
    );
    assert_eq!(short, [0; MAX_PMU_DOMAINS]);
}

#[test]
fn test_pmu_domain_config_size_mismatch() {
    let mut node = MockNode::new();
    node.expect_count_u32().times(1).returning(|_| Some(5));
    node.expect_read_u32_index().never();

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));

    let mut domains = [0xaaaa_u16; 3];
    assert_eq!(
        bank.pmu_domain_config(&mut domains),
        PmuDomainConfig::SizeMismatch { expected: 3, found: 5 }
    );
    assert_eq!(domains, [0xaaaa; 3]);
}

#[test]
fn test_pmu_domain_config_absent() {
    let resources = resources_for(gpu_mask(2, false), 64);
    let mut domains = [0x5555_u16; 2];

    let bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert_eq!(bank.pmu_domain_config(&mut domains), PmuDomainConfig::Absent);

    let mut node = MockNode::new();
    node.expect_count_u32().returning(|_| None);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));
    assert_eq!(bank.pmu_domain_config(&mut domains), PmuDomainConfig::Absent);
    assert_eq!(domains, [0x5555; 2]);
}

#[test]
fn test_pmu_switch_delay() {
    let resources = resources_for(gpu_mask(2, false), 64);

    let mut node = MockNode::new();
    node.expect_read_u32()
        .times(1)
        .returning(|name| (name == "pmu_switch_delay").then_some(0xff));
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));
    assert_eq!(bank.pmu_switch_delay(), 0xff);

    let mut node = MockNode::new();
    node.expect_read_u32().returning(|_| None);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_node(&node));
    assert_eq!(bank.pmu_switch_delay(), 0);

    let bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert_eq!(bank.pmu_switch_delay(), 0);
}

#[test]
fn test_device_data_not_found() {
    let unbound: ResourceBank<StaticPlatform<'static>> = ResourceBank::unbound();
    assert_eq!(unbound.device_data().unwrap_err().code(), ErrorCode::ItemNotFound);

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources));
    assert!(bank.device_data().unwrap_err().is_not_found());
}

#[test]
fn test_device_data_wrong_layout() {
    let resources = resources_for(gpu_mask(2, false), 64);
    let blob = [0u8; DEVICE_DATA_SIZE / 2];
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_platform_data(&blob));
    assert_eq!(bank.device_data().unwrap_err().code(), ErrorCode::InvalidArgs);
}

#[test]
fn test_device_data_fields() {
    let data = DeviceData {
        dedicated_mem_start: 0x4000_0000,
        dedicated_mem_size: 0x0800_0000,
        shared_mem_size: 0x2000_0000,
        fb_start: 0x5000_0000,
        fb_size: 0x0080_0000,
        max_job_runtime: 60,
        control_interval: 100,
    };
    let blob = data.to_bytes();

    let resources = resources_for(gpu_mask(2, false), 64);
    let bank = ResourceBank::new(StaticPlatform::new(&resources).with_platform_data(&blob));
    assert_eq!(bank.device_data(), Ok(data));
}

proptest! {
    #[test]
    fn prop_initialize_matches_topology_rules(mask in 0u32..(1 << IRQ_RESOURCES), base_page in 0usize..0x1_0000) {
        let base = base_page << 16;
        let mut resources = resources_for(mask, 32);
        resources[0] = PlatformResource::mem(None, base, 0x3_0000);

        let mut bank = ResourceBank::new(StaticPlatform::new(&resources));
        let before = enabled_set(&bank);
        let result = bank.initialize();
        let after = enabled_set(&bank);

        // Pruning never re-enables an entry
        for (was, is) in before.iter().zip(&after) {
            prop_assert!(*was || !*is);
        }

        let pp_entries = (PP_START..=PP_END).filter(|i| mask & (1 << i) != 0).count();
        if pp_entries % 2 != 0 {
            prop_assert_eq!(result.unwrap_err().code(), ErrorCode::Fault);
            for entry in DEFAULT_RESOURCES.iter() {
                prop_assert!(bank.find(entry.offset().unwrap()).is_none());
            }
            return Ok(());
        }
        prop_assert!(result.is_ok());

        let variant = if mask & (1 << BROADCAST_INDEX) != 0 { GpuVariant::Mali450 } else { GpuVariant::Mali400 };
        let pp_cores = pp_entries / 2;
        let l2_caches = Topology::l2_caches_for(variant, pp_cores);
        prop_assert_eq!(bank.variant(), Some(variant));
        prop_assert_eq!(bank.pp_core_count(), Some(pp_cores));
        prop_assert_eq!(bank.l2_resource_count() as usize, l2_caches);
        prop_assert!(bank.l2_resource_count() >= 1);

        for (index, entry) in DEFAULT_RESOURCES.iter().enumerate() {
            let expected = match index {
                i if i < IRQ_RESOURCES => mask & (1 << i) != 0,
                i if i <= L2_END => i < L2_START + l2_caches,
                _ => variant == GpuVariant::Mali450,
            };
            prop_assert_eq!(after[index], expected, "entry {}", index);

            let offset = entry.offset().unwrap();
            match bank.find(offset) {
                Some(info) => {
                    prop_assert!(expected);
                    prop_assert_eq!(info.base, offset as PhysAddr + bank.base_address());
                    prop_assert_eq!(info.base, offset as PhysAddr + base);
                }
                None => prop_assert!(!expected),
            }
        }
    }

    #[test]
    fn prop_shared_interrupts_detects_duplicates(irqs in proptest::collection::vec(0u32..64, 0..32)) {
        let resources: Vec<_> = irqs.iter().map(|&irq| PlatformResource::irq("gp", irq)).collect();
        let bank = ResourceBank::new(StaticPlatform::new(&resources));

        let mut sorted = irqs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(bank.shared_interrupts(), sorted.len() != irqs.len());
    }

    #[test]
    fn prop_device_data_is_verbatim_copy(blob in proptest::collection::vec(any::<u8>(), DEVICE_DATA_SIZE)) {
        let resources = resources_for(gpu_mask(1, false), 32);
        let bank = ResourceBank::new(StaticPlatform::new(&resources).with_platform_data(&blob));

        let data = bank.device_data().unwrap();
        prop_assert_eq!(&data.to_bytes()[..], &blob[..]);
    }
}

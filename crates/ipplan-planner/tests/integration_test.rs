use ipplan_cidr::{find_overlaps, find_overlaps_between, NetworkBlock};
use ipplan_core::{mask_to_prefix, prefix_to_mask, Address, IpplanError};
use ipplan_planner::{
    allocate_vlsm, plan_uniform, PlanMode, PlannerConfig, SubnetRequirement, VlsmAllocator,
};

fn block(text: &str) -> NetworkBlock {
    NetworkBlock::parse(text).expect("valid CIDR")
}

#[test]
fn test_uniform_plans_never_overlap() {
    let bases = ["10.0.0.0/16", "192.168.0.0/24", "172.16.0.0/12", "203.0.113.0/26"];
    for base in bases {
        let base = block(base);
        for count in [1u64, 2, 3, 7, 16] {
            let Ok(plan) = plan_uniform(&base, PlanMode::SubnetCount(count)) else {
                continue;
            };
            assert!(
                find_overlaps(&plan.subnets).is_empty(),
                "{} split {} ways overlapped",
                base,
                count
            );
            let used = plan.subnet_count() as u64 * plan.addresses_per_subnet();
            assert!(used <= base.size());
            assert!(plan.subnets.len() as u64 >= count);
        }
    }
}

#[test]
fn test_uniform_by_hosts_meets_requirement() {
    let base = block("10.20.0.0/20");
    for hosts in [1u64, 2, 14, 30, 62, 100, 500, 4094] {
        let plan = plan_uniform(&base, PlanMode::HostsPerSubnet(hosts)).expect("fits");
        assert!(plan.usable_hosts_per_subnet() >= hosts);
        // One bit fewer would not have been enough.
        assert!(plan.addresses_per_subnet() / 2 < hosts + 2);
        assert!(find_overlaps(&plan.subnets).is_empty());
    }
}

#[test]
fn test_vlsm_plans_never_overlap() {
    let base = block("10.0.0.0/22");
    let requirements =
        SubnetRequirement::parse_list("eng:200,sales:90,ops:50,wan1:2,wan2:2,lab:25").unwrap();
    let plan = allocate_vlsm(&base, &requirements).unwrap();

    assert_eq!(plan.allocations.len(), requirements.len());
    assert!(find_overlaps(&plan.allocations).is_empty());
    for subnet in &plan.allocations {
        assert!(base.contains_block(&subnet.network));
    }
}

#[test]
fn test_vlsm_keeps_mapping_to_input() {
    let requirements = SubnetRequirement::parse_list("c:2,a:60,b:10").unwrap();
    let plan = allocate_vlsm(&block("192.168.1.0/24"), &requirements).unwrap();

    for subnet in plan.in_input_order() {
        let index = subnet.origin.index();
        assert_eq!(subnet.origin.label(), requirements[index].name);
        assert!(subnet.usable_hosts >= requirements[index].hosts_needed);
    }
}

#[test]
fn test_plan_checked_against_inventory() {
    let inventory = [block("10.0.0.0/24"), block("10.0.2.0/24")];
    let plan = plan_uniform(&block("10.0.0.0/22"), PlanMode::SubnetCount(4)).unwrap();

    let conflicts = find_overlaps_between(&plan.subnets, &inventory);
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts.overlaps[0].first, block("10.0.0.0/24"));
    assert_eq!(conflicts.overlaps[1].first, block("10.0.2.0/24"));
}

#[test]
fn test_mask_round_trip_for_planned_prefixes() {
    let plan = plan_uniform(&block("10.0.0.0/8"), PlanMode::HostsPerSubnet(1000)).unwrap();
    let prefix = plan.new_prefix;
    let mask = prefix_to_mask(u32::from(prefix.get())).unwrap();
    assert_eq!(mask.to_string(), "255.255.252.0");
    assert_eq!(mask_to_prefix(mask).unwrap(), prefix);
}

#[test]
fn test_strict_and_lenient_agree_when_everything_fits() {
    let base = block("192.168.10.0/24");
    let requirements = SubnetRequirement::parse_list("A:60,B:10,C:2").unwrap();

    let lenient = VlsmAllocator::new().allocate(&base, &requirements).unwrap();
    let strict = VlsmAllocator::with_config(PlannerConfig::strict())
        .allocate(&base, &requirements)
        .unwrap();
    assert_eq!(lenient, strict);
}

#[test]
fn test_errors_are_typed() {
    assert!(matches!(
        NetworkBlock::parse("10.0.0.300/24"),
        Err(IpplanError::OctetOutOfRange(_))
    ));
    assert!(matches!(
        Address::parse("10.0.0"),
        Err(IpplanError::InvalidFormat(_))
    ));
    assert!(matches!(
        PlanMode::from_options(Some(2), Some(2)),
        Err(IpplanError::MutuallyExclusiveModeViolation(_))
    ));
}

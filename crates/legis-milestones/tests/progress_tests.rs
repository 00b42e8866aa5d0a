use legis_milestones::prelude::*;
use legis_milestones::{
    assign_tracks, build_reached_set, furthest_stage_index, is_stage_reached, normalize_status,
    stage_index, StageKind, TrackAssignment,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CODES: &[&str] = &[
    "INTRODUCED",
    "IN_ASSEMBLY_COMM",
    "IN_SENATE_COMM",
    "ASSEMBLY_FLOOR",
    "SENATE_FLOOR",
    "PASSED_ASSEMBLY",
    "PASSED_SENATE",
    "DELIVERED_TO_GOV",
    "SIGNED_BY_GOV",
    "VETOED",
    "STRICKEN",
    "SUBSTITUTED",
    "RECOMMITTED",
];

fn events_strategy() -> impl Strategy<Value = Vec<MilestoneEvent>> {
    proptest::collection::vec(
        proptest::sample::select(CODES).prop_map(MilestoneEvent::new),
        0..12,
    )
}

fn milestones_strategy() -> impl Strategy<Value = Vec<Milestone>> {
    proptest::collection::vec(proptest::sample::select(Milestone::ALL.to_vec()), 0..8)
}

proptest! {
    #[test]
    fn prop_introduced_iff_history_non_empty(events in events_strategy()) {
        let set = build_reached_set(&events);
        prop_assert_eq!(set.contains(Milestone::Introduced), !events.is_empty());
        if events.is_empty() {
            prop_assert!(set.is_empty());
        }
    }

    #[test]
    fn prop_furthest_is_monotonic(
        assembly in milestones_strategy(),
        senate in milestones_strategy(),
        extra_assembly in milestones_strategy(),
        extra_senate in milestones_strategy(),
    ) {
        let a: ReachedSet = assembly.iter().copied().collect();
        let s: ReachedSet = senate.iter().copied().collect();
        let before = furthest_stage_index(&a, &s);

        let a2: ReachedSet = assembly.iter().chain(&extra_assembly).copied().collect();
        let s2: ReachedSet = senate.iter().chain(&extra_senate).copied().collect();
        let after = furthest_stage_index(&a2, &s2);

        prop_assert!(after >= before);
    }

    #[test]
    fn prop_dual_stage_reached_by_one_side(
        idx in 1usize..4,
        assembly_side in any::<bool>(),
    ) {
        let stage = &STAGES[idx];
        let StageKind::Dual { assembly, senate } = stage.kind else {
            panic!("stage {idx} should be dual");
        };
        let (a, s): (ReachedSet, ReachedSet) = if assembly_side {
            ([assembly].into_iter().collect(), ReachedSet::new())
        } else {
            (ReachedSet::new(), [senate].into_iter().collect())
        };
        prop_assert!(is_stage_reached(stage, &a, &s));
    }

    #[test]
    fn prop_exactly_one_current_node(
        events in events_strategy(),
        companion in events_strategy(),
        chamber in prop_oneof![
            Just(Chamber::Assembly),
            Just(Chamber::Senate),
            Just(Chamber::Unknown),
        ],
    ) {
        let progress =
            BillProgress::derive(&events, &companion, chamber, &MilestoneConfig::default());
        let current = progress.nodes.iter().filter(|n| n.state == NodeState::Current).count();
        prop_assert_eq!(current, 1);
        prop_assert_eq!(progress.connectors.len(), STAGES.len() - 1);
    }
}

#[test]
fn disjoint_introduced_only_sets_resolve_to_zero() {
    let assembly: ReachedSet = [Milestone::Introduced].into_iter().collect();
    let senate: ReachedSet = [Milestone::Introduced].into_iter().collect();
    assert_eq!(furthest_stage_index(&assembly, &senate), 0);
}

#[test]
fn assembly_committee_scenario() {
    let originating = vec![MilestoneEvent::new("IN_ASSEMBLY_COMM")];
    let tracks = assign_tracks(
        build_reached_set(&originating),
        build_reached_set(&[]),
        Chamber::Assembly,
    );

    let expected: ReachedSet = [Milestone::Introduced, Milestone::InAssemblyComm]
        .into_iter()
        .collect();
    assert_eq!(tracks.assembly, expected);
    assert!(tracks.senate.is_empty());

    let furthest = furthest_stage_index(&tracks.assembly, &tracks.senate);
    assert_eq!(furthest, stage_index("committee").unwrap());

    let progress = BillProgress::from_tracks(&tracks);
    let committee = progress.node("committee").unwrap();
    let halves = committee.halves.unwrap();
    assert!(halves.assembly_lit);
    assert!(!halves.senate_lit);
    assert_eq!(committee.state, NodeState::Current);
    assert_eq!(progress.assignment, TrackAssignment::OriginatingAssembly);
}

#[test]
fn veto_normalizes_with_delivered_to_governor() {
    assert_eq!(normalize_status("VETOED"), normalize_status("DELIVERED_TO_GOV"));

    let originating = vec![
        MilestoneEvent::new("PASSED_ASSEMBLY"),
        MilestoneEvent::new("PASSED_SENATE"),
        MilestoneEvent::new("VETOED"),
    ];
    let progress = BillProgress::derive(
        &originating,
        &[],
        Chamber::Assembly,
        &MilestoneConfig::default(),
    );
    assert_eq!(progress.current().id, "governor");
    assert!(!progress.node("law").unwrap().reached);
}

#[test]
fn companion_history_lights_other_chamber() {
    let originating = vec![
        MilestoneEvent::new("IN_SENATE_COMM"),
        MilestoneEvent::new("SENATE_FLOOR"),
        MilestoneEvent::new("PASSED_SENATE"),
    ];
    let companion = vec![MilestoneEvent::new("IN_ASSEMBLY_COMM")];
    let progress = BillProgress::derive(
        &originating,
        &companion,
        Chamber::Senate,
        &MilestoneConfig::default(),
    );

    let committee = progress.node("committee").unwrap().halves.unwrap();
    assert!(committee.assembly_lit && committee.senate_lit);

    let passed = progress.node("passed").unwrap().halves.unwrap();
    assert!(!passed.assembly_lit);
    assert!(passed.senate_lit);
    assert_eq!(progress.current().id, "passed");
}

#[test]
fn unknown_chamber_falls_back_to_companion() {
    let originating = vec![MilestoneEvent::new("PASSED_SENATE")];
    let progress =
        BillProgress::derive(&originating, &[], Chamber::Unknown, &MilestoneConfig::default());
    assert_eq!(progress.assignment, TrackAssignment::Unassigned);
    assert_eq!(progress.furthest, 0);
    assert!(!progress.nodes[0].reached);
}

#[test]
fn progress_serializes_for_renderers() {
    let progress = BillProgress::derive(
        &[MilestoneEvent::new("IN_ASSEMBLY_COMM")],
        &[],
        Chamber::Assembly,
        &MilestoneConfig::default(),
    );
    let json = serde_json::to_value(&progress).unwrap();
    assert_eq!(json["nodes"][1]["id"], "committee");
    assert_eq!(json["nodes"][1]["state"], "current");
    assert_eq!(json["nodes"][1]["halves"]["assembly_lit"], true);
    assert_eq!(json["assignment"], "originating_assembly");
}

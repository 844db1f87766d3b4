use seedcast::{
    ResolutionRecord, SeededRng, Template, pick_weighted_index, shuffled, to_cumulative_weights,
};

#[test]
fn test_determinism_identical_seeds_produce_identical_results_everywhere() {
    let seed = 12_345_u64;

    let cumulative =
        to_cumulative_weights(&[1.0, 2.0, 3.0, 4.0, 5.0]).expect("weights are valid");
    assert_eq!(
        pick_weighted_index(&cumulative, Some(seed.into())).expect("non-empty"),
        pick_weighted_index(&cumulative, Some(seed.into())).expect("non-empty"),
    );

    let items: Vec<u32> = (0..40).collect();
    assert_eq!(shuffled(&items, Some(seed.into())), shuffled(&items, Some(seed.into())));

    let template =
        Template::parse("[stone|iron|gold] [dagger|sword|axe] of [ice|fire|[storm|void]s]")
            .expect("template is valid");
    assert_eq!(template.pick(Some(seed.into())), template.pick(Some(seed.into())));
}

#[test]
fn test_determinism_different_seeds_diverge() {
    let items: Vec<u32> = (0..40).collect();
    assert_ne!(shuffled(&items, Some(123_u64.into())), shuffled(&items, Some(456_u64.into())));

    let template = Template::parse("[0|1|2|3][0|1|2|3][0|1|2|3][0|1|2|3][0|1|2|3][0|1|2|3]")
        .expect("template is valid");
    let picks: Vec<String> = (0..16_u64).map(|seed| template.pick(Some(seed.into()))).collect();
    let mut distinct = picks.clone();
    distinct.sort();
    distinct.dedup();
    assert!(distinct.len() > 1, "every seed produced the same resolution: {picks:?}");
}

#[test]
fn test_retained_generator_sequences_are_reproducible_but_not_reused() {
    let template = Template::parse("[a|b|c|d|e|f|g|h]").expect("template is valid");
    let items: Vec<u32> = (0..20).collect();

    let run = |base_seed: u64| -> (Vec<String>, Vec<u32>) {
        let mut rng = SeededRng::new(Some(base_seed.into()));
        let picks = (0..6).map(|_| template.pick(Some((&mut rng).into()))).collect();
        let order = shuffled(&items, Some((&mut rng).into()));
        (picks, order)
    };

    let (left_picks, left_order) = run(777);
    let (right_picks, right_order) = run(777);
    assert_eq!(left_picks, right_picks, "same base seed must replay the whole sequence");
    assert_eq!(left_order, right_order);

    // Each spawn consumed the retained generator, so the calls within one
    // run are decorrelated rather than accidentally identical.
    let mut distinct = left_picks.clone();
    distinct.sort();
    distinct.dedup();
    assert!(distinct.len() > 1, "successive spawns reused the seed: {left_picks:?}");
}

#[test]
fn test_records_reproduce_resolutions_end_to_end() {
    let template = Template::parse("token1 [A[1[a|b]|2[c|d]]|B] token2 [C|D[1|2]]")
        .expect("template is valid");

    for seed in [1_236_u64, 12_345, 99_999] {
        let record = ResolutionRecord::capture(&template, Some(seed));
        assert_eq!(record.replay(&template).expect("record replays"), record.resolved);
        assert_eq!(template.pick(Some(seed.into())), record.resolved);
    }
}

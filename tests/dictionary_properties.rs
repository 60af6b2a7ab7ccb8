use featweights::{
    DictionaryError, DisplacementHash, FeatureDictionary, UNKNOWN_FEATURE, WeightCodec,
};

#[test]
fn distinct_names_receive_distinct_sequential_ids() {
    let mut dict = FeatureDictionary::new();
    let names: Vec<String> = (0..100).map(|i| format!("feature_{i}")).collect();
    let ids: Vec<_> = names.iter().map(|name| dict.convert(name)).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    for (name, &id) in names.iter().zip(&ids) {
        assert_eq!(dict.name(id), name.as_str());
    }
}

#[test]
fn freezing_stops_growth_for_every_later_lookup() {
    let mut dict = FeatureDictionary::new();
    dict.convert("seen");
    dict.freeze();
    let before = dict.num_feats();
    for _ in 0..5 {
        assert_eq!(dict.convert("unseen"), UNKNOWN_FEATURE);
    }
    assert_eq!(dict.num_feats(), before);
    assert_eq!(dict.convert("seen"), 1);
}

#[test]
fn enabling_hash_after_loading_text_weights_is_refused() {
    let mut dict = FeatureDictionary::new();
    WeightCodec::default()
        .read_from("foo 1\n".as_bytes(), &mut dict, None)
        .unwrap();
    let hash = DisplacementHash::from_parts(0, vec![(0, 0)], 4).unwrap();
    let err = dict.enable_hash(hash).unwrap_err();
    assert!(matches!(
        err,
        DictionaryError::HashOnNonEmptyDictionary { assigned: 1 }
    ));
}

#[test]
fn composite_paths_render_space_separated() {
    let mut dict = FeatureDictionary::new();
    let path = [dict.convert("S"), dict.convert("NP"), dict.convert("VP")];
    assert_eq!(dict.render(&path), "S NP VP");
}

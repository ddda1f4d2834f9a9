use inventory_tags::apriltag::builtins::{builtin_family, BUILTIN_FAMILY_NAMES};
use inventory_tags::apriltag::TagLayout;
use inventory_tags::{FamilySpec, IdSplitter, TagFamily, TagPairGenerator, TagPairParams};

#[test]
fn builtin_41h12_is_available() {
    assert!(BUILTIN_FAMILY_NAMES.contains(&"tagStandard41h12"));
    let fam = builtin_family("tagStandard41h12").expect("builtin");
    assert_eq!(fam.spec(), FamilySpec::TAG_STANDARD_41H12);
}

#[test]
fn default_splitter_round_trips_through_the_facade() {
    let splitter = IdSplitter::default();
    let split = splitter.split(2).expect("split");
    assert_eq!((split.index_a, split.index_b), (0, 2));
    assert_eq!(splitter.join(split.index_a, split.index_b), Ok(2));
}

#[test]
fn family_b_table_from_disk_drives_the_generator() {
    let _ = inventory_tags::core::init_with_level(log::LevelFilter::Warn);

    let spec = FamilySpec::TAG_STANDARD_52H13;
    let layout = TagLayout::standard(10).expect("layout");
    let codes: Vec<u64> = (0..u64::from(spec.count))
        .map(|i| (i * 0x5851_F42D) & ((1 << 52) - 1))
        .collect();
    let fam = TagFamily::new(spec.name, 13, layout, codes).expect("family");

    let dir = tempfile::tempdir().expect("tempdir");
    let table = dir.path().join("tagStandard52h13.json");
    fam.write_json(&table).expect("write table");

    let gen = TagPairGenerator::from_family_b_table(&table).expect("generator");
    let params = TagPairParams {
        scale: 3.0,
        ..TagPairParams::default()
    };
    let art = gen.generate(1_000_000, &params).expect("generate");

    let doc = roxmltree::Document::parse(&art.svg).expect("svg");
    let text = doc
        .descendants()
        .find(|n| n.has_tag_name("text"))
        .and_then(|n| n.text());
    assert_eq!(text, Some("1000000"));
    assert_eq!(serde_json::to_value(art.split).expect("json")["index_a"], 20);
}

//! Fluent search: condition stacking, refinement, and multi-box ordering.

mod fixtures;

use beadbox::{search_boxes, BeadBox};

use fixtures::box_rig::{freeze, kind, name, write_bead, BoxRig};

fn seeded_box(rig: &BoxRig, box_name: &str, beads: &[(&str, &str, &str, &str)]) -> BeadBox {
    let staging = rig.staging_dir();
    let bead_box = rig.open_box(box_name);
    for (bead_name, content_id, bead_kind, freeze_time) in beads {
        let source = write_bead(&staging, bead_name, content_id, bead_kind, freeze_time);
        bead_box.store(&source).expect("store bead");
        std::fs::remove_file(&source).expect("clear staging");
    }
    bead_box
}

#[test]
fn conditions_stack_as_a_conjunction() {
    let rig = BoxRig::new();
    let bead_box = seeded_box(
        &rig,
        "b1",
        &[
            ("alpha", "c1", "k1", "20200101T000000000000Z"),
            ("alpha", "c2", "k1", "20200601T000000000000Z"),
            ("beta", "c3", "k2", "20200301T000000000000Z"),
        ],
    );

    let hits = bead_box
        .search()
        .by_name(name("alpha"))
        .at_or_newer(freeze("20200201T000000000000Z"))
        .all()
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content_id.as_str(), "c2");

    let by_kind = bead_box
        .search()
        .by_kind(kind("k2"))
        .all()
        .expect("search by kind");
    assert_eq!(by_kind.len(), 1);
    assert_eq!(by_kind[0].name.as_str(), "beta");

    assert!(bead_box
        .search()
        .by_name(name("alpha"))
        .by_kind(kind("k2"))
        .all()
        .expect("conjunction")
        .is_empty());
}

#[test]
fn time_window_conditions_follow_the_operator_table() {
    let rig = BoxRig::new();
    let bead_box = seeded_box(
        &rig,
        "b1",
        &[
            ("alpha", "c1", "k1", "20200101T000000000000Z"),
            ("alpha", "c2", "k1", "20200201T000000000000Z"),
            ("alpha", "c3", "k1", "20200301T000000000000Z"),
        ],
    );

    let strict = bead_box
        .search()
        .newer_than(freeze("20200101T000000000000Z"))
        .older_than(freeze("20200301T000000000000Z"))
        .all()
        .expect("window");
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].content_id.as_str(), "c2");

    let exact = bead_box
        .search()
        .at_time(freeze("20200301T000000000000Z"))
        .all()
        .expect("exact");
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].content_id.as_str(), "c3");

    let inclusive = bead_box
        .search()
        .at_or_older(freeze("20200201T000000000000Z"))
        .all()
        .expect("inclusive");
    assert_eq!(inclusive.len(), 2);
}

#[test]
fn newest_and_oldest_break_ties_by_content_id() {
    let rig = BoxRig::new();
    let bead_box = seeded_box(
        &rig,
        "b1",
        &[
            ("alpha", "c2", "k1", "20200601T000000000000Z"),
            ("beta", "c1", "k1", "20200601T000000000000Z"),
            ("gamma", "c3", "k1", "20200101T000000000000Z"),
        ],
    );

    let newest = bead_box.search().newest().expect("newest").expect("found");
    assert_eq!(newest.content_id.as_str(), "c1");

    let oldest = bead_box.search().oldest().expect("oldest").expect("found");
    assert_eq!(oldest.content_id.as_str(), "c3");
}

#[test]
fn unique_keeps_the_first_record_per_content_id() {
    let rig = BoxRig::new();
    let b1 = seeded_box(&rig, "b1", &[("alpha", "c1", "k1", "20200101T000000000000Z")]);
    let b2 = seeded_box(&rig, "b2", &[("alpha", "c1", "k1", "20200101T000000000000Z")]);
    let boxes = [b1, b2];

    let all = search_boxes(&boxes).all().expect("union");
    assert_eq!(all.len(), 2);

    let unique = search_boxes(&boxes).unique().all().expect("unique union");
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].box_name, "b1");
}

#[test]
fn multi_box_first_respects_box_order_and_newest_is_global() {
    let rig = BoxRig::new();
    let b1 = seeded_box(&rig, "b1", &[("alpha", "c1", "k1", "20200101T000000000000Z")]);
    let b2 = seeded_box(&rig, "b2", &[("alpha", "c2", "k1", "20210101T000000000000Z")]);
    let boxes = [b1, b2];

    let first = search_boxes(&boxes)
        .by_name(name("alpha"))
        .first()
        .expect("first")
        .expect("found");
    assert_eq!(first.box_name, "b1");

    let newest = search_boxes(&boxes)
        .by_name(name("alpha"))
        .newest()
        .expect("newest")
        .expect("found");
    assert_eq!(newest.box_name, "b2");
    assert_eq!(newest.content_id.as_str(), "c2");

    assert!(search_boxes(&boxes)
        .by_name(name("alpha"))
        .exists()
        .expect("exists"));
    assert!(!search_boxes(&boxes)
        .by_name(name("missing"))
        .exists()
        .expect("exists"));
}

#[test]
fn multi_box_first_skips_a_box_that_cannot_answer() {
    let rig = BoxRig::new();
    let broken = seeded_box(&rig, "broken", &[("alpha", "c0", "k1", "20200101T000000000000Z")]);
    let healthy = seeded_box(&rig, "healthy", &[("alpha", "c1", "k1", "20200601T000000000000Z")]);

    // Pull the directory out from under the first box after it opened.
    std::fs::remove_dir_all(broken.directory()).expect("remove box directory");

    let boxes = [broken, healthy];
    let first = search_boxes(&boxes)
        .by_name(name("alpha"))
        .first()
        .expect("first")
        .expect("found");
    assert_eq!(first.box_name, "healthy");
    assert_eq!(first.content_id.as_str(), "c1");
}

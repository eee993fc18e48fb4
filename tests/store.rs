//! Attribute store bookkeeping, mesh building, and whole-store welding.

use meshweld::{
    AttributeKind, AttributeStore, AttributeValue, Corner, Corners, MeshStats, Precision,
    Precisions, StoreError, SENTINEL,
};
use nalgebra::{point, vector, Point3};

fn pos(x: f32, y: f32, z: f32) -> AttributeValue {
    AttributeValue::Position(point![x, y, z])
}

/// Two triangles forming a quad, sharing an edge; normals only on the first triangle.
fn quad() -> Vec<[Corner; 3]> {
    let up = vector![0.0, 0.0, 1.0];
    let corner = |x: f32, y: f32, normal: bool| Corner {
        normal: normal.then_some(up),
        texcoord: Some(point![x, y]),
        ..Corner::at(point![x, y, 0.0])
    };
    vec![
        [corner(0.0, 0.0, true), corner(1.0, 0.0, true), corner(1.0, 1.0, true)],
        [corner(0.0, 0.0, false), corner(1.0, 1.0, false), corner(0.0, 1.0, false)],
    ]
}

#[test]
fn append_returns_running_positions() {
    let mut store = AttributeStore::<u32>::new();
    assert_eq!(store.current_len(AttributeKind::Position), 0);
    assert_eq!(store.append(pos(0.0, 0.0, 0.0)), Ok(0));
    assert_eq!(store.append(pos(0.0, 0.0, 0.0)), Ok(1));
    assert_eq!(store.current_len(AttributeKind::Position), 2);
    // kinds count independently
    assert_eq!(store.append(AttributeValue::Texcoord(point![0.0, 0.0])), Ok(0));
    assert_eq!(store.current_len(AttributeKind::Normal), 0);
    assert_eq!(
        store.present_kinds().collect::<Vec<_>>(),
        vec![AttributeKind::Position, AttributeKind::Texcoord]
    );
}

#[test]
fn append_overflows_small_index() {
    let mut store = AttributeStore::<u8>::new();
    for i in 0..256 {
        assert_eq!(store.append(pos(i as f32, 0.0, 0.0)), Ok(i as u8));
    }
    assert_eq!(
        store.append(pos(0.0, 0.0, 0.0)),
        Err(StoreError::IndexOverflow {
            kind: AttributeKind::Position,
            len: 256
        })
    );
}

#[test]
fn overflow_leaves_store_untouched() {
    let mut store = AttributeStore::<u8>::new();
    let up = AttributeValue::Normal(vector![0.0, 0.0, 1.0]);
    for _ in 0..256 {
        store.append(up).unwrap();
    }
    let corner = |x: f32| Corner {
        normal: Some(vector![0.0, 0.0, 1.0]),
        ..Corner::at(point![x, 0.0, 0.0])
    };

    let mut mesh = store.begin_mesh("full");
    assert_eq!(
        mesh.push_polygon(&[corner(0.0), corner(1.0), corner(2.0)]),
        Err(StoreError::IndexOverflow {
            kind: AttributeKind::Normal,
            len: 256
        })
    );
    // positions fit, but were not written either
    assert_eq!(
        mesh.push_polygon(&[
            Corner::at(point![0.0, 0.0, 0.0]),
            Corner::at(point![1.0, 0.0, 0.0]),
            Corner::at(point![2.0, 0.0, 0.0]),
        ]),
        Ok(true)
    );
    assert_eq!(
        mesh.finish(),
        MeshStats {
            triangles: 1,
            dropped: 0
        }
    );

    assert_eq!(store.triangle_count(), 1);
    assert_eq!(store.current_len(AttributeKind::Position), 3);
    assert_eq!(store.current_len(AttributeKind::Normal), 256);
    assert_eq!(
        store.indices(AttributeKind::Position),
        &[Corners::from([0, 1, 2])]
    );
    assert_eq!(store.indices(AttributeKind::Normal), &[Corners::ABSENT]);
}

#[test]
fn weld_remaps_records() {
    let mut store = AttributeStore::<u32>::new();
    for p in [pos(0.0, 0.0, 0.0), pos(1.0, 0.0, 0.0), pos(0.0, 0.0, 0.0)] {
        store.append(p).unwrap();
    }
    store.record_indices(0, AttributeKind::Position, Corners::from([2, 0, 1]));
    store.record_indices(0, AttributeKind::Color, Corners::ABSENT);

    let summary = store.weld_all();
    assert_eq!(summary.reports.len(), 1);
    let report = summary.get(AttributeKind::Position).unwrap();
    assert_eq!((report.before, report.after, report.merged()), (3, 2, 1));

    assert_eq!(
        store.positions().values(),
        &[point![0.0, 0.0, 0.0], point![1.0, 0.0, 0.0]]
    );
    assert_eq!(
        store.indices(AttributeKind::Position),
        &[Corners::from([0, 0, 1])]
    );
    // no colors were ever appended, so no color index can mean anything
    assert!(store.indices(AttributeKind::Color).is_empty());
}

#[test]
fn absent_corners_survive_weld() {
    let mut store = AttributeStore::<u32>::new();
    let n = AttributeValue::Normal(vector![0.0, 1.0, 0.0]);
    store.append(n).unwrap();
    store.append(n).unwrap();
    store.record_indices(
        0,
        AttributeKind::Normal,
        Corners::new(Some(1), None, Some(0)),
    );
    store.weld_all();
    let record = store.indices(AttributeKind::Normal)[0];
    assert_eq!(record, Corners::new(Some(0), None, Some(0)));
    assert_eq!(record.to_raw(), [0, SENTINEL, 0]);
}

#[test]
#[should_panic(expected = "out of order")]
fn records_must_be_in_order() {
    let mut store = AttributeStore::<u32>::new();
    store.record_indices(1, AttributeKind::Position, Corners::ABSENT);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn dangling_record_fails_loudly() {
    let mut store = AttributeStore::<u32>::new();
    store.append(pos(0.0, 0.0, 0.0)).unwrap();
    store.record_indices(0, AttributeKind::Position, Corners::from([0, 0, 3]));
    store.weld_all();
}

#[test]
fn builder_records_every_kind() {
    let mut store = AttributeStore::<u32>::new();
    let mut mesh = store.begin_mesh("quad");
    for tri in quad() {
        assert!(mesh.push_polygon(&tri).unwrap());
    }
    assert_eq!(
        mesh.finish(),
        MeshStats {
            triangles: 2,
            dropped: 0
        }
    );

    assert_eq!(store.triangle_count(), 2);
    for kind in AttributeKind::ALL {
        assert_eq!(store.indices(kind).len(), 2, "{kind}");
    }
    // before welding, every value is used by exactly one corner
    assert_eq!(store.current_len(AttributeKind::Position), 6);
    assert_eq!(store.current_len(AttributeKind::Normal), 3);
    assert_eq!(
        store.indices(AttributeKind::Normal),
        &[Corners::from([0, 1, 2]), Corners::ABSENT]
    );
    assert_eq!(
        store.indices(AttributeKind::Texcoord)[1],
        Corners::from([3, 4, 5])
    );

    let summary = store.weld_all();
    assert_eq!(summary.get(AttributeKind::Position).map(|r| r.after), Some(4));
    assert_eq!(summary.get(AttributeKind::Normal).map(|r| r.after), Some(1));
    assert_eq!(summary.get(AttributeKind::Tangent), None);
    assert_eq!(summary.merged(), 2 + 2 + 2);

    assert_eq!(
        store.indices(AttributeKind::Position),
        &[Corners::from([0, 1, 2]), Corners::from([0, 2, 3])]
    );
    assert_eq!(
        store.indices(AttributeKind::Normal),
        &[Corners::from([0, 0, 0]), Corners::ABSENT]
    );
    assert!(store.indices(AttributeKind::Tangent).is_empty());
}

#[test]
fn weld_preserves_corner_values() {
    let mut store = AttributeStore::<u16>::new();
    let mut mesh = store.begin_mesh("quad");
    for tri in quad() {
        mesh.push_polygon(&tri).unwrap();
    }
    mesh.finish();

    let snapshot = |store: &AttributeStore<u16>| {
        let mut values = Vec::new();
        for t in 0..store.triangle_count() {
            for c in 0..3 {
                for kind in [AttributeKind::Position, AttributeKind::Normal, AttributeKind::Texcoord] {
                    values.push(store.corner_value(t, c, kind));
                }
            }
        }
        values
    };

    let before = snapshot(&store);
    store.weld_all();
    assert_eq!(snapshot(&store), before);

    // welding twice is wasteful, never wrong
    let positions = store.positions().values().to_vec();
    store.weld_all();
    assert_eq!(store.positions().values(), positions.as_slice());
    assert_eq!(snapshot(&store), before);
}

#[test]
fn builder_drops_non_triangles() {
    let mut store = AttributeStore::<u32>::new();
    let quad: Vec<Corner> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Corner::at(point![x, y, 0.0]))
        .collect();
    let tri = [quad[0], quad[1], quad[2]];

    let mut mesh = store.begin_mesh("mixed");
    assert!(!mesh.push_polygon(&quad).unwrap());
    assert!(!mesh.push_polygon(&quad[..2]).unwrap());
    assert_eq!(mesh.extend([&tri[..], &quad[..]]).unwrap(), 1);
    assert_eq!(
        mesh.finish(),
        MeshStats {
            triangles: 1,
            dropped: 3
        }
    );
    assert_eq!(store.current_len(AttributeKind::Position), 3);
    assert_eq!(store.triangle_count(), 1);
}

#[test]
fn builder_quantizes_with_store_precision() {
    let precisions = Precisions::uniform(Precision::new(10.0).unwrap());
    let mut store = AttributeStore::<u32>::with_precisions(precisions);
    let corner = |x: f32| Corner {
        color: Some(point![x, x, x, 1.0]),
        ..Corner::at(point![x, 0.0, 0.0])
    };

    let mut mesh = store.begin_mesh("noisy");
    mesh.push_polygon(&[corner(0.51), corner(0.58), corner(0.6)])
        .unwrap();
    mesh.finish();

    let welded = store.weld_all();
    assert_eq!(welded.get(AttributeKind::Position).map(|r| r.after), Some(2));
    assert_eq!(welded.get(AttributeKind::Color).map(|r| r.after), Some(2));
    assert_eq!(
        store.positions().values(),
        &[Point3::new(0.5, 0.0, 0.0), Point3::new(0.6, 0.0, 0.0)]
    );
}

#[test]
fn meshes_share_streams() {
    let mut store = AttributeStore::<u32>::new();
    for name in ["a", "b"] {
        let mut mesh = store.begin_mesh(name);
        mesh.push_polygon(&quad()[0]).unwrap();
        mesh.finish();
    }
    assert_eq!(
        store.indices(AttributeKind::Position),
        &[Corners::from([0, 1, 2]), Corners::from([3, 4, 5])]
    );
    store.weld_all();
    assert_eq!(
        store.indices(AttributeKind::Position),
        &[Corners::from([0, 1, 2]), Corners::from([0, 1, 2])]
    );
}

#[test]
fn raw_corners() {
    assert_eq!(
        Corners::<u32>::from_raw([4, -1, 0]),
        Some(Corners::new(Some(4), None, Some(0)))
    );
    assert_eq!(Corners::<u8>::from_raw([300, 0, 0]), None);
    assert_eq!(Corners::<u32>::ABSENT.to_raw(), [SENTINEL; 3]);
    assert!(Corners::<u32>::default().is_absent());
    assert_eq!(
        Corners::<u32>::new(None, Some(2), Some(7))
            .present()
            .collect::<Vec<_>>(),
        vec![2, 7]
    );
}

#[test]
fn materials_survive_weld() {
    let mut store = AttributeStore::<u32>::new();
    let mut mesh = store.begin_mesh("quad");
    let [first, second]: [[Corner; 3]; 2] = quad().try_into().unwrap();
    mesh.push_polygon(&first).unwrap();
    mesh.set_materials(&[2]);
    mesh.push_polygon(&second).unwrap();
    mesh.finish();

    let mut mesh = store.begin_mesh("other");
    mesh.set_materials(&[0, 3]);
    mesh.push_polygon(&first).unwrap();
    mesh.finish();

    let before = store.material_records().to_vec();
    assert_eq!(before, vec![vec![], vec![2], vec![0, 3]]);

    store.weld_all();
    assert_eq!(store.material_records(), before.as_slice());
    assert_eq!(store.materials(2), &[0, 3]);
    assert!(store.materials(0).is_empty());
    assert!(store.materials(9).is_empty());
}

#[test]
fn skipped_triangles_have_no_materials() {
    let mut store = AttributeStore::<u32>::new();
    store.record_materials(2, &[5]);
    assert_eq!(store.triangle_count(), 3);
    assert_eq!(store.material_records(), &[vec![], vec![], vec![5]]);
}

#[test]
#[should_panic(expected = "out of order")]
fn materials_recorded_once() {
    let mut store = AttributeStore::<u32>::new();
    store.record_materials(1, &[0]);
    store.record_materials(0, &[1]);
}

#[test]
fn corner_value_out_of_range() {
    let mut store = AttributeStore::<u32>::new();
    let mut mesh = store.begin_mesh("quad");
    mesh.push_polygon(&quad()[0]).unwrap();
    mesh.finish();

    assert!(store.corner_value(0, 2, AttributeKind::Position).is_some());
    assert_eq!(store.corner_value(0, 3, AttributeKind::Position), None);
    assert_eq!(store.corner_value(1, 0, AttributeKind::Position), None);
    assert_eq!(store.positions().corner_value(0, 7), None);
}

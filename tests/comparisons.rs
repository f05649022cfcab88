use rand::prelude::*;
use rand::rngs::StdRng;
use roomthree::geometry::distance_sq;
use roomthree::{BoundingBox, Bvh, Face, LinearIndex, Quaternion, SpatialIndex, VirtualExtension, World};

fn random_boxes(rng: &mut StdRng, count: usize) -> Vec<BoundingBox<3>> {
    (0..count)
        .map(|_| {
            let center = [
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            ];
            let half = [
                rng.gen_range(0.0..8.0),
                rng.gen_range(0.0..8.0),
                rng.gen_range(0.0..8.0),
            ];
            BoundingBox::from_center(center, half)
        })
        .collect()
}

fn containing<I: SpatialIndex>(index: &I, point: &[f64; 3]) -> Vec<usize> {
    let mut hits = Vec::new();
    index.visit_containing(point, |i| hits.push(i));
    hits.sort_unstable();
    hits
}

fn overlapping<I: SpatialIndex>(index: &I, region: &BoundingBox<3>) -> Vec<usize> {
    let mut hits = Vec::new();
    index.visit_overlapping(region, |i| hits.push(i));
    hits.sort_unstable();
    hits
}

#[test]
fn test_bvh_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(0xB0B);
    let boxes = random_boxes(&mut rng, 500);

    for leaf_size in [1, 4, 16] {
        let mut bvh = Bvh::default();
        bvh.build(&boxes, leaf_size);
        let mut linear = LinearIndex::default();
        linear.build(&boxes, leaf_size);
        assert_eq!(bvh.len(), linear.len());

        for _ in 0..200 {
            let p = [
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
            ];
            assert_eq!(containing(&bvh, &p), containing(&linear, &p), "point {:?}", p);

            let region = BoundingBox::from_center(p, [rng.gen_range(0.0..10.0); 3]);
            assert_eq!(overlapping(&bvh, &region), overlapping(&linear, &region));
        }
    }
}

#[test]
fn test_bvh_reports_box_corners() {
    let mut rng = StdRng::seed_from_u64(17);
    let boxes = random_boxes(&mut rng, 100);
    let mut bvh = Bvh::default();
    bvh.build(&boxes, 4);

    for (i, b) in boxes.iter().enumerate() {
        for corner in b.corners() {
            assert!(containing(&bvh, &corner).contains(&i));
        }
    }
}

fn house<I: SpatialIndex>() -> World<I> {
    let mut world = World::new([20.0, 10.0, 20.0]).unwrap();
    let outer = world
        .add_delimiter([0.0; 3], [8.0, 4.0, 8.0], Quaternion::IDENTITY, 0)
        .unwrap();
    for face in Face::ALL {
        world
            .add_delimiter_plane(outer, face as u8, false, VirtualExtension::empty())
            .unwrap();
    }
    let inner = world
        .add_delimiter([0.0; 3], [0.1, 4.0, 8.0], Quaternion::IDENTITY, 1)
        .unwrap();
    world
        .add_delimiter_plane(inner, Face::PositiveX as u8, true, VirtualExtension::empty())
        .unwrap();
    world.random_anchors(80, 99);
    world
}

#[test]
fn test_world_index_backends_agree() {
    let mut bvh_world: World<Bvh> = house();
    let mut linear_world: World<LinearIndex> = house();
    let a = bvh_world.calculate_volumes(0.5).unwrap();
    let b = linear_world.calculate_volumes(0.5).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.volume_count, 3);

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..500 {
        let p = [
            rng.gen_range(-21.0..21.0),
            rng.gen_range(-11.0..11.0),
            rng.gen_range(-21.0..21.0),
        ];
        assert_eq!(bvh_world.query_volume(p), linear_world.query_volume(p));
        assert_eq!(bvh_world.query_point(p), linear_world.query_point(p));
        assert_eq!(bvh_world.delimiters_at(p), linear_world.delimiters_at(p));
    }
}

#[test]
fn test_nearest_anchor_matches_scan_of_volume() {
    let mut world: World = house();
    world.random_anchors(2000, 3);
    world.calculate_volumes(0.5).unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let p = [
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-20.0..20.0),
        ];
        let expected = world.query_volume(p).and_then(|id| {
            let volume = world.volume(id).unwrap();
            volume.anchors.iter().copied().min_by(|&a, &b| {
                let da = distance_sq(world.anchor(a).unwrap().position, p);
                let db = distance_sq(world.anchor(b).unwrap().position, p);
                da.total_cmp(&db).then(a.cmp(&b))
            })
        });
        assert_eq!(world.query_point(p), expected, "point {:?}", p);
    }
}

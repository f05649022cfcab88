use roomthree::{Face, Quaternion, VirtualExtension, World};

fn room(world: &mut World, half: f64, open: Option<Face>) {
    let d = world
        .add_delimiter([0.0; 3], [half; 3], Quaternion::IDENTITY, 0)
        .unwrap();
    for face in Face::ALL {
        if Some(face) != open {
            world
                .add_delimiter_plane(d, face as u8, false, VirtualExtension::empty())
                .unwrap();
        }
    }
}

#[test]
fn test_sealed_room_keeps_inside_and_outside_apart() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    room(&mut world, 3.0, None);
    let inside = world.add_anchor([0.0, 0.0, 0.0]);
    let outside = world.add_anchor([8.0, 8.0, 8.0]);

    let summary = world.calculate_volumes(1.0).unwrap();
    assert_eq!(summary.volume_count, 2);
    assert_eq!(summary.unassigned_anchors, 0);
    assert_ne!(world.anchor_volume(inside).unwrap(), world.anchor_volume(outside).unwrap());

    assert_eq!(world.query_point([1.5, -1.5, 1.0]), Some(inside));
    assert_eq!(world.query_point([-9.0, 0.0, 0.0]), Some(outside));
    assert_eq!(world.query_point([0.0, 0.0, 5.0]), Some(outside));
}

#[test]
fn test_anchors_on_planes_or_outside_are_unassigned() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    room(&mut world, 5.0, None);
    let on_face = world.add_anchor([5.0, 0.0, 0.0]);
    let outside = world.add_anchor([30.0, 0.0, 0.0]);
    let inside = world.add_anchor([0.0, 0.0, 0.0]);

    let summary = world.calculate_volumes(1.0).unwrap();
    assert_eq!(summary.unassigned_anchors, 2);
    assert_eq!(world.anchor_volume(on_face).unwrap(), None);
    assert_eq!(world.anchor_volume(outside).unwrap(), None);
    assert!(world.anchor_volume(inside).unwrap().is_some());

    assert_eq!(world.query_volume([5.0, 0.0, 0.0]), None);
    assert_eq!(world.query_point([5.0, 0.0, 0.0]), None);
    assert_eq!(world.query_point([30.0, 0.0, 0.0]), None);
}

#[test]
fn test_open_face_joins_room_to_outside() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    room(&mut world, 3.0, Some(Face::PositiveX));
    let inside = world.add_anchor([0.0, 0.0, 0.0]);
    let outside = world.add_anchor([8.0, 8.0, 8.0]);

    let summary = world.calculate_volumes(1.0).unwrap();
    assert_eq!(summary.volume_count, 1);
    assert_eq!(world.anchor_volume(inside).unwrap(), world.anchor_volume(outside).unwrap());

    // Both anchors share the volume, so the nearest one wins.
    assert_eq!(world.query_point([1.0, 0.0, 0.0]), Some(inside));
    assert_eq!(world.query_point([7.0, 7.0, 7.0]), Some(outside));
}

#[test]
fn test_queries_outside_the_world() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    let a = world.add_anchor([0.0, 0.0, 0.0]);
    assert_eq!(world.query_point([0.0, 0.0, 0.0]), None, "nothing computed yet");

    world.calculate_volumes(1.0).unwrap();
    assert_eq!(world.query_point([10.5, 0.0, 0.0]), None);
    assert_eq!(world.query_point([0.0, -11.0, 0.0]), None);
    assert_eq!(world.query_point([f64::NAN, 0.0, 0.0]), None);

    // The closed upper boundary belongs to the last cell.
    assert_eq!(world.query_point([10.0, 10.0, 10.0]), Some(a));
    assert_eq!(world.query_point([-10.0, -10.0, -10.0]), Some(a));
}

#[test]
fn test_extension_seals_beyond_physical_bounds() {
    let anchors = [[-5.0, 8.0, 8.0], [5.0, 8.0, 8.0]];

    // A small centered wall leaves space around it connected.
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    let wall = world
        .add_delimiter([0.0; 3], [0.1, 2.0, 2.0], Quaternion::IDENTITY, 0)
        .unwrap();
    world
        .add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::empty())
        .unwrap();
    let [left, right] = anchors.map(|p| world.add_anchor(p));
    assert_eq!(world.calculate_volumes(1.0).unwrap().volume_count, 1);
    assert_eq!(world.anchor_volume(left).unwrap(), world.anchor_volume(right).unwrap());

    // Extended along both in-plane axes, the same wall cuts the world in two.
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    let wall = world
        .add_delimiter([0.0; 3], [0.1, 2.0, 2.0], Quaternion::IDENTITY, 0)
        .unwrap();
    world
        .add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::ALL)
        .unwrap();
    let [left, right] = anchors.map(|p| world.add_anchor(p));
    assert_eq!(world.calculate_volumes(1.0).unwrap().volume_count, 2);
    assert_ne!(world.anchor_volume(left).unwrap(), world.anchor_volume(right).unwrap());
    assert_eq!(world.query_point([-9.0, -9.0, -9.0]), Some(left));
    assert_eq!(world.query_point([9.0, -9.0, -9.0]), Some(right));
}

#[test]
fn test_partial_extension_leaves_one_side_open() {
    // Extended only along +U and both V sides: space below the wall stays connected.
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    let wall = world
        .add_delimiter([0.0; 3], [0.1, 2.0, 2.0], Quaternion::IDENTITY, 0)
        .unwrap();
    world
        .add_delimiter_plane(
            wall,
            Face::PositiveX as u8,
            true,
            VirtualExtension::POSITIVE_U | VirtualExtension::V,
        )
        .unwrap();
    let left = world.add_anchor([-5.0, 8.0, 0.0]);
    let right = world.add_anchor([5.0, 8.0, 0.0]);
    assert_eq!(world.calculate_volumes(1.0).unwrap().volume_count, 1);
    assert_eq!(world.anchor_volume(left).unwrap(), world.anchor_volume(right).unwrap());
}

#[test]
fn test_rotated_wall() {
    // A quarter turn about Z maps the local +X face normal onto world +Y.
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    let wall = world
        .add_delimiter_euler([0.0; 3], [0.1, 1.0, 1.0], [0.0, 0.0, 0.25], 1)
        .unwrap();
    world
        .add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::ALL)
        .unwrap();
    let below = world.add_anchor([3.0, -5.0, 3.0]);
    let above = world.add_anchor([3.0, 5.0, 3.0]);

    assert_eq!(world.calculate_volumes(1.0).unwrap().volume_count, 2);
    assert_eq!(world.query_point([-9.0, -9.0, 0.0]), Some(below));
    assert_eq!(world.query_point([-9.0, 9.0, 0.0]), Some(above));
}

#[test]
fn test_recomputation_is_idempotent() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    room(&mut world, 4.0, None);
    world.random_anchors(50, 7);

    world.calculate_volumes(1.0).unwrap();
    let first: Vec<_> = world.anchors().map(|(id, _)| world.anchor_volume(id).unwrap()).collect();
    let first_cells: Vec<_> = world.volumes().iter().map(|v| v.cell_count).collect();

    world.calculate_volumes(1.0).unwrap();
    let second: Vec<_> = world.anchors().map(|(id, _)| world.anchor_volume(id).unwrap()).collect();
    let second_cells: Vec<_> = world.volumes().iter().map(|v| v.cell_count).collect();

    assert_eq!(first, second);
    assert_eq!(first_cells, second_cells);
}

#[test]
fn test_open_room_does_not_fragment_under_refinement() {
    let mut counts = Vec::new();
    for cell_size in [2.0, 1.0, 0.5] {
        let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
        room(&mut world, 3.0, Some(Face::NegativeY));
        counts.push(world.calculate_volumes(cell_size).unwrap().volume_count);
    }
    assert_eq!(counts, vec![1, 1, 1]);

    let mut counts = Vec::new();
    for cell_size in [2.0, 1.0, 0.5] {
        let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
        room(&mut world, 3.0, None);
        counts.push(world.calculate_volumes(cell_size).unwrap().volume_count);
    }
    assert_eq!(counts, vec![2, 2, 2]);
}

#[test]
fn test_containment_round_trip() {
    let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
    room(&mut world, 4.0, None);
    let walls = world
        .add_delimiter([6.0, 0.0, 0.0], [0.05, 10.0, 10.0], Quaternion::IDENTITY, 0)
        .unwrap();
    world
        .add_delimiter_plane(walls, Face::PositiveX as u8, true, VirtualExtension::empty())
        .unwrap();
    world.random_anchors(200, 42);
    world.calculate_volumes(0.5).unwrap();

    for (id, anchor) in world.anchors() {
        let Some(volume) = world.anchor_volume(id).unwrap() else {
            continue;
        };
        assert_eq!(world.query_volume(anchor.position), Some(volume));

        // The anchor is its own nearest neighbour unless another one sits on the same spot.
        let hit = world.query_point(anchor.position).unwrap();
        let hit_pos = world.anchor(hit).unwrap().position;
        assert_eq!(hit_pos, anchor.position);
    }

    for volume in world.volumes() {
        let center = volume.bounds.center();
        let Some(found) = world.query_volume(center) else {
            continue;
        };
        if found != volume.id {
            continue;
        }
        match world.query_point(center) {
            Some(anchor) => assert!(volume.anchors.contains(&anchor)),
            None => assert!(volume.anchors.is_empty()),
        }
    }
}

/// A wall close to, but not on, a cell boundary at a cell size that is not a power of two.
fn thin_corridor() -> World {
    let mut world: World = World::new([10.0, 1.0, 1.0]).unwrap();
    let wall = world
        .add_delimiter([-3.33, 0.0, 0.0], [0.05, 1.0, 1.0], Quaternion::IDENTITY, 0)
        .unwrap();
    world
        .add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::ALL)
        .unwrap();
    world
}

#[test]
fn test_anchor_on_rounded_cell_edge_is_found_by_queries() {
    let mut world = thin_corridor();
    let anchor = world.add_anchor([-3.4, 0.0, 0.0]);
    world.calculate_volumes(0.1).unwrap();

    let volume = world.anchor_volume(anchor).unwrap();
    assert!(volume.is_some());
    assert_eq!(world.query_volume([-3.4, 0.0, 0.0]), volume);
    assert_eq!(world.query_point([-3.4, 0.0, 0.0]), Some(anchor));
}

#[test]
fn test_queries_agree_with_assignment_around_volume_edges() {
    let mut world = thin_corridor();
    world.calculate_volumes(0.1).unwrap();
    let edges: Vec<f64> = world
        .volumes()
        .iter()
        .flat_map(|v| [v.bounds.min[0], v.bounds.max[0]])
        .collect();
    assert!(edges.len() >= 4);

    // Neighbouring floats on both sides of every edge.
    for edge in edges {
        for step in -4i64..=4 {
            let x = f64::from_bits((edge.to_bits() as i64 + step) as u64);
            world.add_anchor([x, 0.3, -0.2]);
        }
    }
    let summary = world.calculate_volumes(0.1).unwrap();
    assert!(summary.unassigned_anchors < world.anchor_count());

    for (id, anchor) in world.anchors() {
        let volume = world.anchor_volume(id).unwrap();
        assert_eq!(world.query_volume(anchor.position), volume, "anchor at {:?}", anchor.position);
        match volume {
            Some(_) => {
                let hit = world.query_point(anchor.position).unwrap();
                assert_eq!(world.anchor(hit).unwrap().position, anchor.position);
            }
            None => assert_eq!(world.query_point(anchor.position), None),
        }
    }
}

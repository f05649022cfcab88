use roomthree::{DebugDrawOptions, Face, Quaternion, VirtualExtension, World};
use std::fs::File;
use std::io::BufWriter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A two storey house on a plot of 40 x 12 x 40.
    let mut world: World = World::new([20.0, 6.0, 20.0])?;

    // Outer shell, open at the front door (-Z face is replaced by two wall segments below).
    let shell = world.add_named_delimiter("shell", [0.0, 0.0, 0.0], [10.0, 5.0, 8.0], Quaternion::IDENTITY, 0)?;
    for face in [Face::PositiveX, Face::PositiveY, Face::PositiveZ, Face::NegativeX, Face::NegativeY] {
        world.add_delimiter_plane(shell, face as u8, false, VirtualExtension::empty())?;
    }
    for (name, x) in [("front left", -6.0), ("front right", 6.0)] {
        let segment = world.add_named_delimiter(name, [x, 0.0, -8.0], [4.0, 5.0, 0.1], Quaternion::IDENTITY, 0)?;
        world.add_delimiter_plane(segment, Face::PositiveZ as u8, true, VirtualExtension::empty())?;
    }
    // Lintel above the door.
    let lintel = world.add_named_delimiter("lintel", [0.0, 3.0, -8.0], [2.0, 2.0, 0.1], Quaternion::IDENTITY, 0)?;
    world.add_delimiter_plane(lintel, Face::PositiveZ as u8, true, VirtualExtension::empty())?;

    // Floor between the storeys and an interior wall on the ground floor.
    let floor = world.add_named_delimiter("floor", [0.0, 0.0, 0.0], [10.0, 0.1, 8.0], Quaternion::IDENTITY, 1)?;
    world.add_delimiter_plane(floor, Face::PositiveY as u8, true, VirtualExtension::empty())?;
    let wall = world.add_named_delimiter("kitchen wall", [3.0, -2.5, 0.0], [0.1, 2.5, 8.0], Quaternion::IDENTITY, 1)?;
    world.add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::empty())?;

    // A rotated shed in the garden, sealed on all sides.
    let shed = world.add_named_delimiter(
        "shed",
        [14.0, -4.0, 14.0],
        [2.0, 1.5, 2.0],
        Quaternion::from_euler_turns([0.0, 0.125, 0.0]),
        0,
    )?;
    for axis in 0..3 {
        world.add_both_delimiter_planes(shed, axis, VirtualExtension::empty())?;
    }

    let hall = world.add_named_anchor("hall", [-5.0, -2.5, 0.0]);
    let kitchen = world.add_named_anchor("kitchen", [6.0, -2.5, 0.0]);
    let bedroom = world.add_named_anchor("bedroom", [0.0, 2.5, 0.0]);
    let shed_anchor = world.add_named_anchor("shed", [14.0, -4.0, 14.0]);
    let garden = world.add_named_anchor("garden", [-15.0, 0.0, -15.0]);

    let summary = world.calculate_volumes(0.25)?;
    println!("{:#?}", summary);

    for (name, anchor) in [("hall", hall), ("kitchen", kitchen), ("bedroom", bedroom), ("shed", shed_anchor), ("garden", garden)] {
        println!("{:>8}: volume {:?}", name, world.anchor_volume(anchor)?);
    }
    for probe in [[0.0, -2.5, -7.0], [8.0, -4.0, 5.0], [-9.0, 4.0, 7.0], [14.0, -4.5, 13.0], [0.0, -4.0, -12.0]] {
        let owner = world.query_point(probe).and_then(|id| world.anchor(id).ok()?.name.clone());
        println!("{:?} -> {:?}", probe, owner);
    }

    for entry in &world.profiling_data().summary {
        println!(
            "{:>18}: {:8.3} ms ({} calls)",
            entry.name,
            entry.exclusive_ns as f64 * 1e-6,
            entry.count
        );
    }

    let options = DebugDrawOptions::ANCHORS
        | DebugDrawOptions::DELIMITERS
        | DebugDrawOptions::DELIMITER_WIREFRAMES
        | DebugDrawOptions::VOLUME_WIREFRAMES
        | DebugDrawOptions::LABELS
        | DebugDrawOptions::ROOT_PLANES;
    let draw = world.debug_draw(options);
    let path = "house_debug_draw.json";
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &draw)?;
    println!("{} primitives written to {}", draw.primitive_count(), path);

    Ok(())
}

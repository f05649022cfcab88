//! # roomthree
//!
//! `roomthree` is a Rust library for partitioning a 3D world into enclosed volumes, designed to be
//! used in Rust as well as compiled to WebAssembly (WASM). Walls are described by oriented boxes
//! ("delimiters") carrying face planes, and named points ("anchors") are assigned to the volume
//! they sit in.
//!
//! ## Features
//!
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//! - **Voxel flood fill**: Planes are rasterized into a uniform grid and free cells are flood filled into volumes.
//! - **Virtual extensions**: Plane edges can be extended to the world boundary to seal gaps.
//! - **Point queries**: A BVH over the volume bounds finds the volume, a kd-tree per volume its nearest anchor.
//! - **Debug draw**: Owned snapshots of anchors, delimiters, volumes and index nodes as primitives.
//!
//! ## Example
//!
//! ```
//! use roomthree::{Face, Quaternion, VirtualExtension, World};
//!
//! let mut world: World = World::new([10.0, 10.0, 10.0]).unwrap();
//! let left = world.add_anchor([-5.0, 0.0, 0.0]);
//! let right = world.add_anchor([5.0, 0.0, 0.0]);
//!
//! let wall = world.add_delimiter([0.0; 3], [0.1, 1.0, 1.0], Quaternion::IDENTITY, 0).unwrap();
//! world.add_delimiter_plane(wall, Face::PositiveX as u8, true, VirtualExtension::ALL).unwrap();
//!
//! world.calculate_volumes(1.0).unwrap();
//! assert_eq!(world.query_point([-9.0, 9.0, 9.0]), Some(left));
//! assert_eq!(world.query_point([9.0, -9.0, -9.0]), Some(right));
//! ```
//!
//! See the `demos/` directory for a larger scene dumped as JSON.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`World`] struct. Hosts that need opaque handles use [`WorldRegistry`].

pub mod algorithm;
mod bounds;
pub mod debug_draw;
mod delimiter;
mod entity;
mod error;
pub mod geometry;
pub mod grid;
mod profiling;
mod registry;
mod settings;
mod volume;
mod world;
pub mod wasm;

pub use algorithm::SpatialIndex;
pub use algorithm::bvh::Bvh;
pub use algorithm::kdtree::KdTree;
pub use algorithm::linear::LinearIndex;
pub use bounds::BoundingBox;
pub use debug_draw::{DebugCuboid, DebugDrawData, DebugDrawOptions, DebugLine, DebugSphere, DebugText, DebugTriangle};
pub use delimiter::{Delimiter, DelimiterPlane, PlaneRect, VirtualExtension};
pub use entity::{Anchor, AnchorId, DelimiterId, EntityId};
pub use error::{Result, WorldError};
pub use geometry::{Face, Quaternion, Vec3};
pub use grid::{MAX_GRID_CELLS, VoxelGrid};
pub use profiling::{SummaryEntry, TimelineEntry, TimingData};
pub use registry::{WorldHandle, WorldRegistry};
pub use settings::{DEFAULT_MAX_CELL_COUNT, WorldSettings};
pub use volume::{Volume, VolumeId, VolumeSummary};
pub use world::World;

//! Generational identifiers and the dense per-kind storage they index into.

use std::marker::PhantomData;

use crate::delimiter::Delimiter;
use crate::geometry::Vec3;

/// Stable identifier of an entity of kind `T` inside one world.
///
/// The generation is bumped by [`World::reset`](crate::World::reset), so ids issued before a
/// reset are rejected afterwards instead of silently aliasing new entities.
pub struct EntityId<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

pub type AnchorId = EntityId<Anchor>;
pub type DelimiterId = EntityId<Delimiter>;

impl<T> EntityId<T> {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// An id that never resolves.
    #[inline]
    pub const fn null() -> Self {
        Self::new(u32::MAX, 0)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: deriving would put the bounds on `T` instead of on the id.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> std::hash::Hash for EntityId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.generation, self.index).cmp(&(other.generation, other.index))
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> std::fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}v{})", self.index, self.generation)
        }
    }
}

/// A labeled point whose enclosing volume is computed and queryable.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub position: Vec3,
    pub name: Option<String>,
}

/// Dense append-only storage. Entities are never removed one by one, only all at once.
#[derive(Debug)]
pub(crate) struct EntityStore<T> {
    items: Vec<T>,
    generation: u32,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
        }
    }
}

impl<T> EntityStore<T> {
    pub fn push(&mut self, value: T) -> EntityId<T> {
        let index = self.items.len() as u32;
        self.items.push(value);
        EntityId::new(index, self.generation)
    }

    /// Position of `id` in the dense array, if it was issued by this store and generation.
    pub fn slot(&self, id: EntityId<T>) -> Option<usize> {
        let index = id.index as usize;
        (id.generation == self.generation && index < self.items.len()).then_some(index)
    }

    pub fn get(&self, id: EntityId<T>) -> Option<&T> {
        self.slot(id).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, id: EntityId<T>) -> Option<&mut T> {
        self.slot(id).map(|i| &mut self.items[i])
    }

    pub fn id_at(&self, index: usize) -> EntityId<T> {
        EntityId::new(index as u32, self.generation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId<T>, &T)> + '_ {
        let generation = self.generation;
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (EntityId::new(i as u32, generation), item))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    /// Drops every entity and invalidates all ids handed out so far.
    pub fn clear(&mut self) {
        self.items.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

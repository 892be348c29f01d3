// std imports
use std::{
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
    sync::Arc,
};

// third-party imports
use crossbeam_queue::SegQueue;

// ---

pub trait Pool {
    type Item;

    fn check_out(&self) -> Self::Item;
    fn check_in(&self, item: Self::Item);
}

impl<P> Pool for Arc<P>
where
    P: Pool,
{
    type Item = P::Item;

    #[inline]
    fn check_out(&self) -> Self::Item {
        self.as_ref().check_out()
    }

    #[inline]
    fn check_in(&self, item: Self::Item) {
        self.as_ref().check_in(item)
    }
}

// ---

pub trait Lease {
    type Item;
    type Pool: Pool<Item = Self::Item>;
    type Leased: DerefMut<Target = Self::Item>;

    fn lease(&self) -> Self::Leased;
}

// ---

pub trait Factory {
    type Item;

    fn new(&self) -> Self::Item;
}

impl<T, F> Factory for F
where
    F: Fn() -> T,
{
    type Item = T;

    #[inline]
    fn new(&self) -> T {
        self()
    }
}

// ---

pub trait Recycler<T> {
    fn recycle(&self, item: T) -> T;
}

impl<T, F> Recycler<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn recycle(&self, item: T) -> T {
        self(item)
    }
}

// ---

#[derive(Default, Clone, Copy)]
pub struct DefaultFactory<T>(PhantomData<T>);

impl<T: Default> Factory for DefaultFactory<T> {
    type Item = T;

    #[inline]
    fn new(&self) -> T {
        T::default()
    }
}

// ---

pub struct RecycleAsIs;

impl<T> Recycler<T> for RecycleAsIs {
    #[inline]
    fn recycle(&self, item: T) -> T {
        item
    }
}

// ---

/// Constructs new items of type T using Factory F and recycles them using Recycler R on request.
pub struct SQPool<T, F = DefaultFactory<T>, R = RecycleAsIs>
where
    F: Factory<Item = T>,
    R: Recycler<T>,
{
    factory: F,
    recycler: R,
    recycled: SegQueue<T>,
}

impl<T> SQPool<T, DefaultFactory<T>, RecycleAsIs>
where
    T: Default,
{
    /// Returns a new Pool with default factory.
    pub fn new() -> SQPool<T, DefaultFactory<T>, RecycleAsIs> {
        SQPool {
            factory: DefaultFactory(PhantomData),
            recycler: RecycleAsIs,
            recycled: SegQueue::new(),
        }
    }
}

impl<T, F> SQPool<T, F, RecycleAsIs>
where
    F: Factory<Item = T>,
{
    /// Returns a new Pool with the given factory.
    #[inline]
    pub fn new_with_factory(factory: F) -> SQPool<T, F, RecycleAsIs> {
        SQPool {
            factory,
            recycler: RecycleAsIs,
            recycled: SegQueue::new(),
        }
    }
}

impl<T, F, R> SQPool<T, F, R>
where
    F: Factory<Item = T>,
    R: Recycler<T>,
{
    /// Converts the Pool to a new Pool with the given recycle function.
    #[inline]
    pub fn with_recycler<R2: Recycler<T>>(self, recycler: R2) -> SQPool<T, F, R2> {
        SQPool {
            factory: self.factory,
            recycler,
            recycled: self.recycled,
        }
    }

    /// Returns a new or recycled T.
    #[inline]
    pub fn check_out(&self) -> T {
        match self.recycled.pop() {
            Some(item) => item,
            None => self.factory.new(),
        }
    }

    /// Recycles the given T.
    #[inline]
    pub fn check_in(&self, item: T) {
        self.recycled.push(self.recycler.recycle(item))
    }
}

impl<T, F, R> Pool for SQPool<T, F, R>
where
    F: Factory<Item = T>,
    R: Recycler<T>,
{
    type Item = T;

    #[inline]
    fn check_out(&self) -> T {
        self.check_out()
    }

    #[inline]
    fn check_in(&self, item: T) {
        self.check_in(item)
    }
}

impl<T, F, R> Lease for Arc<SQPool<T, F, R>>
where
    F: Factory<Item = T>,
    R: Recycler<T>,
{
    type Item = T;
    type Pool = Self;
    type Leased = Leased<T, Self>;

    #[inline]
    fn lease(&self) -> Self::Leased {
        Leased::new(self.check_out(), self.clone())
    }
}

// ---

/// A scoped lease of a pooled item.
///
/// Dropping the lease checks the item back into the pool on every exit path,
/// so an acquired item can never leak or skip recycling.
pub struct Leased<T, P>
where
    P: Pool<Item = T>,
{
    item: ManuallyDrop<T>,
    pool: P,
}

impl<T, P> Leased<T, P>
where
    P: Pool<Item = T>,
{
    #[inline]
    fn new(item: T, pool: P) -> Self {
        Leased {
            item: ManuallyDrop::new(item),
            pool,
        }
    }
}

impl<T, P> Deref for Leased<T, P>
where
    P: Pool<Item = T>,
{
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl<T, P> DerefMut for Leased<T, P>
where
    P: Pool<Item = T>,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.item
    }
}

impl<T, P> Drop for Leased<T, P>
where
    P: Pool<Item = T>,
{
    #[inline]
    fn drop(&mut self) {
        // Safety: the item is taken exactly once, right here
        self.pool.check_in(unsafe { ManuallyDrop::take(&mut self.item) })
    }
}

// ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool() {
        let pool = Arc::new(SQPool::new_with_factory(|| 42));
        let mut leased = pool.lease();
        assert_eq!(*leased, 42);
        *leased = 43;
        assert_eq!(*leased, 43);
        drop(leased);

        let leased = pool.lease();
        assert_eq!(*leased, 43);
        let mut leased = pool.lease();
        assert_eq!(*leased, 42);
        *leased = 44;
        assert_eq!(*leased, 44);
    }

    #[test]
    fn test_pool_recycler() {
        let pool = Arc::new(SQPool::new_with_factory(|| vec![0u8; 4]).with_recycler(|mut v: Vec<u8>| {
            v.clear();
            v
        }));
        let mut leased = pool.lease();
        leased.push(1);
        assert_eq!(leased.len(), 5);
        drop(leased);

        let leased = pool.lease();
        assert!(leased.is_empty());
    }

    #[test]
    fn test_pool_default_factory() {
        let pool = Arc::new(SQPool::<String>::new());
        let leased = pool.lease();
        assert_eq!(*leased, "");
    }
}

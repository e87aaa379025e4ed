use super::response::CollisionResponse;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational handle into a `ResponsePool`.
    pub struct ResponseKey;
}

/// Free list of collision responses.
///
/// Recycled slots are reused by later `store` calls, so steady state ticks do
/// not allocate. Every slot carries a generation: a key that outlived its
/// `recycle` no longer resolves instead of aliasing a newer response.
#[derive(Default)]
pub struct ResponsePool {
    responses: SlotMap<ResponseKey, CollisionResponse>,
}

impl ResponsePool {
    pub fn new() -> ResponsePool {
        ResponsePool::default()
    }

    pub fn store(&mut self, response: CollisionResponse) -> ResponseKey {
        self.responses.insert(response)
    }

    pub fn get(&self, key: ResponseKey) -> Option<&CollisionResponse> {
        self.responses.get(key)
    }

    /// returns the slot to the free list, `false` if `key` was already recycled
    pub fn recycle(&mut self, key: ResponseKey) -> bool {
        self.responses.remove(key).is_some()
    }

    /// responses currently handed out
    pub fn live(&self) -> usize {
        self.responses.len()
    }

    pub fn capacity(&self) -> usize {
        self.responses.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_key_no_longer_resolves() {
        let mut pool = ResponsePool::new();
        let key = pool.store(CollisionResponse {
            hit: true,
            ..CollisionResponse::default()
        });
        assert!(pool.get(key).unwrap().hit);
        assert!(pool.recycle(key));
        assert!(pool.get(key).is_none());
        assert!(!pool.recycle(key));

        let reused = pool.store(CollisionResponse::default());
        assert!(pool.get(key).is_none());
        assert!(!pool.get(reused).unwrap().hit);
    }

    #[test]
    fn slots_are_reused() {
        let mut pool = ResponsePool::new();
        let keys: Vec<_> = (0..4).map(|_| pool.store(CollisionResponse::default())).collect();
        let capacity = pool.capacity();
        for key in keys {
            pool.recycle(key);
        }
        assert_eq!(pool.live(), 0);
        for _ in 0..4 {
            pool.store(CollisionResponse::default());
        }
        assert_eq!(pool.capacity(), capacity);
        assert_eq!(pool.live(), 4);
    }
}

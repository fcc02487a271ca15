use rand::Rng;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

/// The kind of entity an id is generated for. Each kind has its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Album,
    Song,
    User,
    Playlist,
    PlaylistSong,
    Like,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Album => "album",
            EntityKind::Song => "song",
            EntityKind::User => "user",
            EntityKind::Playlist => "playlist",
            EntityKind::PlaylistSong => "playlist_song",
            EntityKind::Like => "like",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Trait for generating entity ids.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness is left to the generator.
pub trait IdGenerator: Send + Sync + 'static {
    /// Generates a new id of the form `<prefix>-<suffix>`.
    fn generate(&self, kind: EntityKind) -> String;
}

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const DEFAULT_SUFFIX_LENGTH: usize = 16;

/// Generates ids with a random URL-safe suffix, e.g. `album-V1StGXR8_Z5jdHi6`.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            length: DEFAULT_SUFFIX_LENGTH,
        }
    }

    /// Creates a generator with a custom suffix length.
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, kind: EntityKind) -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{}-{}", kind.prefix(), suffix)
    }
}

/// Generates sequential ids like `album-000000`, `album-000001`.
///
/// A single counter is shared across all entity kinds, so every id produced
/// by one instance is unique. Intended for deterministic tests.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self, kind: EntityKind) -> String {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{:06}", kind.prefix(), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_have_prefix_and_length() {
        let generator = RandomIdGenerator::new();
        let id = generator.generate(EntityKind::Album);

        let suffix = id.strip_prefix("album-").expect("prefix");
        assert_eq!(suffix.len(), 16);
        assert!(suffix.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn random_ids_do_not_repeat() {
        let generator = RandomIdGenerator::new();
        let ids: HashSet<_> = (0..1000)
            .map(|_| generator.generate(EntityKind::Like))
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn sequential_ids_share_one_counter() {
        let generator = SequentialIdGenerator::new();

        assert_eq!(generator.generate(EntityKind::Album), "album-000000");
        assert_eq!(generator.generate(EntityKind::Song), "song-000001");
        assert_eq!(
            generator.generate(EntityKind::PlaylistSong),
            "playlist_song-000002"
        );
    }

    #[test]
    fn sequential_ids_with_offset() {
        let generator = SequentialIdGenerator::with_offset(1000);
        assert_eq!(generator.generate(EntityKind::User), "user-001000");
    }

    #[test]
    fn generators_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomIdGenerator>();
        assert_send_sync::<SequentialIdGenerator>();
    }
}

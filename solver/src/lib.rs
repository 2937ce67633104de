pub mod driver;
pub mod game;
pub mod index;
pub mod registry;
pub mod zielonka;


pub type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
pub type Map<K, V> = rustc_hash::FxHashMap<K, V>;

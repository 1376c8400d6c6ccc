//! Asynchronous asset loading, joined once before a game starts.

use futures::future::{self, LocalBoxFuture};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::structs::Size;

#[derive(Clone, Debug, PartialEq)]
pub enum AssetKind {
    Image { size: Size },
    Font { family: String },
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedAsset {
    pub name: String,
    pub kind: AssetKind,
    pub bytes: Vec<u8>,
}

/// Fetches one asset. Implementations do their own I/O; the engine only
/// awaits the returned future.
pub trait AssetSource {
    fn name(&self) -> &str;
    fn load(&self) -> LocalBoxFuture<'static, Result<LoadedAsset>>;
}

/// Asset whose bytes are already in memory.
#[derive(Clone, Debug)]
pub struct InMemoryAsset(pub LoadedAsset);

impl InMemoryAsset {
    pub fn image(name: impl Into<String>, size: Size) -> Self {
        Self(LoadedAsset {
            name: name.into(),
            kind: AssetKind::Image { size },
            bytes: Vec::new(),
        })
    }
}

impl AssetSource for InMemoryAsset {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn load(&self) -> LocalBoxFuture<'static, Result<LoadedAsset>> {
        Box::pin(future::ready(Ok(self.0.clone())))
    }
}

/// Loaded assets by name.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    assets: IndexMap<String, LoadedAsset>,
}

impl AssetStore {
    /// Loads every source concurrently; the first failure fails the whole set.
    pub async fn load_all(sources: &[Box<dyn AssetSource>]) -> Result<Self> {
        let loaded = future::try_join_all(sources.iter().map(|s| s.load())).await?;
        let mut store = Self::default();
        for asset in loaded {
            if store.assets.contains_key(&asset.name) {
                return Err(Error::Asset(format!("asset \"{}\" loaded twice", asset.name)));
            }
            store.assets.insert(asset.name.clone(), asset);
        }
        Ok(store)
    }

    pub fn get(&self, name: &str) -> Option<&LoadedAsset> {
        self.assets.get(name)
    }

    pub fn image_size(&self, name: &str) -> Option<Size> {
        match self.get(name)?.kind {
            AssetKind::Image { size } => Some(size),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn merge(&mut self, other: AssetStore) {
        self.assets.extend(other.assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl AssetSource for Failing {
        fn name(&self) -> &str {
            "broken.png"
        }

        fn load(&self) -> LocalBoxFuture<'static, Result<LoadedAsset>> {
            Box::pin(async { Err(Error::Asset("404 broken.png".to_string())) })
        }
    }

    #[test]
    fn loads_all_sources_at_one_join_point() {
        let sources: Vec<Box<dyn AssetSource>> = vec![
            Box::new(InMemoryAsset::image("a.png", Size::new(10.0, 20.0))),
            Box::new(InMemoryAsset::image("b.png", Size::square(5.0))),
        ];
        let store = pollster::block_on(AssetStore::load_all(&sources)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.image_size("a.png"), Some(Size::new(10.0, 20.0)));
    }

    #[test]
    fn one_failure_rejects_the_load() {
        let sources: Vec<Box<dyn AssetSource>> = vec![
            Box::new(InMemoryAsset::image("a.png", Size::square(1.0))),
            Box::new(Failing),
        ];
        let result = pollster::block_on(AssetStore::load_all(&sources));
        assert_eq!(result.unwrap_err(), Error::Asset("404 broken.png".to_string()));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let sources: Vec<Box<dyn AssetSource>> = vec![
            Box::new(InMemoryAsset::image("a.png", Size::square(1.0))),
            Box::new(InMemoryAsset::image("a.png", Size::square(2.0))),
        ];
        assert!(pollster::block_on(AssetStore::load_all(&sources)).is_err());
    }
}

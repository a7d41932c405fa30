//! Clip Registry: the clip set of the active theme.

use super::{ClipMedia, ClipName, Theme};
use log::debug;
use std::collections::BTreeMap;

/// A theme's clips keyed by name.
pub type ClipSet<M> = BTreeMap<ClipName, M>;

/// Holds the playable clips of one theme.
///
/// Lookups of a name the theme does not ship return `None`; that is not an
/// error here, the transition engine turns it into a no-op. Installing a
/// new set swaps the whole mapping in one step and releases the old media.
#[derive(Debug)]
pub struct ClipRegistry<M> {
    theme: Option<Theme>,
    clips: ClipSet<M>,
}

impl<M> Default for ClipRegistry<M> {
    fn default() -> Self {
        Self {
            theme: None,
            clips: ClipSet::new(),
        }
    }
}

impl<M: ClipMedia> ClipRegistry<M> {
    /// An empty registry with no theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme of the installed set, `None` before the first install.
    #[inline]
    pub const fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Look up a clip.
    #[inline]
    pub fn get(&self, name: ClipName) -> Option<&M> {
        self.clips.get(&name)
    }

    /// Look up a clip mutably.
    #[inline]
    pub fn get_mut(&mut self, name: ClipName) -> Option<&mut M> {
        self.clips.get_mut(&name)
    }

    /// Whether the installed theme ships `name`.
    #[inline]
    pub fn contains(&self, name: ClipName) -> bool {
        self.clips.contains_key(&name)
    }

    /// Number of installed clips.
    #[inline]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether nothing is installed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Installed clip names in order.
    pub fn names(&self) -> impl Iterator<Item = ClipName> + '_ {
        self.clips.keys().copied()
    }

    /// All installed clips.
    pub fn iter(&self) -> impl Iterator<Item = (ClipName, &M)> {
        self.clips.iter().map(|(name, clip)| (*name, clip))
    }

    /// All installed clips, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ClipName, &mut M)> {
        self.clips.iter_mut().map(|(name, clip)| (*name, clip))
    }

    /// Replace the whole set, releasing the previous clips' media.
    pub fn install(&mut self, theme: Theme, clips: ClipSet<M>) {
        let mut previous = std::mem::replace(&mut self.clips, clips);
        for clip in previous.values_mut() {
            clip.release();
        }
        debug!(
            "registry: installed {} clips for {:?}, released {}",
            self.clips.len(),
            theme,
            previous.len()
        );
        self.theme = Some(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::testing::{fake_set, FakeClip};

    #[test]
    fn test_empty_registry() {
        let registry: ClipRegistry<FakeClip> = ClipRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.theme().is_none());
        assert!(registry.get(ClipName::Idle).is_none());
    }

    #[test]
    fn test_install_and_lookup() {
        let mut registry = ClipRegistry::new();
        registry.install(Theme::Night, fake_set(&[ClipName::Idle, ClipName::Roar]));

        assert_eq!(registry.theme(), Some(Theme::Night));
        assert!(registry.contains(ClipName::Roar));
        assert!(registry.get(ClipName::Eat).is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![ClipName::Idle, ClipName::Roar]);
    }

    #[test]
    fn test_install_releases_previous() {
        let mut registry = ClipRegistry::new();
        let first = fake_set(&[ClipName::Idle]);
        let probe = first[&ClipName::Idle].probe();
        registry.install(Theme::Day, first);
        assert!(!probe.borrow().released);

        registry.install(Theme::Night, fake_set(&[ClipName::Idle, ClipName::Eat]));
        assert!(probe.borrow().released);
        assert_eq!(registry.len(), 2);
    }
}

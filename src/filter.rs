//! Level/tag admission filter and per-tag level override table.
//!
//! All storage is inline; setters truncate to the configured maximum
//! lengths instead of failing.

use core::sync::atomic::{fence, AtomicU32, AtomicU8, AtomicUsize, Ordering};

use crate::config::{FILTER_KW_MAX_LEN, FILTER_TAG_LVL_MAX_NUM, FILTER_TAG_MAX_LEN};
use crate::error::LogError;
use crate::level::{LogLevel, LEVEL_ALL};

/// Inline string with a fixed byte capacity.
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    /// Create empty string.
    pub const fn new() -> Self {
        Self { buf: [0u8; N], len: 0 }
    }

    /// Build from `s`, truncated to `N` bytes.
    pub fn from_str_truncated(s: &str) -> Self {
        let mut out = Self::new();
        out.set(s);
        out
    }

    /// Replace contents, truncating to `N` bytes on a char boundary.
    pub fn set(&mut self, s: &str) {
        let mut copy_len = s.len().min(N);
        while !s.is_char_boundary(copy_len) {
            copy_len -= 1;
        }
        self.buf[..copy_len].copy_from_slice(&s.as_bytes()[..copy_len]);
        self.len = copy_len;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> core::fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self.as_str(), f)
    }
}

/// Tag string as stored by the filter.
pub type TagStr = FixedStr<FILTER_TAG_MAX_LEN>;

/// Keyword string as stored by the filter.
pub type KeywordStr = FixedStr<FILTER_KW_MAX_LEN>;

/// One override slot.
#[derive(Clone, Copy, Debug)]
struct TagLevelSlot {
    tag: TagStr,
    level: LogLevel,
    in_use: bool,
}

impl TagLevelSlot {
    const EMPTY: Self = Self {
        tag: TagStr::new(),
        level: LEVEL_ALL,
        in_use: false,
    };
}

/// Fixed table of per-tag level overrides.
///
/// Populated and queried only; admission does not consult it.
#[derive(Clone, Copy, Debug)]
pub struct TagLevelTable<const SLOTS: usize = FILTER_TAG_LVL_MAX_NUM> {
    slots: [TagLevelSlot; SLOTS],
}

impl<const SLOTS: usize> TagLevelTable<SLOTS> {
    pub const fn new() -> Self {
        Self {
            slots: [TagLevelSlot::EMPTY; SLOTS],
        }
    }

    /// Upsert or remove an override.
    ///
    /// `LEVEL_ALL` removes an existing entry and is a no-op for an unknown tag.
    /// A new tag claims the first free slot; [`LogError::TagTableFull`] when
    /// there is none (table unchanged).
    pub fn set(&mut self, tag: &str, level: LogLevel) -> Result<(), LogError> {
        let key = TagStr::from_str_truncated(tag);

        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.in_use && slot.tag.as_str() == key.as_str())
        {
            if level == LEVEL_ALL {
                *slot = TagLevelSlot::EMPTY;
            } else {
                slot.level = level;
            }
            return Ok(());
        }

        if level == LEVEL_ALL {
            return Ok(());
        }

        match self.slots.iter_mut().find(|slot| !slot.in_use) {
            Some(slot) => {
                *slot = TagLevelSlot {
                    tag: key,
                    level,
                    in_use: true,
                };
                Ok(())
            }
            None => Err(LogError::TagTableFull),
        }
    }

    /// Stored level for `tag`, or `LEVEL_ALL` if none.
    pub fn get(&self, tag: &str) -> LogLevel {
        let key = TagStr::from_str_truncated(tag);
        self.slots
            .iter()
            .find(|slot| slot.in_use && slot.tag.as_str() == key.as_str())
            .map_or(LEVEL_ALL, |slot| slot.level)
    }

    /// Number of slots in use.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        SLOTS
    }
}

impl<const SLOTS: usize> Default for TagLevelTable<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Output filter: threshold, tag substring, keyword and override table.
#[derive(Clone, Copy, Debug)]
pub struct Filter {
    level: LogLevel,
    tag: TagStr,
    /// Stored and reported, not used by admission.
    keyword: KeywordStr,
    tag_levels: TagLevelTable,
}

impl Filter {
    /// Filter admitting everything up to `level`, any tag.
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level,
            tag: TagStr::new(),
            keyword: KeywordStr::new(),
            tag_levels: TagLevelTable::new(),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag.set(tag);
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword.set(keyword);
    }

    /// Set threshold, tag substring and keyword together.
    pub fn set(&mut self, level: LogLevel, tag: &str, keyword: &str) {
        self.set_level(level);
        self.set_tag(tag);
        self.set_keyword(keyword);
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }

    pub fn keyword(&self) -> &str {
        self.keyword.as_str()
    }

    pub fn set_tag_level(&mut self, tag: &str, level: LogLevel) -> Result<(), LogError> {
        self.tag_levels.set(tag, level)
    }

    pub fn tag_level(&self, tag: &str) -> LogLevel {
        self.tag_levels.get(tag)
    }

    pub fn tag_levels(&self) -> &TagLevelTable {
        &self.tag_levels
    }

    /// Admission: `level <= threshold` and `tag` contains the tag substring.
    #[inline]
    pub fn admit(&self, level: LogLevel, tag: &str) -> bool {
        level <= self.level && tag.contains(self.tag.as_str())
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(LEVEL_ALL)
    }
}

/// Read attempts before [`TagMirror::load`] gives up on a torn snapshot.
const MIRROR_READ_RETRIES: usize = 4;

/// One published copy of the tag filter, guarded by its own sequence count.
struct MirrorSlot {
    version: AtomicU32,
    len: AtomicUsize,
    bytes: [AtomicU8; FILTER_TAG_MAX_LEN],
}

impl MirrorSlot {
    const fn new() -> Self {
        Self {
            version: AtomicU32::new(0),
            len: AtomicUsize::new(0),
            bytes: [const { AtomicU8::new(0) }; FILTER_TAG_MAX_LEN],
        }
    }
}

/// Lock-free copy of the tag filter for admission before sequencing.
///
/// ```text
/// publish():  write inactive slot (version odd → bytes → version even) → flip active
/// load():     read active slot, retry if its version was odd or moved
/// ```
///
/// Publishers must be serialized (the logger publishes under the output
/// lock). Readers never block: an interrupt that preempts a publisher reads
/// the slot that is not being written.
pub struct TagMirror {
    active: AtomicUsize,
    slots: [MirrorSlot; 2],
}

impl TagMirror {
    /// Mirror of an empty tag filter (matches every tag).
    pub const fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            slots: [MirrorSlot::new(), MirrorSlot::new()],
        }
    }

    /// Publish `tag`, truncated like [`Filter::set_tag`].
    pub fn publish(&self, tag: &str) {
        let tag = TagStr::from_str_truncated(tag);
        let next = 1 - self.active.load(Ordering::Acquire);
        let slot = &self.slots[next];

        let version = slot.version.load(Ordering::Relaxed);
        slot.version.store(version.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (dst, &byte) in slot.bytes.iter().zip(tag.as_str().as_bytes()) {
            dst.store(byte, Ordering::Relaxed);
        }
        slot.len.store(tag.len(), Ordering::Relaxed);

        slot.version.store(version.wrapping_add(2), Ordering::Release);
        self.active.store(next, Ordering::Release);
    }

    /// Consistent snapshot of the published tag, or `None` if every attempt
    /// raced a publisher.
    pub fn load(&self) -> Option<TagStr> {
        for _ in 0..MIRROR_READ_RETRIES {
            let slot = &self.slots[self.active.load(Ordering::Acquire)];

            let before = slot.version.load(Ordering::Acquire);
            if before % 2 == 1 {
                continue;
            }

            let mut raw = [0u8; FILTER_TAG_MAX_LEN];
            let len = slot.len.load(Ordering::Relaxed).min(FILTER_TAG_MAX_LEN);
            for (dst, src) in raw[..len].iter_mut().zip(&slot.bytes) {
                *dst = src.load(Ordering::Relaxed);
            }

            fence(Ordering::Acquire);
            if slot.version.load(Ordering::Relaxed) != before {
                continue;
            }

            if let Ok(text) = core::str::from_utf8(&raw[..len]) {
                return Some(TagStr::from_str_truncated(text));
            }
        }
        None
    }

    /// Whether `tag` passes the published filter; `None` if undecided.
    #[inline]
    pub fn matches(&self, tag: &str) -> Option<bool> {
        self.load().map(|filter| tag.contains(filter.as_str()))
    }
}

impl Default for TagMirror {
    fn default() -> Self {
        Self::new()
    }
}

//! Ordered label → optional texture mapping shown as one choice control.

use crate::error::{MaterialError, MaterialResult};
use crate::material::TextureHandle;

/// Ordered mapping from a human-readable label to a texture (or none).
///
/// Labels are unique. Order is presentation order only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureSlot {
    entries: Vec<(String, Option<TextureHandle>)>,
}

impl TextureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot with the conventional leading `"none"` entry.
    pub fn with_none() -> Self {
        Self {
            entries: vec![("none".to_string(), None)],
        }
    }

    /// Append an entry; duplicate labels are rejected.
    pub fn insert(&mut self, label: impl Into<String>, texture: Option<TextureHandle>) -> MaterialResult<()> {
        let label = label.into();
        if self.contains(&label) {
            return Err(MaterialError::DuplicateLabel(label));
        }
        self.entries.push((label, texture));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, label: impl Into<String>, texture: Option<TextureHandle>) -> MaterialResult<Self> {
        self.insert(label, texture)?;
        Ok(self)
    }

    /// Outer `None` means the label is unknown; inner `None` means "no texture".
    pub fn get(&self, label: &str) -> Option<Option<TextureHandle>> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| *t)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<TextureHandle>)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), *t))
    }

    /// First label bound to `texture`, used to show the current selection.
    pub fn label_of(&self, texture: Option<TextureHandle>) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| *t == texture)
            .map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> TextureSlot {
        TextureSlot::with_none()
            .with("blocks", Some(TextureHandle(7)))
            .unwrap()
    }

    #[test]
    fn lookup_distinguishes_unknown_from_none() {
        let slot = blocks();
        assert_eq!(slot.get("none"), Some(None));
        assert_eq!(slot.get("blocks"), Some(Some(TextureHandle(7))));
        assert_eq!(slot.get("bricks"), None);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut slot = blocks();
        let err = slot.insert("blocks", None).unwrap_err();
        assert_eq!(err, MaterialError::DuplicateLabel("blocks".into()));
        assert_eq!(slot.len(), 2);
    }

    #[test]
    fn labels_keep_insertion_order() {
        let slot = TextureSlot::with_none()
            .with("threeTone", Some(TextureHandle(1)))
            .unwrap()
            .with("fiveTone", Some(TextureHandle(2)))
            .unwrap();
        let labels: Vec<&str> = slot.labels().collect();
        assert_eq!(labels, ["none", "threeTone", "fiveTone"]);
        assert_eq!(slot.label_of(Some(TextureHandle(2))), Some("fiveTone"));
        assert_eq!(slot.label_of(None), Some("none"));
    }
}

//! Faces keyed by family and style name.

use std::collections::BTreeMap;

use crate::face::Face;
use crate::raster::RasterFace;

/// Resident faces, unique by `(family, style)`.
pub struct Registry<F> {
    families: BTreeMap<String, BTreeMap<String, Face<F>>>,
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Registry {
            families: BTreeMap::new(),
        }
    }
}

impl<F: RasterFace> Registry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, family: &str, style: &str) -> bool {
        self.get(family, style).is_some()
    }

    pub fn get(&self, family: &str, style: &str) -> Option<&Face<F>> {
        self.families.get(family)?.get(style)
    }

    pub fn get_mut(&mut self, family: &str, style: &str) -> Option<&mut Face<F>> {
        self.families.get_mut(family)?.get_mut(style)
    }

    /// First `(family, style)` in `faces` that is already registered or
    /// appears twice in the batch.
    pub fn find_conflict<'a>(&self, faces: &'a [Face<F>]) -> Option<(&'a str, &'a str)> {
        faces.iter().enumerate().find_map(|(i, face)| {
            let (family, style) = (face.family_name(), face.style_name());
            let repeated = faces[..i]
                .iter()
                .any(|earlier| earlier.family_name() == family && earlier.style_name() == style);
            (repeated || self.contains(family, style)).then_some((family, style))
        })
    }

    /// Register a batch of faces. The caller has checked it with
    /// [`find_conflict`](Self::find_conflict).
    pub fn insert_all(&mut self, faces: Vec<Face<F>>) {
        for face in faces {
            let family = face.family_name().to_string();
            let style = face.style_name().to_string();
            self.families.entry(family).or_default().insert(style, face);
        }
    }

    /// Remove every style of `family`, returning how many faces were dropped.
    pub fn remove_family(&mut self, family: &str) -> usize {
        self.families.remove(family).map_or(0, |styles| styles.len())
    }

    /// `(family, style)` pairs in sorted order.
    pub fn names(&self) -> Vec<(String, String)> {
        self.families
            .iter()
            .flat_map(|(family, styles)| {
                styles
                    .keys()
                    .map(move |style| (family.clone(), style.clone()))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Face<F>> {
        self.families.values().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.families.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn clear(&mut self) {
        self.families.clear();
    }
}

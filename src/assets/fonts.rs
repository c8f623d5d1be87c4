use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

/// Where a [`FontBook`] looks for font faces.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FontSettings {
    /// Load the fonts installed on the host system.
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,
    /// Extra directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone)]
/// A concrete font face picked for a `(family, weight)` request.
pub struct ResolvedFont {
    /// Family name of the face that was picked (may differ from the request on fallback).
    pub family: String,
    /// Weight of the picked face.
    pub weight: u16,
    /// Raw font file bytes.
    pub data: Arc<Vec<u8>>,
    /// Face index inside `data` (non-zero for collections).
    pub index: u32,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Font lookup by CSS-style family name and numeric weight.
///
/// Requests that name an unknown family fall back to the generic sans-serif family, then to any
/// loaded face. Lookups are memoized per `(family, weight)`.
pub struct FontBook {
    db: fontdb::Database,
    cache: HashMap<(String, u16), Option<ResolvedFont>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontBook {
    /// A book with no faces; every text layer will be skipped.
    pub fn empty() -> Self {
        Self::from_database(fontdb::Database::new())
    }

    /// Build a book from settings.
    pub fn new(settings: &FontSettings) -> Self {
        let mut db = fontdb::Database::new();
        if settings.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &settings.font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font book loaded");
        Self::from_database(db)
    }

    fn from_database(db: fontdb::Database) -> Self {
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    /// Register an in-memory font file.
    pub fn add_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.cache.clear();
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Sorted, de-duplicated family names of all loaded faces.
    pub fn families(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .db
            .faces()
            .flat_map(|f| f.families.iter().map(|(name, _)| name.clone()))
            .collect();
        set.into_iter().collect()
    }

    /// Resolve a family/weight pair to a concrete face.
    pub fn resolve(&mut self, family: &str, weight: u16) -> Option<ResolvedFont> {
        let key = (family.to_string(), weight);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let out = self.lookup(family, weight);
        if out.is_none() {
            tracing::warn!(family, weight, "no font face available");
        }
        self.cache.insert(key, out.clone());
        out
    }

    fn lookup(&self, family: &str, weight: u16) -> Option<ResolvedFont> {
        let mut families = Vec::<fontdb::Family<'_>>::new();
        for name in family.split(',').map(|s| s.trim().trim_matches(['"', '\''])) {
            if name.is_empty() {
                continue;
            }
            families.push(match name.to_ascii_lowercase().as_str() {
                "serif" => fontdb::Family::Serif,
                "sans-serif" => fontdb::Family::SansSerif,
                "cursive" => fontdb::Family::Cursive,
                "fantasy" => fontdb::Family::Fantasy,
                "monospace" => fontdb::Family::Monospace,
                _ => fontdb::Family::Name(name),
            });
        }
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;

        let face = self.db.face(id)?;
        let picked_family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.to_string());
        let picked_weight = face.weight.0;
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;

        Some(ResolvedFont {
            family: picked_family,
            weight: picked_weight,
            data: Arc::new(data),
            index,
        })
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;

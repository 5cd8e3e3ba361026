// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Furniture catalog and placed instances.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, check_in_plan};

/// One catalog item: a named box with a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog id, e.g. `"sofa"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category such as `"living"` or `"kitchen"`.
    #[serde(rename = "cat")]
    pub category: String,
    /// Width along local x.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Depth along local z.
    pub d: f64,
}

/// The set of placeable items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wrap a list of entries. Later duplicates of an id are unreachable through [`get`](Self::get).
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Look up an item by catalog id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Items in catalog order, optionally restricted to one category.
    pub fn filter<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| category.is_none_or(|c| e.category == c))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A catalog item placed in the design.
///
/// `mesh_id` identifies the instance; several instances can share a `catalog_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedFurniture {
    /// Instance id.
    pub mesh_id: String,
    /// Catalog item this is an instance of.
    pub catalog_id: String,
    /// Center x.
    pub x: f64,
    /// Base height.
    #[serde(default)]
    pub y: f64,
    /// Center z.
    pub z: f64,
    /// Yaw in radians.
    #[serde(default)]
    pub rot_y: f64,
    /// Floor level.
    #[serde(default)]
    pub floor: i32,
    /// Per-axis scale override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_scale: Option<[f64; 3]>,
    /// Color override, e.g. `"#aa8855"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
}

impl PlacedFurniture {
    /// A new instance at `(x, z)` with no overrides.
    pub fn new(
        mesh_id: impl Into<String>,
        catalog_id: impl Into<String>,
        x: f64,
        z: f64,
        rot_y: f64,
        floor: i32,
    ) -> Self {
        Self {
            mesh_id: mesh_id.into(),
            catalog_id: catalog_id.into(),
            x,
            y: 0.0,
            z,
            rot_y,
            floor,
            custom_scale: None,
            custom_color: None,
        }
    }

    /// Check that the position, yaw, and scale are usable.
    pub fn validate(&self) -> Result<(), RecordError> {
        check_in_plan("furniture", &[self.x, self.y, self.z, self.rot_y])?;
        match self.custom_scale {
            Some(s) if !s.iter().all(|v| v.is_finite() && *v > 0.0) => {
                Err(RecordError::NonPositiveSize {
                    what: "furniture scale",
                    w: s[0],
                    d: s[2],
                })
            }
            _ => Ok(()),
        }
    }

    /// Plan box centered on the instance using the catalog's raw width and depth.
    ///
    /// Rotation and scale are ignored; the result is a coarse bound for the
    /// index, not a collision shape.
    pub fn footprint(&self, item: &CatalogEntry) -> Rect {
        let (hw, hd) = (item.w / 2.0, item.d / 2.0);
        Rect::new(self.x - hw, self.z - hd, self.x + hw, self.z + hd)
    }
}

const ITEMS: &[(&str, &str, &str, [f64; 3])] = &[
    ("bed_double", "Double Bed", "bedroom", [1.8, 0.6, 2.0]),
    ("bed_single", "Single Bed", "bedroom", [1.0, 0.6, 2.0]),
    ("bed_king", "King Bed", "bedroom", [2.1, 0.6, 2.2]),
    ("wardrobe", "Wardrobe", "bedroom", [1.2, 2.0, 0.6]),
    ("nightstand", "Nightstand", "bedroom", [0.5, 0.55, 0.4]),
    ("dresser", "Dresser", "bedroom", [1.0, 0.85, 0.5]),
    ("sofa", "Sofa", "living", [2.2, 0.85, 0.9]),
    ("sofa_3seat", "3-Seat Sofa", "living", [2.8, 0.85, 0.9]),
    ("sectional", "L-Sectional", "living", [2.8, 0.85, 2.8]),
    ("armchair", "Armchair", "living", [0.85, 0.85, 0.85]),
    ("coffee_tbl", "Coffee Table", "living", [1.0, 0.4, 0.6]),
    ("side_table", "Side Table", "living", [0.5, 0.55, 0.5]),
    ("tv_stand", "TV Stand", "living", [1.6, 0.5, 0.4]),
    ("bookshelf", "Bookshelf", "living", [1.0, 1.8, 0.35]),
    ("floor_lamp", "Floor Lamp", "living", [0.35, 1.5, 0.35]),
    ("plant_pot", "Potted Plant", "living", [0.4, 0.8, 0.4]),
    ("rug_rect", "Area Rug", "living", [2.5, 0.02, 1.8]),
    ("counter", "Counter", "kitchen", [1.0, 0.9, 0.6]),
    ("fridge", "Fridge", "kitchen", [0.7, 1.8, 0.7]),
    ("oven", "Stove/Oven", "kitchen", [0.6, 0.9, 0.6]),
    ("sink_kitchen", "Kitchen Sink", "kitchen", [0.8, 0.9, 0.6]),
    ("dining_tbl", "Dining Table", "kitchen", [1.4, 0.75, 0.8]),
    ("round_table", "Round Table", "kitchen", [1.0, 0.75, 1.0]),
    ("chair", "Chair", "kitchen", [0.5, 0.9, 0.5]),
    ("bar_stool", "Bar Stool", "kitchen", [0.4, 0.75, 0.4]),
    ("toilet", "Toilet", "bathroom", [0.4, 0.45, 0.65]),
    ("sink", "Sink", "bathroom", [0.55, 0.85, 0.45]),
    ("bathtub", "Bathtub", "bathroom", [0.8, 0.5, 1.7]),
    ("shower", "Shower", "bathroom", [0.9, 2.1, 0.9]),
    ("laundry", "Washer", "bathroom", [0.6, 0.85, 0.6]),
    ("desk", "Desk", "office", [1.4, 0.75, 0.7]),
    ("office_chair", "Office Chair", "office", [0.6, 1.0, 0.6]),
    ("monitor", "Monitor", "office", [0.55, 0.4, 0.2]),
    ("bench", "Bench", "outdoor", [1.5, 0.45, 0.5]),
    ("planter", "Potted Plant", "outdoor", [0.4, 0.8, 0.4]),
];

/// The built-in catalog.
pub fn default_catalog() -> Catalog {
    Catalog::new(
        ITEMS
            .iter()
            .map(|&(id, name, category, [w, h, d])| CatalogEntry {
                id: id.into(),
                name: name.into(),
                category: category.into(),
                w,
                h,
                d,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_and_filter() {
        let cat = default_catalog();
        let sofa = cat.get("sofa").unwrap();
        assert_eq!((sofa.w, sofa.h, sofa.d), (2.2, 0.85, 0.9));
        assert!(cat.get("spaceship").is_none());
        assert!(cat.filter(Some("office")).all(|e| e.category == "office"));
        assert_eq!(cat.filter(None).count(), cat.len());
        assert_eq!(cat.filter(Some("attic")).count(), 0);
    }

    #[test]
    fn footprint_ignores_rotation() {
        let cat = default_catalog();
        let sofa = cat.get("sofa").unwrap();
        let a = PlacedFurniture::new("m1", "sofa", 5.0, 5.0, 0.0, 0).footprint(sofa);
        let b = PlacedFurniture::new("m2", "sofa", 5.0, 5.0, 1.57, 0).footprint(sofa);
        assert_eq!(a, b);
        assert!((a.width() - 2.2).abs() < 1e-12);
        assert!((a.height() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn overrides_are_omitted_when_unset() {
        let f = PlacedFurniture::new("m1", "chair", 1.0, 2.0, 0.5, 1);
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["meshId"], "m1");
        assert_eq!(v["rotY"], 0.5);
        assert!(v.get("customScale").is_none());

        let entry = serde_json::to_value(default_catalog().get("chair").unwrap()).unwrap();
        assert_eq!(entry["cat"], "kitchen");
    }

    #[test]
    fn validate_rejects_far_or_broken_instances() {
        let mut f = PlacedFurniture::new("f_1", "sofa", 1.0, 2.0, 0.5, 0);
        assert!(f.validate().is_ok());
        f.custom_scale = Some([1.0, 0.0, 1.0]);
        assert!(matches!(f.validate(), Err(RecordError::NonPositiveSize { .. })));
        f.custom_scale = None;
        f.z = 1e12;
        assert!(matches!(f.validate(), Err(RecordError::OutOfPlan { what: "furniture", .. })));
        f.z = 2.0;
        f.rot_y = f64::NAN;
        assert!(f.validate().is_err());
    }
}

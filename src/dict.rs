//! Read-only schema view over parsed dictionary save frames.
//!
//! PDBx/mmCIF dictionaries describe their own schema in the same wire
//! format as data files: every save frame defines either a category or
//! an item. This module walks the save frames of parsed containers and
//! collects the definitions into flat, name-keyed lookups.
//!
//! No enforcement happens here; validating a data file against the
//! schema is the caller's business. Links between definitions are plain
//! name strings rather than references, so the dictionary owns no
//! cycles and can be handed around freely.
//!
//! ## Examples
//!
//! ```rust
//! use pdbx_cif::{parse_str, Dictionary};
//!
//! let text = "\
//! data_mmcif_demo.dic
//! _dictionary.title mmcif_demo.dic
//! _dictionary.version 1.0
//! save_cell
//! _category.id cell
//! _category.mandatory_code no
//! save_
//! save__cell.length_a
//! _item.name '_cell.length_a'
//! _item.category_id cell
//! _item.mandatory_code yes
//! _item_type.code float
//! save_
//! ";
//! let containers = parse_str(text).unwrap();
//! let dict = Dictionary::from_containers(&containers);
//!
//! assert_eq!(dict.version(), Some("1.0"));
//! let item = dict.item("_cell.length_a").unwrap();
//! assert!(item.is_mandatory());
//! assert_eq!(item.type_code(), Some("float"));
//! ```

use crate::model::{Container, Value};
use indexmap::IndexMap;

/// Schema metadata for one category, from its `save_<category>` frame.
#[derive(Clone, Debug, Default)]
pub struct CategoryDef {
    name: String,
    description: Option<String>,
    mandatory_code: Option<String>,
    key_items: Vec<String>,
    groups: Vec<String>,
    parent_categories: Vec<String>,
}

impl CategoryDef {
    /// The category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description, if the dictionary carries one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The raw `_category.mandatory_code` value.
    #[must_use]
    pub fn mandatory_code(&self) -> Option<&str> {
        self.mandatory_code.as_deref()
    }

    /// `true` when the mandatory code is `yes`.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("yes"))
    }

    /// Full item names forming the category key.
    #[must_use]
    pub fn key_items(&self) -> &[String] {
        &self.key_items
    }

    /// Category group memberships.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Categories this one links up to through its items' parent links.
    #[must_use]
    pub fn parent_categories(&self) -> &[String] {
        &self.parent_categories
    }
}

/// Schema metadata for one item, from its `save__<category>.<item>` frame.
#[derive(Clone, Debug, Default)]
pub struct ItemDef {
    name: String,
    category: Option<String>,
    mandatory_code: Option<String>,
    type_code: Option<String>,
    description: Option<String>,
    default_value: Option<String>,
    enumeration: Vec<String>,
    parents: Vec<String>,
    children: Vec<String>,
}

impl ItemDef {
    /// The full item name, `_category.item`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning category name.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The raw `_item.mandatory_code` value.
    #[must_use]
    pub fn mandatory_code(&self) -> Option<&str> {
        self.mandatory_code.as_deref()
    }

    /// `true` when the mandatory code is `yes`.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("yes"))
    }

    /// The `_item_type.code` type, e.g. `float`, `int`, `line`.
    #[must_use]
    pub fn type_code(&self) -> Option<&str> {
        self.type_code.as_deref()
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Dictionary default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Allowed values, when the item is enumerated.
    #[must_use]
    pub fn enumeration(&self) -> &[String] {
        &self.enumeration
    }

    /// Full names of parent items this item links to.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Full names of child items linking to this item.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// A flat, name-keyed view of every definition found in a container
/// list's save frames.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    title: Option<String>,
    version: Option<String>,
    categories: IndexMap<String, CategoryDef>,
    items: IndexMap<String, ItemDef>,
}

impl Dictionary {
    /// Collects definitions from the save frames of `containers`.
    ///
    /// Containers without save frames contribute nothing, so calling
    /// this on a plain data file yields an empty dictionary.
    #[must_use]
    pub fn from_containers(containers: &[Container]) -> Self {
        let mut dict = Dictionary::default();
        let mut links: Vec<(String, String)> = Vec::new();
        for container in containers {
            if let Some(meta) = container.category("dictionary") {
                if dict.title.is_none() {
                    dict.title = first_string(meta, "title");
                }
                if dict.version.is_none() {
                    dict.version = first_string(meta, "version");
                }
            }
            for frame in container.frames() {
                dict.collect_frame(frame, &mut links);
            }
        }
        dict.apply_links(links);
        dict
    }

    /// Dictionary title from `_dictionary.title`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Dictionary version from `_dictionary.version`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Looks up a category definition by category name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.get(name)
    }

    /// Looks up an item definition by full `_category.item` name.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemDef> {
        self.items.get(name)
    }

    /// All category definitions, in dictionary order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryDef> {
        self.categories.values()
    }

    /// All item definitions, in dictionary order.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// Number of category definitions.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of item definitions.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// `true` when no definitions were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.items.is_empty()
    }

    fn collect_frame(&mut self, frame: &Container, links: &mut Vec<(String, String)>) {
        if let Some(cat) = frame.category("category") {
            let name = first_string(cat, "id").unwrap_or_else(|| frame.name().to_string());
            let def = CategoryDef {
                description: first_string(cat, "description"),
                mandatory_code: first_string(cat, "mandatory_code"),
                key_items: frame
                    .category("category_key")
                    .map(|k| column_strings(k, "name"))
                    .unwrap_or_default(),
                groups: frame
                    .category("category_group")
                    .map(|g| column_strings(g, "id"))
                    .unwrap_or_default(),
                parent_categories: Vec::new(),
                name: name.clone(),
            };
            self.categories.insert(name, def);
        }
        if let Some(item_cat) = frame.category("item") {
            // An item frame can declare several items in one loop; the
            // type and enumeration apply to the item named by the frame,
            // or failing that to the first declared row.
            let mut primary: Option<String> = None;
            for row in 0..item_cat.row_count() {
                let Some(name) = item_cat.get("name", row).and_then(Value::as_str) else {
                    continue;
                };
                let def = ItemDef {
                    name: name.to_string(),
                    category: item_cat
                        .get("category_id", row)
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    mandatory_code: item_cat
                        .get("mandatory_code", row)
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    ..ItemDef::default()
                };
                if primary.is_none() || name == frame.name() {
                    primary = Some(name.to_string());
                }
                self.items.insert(name.to_string(), def);
            }
            if let Some(primary) = primary.and_then(|p| self.items.get_mut(&p)) {
                primary.type_code = frame
                    .category("item_type")
                    .and_then(|c| first_string(c, "code"));
                primary.description = frame
                    .category("item_description")
                    .and_then(|c| first_string(c, "description"));
                primary.default_value = frame
                    .category("item_default")
                    .and_then(|c| first_string(c, "value"));
                primary.enumeration = frame
                    .category("item_enumeration")
                    .map(|c| column_strings(c, "value"))
                    .unwrap_or_default();
            }
            if let Some(linked) = frame.category("item_linked") {
                for row in 0..linked.row_count() {
                    let child = linked.get("child_name", row).and_then(Value::as_str);
                    let parent = linked.get("parent_name", row).and_then(Value::as_str);
                    if let (Some(child), Some(parent)) = (child, parent) {
                        links.push((child.to_string(), parent.to_string()));
                    }
                }
            }
        }
    }

    /// Resolves collected child/parent item links into both item-level
    /// and category-level views. Links stay as names, never references.
    fn apply_links(&mut self, links: Vec<(String, String)>) {
        for (child, parent) in links {
            let parent_category = item_category_name(&parent);
            if let Some(child_def) = self.items.get_mut(&child) {
                if !child_def.parents.contains(&parent) {
                    child_def.parents.push(parent.clone());
                }
            }
            if let Some(parent_def) = self.items.get_mut(&parent) {
                if !parent_def.children.contains(&child) {
                    parent_def.children.push(child.clone());
                }
            }
            if let (Some(child_category), Some(parent_category)) =
                (item_category_name(&child), parent_category)
            {
                if let Some(def) = self.categories.get_mut(&child_category) {
                    if !def.parent_categories.contains(&parent_category) {
                        def.parent_categories.push(parent_category);
                    }
                }
            }
        }
    }
}

/// Extracts the category part of a full `_category.item` name.
fn item_category_name(full: &str) -> Option<String> {
    full.strip_prefix('_')?
        .split_once('.')
        .map(|(category, _)| category.to_string())
}

fn first_string(category: &crate::Category, item: &str) -> Option<String> {
    category.first(item)?.as_str().map(str::to_string)
}

fn column_strings(category: &crate::Category, item: &str) -> Vec<String> {
    (0..category.row_count())
        .filter_map(|row| category.get(item, row).and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    const DICT: &str = "\
data_demo_dict.dic
_dictionary.title demo_dict.dic
_dictionary.version 0.3
save_entity
_category.id entity
_category.description 'Details about molecular entities'
_category.mandatory_code no
loop_
_category_key.name
'_entity.id'
save_
save__entity.id
_item.name '_entity.id'
_item.category_id entity
_item.mandatory_code yes
_item_type.code code
save_
save__entity.type
_item.name '_entity.type'
_item.category_id entity
_item.mandatory_code no
_item_type.code line
loop_
_item_enumeration.value
polymer
non-polymer
water
save_
save__entity_poly.entity_id
_item.name '_entity_poly.entity_id'
_item.category_id entity_poly
_item.mandatory_code yes
loop_
_item_linked.child_name
_item_linked.parent_name
'_entity_poly.entity_id' '_entity.id'
save_
";

    fn demo() -> Dictionary {
        Dictionary::from_containers(&parse_str(DICT).expect("dictionary parses"))
    }

    #[test]
    fn header_metadata() {
        let dict = demo();
        assert_eq!(dict.title(), Some("demo_dict.dic"));
        assert_eq!(dict.version(), Some("0.3"));
    }

    #[test]
    fn category_definition() {
        let dict = demo();
        let entity = dict.category("entity").unwrap();
        assert!(!entity.is_mandatory());
        assert_eq!(entity.key_items(), &["_entity.id".to_string()]);
        assert!(entity.description().unwrap().contains("entities"));
    }

    #[test]
    fn item_definitions_keyed_by_full_name() {
        let dict = demo();
        assert_eq!(dict.item_count(), 3);
        let id = dict.item("_entity.id").unwrap();
        assert!(id.is_mandatory());
        assert_eq!(id.category(), Some("entity"));
        assert_eq!(id.type_code(), Some("code"));
    }

    #[test]
    fn enumerations_collected() {
        let dict = demo();
        let ty = dict.item("_entity.type").unwrap();
        assert_eq!(
            ty.enumeration(),
            &["polymer".to_string(), "non-polymer".to_string(), "water".to_string()]
        );
    }

    #[test]
    fn links_resolved_both_directions() {
        let dict = demo();
        let child = dict.item("_entity_poly.entity_id").unwrap();
        assert_eq!(child.parents(), &["_entity.id".to_string()]);
        let parent = dict.item("_entity.id").unwrap();
        assert_eq!(parent.children(), &["_entity_poly.entity_id".to_string()]);
    }

    #[test]
    fn category_parent_links() {
        let dict = demo();
        // entity_poly has no category frame of its own here, so only the
        // declared category picks up the link.
        assert!(dict.category("entity_poly").is_none());
        let entity = dict.category("entity").unwrap();
        assert!(entity.parent_categories().is_empty());
    }

    #[test]
    fn plain_data_file_yields_empty_dictionary() {
        let containers = parse_str("data_x\n_cell.length_a 10.0\n").unwrap();
        assert!(Dictionary::from_containers(&containers).is_empty());
    }
}

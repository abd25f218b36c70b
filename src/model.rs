//! The in-memory container graph for PDBx/mmCIF data.
//!
//! A parsed file is an ordered list of [`Container`]s (data blocks). Each
//! container holds named [`Category`] tables and, for data blocks, nested
//! save-frame containers (dictionary definitions). A category is a set of
//! named items (columns) with one or more aligned rows of [`Value`]s.
//!
//! Ordering is significant everywhere: categories, items, and rows are
//! kept in declaration order and serialize back in that order. The maps
//! are [`IndexMap`]s for exactly that reason.
//!
//! ## Sentinels
//!
//! mmCIF distinguishes a missing value (`?`, "unknown") and a value that
//! does not apply (`.`, "inapplicable") from real data. [`Value`] models
//! all three; a real data string that happens to equal `"."` or `"?"` is
//! [`Value::Present`] and round-trips in quoted form so it is never
//! confused with a sentinel.
//!
//! ## Examples
//!
//! ```rust
//! use pdbx_cif::{Container, Category, Value};
//!
//! let mut block = Container::data("demo");
//! let mut cat = Category::new("cell");
//! cat.add_item("length_a").unwrap();
//! cat.add_item("length_b").unwrap();
//! cat.append_row(vec![Value::from("10.0"), Value::Unknown]).unwrap();
//! block.insert_category(cat).unwrap();
//!
//! let cell = block.category("cell").unwrap();
//! assert_eq!(cell.first("length_a").and_then(Value::as_str), Some("10.0"));
//! assert!(cell.first("length_b").unwrap().is_unknown());
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// A single cell in a category row.
///
/// # Examples
///
/// ```rust
/// use pdbx_cif::Value;
///
/// let v = Value::from("ALA");
/// assert_eq!(v.as_str(), Some("ALA"));
/// assert!(Value::Unknown.is_unknown());
/// assert!(Value::Inapplicable.is_inapplicable());
///
/// // A literal "." is data, not the inapplicable sentinel.
/// assert!(Value::from(".").is_present());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Value {
    /// A real data string.
    Present(String),
    /// The `?` sentinel: the value exists but is not known.
    Unknown,
    /// The `.` sentinel: the item does not apply to this row.
    Inapplicable,
}

impl Value {
    /// Returns the contained string for [`Value::Present`], `None` for
    /// either sentinel.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Present(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is a real data string.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Value::Present(_))
    }

    /// Returns `true` for the `?` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Returns `true` for the `.` sentinel.
    #[must_use]
    pub const fn is_inapplicable(&self) -> bool {
        matches!(self, Value::Inapplicable)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Present(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Present(s)
    }
}

/// A named group of items with aligned rows.
///
/// Single-row categories arise from bare tag–value statements; multi-row
/// categories arise from `loop_` blocks. Item order is declaration order
/// and every row holds exactly one value per item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    name: String,
    items: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Category {
    /// Creates an empty category with the given name (no leading `_`,
    /// no `.item` suffix).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::Category;
    ///
    /// let cat = Category::new("atom_site");
    /// assert_eq!(cat.name(), "atom_site");
    /// assert_eq!(cat.row_count(), 0);
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            name: name.into(),
            items: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// The category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item names in declaration order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The rows, each aligned with [`Category::items`].
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the category declares no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Column index of `item`, if declared.
    #[must_use]
    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    /// Returns `true` if `item` is declared in this category.
    #[must_use]
    pub fn has_item(&self, item: &str) -> bool {
        self.item_index(item).is_some()
    }

    /// Declares a new item column.
    ///
    /// Existing rows are back-filled with [`Value::Unknown`].
    ///
    /// # Errors
    ///
    /// [`Error::Structural`] if an item of the same name is already
    /// declared.
    pub fn add_item(&mut self, item: impl Into<String>) -> Result<()> {
        let item = item.into();
        if self.has_item(&item) {
            return Err(Error::structural(format!(
                "duplicate item name _{}.{}",
                self.name, item
            )));
        }
        for row in &mut self.rows {
            row.push(Value::Unknown);
        }
        self.items.push(item);
        Ok(())
    }

    /// Appends a row of values aligned with the declared items.
    ///
    /// # Errors
    ///
    /// [`Error::Structural`] if the row length differs from the item
    /// count.
    pub fn append_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.items.len() {
            return Err(Error::structural(format!(
                "category {} expects {} values per row, got {}",
                self.name,
                self.items.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// The value of `item` in row `row`, if both exist.
    #[must_use]
    pub fn get(&self, item: &str, row: usize) -> Option<&Value> {
        let idx = self.item_index(item)?;
        self.rows.get(row)?.get(idx)
    }

    /// The value of `item` in the first row. Convenient for the
    /// single-row categories produced by bare tag–value statements.
    #[must_use]
    pub fn first(&self, item: &str) -> Option<&Value> {
        self.get(item, 0)
    }

    /// Replaces the value of `item` in row `row`.
    ///
    /// # Errors
    ///
    /// [`Error::Structural`] if the item or row does not exist.
    pub fn set(&mut self, item: &str, row: usize, value: Value) -> Result<()> {
        let idx = self.item_index(item).ok_or_else(|| {
            Error::structural(format!("no item _{}.{} to assign", self.name, item))
        })?;
        let slot = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(idx))
            .ok_or_else(|| {
                Error::structural(format!("category {} has no row {}", self.name, row))
            })?;
        *slot = value;
        Ok(())
    }
}

/// Whether a container is a top-level data block or a nested save frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    Data,
    Save,
}

/// A named top-level unit: a `data_` block, or a `save_` frame nested
/// one level inside a data block.
///
/// Containers are created by the parser and returned as an ordered list;
/// callers may freely mutate categories and rows before handing the list
/// back to the writer. The engine keeps no state between calls.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Container {
    name: String,
    kind: ContainerKind,
    categories: IndexMap<String, Category>,
    frames: IndexMap<String, Container>,
}

impl Container {
    /// Creates an empty data block.
    #[must_use]
    pub fn data(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            kind: ContainerKind::Data,
            categories: IndexMap::new(),
            frames: IndexMap::new(),
        }
    }

    /// Creates an empty save frame.
    #[must_use]
    pub fn save(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            kind: ContainerKind::Save,
            categories: IndexMap::new(),
            frames: IndexMap::new(),
        }
    }

    /// The container name (without the `data_`/`save_` prefix).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data block or save frame.
    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Returns `true` for a `data_` block.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self.kind, ContainerKind::Data)
    }

    /// Looks up a category by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Mutable category lookup.
    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Number of categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Inserts a category.
    ///
    /// # Errors
    ///
    /// [`Error::Structural`] if a category of the same name exists.
    /// Merging repeated bare tag–value statements is the parser's job;
    /// by the time a category reaches the container its name is final.
    pub fn insert_category(&mut self, category: Category) -> Result<()> {
        if self.categories.contains_key(category.name()) {
            return Err(Error::structural(format!(
                "duplicate category {} in container {}",
                category.name(),
                self.name
            )));
        }
        self.categories.insert(category.name().to_string(), category);
        Ok(())
    }

    /// Returns the category named `name`, creating an empty one if absent.
    pub fn category_or_insert(&mut self, name: &str) -> &mut Category {
        self.categories
            .entry(name.to_string())
            .or_insert_with(|| Category::new(name))
    }

    /// Save frames in declaration order. Empty for save frames.
    pub fn frames(&self) -> impl Iterator<Item = &Container> {
        self.frames.values()
    }

    /// Looks up a save frame by name.
    #[must_use]
    pub fn frame(&self, name: &str) -> Option<&Container> {
        self.frames.get(name)
    }

    /// Number of nested save frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Nests a save frame inside this data block.
    ///
    /// # Errors
    ///
    /// [`Error::Structural`] if this container is itself a save frame
    /// (frames nest exactly one level) or a frame of the same name
    /// already exists.
    pub fn insert_frame(&mut self, frame: Container) -> Result<()> {
        if !self.is_data() {
            return Err(Error::structural(format!(
                "save frame {} cannot nest inside save frame {}",
                frame.name, self.name
            )));
        }
        if self.frames.contains_key(frame.name()) {
            return Err(Error::structural(format!(
                "duplicate save frame {} in data block {}",
                frame.name(),
                self.name
            )));
        }
        self.frames.insert(frame.name().to_string(), frame);
        Ok(())
    }
}

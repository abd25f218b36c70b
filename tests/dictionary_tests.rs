//! Dictionary surface tests over a representative slice of a PDBx
//! dictionary: category frames, item frames, enumerations, and
//! parent–child links across categories.

use pdbx_cif::{parse_str, to_string, Dictionary};

const DICT: &str = "\
data_mmcif_slice.dic
_dictionary.title mmcif_slice.dic
_dictionary.datablock_id mmcif_slice.dic
_dictionary.version 5.301
#
save_atom_site
_category.id atom_site
_category.description
;  Data items in the ATOM_SITE category record details about
   the atom sites in a molecular model.
;
_category.mandatory_code no
loop_
_category_key.name
'_atom_site.id'
loop_
_category_group.id
'inclusive_group'
'atom_group'
save_
#
save__atom_site.id
_item.name '_atom_site.id'
_item.category_id atom_site
_item.mandatory_code yes
_item_type.code code
_item_description.description
; A unique identifier for each atom position.
;
save_
#
save__atom_site.group_PDB
_item.name '_atom_site.group_PDB'
_item.category_id atom_site
_item.mandatory_code no
_item_type.code ucode
_item_default.value ATOM
loop_
_item_enumeration.value
ATOM
HETATM
save_
#
save_atom_site_anisotrop
_category.id atom_site_anisotrop
_category.mandatory_code no
loop_
_category_key.name
'_atom_site_anisotrop.id'
save_
#
save__atom_site_anisotrop.id
_item.name '_atom_site_anisotrop.id'
_item.category_id atom_site_anisotrop
_item.mandatory_code yes
loop_
_item_linked.child_name
_item_linked.parent_name
'_atom_site_anisotrop.id' '_atom_site.id'
save_
";

fn slice_dict() -> Dictionary {
    Dictionary::from_containers(&parse_str(DICT).expect("dictionary parses"))
}

#[test]
fn header_fields() {
    let dict = slice_dict();
    assert_eq!(dict.title(), Some("mmcif_slice.dic"));
    assert_eq!(dict.version(), Some("5.301"));
}

#[test]
fn counts() {
    let dict = slice_dict();
    assert_eq!(dict.category_count(), 2);
    assert_eq!(dict.item_count(), 3);
    assert!(!dict.is_empty());
}

#[test]
fn category_metadata() {
    let dict = slice_dict();
    let atom_site = dict.category("atom_site").unwrap();
    assert_eq!(atom_site.name(), "atom_site");
    assert!(!atom_site.is_mandatory());
    assert_eq!(atom_site.key_items(), &["_atom_site.id".to_string()]);
    assert_eq!(
        atom_site.groups(),
        &["inclusive_group".to_string(), "atom_group".to_string()]
    );
    assert!(atom_site
        .description()
        .unwrap()
        .contains("atom sites in a molecular model"));
}

#[test]
fn item_metadata() {
    let dict = slice_dict();
    let id = dict.item("_atom_site.id").unwrap();
    assert_eq!(id.category(), Some("atom_site"));
    assert!(id.is_mandatory());
    assert_eq!(id.type_code(), Some("code"));
    assert!(id.description().unwrap().contains("unique identifier"));
}

#[test]
fn enumeration_and_default() {
    let dict = slice_dict();
    let group = dict.item("_atom_site.group_PDB").unwrap();
    assert_eq!(group.default_value(), Some("ATOM"));
    assert_eq!(
        group.enumeration(),
        &["ATOM".to_string(), "HETATM".to_string()]
    );
    assert!(!group.is_mandatory());
}

#[test]
fn item_links_both_directions() {
    let dict = slice_dict();
    let child = dict.item("_atom_site_anisotrop.id").unwrap();
    assert_eq!(child.parents(), &["_atom_site.id".to_string()]);
    let parent = dict.item("_atom_site.id").unwrap();
    assert_eq!(parent.children(), &["_atom_site_anisotrop.id".to_string()]);
}

#[test]
fn category_links_derived_from_item_links() {
    let dict = slice_dict();
    let anisotrop = dict.category("atom_site_anisotrop").unwrap();
    assert_eq!(anisotrop.parent_categories(), &["atom_site".to_string()]);
    assert!(dict.category("atom_site").unwrap().parent_categories().is_empty());
}

#[test]
fn definitions_keep_dictionary_order() {
    let dict = slice_dict();
    let names: Vec<_> = dict.categories().map(|c| c.name().to_string()).collect();
    assert_eq!(names, vec!["atom_site", "atom_site_anisotrop"]);
    let first_item = dict.items().next().unwrap();
    assert_eq!(first_item.name(), "_atom_site.id");
}

#[test]
fn dictionary_survives_rewrite() {
    let containers = parse_str(DICT).unwrap();
    let rewritten = to_string(&containers).unwrap();
    let dict = Dictionary::from_containers(&parse_str(&rewritten).unwrap());
    assert_eq!(dict.category_count(), 2);
    assert_eq!(dict.item_count(), 3);
    assert_eq!(
        dict.item("_atom_site.group_PDB").unwrap().enumeration(),
        &["ATOM".to_string(), "HETATM".to_string()]
    );
}

#[test]
fn lookup_misses_return_none() {
    let dict = slice_dict();
    assert!(dict.category("no_such_category").is_none());
    assert!(dict.item("_no.item").is_none());
}

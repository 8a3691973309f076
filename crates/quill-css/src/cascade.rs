//! CSS Cascading
//!
//! Resolves style rules onto a [`PropertyBag`] per element, per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).

use std::collections::{BTreeMap, HashMap};

use quill_common::warning::warn_once;
use quill_dom::{DomTree, NodeId, NodeType};
use serde::{Serialize, Serializer};

use crate::parser::{Declaration, Stylesheet, parse_stylesheet};
use crate::property::{KeywordProperty, PropertyValue};
use crate::selector::{Selector, Specificity};

/// A declaration tagged with the specificity of the rule it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedDeclaration {
    /// Property name, lower-cased.
    pub name: String,
    /// Validated value.
    pub value: PropertyValue,
    /// Specificity of the matching selector.
    pub specificity: Specificity,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

impl WeightedDeclaration {
    /// Validate a parsed declaration. Returns `None` (after a warning) when
    /// the value is not valid for the property.
    #[must_use]
    pub fn from_declaration(declaration: &Declaration, specificity: Specificity) -> Option<Self> {
        let text = declaration.value_text();
        let Some(value) = PropertyValue::parse(&declaration.name, &text) else {
            warn_once(
                "CSS",
                &format!("dropping invalid value '{text}' for '{}'", declaration.name),
            );
            return None;
        };
        Some(Self {
            name: declaration.name.clone(),
            value,
            specificity,
            important: declaration.important,
        })
    }
}

/// The value that won the cascade for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadedValue {
    /// The winning value.
    pub value: PropertyValue,
    /// Specificity of the rule that supplied it.
    pub specificity: Specificity,
    /// Whether it came from the important layer.
    pub important: bool,
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Per-element map from property name to its cascaded value.
///
/// Declarations are applied in source order. A declaration replaces the
/// stored entry when its specificity is greater than or equal to the stored
/// one, so among equals the later one wins. Important declarations live in
/// their own layer, which takes precedence over the normal layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    normal: BTreeMap<String, CascadedValue>,
    important: BTreeMap<String, CascadedValue>,
}

impl PropertyBag {
    /// Create an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            normal: BTreeMap::new(),
            important: BTreeMap::new(),
        }
    }

    /// Apply one declaration. Returns whether it was stored.
    pub fn apply(&mut self, declaration: WeightedDeclaration) -> bool {
        let layer = if declaration.important {
            &mut self.important
        } else {
            &mut self.normal
        };
        if let Some(existing) = layer.get(&declaration.name)
            && declaration.specificity < existing.specificity
        {
            return false;
        }
        let _ = layer.insert(
            declaration.name,
            CascadedValue {
                value: declaration.value,
                specificity: declaration.specificity,
                important: declaration.important,
            },
        );
        true
    }

    /// Apply a rule's declarations at `specificity`, in order.
    pub fn extend(&mut self, declarations: &[Declaration], specificity: Specificity) {
        for declaration in declarations {
            if let Some(weighted) = WeightedDeclaration::from_declaration(declaration, specificity) {
                let _ = self.apply(weighted);
            }
        }
    }

    /// The winning entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CascadedValue> {
        self.important.get(name).or_else(|| self.normal.get(name))
    }

    /// The winning value for `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).map(|cascaded| &cascaded.value)
    }

    /// Winning entries, ordered by property name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CascadedValue)> {
        let mut merged: BTreeMap<&str, &CascadedValue> = self
            .normal
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        merged.extend(
            self.important
                .iter()
                .map(|(name, value)| (name.as_str(), value)),
        );
        merged.into_iter()
    }

    /// The winning entries as `(name, value, specificity)` triples.
    #[must_use]
    pub fn declarations(&self) -> Vec<(String, PropertyValue, Specificity)> {
        self.iter()
            .map(|(name, cascaded)| (name.to_string(), cascaded.value.clone(), cascaded.specificity))
            .collect()
    }

    /// Number of distinct properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.normal.len()
            + self
                .important
                .keys()
                .filter(|name| !self.normal.contains_key(*name))
                .count()
    }

    /// Whether nothing has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.important.is_empty()
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// [HTML § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Parse the concatenated contents of every `<style>` element, in tree order.
#[must_use]
pub fn stylesheet_from_document(tree: &DomTree) -> Stylesheet {
    let mut css = String::new();
    for id in tree.descendants(tree.root()) {
        if tree.is_element_named(id, "style") {
            for &child in tree.children(id) {
                if let Some(text) = tree.as_text(child) {
                    css.push_str(text);
                    css.push('\n');
                }
            }
        }
    }
    parse_stylesheet(&css)
}

/// Specificity the selector applies with when it matches `id`. For a list,
/// the highest-specificity member that matches.
fn matched_specificity(selector: &Selector, tree: &DomTree, id: NodeId) -> Option<Specificity> {
    match selector {
        Selector::List(members) => members
            .iter()
            .filter(|member| member.matches(tree, id))
            .map(Selector::specificity)
            .max(),
        _ => selector.matches(tree, id).then(|| selector.specificity()),
    }
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Compute a property bag for every element in the tree.
pub fn compute_styles(tree: &DomTree, stylesheet: &Stylesheet) -> HashMap<NodeId, PropertyBag> {
    let mut styles = HashMap::new();
    let empty = PropertyBag::new();
    compute_node_styles(tree, tree.root(), stylesheet, &empty, &mut styles);
    styles
}

fn compute_node_styles(
    tree: &DomTree,
    id: NodeId,
    stylesheet: &Stylesheet,
    parent: &PropertyBag,
    styles: &mut HashMap<NodeId, PropertyBag>,
) {
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(_) => {
            let mut bag = inherit_from(parent);
            for rule in stylesheet.style_rules() {
                let Some(specificity) = matched_specificity(&rule.selector, tree, id) else {
                    continue;
                };
                for declaration in &rule.declarations {
                    let Some(mut weighted) =
                        WeightedDeclaration::from_declaration(declaration, specificity)
                    else {
                        continue;
                    };
                    if weighted.value == PropertyValue::Inherit {
                        weighted.value = inherited_value(parent, &weighted.name);
                    }
                    let _ = bag.apply(weighted);
                }
            }

            for &child in tree.children(id) {
                compute_node_styles(tree, child, stylesheet, &bag, styles);
            }
            let _ = styles.insert(id, bag);
        }
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(id) {
                compute_node_styles(tree, child, stylesheet, parent, styles);
            }
        }
        NodeType::DocumentType(_) | NodeType::Text(_) | NodeType::Comment(_) => {}
    }
}

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Seed a child's bag with the parent's inherited keyword properties at zero
/// specificity, so any matching declaration replaces them.
fn inherit_from(parent: &PropertyBag) -> PropertyBag {
    let mut bag = PropertyBag::new();
    for (name, cascaded) in parent.iter() {
        let inherited = name
            .parse::<KeywordProperty>()
            .is_ok_and(KeywordProperty::inherited);
        if inherited {
            let _ = bag.apply(WeightedDeclaration {
                name: name.to_string(),
                value: cascaded.value.clone(),
                specificity: Specificity::default(),
                important: false,
            });
        }
    }
    bag
}

/// [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#inherit)
///
/// The parent's value, or `initial` when the parent has none.
fn inherited_value(parent: &PropertyBag, name: &str) -> PropertyValue {
    parent
        .value(name)
        .cloned()
        .unwrap_or(PropertyValue::Initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(name: &str, value: &str, specificity: Specificity, important: bool) -> WeightedDeclaration {
        WeightedDeclaration {
            name: name.to_string(),
            value: PropertyValue::Opaque(value.to_string()),
            specificity,
            important,
        }
    }

    #[test]
    fn test_lower_specificity_does_not_replace() {
        let mut bag = PropertyBag::new();
        assert!(bag.apply(weighted("color", "red", Specificity::new(1, 0, 0), false)));
        assert!(!bag.apply(weighted("color", "blue", Specificity::new(0, 5, 0), false)));
        assert!(bag.apply(weighted("color", "green", Specificity::new(1, 0, 0), false)));
        assert_eq!(bag.value("color"), Some(&PropertyValue::Opaque("green".into())));
    }

    #[test]
    fn test_important_layer_wins_and_len_counts_names_once() {
        let mut bag = PropertyBag::new();
        let _ = bag.apply(weighted("color", "red", Specificity::new(0, 0, 1), true));
        let _ = bag.apply(weighted("color", "blue", Specificity::new(1, 0, 0), false));
        let _ = bag.apply(weighted("margin", "0", Specificity::new(0, 0, 1), false));
        assert_eq!(bag.value("color"), Some(&PropertyValue::Opaque("red".into())));
        assert_eq!(bag.len(), 2);
        let names: Vec<&str> = bag.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["color", "margin"]);
    }
}

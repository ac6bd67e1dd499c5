//! Presentation mirror of the element tree
//!
//! Stands in for the DOM: one element per node with a dom id, a parent link
//! and the node's attributes rendered as `data-*` strings. Only
//! [`ElementTree`](super::ElementTree) mutates it, always in the same call
//! that mutates the logical args.

use crate::core::{ArgValue, Args, Attr, NodeId, NodeKind};
use crate::{Result, UiError};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationElement {
    pub dom_id: String,
    pub class: &'static str,
    pub parent: Option<NodeId>,
    pub attributes: BTreeMap<String, String>,
}

impl PresentationElement {
    pub fn attribute(&self, attr: Attr) -> Option<&str> {
        self.attributes.get(&attr.data_name()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Presentation {
    elements: FxHashMap<NodeId, PresentationElement>,
    /// Number of rebinds after reparenting (for diagnostics)
    rebinds: u64,
}

fn render(args: &Args) -> BTreeMap<String, String> {
    args.iter()
        .map(|(attr, value)| (attr.data_name(), value.to_string()))
        .collect()
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn build(
        &mut self,
        id: NodeId,
        dom_id: String,
        kind: NodeKind,
        parent: Option<NodeId>,
        args: &Args,
    ) {
        self.elements.insert(
            id,
            PresentationElement {
                dom_id,
                class: kind.as_str(),
                parent,
                attributes: render(args),
            },
        );
    }

    pub(crate) fn set_attribute(&mut self, id: NodeId, attr: Attr, value: &ArgValue) -> Result<()> {
        let element = self.elements.get_mut(&id).ok_or(UiError::NodeNotFound(id))?;
        element.attributes.insert(attr.data_name(), value.to_string());
        Ok(())
    }

    pub(crate) fn remove_attribute(&mut self, id: NodeId, attr: Attr) -> Result<()> {
        let element = self.elements.get_mut(&id).ok_or(UiError::NodeNotFound(id))?;
        element.attributes.remove(&attr.data_name());
        Ok(())
    }

    /// Re-resolve an element after it moved: new dom id, new parent and
    /// every attribute re-applied from the logical args.
    pub(crate) fn rebind(
        &mut self,
        id: NodeId,
        dom_id: String,
        parent: NodeId,
        args: &Args,
    ) -> Result<()> {
        let element = self.elements.get_mut(&id).ok_or(UiError::NodeNotFound(id))?;
        element.dom_id = dom_id;
        element.parent = Some(parent);
        element.attributes = render(args);
        self.rebinds += 1;
        Ok(())
    }

    pub(crate) fn destroy(&mut self, id: NodeId) {
        self.elements.remove(&id);
    }

    pub fn element(&self, id: NodeId) -> Option<&PresentationElement> {
        self.elements.get(&id)
    }

    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .find(|(_, e)| e.dom_id == dom_id)
            .map(|(id, _)| *id)
    }

    pub fn rebinds(&self) -> u64 {
        self.rebinds
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Compare one element against the logical state it should mirror
    pub(crate) fn check(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        args: &Args,
    ) -> std::result::Result<(), String> {
        let element = self
            .elements
            .get(&id)
            .ok_or_else(|| "no presentation element".to_string())?;
        if element.parent != parent {
            return Err(format!(
                "parent is {:?}, expected {:?}",
                element.parent, parent
            ));
        }
        let expected = render(args);
        if element.attributes != expected {
            return Err(format!(
                "attributes {:?}, expected {:?}",
                element.attributes, expected
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_renders_data_attributes() {
        let mut presentation = Presentation::new();
        let args = crate::node_args![Attr::Supply => 2u32, Attr::Active => false];
        presentation.build(NodeId::new(3), "postcards_card-3".into(), NodeKind::Postcard, None, &args);

        let element = presentation.element(NodeId::new(3)).unwrap();
        assert_eq!(element.class, "postcard");
        assert_eq!(element.attribute(Attr::Supply), Some("2"));
        assert_eq!(element.attribute(Attr::Active), Some("false"));
        assert!(presentation.check(NodeId::new(3), None, &args).is_ok());
    }

    #[test]
    fn test_check_reports_divergence() {
        let mut presentation = Presentation::new();
        let args = crate::node_args![Attr::Supply => 2u32];
        presentation.build(NodeId::new(1), "x".into(), NodeKind::Postcard, None, &args);
        presentation
            .set_attribute(NodeId::new(1), Attr::Supply, &ArgValue::Int(5))
            .unwrap();
        assert!(presentation.check(NodeId::new(1), None, &args).is_err());
    }
}

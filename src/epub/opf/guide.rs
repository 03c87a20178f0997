//! 指南模块（EPUB 2的`<guide>`）

use crate::epub::namespace;
use crate::epub::xml::XmlNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideReference {
    pub id: Option<String>,
    pub href: Option<String>,
    pub title: Option<String>,
    /// 引用类型，例如`cover`、`toc`、`text`
    pub reference_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guide {
    pub id: Option<String>,
    pub references: Vec<GuideReference>,
}

impl Guide {
    /// 从`<guide>`元素解析
    pub fn parse(node: &XmlNode) -> Self {
        let references = node
            .children(namespace::OPF, "reference")
            .map(|reference| GuideReference {
                id: reference.attr_string("id"),
                href: reference.attr_string("href"),
                title: reference.attr_string("title"),
                reference_type: reference.attr_string("type"),
            })
            .collect();
        Self {
            id: node.attr_string("id"),
            references,
        }
    }

    pub fn reference_by_type(&self, reference_type: &str) -> Option<&GuideReference> {
        self.references
            .iter()
            .find(|r| r.reference_type.as_deref() == Some(reference_type))
    }

    pub fn reference_by_id(&self, id: &str) -> Option<&GuideReference> {
        self.references.iter().find(|r| r.id.as_deref() == Some(id))
    }
}

//! 脊柱模块
//!
//! 提供EPUB包中阅读顺序（脊柱）的结构定义。

use crate::epub::namespace;
use crate::epub::xml::XmlNode;

/// 脊柱项信息(阅读顺序)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Itemref {
    pub id: Option<String>,
    /// 引用的清单项ID
    pub idref: String,
    /// `linear`属性原值，缺省视为`yes`
    pub linear: Option<String>,
    pub properties: Option<String>,
}

impl Itemref {
    /// 创建指定线性属性的脊柱项
    pub fn with_linear(idref: impl Into<String>, linear: Option<&str>) -> Self {
        Self {
            idref: idref.into(),
            linear: linear.map(str::to_string),
            ..Self::default()
        }
    }

    /// 检查是否为线性阅读
    pub fn is_linear(&self) -> bool {
        self.linear.as_deref() != Some("no")
    }
}

/// OPF `<spine>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spine {
    pub id: Option<String>,
    pub page_progression_direction: Option<String>,
    /// NCX清单项ID
    pub toc: Option<String>,
    pub itemrefs: Vec<Itemref>,
}

impl Spine {
    /// 从`<spine>`元素解析
    pub fn parse(node: &XmlNode) -> Self {
        let itemrefs = node
            .children(namespace::OPF, "itemref")
            .map(|itemref| Itemref {
                id: itemref.attr_string("id"),
                idref: itemref.attr_string("idref").unwrap_or_default(),
                linear: itemref.attr_string("linear"),
                properties: itemref.attr_string("properties"),
            })
            .collect();

        Self {
            id: node.attr_string("id"),
            page_progression_direction: node.attr_string("page-progression-direction"),
            toc: node.attr_string("toc"),
            itemrefs,
        }
    }

    /// 线性脊柱项，保持原顺序
    pub fn linear_itemrefs(&self) -> Vec<&Itemref> {
        self.itemrefs.iter().filter(|itemref| itemref.is_linear()).collect()
    }

    pub fn itemref_by_idref(&self, idref: &str) -> Option<&Itemref> {
        self.itemrefs.iter().find(|itemref| itemref.idref == idref)
    }

    /// 在全部脊柱项中的位置
    pub fn index_by_idref(&self, idref: &str) -> Option<usize> {
        self.itemrefs.iter().position(|itemref| itemref.idref == idref)
    }

    /// 在线性脊柱项中的位置
    pub fn linear_index_by_idref(&self, idref: &str) -> Option<usize> {
        self.linear_itemrefs().iter().position(|itemref| itemref.idref == idref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spine() -> Spine {
        Spine {
            itemrefs: vec![
                Itemref::with_linear("a", Some("yes")),
                Itemref::with_linear("b", Some("no")),
                Itemref::with_linear("c", None),
                Itemref::with_linear("d", Some("no")),
            ],
            ..Spine::default()
        }
    }

    #[test]
    fn test_linear_itemrefs() {
        let spine = spine();
        let linear: Vec<&str> = spine.linear_itemrefs().iter().map(|i| i.idref.as_str()).collect();
        assert_eq!(linear, vec!["a", "c"]);
    }

    #[test]
    fn test_indices() {
        let spine = spine();
        assert_eq!(spine.index_by_idref("c"), Some(2));
        assert_eq!(spine.linear_index_by_idref("c"), Some(1));
        assert_eq!(spine.linear_index_by_idref("b"), None);
        assert_eq!(spine.index_by_idref("z"), None);
    }

    #[test]
    fn test_parse_spine() {
        let xml = r#"<spine xmlns="http://www.idpf.org/2007/opf" toc="ncx" page-progression-direction="rtl">
    <itemref idref="c1"/>
    <itemref idref="notes" linear="no" properties="page-spread-left"/>
</spine>"#;
        let spine = Spine::parse(&XmlNode::parse_str(xml).unwrap());
        assert_eq!(spine.toc.as_deref(), Some("ncx"));
        assert_eq!(spine.page_progression_direction.as_deref(), Some("rtl"));
        assert_eq!(spine.itemrefs.len(), 2);
        assert!(!spine.itemrefs[1].is_linear());
        assert_eq!(spine.itemrefs[1].properties.as_deref(), Some("page-spread-left"));
    }
}

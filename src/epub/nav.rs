//! EPUB 3导航文档
//!
//! 导航文档是一个XHTML文件，其中每个`<nav>`由可选的标题和`<ol><li>`组成的树构成。

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::path;
use crate::epub::xml::XmlNode;

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// 导航树中的一个`<li>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavNode {
    pub id: Option<String>,
    /// `<a>`或`<span>`的文本
    pub label: Option<String>,
    pub href: Option<String>,
    pub epub_type: Option<String>,
    pub children: Vec<NavNode>,
}

impl NavNode {
    fn parse(li: &XmlNode) -> Self {
        let mut node = NavNode::default();

        if let Some(span) = li.child(namespace::XHTML, "span") {
            node.label = Some(span.string_value().trim().to_string());
            node.id = span.attr_string("id");
        }
        if let Some(a) = li.child(namespace::XHTML, "a") {
            node.label = Some(a.string_value().trim().to_string());
            node.id = a.attr_string("id");
            node.href = a.attr_string("href");
            node.epub_type = a.attr_ns_string(namespace::EPUB, "type");
        }
        node.children = parse_list(li);
        node
    }

    fn resolve(&mut self, base: &str) {
        if let Some(href) = &self.href {
            self.href = Some(path::norm_join_parent(base, href));
        }
        for child in &mut self.children {
            child.resolve(base);
        }
    }
}

fn parse_list(parent: &XmlNode) -> Vec<NavNode> {
    parent
        .select(namespace::XHTML, &["ol", "li"])
        .into_iter()
        .map(NavNode::parse)
        .collect()
}

/// 一个`<nav>`元素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavElement {
    /// 所在导航文档的内部路径
    pub internal_path: String,
    pub id: Option<String>,
    /// `epub:type`，例如`toc`、`landmarks`、`page-list`
    pub epub_type: Option<String>,
    /// 第一个`<h1>`..`<h6>`的文本
    pub title: Option<String>,
    pub children: Vec<NavNode>,
}

impl NavElement {
    fn parse(nav: &XmlNode, internal_path: &str) -> Self {
        let title = HEADINGS
            .iter()
            .find_map(|h| nav.child(namespace::XHTML, h))
            .map(|h| h.string_value().trim().to_string());

        NavElement {
            internal_path: internal_path.to_string(),
            id: nav.attr_string("id"),
            epub_type: nav.attr_ns_string(namespace::EPUB, "type"),
            title,
            children: parse_list(nav),
        }
    }

    /// 返回一份href已解析为内部路径的副本
    pub fn resolved(&self) -> NavElement {
        let mut resolved = self.clone();
        for child in &mut resolved.children {
            child.resolve(&self.internal_path);
        }
        resolved
    }
}

/// 导航文档解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavDocument {
    pub internal_path: String,
    pub navs: Vec<NavElement>,
}

impl NavDocument {
    /// 解析导航文档
    ///
    /// # 参数
    /// * `bytes` - XHTML文件内容
    /// * `internal_path` - 导航文档的内部路径
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<NavDocument> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::XHTML, "html") {
            return Err(EpubError::NavParseError(format!(
                "{}: 根元素不是<html>",
                internal_path
            )));
        }
        let navs = root
            .descendants(namespace::XHTML, "nav")
            .into_iter()
            .map(|nav| NavElement::parse(nav, internal_path))
            .collect();
        Ok(NavDocument {
            internal_path: internal_path.to_string(),
            navs,
        })
    }

    pub fn nav_by_id(&self, id: &str) -> Option<&NavElement> {
        self.navs.iter().find(|nav| nav.id.as_deref() == Some(id))
    }

    /// 按`epub:type`查找第一个`<nav>`
    pub fn nav_by_type(&self, epub_type: &str) -> Option<&NavElement> {
        self.navs
            .iter()
            .find(|nav| nav.epub_type.as_deref() == Some(epub_type))
    }

    pub fn toc(&self) -> Option<&NavElement> {
        self.nav_by_type("toc")
    }

    pub fn landmarks(&self) -> Option<&NavElement> {
        self.nav_by_type("landmarks")
    }

    pub fn page_list(&self) -> Option<&NavElement> {
        self.nav_by_type("page-list")
    }
}

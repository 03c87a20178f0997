//! 渲染映射文档（多渲染版本之间的位置对应关系）

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::xml::XmlNode;

const RESOURCE_MAP: &str = "resource-map";

/// 某个渲染版本中的一个位置（`<li><a>`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPoint {
    /// `epub:rendition`，目标渲染版本的OPF路径
    pub epub_rendition: Option<String>,
    pub href: Option<String>,
}

/// 一组彼此对应的位置（`<ul>`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingLocation {
    pub points: Vec<MappingPoint>,
}

/// 渲染映射文档解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenditionMapping {
    pub internal_path: String,
    /// `<nav>`的`epub:type`，只有为`resource-map`时才解析位置
    pub epub_type: Option<String>,
    pub locations: Vec<MappingLocation>,
}

impl RenditionMapping {
    /// 解析渲染映射文档
    ///
    /// # 参数
    /// * `bytes` - XHTML文件内容
    /// * `internal_path` - 文档的内部路径
    ///
    /// # 返回值
    /// * `Result<RenditionMapping>` - 缺少`html/body/nav`时返回错误
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<RenditionMapping> {
        let root = XmlNode::parse(bytes)?;
        let nav = if root.is(namespace::XHTML, "html") {
            root.select(namespace::XHTML, &["body", "nav"]).into_iter().next()
        } else {
            None
        };
        let nav = nav.ok_or_else(|| {
            EpubError::MappingParseError(format!("{}: 缺少html/body/nav元素", internal_path))
        })?;

        let mut mapping = RenditionMapping {
            internal_path: internal_path.to_string(),
            ..RenditionMapping::default()
        };

        if nav.attr_ns(namespace::EPUB, "type") == Some(RESOURCE_MAP) {
            mapping.epub_type = Some(RESOURCE_MAP.to_string());
            mapping.locations = nav
                .children(namespace::XHTML, "ul")
                .map(|ul| MappingLocation {
                    points: ul
                        .select(namespace::XHTML, &["li", "a"])
                        .into_iter()
                        .map(|a| MappingPoint {
                            epub_rendition: a.attr_ns_string(namespace::EPUB, "rendition"),
                            href: a.attr_string("href"),
                        })
                        .collect(),
                })
                .collect();
        }

        Ok(mapping)
    }

    /// 查找包含指定渲染版本中指定位置的那一组位置
    pub fn location_containing(&self, epub_rendition: &str, href: &str) -> Option<&MappingLocation> {
        self.locations.iter().find(|location| {
            location.points.iter().any(|point| {
                point.epub_rendition.as_deref() == Some(epub_rendition)
                    && point.href.as_deref() == Some(href)
            })
        })
    }
}

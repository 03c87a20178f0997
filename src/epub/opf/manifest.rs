//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

use std::collections::HashMap;

use crate::epub::media_type;
use crate::epub::namespace;
use crate::epub::opf::metadata::Refinement;
use crate::epub::path;
use crate::epub::xml::XmlNode;

/// 清单项信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 回退项ID
    pub fallback: Option<String>,
    /// 媒体覆盖（SMIL）文档的项目ID
    pub media_overlay: Option<String>,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
    /// 相对于容器根目录的内部路径
    pub internal_path: String,
    /// 指向本项的细化元数据
    pub refinements: Vec<Refinement>,
}

impl ManifestItem {
    /// 从`<item>`元素解析，href按OPF文件位置解析为内部路径
    ///
    /// # 参数
    /// * `node` - `<item>`元素
    /// * `opf_path` - OPF文件的内部路径
    pub fn parse(node: &XmlNode, opf_path: &str) -> Self {
        let href = node.attr_string("href").unwrap_or_default();
        Self {
            id: node.attr_string("id").unwrap_or_default(),
            internal_path: path::norm_join_parent(opf_path, &href),
            href,
            media_type: node.attr_string("media-type").unwrap_or_default(),
            fallback: node.attr_string("fallback"),
            media_overlay: node.attr_string("media-overlay"),
            properties: node.attr_string("properties"),
            refinements: Vec::new(),
        }
    }

    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        if let Some(properties) = &self.properties {
            properties.split_whitespace().any(|p| p == property)
        } else {
            false
        }
    }

    /// 检查是否为导航文档
    pub fn is_nav(&self) -> bool {
        self.has_property("nav")
    }

    /// 检查是否为封面图片
    pub fn is_cover_image(&self) -> bool {
        self.has_property("cover-image")
    }

    /// 检查是否为媒体覆盖（SMIL）文档
    pub fn is_media_overlay(&self) -> bool {
        self.media_type == media_type::SMIL
    }
}

/// OPF `<manifest>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub id: Option<String>,
    /// 按文档顺序排列的清单项
    pub items: Vec<ManifestItem>,
    by_id: HashMap<String, usize>,
}

impl Manifest {
    /// 从`<manifest>`元素解析
    pub fn parse(node: &XmlNode, opf_path: &str) -> Self {
        let items = node
            .children(namespace::OPF, "item")
            .map(|item| ManifestItem::parse(item, opf_path))
            .collect();
        Self::from_items(node.attr_string("id"), items)
    }

    /// 由清单项构造，重复id时第一个生效
    pub fn from_items(id: Option<String>, items: Vec<ManifestItem>) -> Self {
        let mut by_id = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            by_id.entry(item.id.clone()).or_insert(index);
        }
        Self { id, items, by_id }
    }

    pub(crate) fn index_by_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn attach(&mut self, index: usize, refinement: Refinement) {
        if let Some(item) = self.items.get_mut(index) {
            item.refinements.push(refinement);
        }
    }

    pub fn item_by_id(&self, id: &str) -> Option<&ManifestItem> {
        self.index_by_id(id).map(|index| &self.items[index])
    }

    pub fn item_by_internal_path(&self, internal_path: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.internal_path == internal_path)
    }

    pub fn items_by_media_type(&self, media_type: &str) -> Vec<&ManifestItem> {
        self.items.iter().filter(|item| item.media_type == media_type).collect()
    }

    /// 带有指定属性的清单项，例如`scripted`、`mathml`、`svg`、`remote-resources`、`switch`
    pub fn items_with_property(&self, property: &str) -> Vec<&ManifestItem> {
        self.items.iter().filter(|item| item.has_property(property)).collect()
    }

    /// 第一个带`cover-image`属性的清单项
    pub fn cover_image_item(&self) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.is_cover_image())
    }

    /// 第一个带`nav`属性的清单项
    pub fn nav_document_item(&self) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.is_nav())
    }

    pub fn mo_document_items(&self) -> Vec<&ManifestItem> {
        self.items.iter().filter(|item| item.is_media_overlay()).collect()
    }

    pub fn audio_items(&self) -> Vec<&ManifestItem> {
        self.filter_media_type(media_type::is_audio)
    }

    pub fn image_items(&self) -> Vec<&ManifestItem> {
        self.filter_media_type(media_type::is_image)
    }

    pub fn video_items(&self) -> Vec<&ManifestItem> {
        self.filter_media_type(media_type::is_video)
    }

    pub fn font_items(&self) -> Vec<&ManifestItem> {
        self.filter_media_type(media_type::is_font)
    }

    pub fn content_document_items(&self) -> Vec<&ManifestItem> {
        self.filter_media_type(media_type::is_content_document)
    }

    fn filter_media_type(&self, predicate: fn(&str) -> bool) -> Vec<&ManifestItem> {
        self.items.iter().filter(|item| predicate(&item.media_type)).collect()
    }
}

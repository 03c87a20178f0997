//! NCX解析器模块
//!
//! 提供NCX（Navigation Control file for XML）文件的解析功能。

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::ncx::navigation::{NcxTocNode, PageList};
use crate::epub::xml::XmlNode;

/// NCX文件解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NcxToc {
    /// NCX文件的内部路径
    pub internal_path: String,
    pub id: Option<String>,
    /// NCX版本
    pub version: Option<String>,
    /// XML语言
    pub xml_lang: Option<String>,
    /// 唯一标识符（dtb:uid）
    pub dtb_uid: Option<String>,
    /// 导航深度（dtb:depth）
    pub dtb_depth: Option<String>,
    /// 总页数（dtb:totalPageCount）
    pub dtb_total_page_count: Option<String>,
    /// 最大页码（dtb:maxPageNumber）
    pub dtb_max_page_number: Option<String>,
    /// 生成工具（dtb:generator）
    pub dtb_generator: Option<String>,
    /// 文档标题
    pub doc_title: Option<String>,
    /// 文档作者
    pub doc_author: Option<String>,
    /// `navMap`下的顶层导航点
    pub children: Vec<NcxTocNode>,
    /// 页面列表（可选）
    pub page_list: Option<PageList>,
}

impl NcxToc {
    /// 解析NCX文件内容
    ///
    /// # 参数
    /// * `bytes` - NCX文件内容
    /// * `internal_path` - NCX文件的内部路径
    ///
    /// # 返回值
    /// * `Result<NcxToc>` - 根元素不是`<ncx>`时返回错误
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<NcxToc> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::NCX, "ncx") {
            return Err(EpubError::NcxParseError(format!(
                "{}: 根元素不是<ncx>",
                internal_path
            )));
        }

        let mut toc = NcxToc {
            internal_path: internal_path.to_string(),
            id: root.attr_string("id"),
            version: root.attr_string("version"),
            xml_lang: root.attr_ns_string(namespace::XML, "lang"),
            ..NcxToc::default()
        };

        for meta in root.select(namespace::NCX, &["head", "meta"]) {
            let content = meta.attr_string("content");
            match meta.attr("name") {
                Some("dtb:uid") => toc.dtb_uid = content,
                Some("dtb:depth") => toc.dtb_depth = content,
                Some("dtb:totalPageCount") => toc.dtb_total_page_count = content,
                Some("dtb:maxPageNumber") => toc.dtb_max_page_number = content,
                Some("dtb:generator") => toc.dtb_generator = content,
                _ => {}
            }
        }

        toc.doc_title = first_text(&root, "docTitle");
        toc.doc_author = first_text(&root, "docAuthor");

        if let Some(nav_map) = root.child(namespace::NCX, "navMap") {
            toc.children = nav_map
                .children(namespace::NCX, "navPoint")
                .map(NcxTocNode::parse)
                .collect();
        }
        toc.page_list = root.child(namespace::NCX, "pageList").map(PageList::parse);

        Ok(toc)
    }

    /// 获取所有导航点的平铺列表（深度优先）
    pub fn get_all_nav_points(&self) -> Vec<&NcxTocNode> {
        self.children
            .iter()
            .flat_map(|point| point.get_all_nav_points())
            .collect()
    }

    /// 获取导航深度，优先使用`dtb:depth`
    pub fn get_depth(&self) -> u32 {
        self.dtb_depth
            .as_deref()
            .and_then(|depth| depth.trim().parse().ok())
            .unwrap_or_else(|| self.children.iter().map(|c| c.get_depth()).max().unwrap_or(0))
    }

    /// 根据ID查找导航点
    pub fn find_nav_point_by_id(&self, id: &str) -> Option<&NcxTocNode> {
        self.get_all_nav_points()
            .into_iter()
            .find(|point| point.id.as_deref() == Some(id))
    }

    /// 返回一份src已解析为内部路径的副本
    pub fn resolved(&self) -> NcxToc {
        let mut resolved = self.clone();
        for child in &mut resolved.children {
            child.resolve(&self.internal_path);
        }
        if let Some(page_list) = &mut resolved.page_list {
            page_list.resolve(&self.internal_path);
        }
        resolved
    }
}

fn first_text(root: &XmlNode, parent: &str) -> Option<String> {
    root.select(namespace::NCX, &[parent, "text"])
        .first()
        .map(|text| text.string_value().trim().to_string())
}

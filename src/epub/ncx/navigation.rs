//! NCX导航元素数据结构定义
//!
//! 定义NCX文件中的导航点和页面列表。

use crate::epub::namespace;
use crate::epub::path;
use crate::epub::xml::XmlNode;

/// 导航点（`<navPoint>`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NcxTocNode {
    /// 唯一标识符
    pub id: Option<String>,
    /// 播放顺序
    pub play_order: Option<u32>,
    /// `navLabel/text`的文本（已去除首尾空白）
    pub text: Option<String>,
    /// `content@src`，相对于NCX文件
    pub src: Option<String>,
    /// 子导航点
    pub children: Vec<NcxTocNode>,
}

impl NcxTocNode {
    pub(crate) fn parse(node: &XmlNode) -> Self {
        Self {
            id: node.attr_string("id"),
            play_order: parse_play_order(node),
            text: label_text(node),
            src: content_src(node),
            children: node
                .children(namespace::NCX, "navPoint")
                .map(NcxTocNode::parse)
                .collect(),
        }
    }

    /// 获取所有导航点（包括子导航点）的平铺列表
    pub fn get_all_nav_points(&self) -> Vec<&NcxTocNode> {
        let mut points = vec![self];
        for child in &self.children {
            points.extend(child.get_all_nav_points());
        }
        points
    }

    /// 获取导航深度
    pub fn get_depth(&self) -> u32 {
        1 + self.children.iter().map(|child| child.get_depth()).max().unwrap_or(0)
    }

    pub(crate) fn resolve(&mut self, base: &str) {
        if let Some(src) = &self.src {
            self.src = Some(path::norm_join_parent(base, src));
        }
        for child in &mut self.children {
            child.resolve(base);
        }
    }
}

/// 页面目标（`<pageTarget>`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTarget {
    pub id: Option<String>,
    /// 页面类型（normal, front, special等）
    pub page_type: Option<String>,
    /// 页面值
    pub value: Option<String>,
    pub play_order: Option<u32>,
    pub text: Option<String>,
    pub src: Option<String>,
}

/// 页面列表（`<pageList>`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageList {
    pub id: Option<String>,
    /// 列表标签
    pub text: Option<String>,
    pub page_targets: Vec<PageTarget>,
}

impl PageList {
    pub(crate) fn parse(node: &XmlNode) -> Self {
        let page_targets = node
            .children(namespace::NCX, "pageTarget")
            .map(|target| PageTarget {
                id: target.attr_string("id"),
                page_type: target.attr_string("type"),
                value: target.attr_string("value"),
                play_order: parse_play_order(target),
                text: label_text(target),
                src: content_src(target),
            })
            .collect();
        Self {
            id: node.attr_string("id"),
            text: label_text(node),
            page_targets,
        }
    }

    /// 根据页面值查找页面目标
    pub fn find_page_target_by_value(&self, value: &str) -> Option<&PageTarget> {
        self.page_targets
            .iter()
            .find(|target| target.value.as_deref() == Some(value))
    }

    pub(crate) fn resolve(&mut self, base: &str) {
        for target in &mut self.page_targets {
            if let Some(src) = &target.src {
                target.src = Some(path::norm_join_parent(base, src));
            }
        }
    }

    /// 根据ID查找页面目标
    pub fn find_page_target_by_id(&self, id: &str) -> Option<&PageTarget> {
        self.page_targets
            .iter()
            .find(|target| target.id.as_deref() == Some(id))
    }
}

fn parse_play_order(node: &XmlNode) -> Option<u32> {
    node.attr("playOrder").and_then(|v| v.trim().parse().ok())
}

fn label_text(node: &XmlNode) -> Option<String> {
    node.select(namespace::NCX, &["navLabel", "text"])
        .first()
        .map(|text| text.string_value().trim().to_string())
}

fn content_src(node: &XmlNode) -> Option<String> {
    node.child(namespace::NCX, "content")
        .and_then(|content| content.attr_string("src"))
}

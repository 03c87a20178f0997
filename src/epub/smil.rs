//! 媒体覆盖（SMIL）文档
//!
//! 媒体覆盖把文本片段与音频剪辑配对，用于朗读同步。文档主体是由`seq`、`par`、
//! `text`和`audio`组成的树。

use std::collections::HashSet;

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::path;
use crate::epub::xml::XmlNode;

/// `<seq>`（文档主体`<body>`也按`seq`解析）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoSeq {
    pub id: Option<String>,
    pub epub_textref: Option<String>,
    pub epub_type: Option<String>,
    /// 子节点，只含`Seq`和`Par`
    pub children: Vec<MoNode>,
}

/// `<par>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoPar {
    pub id: Option<String>,
    pub epub_type: Option<String>,
    /// 子节点，只含`Text`和`Audio`
    pub children: Vec<MoNode>,
}

/// `<text>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoText {
    pub id: Option<String>,
    pub src: Option<String>,
}

/// `<audio>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoAudio {
    pub id: Option<String>,
    pub src: Option<String>,
    pub clip_begin: Option<String>,
    pub clip_end: Option<String>,
}

impl MoAudio {
    /// 剪辑开始时间（秒），缺省为0
    pub fn clip_begin_seconds(&self) -> f64 {
        self.clip_begin
            .as_deref()
            .and_then(clock_value_seconds)
            .unwrap_or(0.0)
    }

    /// 剪辑结束时间（秒），缺省时为`None`（直到音频结尾）
    pub fn clip_end_seconds(&self) -> Option<f64> {
        self.clip_end.as_deref().and_then(clock_value_seconds)
    }
}

/// 媒体覆盖树的节点
#[derive(Debug, Clone, PartialEq)]
pub enum MoNode {
    Seq(MoSeq),
    Par(MoPar),
    Text(MoText),
    Audio(MoAudio),
}

impl MoSeq {
    fn parse(node: &XmlNode) -> Self {
        let children = node
            .elements()
            .filter_map(|child| match child.namespace.as_deref() {
                Some(namespace::SMIL) if child.name == "seq" => Some(MoNode::Seq(MoSeq::parse(child))),
                Some(namespace::SMIL) if child.name == "par" => Some(MoNode::Par(MoPar::parse(child))),
                _ => None,
            })
            .collect();
        Self {
            id: node.attr_string("id"),
            epub_textref: node.attr_ns_string(namespace::EPUB, "textref"),
            epub_type: node.attr_ns_string(namespace::EPUB, "type"),
            children,
        }
    }
}

impl MoPar {
    fn parse(node: &XmlNode) -> Self {
        let children = node
            .elements()
            .filter_map(|child| match child.namespace.as_deref() {
                Some(namespace::SMIL) if child.name == "text" => Some(MoNode::Text(MoText {
                    id: child.attr_string("id"),
                    src: child.attr_string("src"),
                })),
                Some(namespace::SMIL) if child.name == "audio" => Some(MoNode::Audio(MoAudio {
                    id: child.attr_string("id"),
                    src: child.attr_string("src"),
                    clip_begin: child.attr_string("clipBegin"),
                    clip_end: child.attr_string("clipEnd"),
                })),
                _ => None,
            })
            .collect();
        Self {
            id: node.attr_string("id"),
            epub_type: node.attr_ns_string(namespace::EPUB, "type"),
            children,
        }
    }

    fn has_text(&self) -> bool {
        self.children.iter().any(|c| matches!(c, MoNode::Text(_)))
    }

    fn has_audio(&self) -> bool {
        self.children.iter().any(|c| matches!(c, MoNode::Audio(_)))
    }
}

impl MoNode {
    /// 深度优先先序遍历，包括自身
    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a MoNode)) {
        visit(self);
        match self {
            MoNode::Seq(MoSeq { children, .. }) | MoNode::Par(MoPar { children, .. }) => {
                for child in children {
                    child.walk(visit);
                }
            }
            MoNode::Text(_) | MoNode::Audio(_) => {}
        }
    }
}

/// 同一文档中的片段标识符分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    /// `#`之前的文件部分
    pub document: String,
    /// 按出现顺序排列的片段标识符（不去重）
    pub fragments: Vec<String>,
}

/// 媒体覆盖文档解析结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoDocument {
    /// SMIL文件的内部路径
    pub internal_path: String,
    pub id: Option<String>,
    pub epub_prefix: Option<String>,
    pub version: Option<String>,
    pub body: MoSeq,
}

impl MoDocument {
    /// 解析SMIL文件内容
    ///
    /// # 参数
    /// * `bytes` - SMIL文件内容
    /// * `internal_path` - SMIL文件的内部路径
    ///
    /// # 返回值
    /// * `Result<MoDocument>` - 缺少`<smil>`或`<body>`时返回错误
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<MoDocument> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::SMIL, "smil") {
            return Err(EpubError::SmilParseError(format!(
                "{}: 根元素不是<smil>",
                internal_path
            )));
        }
        let body = root.child(namespace::SMIL, "body").ok_or_else(|| {
            EpubError::SmilParseError(format!("{}: 缺少<body>元素", internal_path))
        })?;

        Ok(MoDocument {
            internal_path: internal_path.to_string(),
            id: root.attr_string("id"),
            epub_prefix: root.attr_ns_string(namespace::EPUB, "prefix"),
            version: root.attr_string("version"),
            body: MoSeq::parse(body),
        })
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a MoNode)) {
        for child in &self.body.children {
            child.walk(visit);
        }
    }

    /// 引用的音频文件内部路径，去重并保持首次出现顺序
    pub fn referenced_audio_files(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        self.walk(&mut |node| {
            if let MoNode::Audio(MoAudio { src: Some(src), .. }) = node {
                let resolved = path::norm_join_parent(&self.internal_path, src);
                if seen.insert(resolved.clone()) {
                    files.push(resolved);
                }
            }
        });
        files
    }

    /// 所有`<text>`的`src`（未解析、不去重），按深度优先顺序
    pub fn referenced_fragment_identifiers(&self) -> Vec<String> {
        let mut references = Vec::new();
        self.walk(&mut |node| {
            if let MoNode::Text(MoText { src: Some(src), .. }) = node {
                references.push(src.clone());
            }
        });
        references
    }

    /// 按文件部分分组的片段标识符；没有片段的引用不出现在分组中
    pub fn grouped_referenced_fragment_identifiers(&self) -> Vec<FragmentGroup> {
        let mut groups: Vec<FragmentGroup> = Vec::new();
        for reference in self.referenced_fragment_identifiers() {
            let (document, Some(fragment)) = path::split_reference(&reference) else {
                continue;
            };
            match groups.iter_mut().find(|g| g.document == document) {
                Some(group) => group.fragments.push(fragment.to_string()),
                None => groups.push(FragmentGroup {
                    document: document.to_string(),
                    fragments: vec![fragment.to_string()],
                }),
            }
        }
        groups
    }

    /// 是否存在只有`<text>`没有`<audio>`的`<par>`（文本高亮依赖内嵌音视频）
    pub fn references_embedded_audio_video(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if let MoNode::Par(par) = node {
                if par.has_text() && !par.has_audio() {
                    found = true;
                }
            }
        });
        found
    }
}

/// 把SMIL时钟值转换为秒
///
/// 支持`ms`、`s`、`h`、`min`后缀和`hh:mm:ss.fff`形式；无法解析时返回`None`。
pub fn clock_value_seconds(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    if let Some(number) = value.strip_suffix("ms") {
        return number.trim().parse::<f64>().ok().map(|v| v / 1000.0);
    }
    if let Some(number) = value.strip_suffix("min") {
        return number.trim().parse::<f64>().ok().map(|v| v * 60.0);
    }
    if let Some(number) = value.strip_suffix('s') {
        return number.trim().parse::<f64>().ok();
    }
    if let Some(number) = value.strip_suffix('h') {
        return number.trim().parse::<f64>().ok().map(|v| v * 3600.0);
    }

    let (clock, fraction) = match value.split_once('.') {
        Some((clock, fraction)) => (clock, fraction),
        None => (value, ""),
    };
    let fraction = if fraction.is_empty() {
        0.0
    } else {
        let digits: u64 = fraction.parse().ok()?;
        digits as f64 / 10f64.powi(fraction.len() as i32)
    };

    let mut seconds = 0.0;
    for (part, multiplier) in clock.rsplit(':').zip([1.0, 60.0, 3600.0]) {
        let part: u64 = part.parse().ok()?;
        seconds += part as f64 * multiplier;
    }
    Some(seconds + fraction)
}

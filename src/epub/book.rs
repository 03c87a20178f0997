//! 书籍门面
//!
//! [`Book`]在[`Publication`]之上提供面向阅读的便捷查询，全部基于默认渲染版本。

use std::path::Path;

use crate::epub::error::Result;
use crate::epub::nav::{NavElement, NavNode};
use crate::epub::ncx::{NcxToc, NcxTocNode};
use crate::epub::opf::OpfPackage;
use crate::epub::options::ParsingOptions;
use crate::epub::publication::Publication;
use crate::epub::rendition::Toc;

/// 目录或地标中的一项，href已解析为内部路径
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocEntry {
    pub label: String,
    /// 内部路径，可能带`#片段`
    pub href: Option<String>,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    fn from_nav(node: &NavNode) -> Self {
        TocEntry {
            label: node.label.clone().unwrap_or_default(),
            href: node.href.clone(),
            children: node.children.iter().map(TocEntry::from_nav).collect(),
        }
    }

    fn from_ncx(node: &NcxTocNode) -> Self {
        TocEntry {
            label: node.text.clone().unwrap_or_default(),
            href: node.src.clone(),
            children: node.children.iter().map(TocEntry::from_ncx).collect(),
        }
    }

    /// 包括自身在内的条目总数
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TocEntry::count).sum::<usize>()
    }
}

/// 封面图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub internal_path: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// 一本书
#[derive(Debug, Clone)]
pub struct Book {
    publication: Publication,
}

impl Book {
    /// 使用默认解析选项打开一本书
    ///
    /// # 参数
    /// * `path` - EPUB文件或解压目录的路径
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Book> {
        Ok(Self::from_publication(Publication::open(path, ParsingOptions::default())?))
    }

    pub fn from_publication(publication: Publication) -> Book {
        Book { publication }
    }

    pub fn publication(&self) -> &Publication {
        &self.publication
    }

    pub fn into_publication(self) -> Publication {
        self.publication
    }

    fn package(&self) -> Option<&OpfPackage> {
        self.publication
            .default_rendition()?
            .package_document
            .as_ref()
            .map(|document| document.as_opf())
    }

    fn dc_text(&self, tag: &str) -> Option<&str> {
        self.package()?.metadata.first_text_by_tag(tag)
    }

    fn dc_texts(&self, tag: &str) -> Vec<&str> {
        self.package()
            .map(|package| {
                package
                    .metadata
                    .metadata_by_tag(tag)
                    .into_iter()
                    .filter_map(|dc| dc.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.dc_text("title")
    }

    pub fn language(&self) -> Option<&str> {
        self.dc_text("language")
    }

    /// 所有`<dc:creator>`
    pub fn authors(&self) -> Vec<&str> {
        self.dc_texts("creator")
    }

    /// 第一个`<dc:creator>`
    pub fn author(&self) -> Option<&str> {
        self.dc_text("creator")
    }

    /// 出版物唯一标识符
    pub fn identifier(&self) -> Option<&str> {
        self.publication.unique_identifier()
    }

    pub fn date(&self) -> Option<&str> {
        self.dc_text("date")
    }

    pub fn description(&self) -> Option<&str> {
        self.dc_text("description")
    }

    pub fn publisher(&self) -> Option<&str> {
        self.dc_text("publisher")
    }

    pub fn rights(&self) -> Option<&str> {
        self.dc_text("rights")
    }

    pub fn source(&self) -> Option<&str> {
        self.dc_text("source")
    }

    pub fn subjects(&self) -> Vec<&str> {
        self.dc_texts("subject")
    }

    /// `<dc:type>`
    pub fn book_type(&self) -> Option<&str> {
        self.dc_text("type")
    }

    /// 封面图片
    ///
    /// # 返回值
    /// * `Option<CoverImage>` - 没有封面或封面无法读取时为`None`
    pub fn cover_image(&self) -> Option<CoverImage> {
        let item = self.package()?.cover_image_item()?;
        let data = self.asset_contents(&item.internal_path)?;
        Some(CoverImage {
            internal_path: item.internal_path.clone(),
            media_type: item.media_type.clone(),
            data,
        })
    }

    /// 目录，导航文档优先，其次NCX
    pub fn toc(&self) -> Vec<TocEntry> {
        match self.publication.default_rendition().and_then(|r| r.toc()) {
            Some(Toc::Nav(nav)) => nav_entries(nav),
            Some(Toc::Ncx(ncx)) => ncx_entries(ncx),
            None => Vec::new(),
        }
    }

    /// 地标，导航文档的`landmarks`优先，其次OPF的`<guide>`
    pub fn landmarks(&self) -> Vec<TocEntry> {
        if let Some(landmarks) = self
            .publication
            .default_rendition()
            .and_then(|r| r.landmarks())
        {
            return nav_entries(landmarks);
        }
        let Some(package) = self.package() else {
            return Vec::new();
        };
        package
            .guide
            .iter()
            .flat_map(|guide| guide.references.iter())
            .map(|reference| TocEntry {
                label: reference
                    .title
                    .clone()
                    .or_else(|| reference.reference_type.clone())
                    .unwrap_or_default(),
                href: reference
                    .href
                    .as_deref()
                    .map(|href| package.relative_to_internal(href)),
                children: Vec::new(),
            })
            .collect()
    }

    /// 阅读顺序中的内部路径
    pub fn spine(&self) -> Vec<&str> {
        self.package()
            .map(|package| package.files_referenced_spine())
            .unwrap_or_default()
    }

    /// 只包含线性条目的阅读顺序
    pub fn linear_spine(&self) -> Vec<&str> {
        self.package()
            .map(|package| package.files_referenced_spine_linear())
            .unwrap_or_default()
    }

    pub fn spine_index(&self, internal_path: &str) -> Option<usize> {
        self.package()?.spine_index_by_internal_path(internal_path)
    }

    pub fn linear_spine_index(&self, internal_path: &str) -> Option<usize> {
        self.package()?.spine_linear_index_by_internal_path(internal_path)
    }

    /// 资源内容（已去混淆）
    pub fn asset_contents(&self, internal_path: &str) -> Option<Vec<u8>> {
        self.publication.asset(internal_path)?.contents()
    }
}

fn nav_entries(nav: &NavElement) -> Vec<TocEntry> {
    nav.resolved().children.iter().map(TocEntry::from_nav).collect()
}

fn ncx_entries(ncx: &NcxToc) -> Vec<TocEntry> {
    ncx.resolved().children.iter().map(TocEntry::from_ncx).collect()
}

//! 渲染版本
//!
//! 一个`<rootfile>`对应一个渲染版本：包文档，以及由它派生的导航文档、
//! NCX目录和媒体叠加文档。

use crate::epub::nav::{NavDocument, NavElement};
use crate::epub::ncx::NcxToc;
use crate::epub::opf::PackageDocument;
use crate::epub::smil::MoDocument;

/// 目录来源：EPUB 3导航文档优先，没有时使用NCX
#[derive(Debug, Clone, Copy)]
pub enum Toc<'a> {
    Nav(&'a NavElement),
    Ncx(&'a NcxToc),
}

/// 一个渲染版本
#[derive(Debug, Clone, Default)]
pub struct Rendition {
    /// 包文档的内部路径（`full-path`）
    pub full_path: String,
    pub media_type: String,
    /// `rendition:accessMode`
    pub access_mode: Option<String>,
    /// `rendition:label`
    pub label: Option<String>,
    /// `rendition:language`
    pub language: Option<String>,
    /// `rendition:layout`
    pub layout: Option<String>,
    /// `rendition:media`
    pub media: Option<String>,
    pub package_document: Option<PackageDocument>,
    pub nav_document: Option<NavDocument>,
    pub ncx_toc: Option<NcxToc>,
    pub mo_documents: Vec<MoDocument>,
}

impl Rendition {
    pub fn new(full_path: impl Into<String>, media_type: impl Into<String>) -> Self {
        Rendition {
            full_path: full_path.into(),
            media_type: media_type.into(),
            ..Rendition::default()
        }
    }

    pub fn internal_path(&self) -> &str {
        &self.full_path
    }

    /// 包文档中声明的唯一标识符
    pub fn unique_identifier(&self) -> Option<&str> {
        self.package_document.as_ref()?.unique_identifier()
    }

    /// 目录
    ///
    /// # 返回值
    /// * `Option<Toc>` - 导航文档中的`toc`导航，否则NCX目录，都没有时为`None`
    pub fn toc(&self) -> Option<Toc<'_>> {
        if let Some(nav) = self.nav_document.as_ref().and_then(|doc| doc.toc()) {
            return Some(Toc::Nav(nav));
        }
        self.ncx_toc.as_ref().map(Toc::Ncx)
    }

    /// 导航文档中的`landmarks`导航
    pub fn landmarks(&self) -> Option<&NavElement> {
        self.nav_document.as_ref()?.landmarks()
    }

    /// 导航文档中的`page-list`导航
    pub fn page_list(&self) -> Option<&NavElement> {
        self.nav_document.as_ref()?.page_list()
    }

    /// 按内部路径查找媒体叠加文档
    pub fn mo_document(&self, internal_path: &str) -> Option<&MoDocument> {
        self.mo_documents
            .iter()
            .find(|doc| doc.internal_path == internal_path)
    }
}

//! 发布物
//!
//! [`Publication`]从ZIP归档或解压目录构建完整的对象图：资源表、容器、各渲染版本，
//! 以及可选的跨渲染版本元数据和加密信息。

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::epub::asset::Asset;
use crate::epub::container::Container;
use crate::epub::encryption::Encryption;
use crate::epub::error::{EpubError, Result};
use crate::epub::mapping::RenditionMapping;
use crate::epub::media_type;
use crate::epub::metadata::PublicationMetadata;
use crate::epub::namespace;
use crate::epub::nav::NavDocument;
use crate::epub::ncx::NcxToc;
use crate::epub::obfuscation::ObfuscationAlgorithm;
use crate::epub::opf::{OpfPackage, PackageDocument};
use crate::epub::options::{ParsingFeature, ParsingOptions};
use crate::epub::rendition::Rendition;
use crate::epub::smil::MoDocument;

/// 发布物的存在形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manifestation {
    /// ZIP归档
    Compressed,
    /// 解压后的目录
    Uncompressed,
    /// 只存在于内存中，没有后备存储
    Memory,
}

/// 一个EPUB发布物
#[derive(Debug, Clone)]
pub struct Publication {
    path: Option<PathBuf>,
    manifestation: Manifestation,
    options: ParsingOptions,
    assets: BTreeMap<String, Asset>,
    container: Option<Container>,
    metadata: Option<PublicationMetadata>,
    encryption: Option<Encryption>,
}

impl Publication {
    /// 打开并解析一个发布物
    ///
    /// # 参数
    /// * `path` - EPUB文件或解压目录的路径
    /// * `options` - 解析选项，默认值表示全部启用
    ///
    /// # 返回值
    /// * `Result<Publication>` - 路径不存在、容器或包文档缺失/无效时返回错误
    pub fn open<P: AsRef<Path>>(path: P, options: ParsingOptions) -> Result<Publication> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EpubError::NotFound(path.to_path_buf()));
        }

        let manifestation = if path.is_dir() {
            Manifestation::Uncompressed
        } else {
            // 先确认是有效的ZIP归档
            let archive = ZipArchive::new(File::open(path)?)?;
            debug!(entries = archive.len(), "已打开ZIP归档");
            Manifestation::Compressed
        };
        info!(path = %path.display(), ?manifestation, "开始解析发布物");

        let mut publication = Publication {
            path: Some(path.to_path_buf()),
            manifestation,
            options,
            assets: BTreeMap::new(),
            container: None,
            metadata: None,
            encryption: None,
        };
        publication.parse()?;
        Ok(publication)
    }

    /// 创建一个空的内存发布物，用于以编程方式构建对象图
    pub fn new_in_memory() -> Publication {
        Publication {
            path: None,
            manifestation: Manifestation::Memory,
            options: ParsingOptions::default(),
            assets: BTreeMap::new(),
            container: None,
            metadata: None,
            encryption: None,
        }
    }

    /// 添加（或替换）一个资源
    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.insert(asset.internal_path().to_string(), asset);
    }

    pub fn set_container(&mut self, container: Container) {
        self.container = Some(container);
    }

    fn parse(&mut self) -> Result<()> {
        self.register(namespace::MIMETYPE_PATH);

        let container_bytes = self
            .register(namespace::CONTAINER_PATH)
            .contents()
            .ok_or_else(|| EpubError::MissingDocument(namespace::CONTAINER_PATH.to_string()))?;
        let mut container = Container::parse(&container_bytes, namespace::CONTAINER_PATH)?;
        debug!(renditions = container.renditions.len(), "容器解析完成");

        if self.options.is_enabled(ParsingFeature::MultipleRenditions) {
            self.metadata = self.parse_optional(namespace::METADATA_PATH, PublicationMetadata::parse);
            if let Some(mapping_path) = container.mapping_path.clone() {
                container.mapping = self.parse_optional(&mapping_path, RenditionMapping::parse);
            }
            for rendition in &mut container.renditions {
                self.parse_rendition(rendition)?;
            }
        } else if let Some(rendition) = container.default_rendition_mut() {
            self.parse_rendition(rendition)?;
        }
        self.container = Some(container);

        if self.options.is_enabled(ParsingFeature::Encryption) {
            self.encryption = self.parse_optional(namespace::ENCRYPTION_PATH, Encryption::parse);
            self.apply_encryption();
        }

        info!(assets = self.assets.len(), "发布物解析完成");
        Ok(())
    }

    fn parse_rendition(&mut self, rendition: &mut Rendition) -> Result<()> {
        if rendition.media_type != media_type::OPF {
            debug!(path = %rendition.full_path, media_type = %rendition.media_type, "跳过非OPF的渲染版本");
            return Ok(());
        }

        let opf_path = rendition.full_path.clone();
        let opf_bytes = self
            .register(&opf_path)
            .contents()
            .ok_or_else(|| EpubError::MissingDocument(opf_path.clone()))?;
        let opf = OpfPackage::parse(&opf_bytes, &opf_path)?;
        debug!(path = %opf_path, version = ?opf.version, "包文档解析完成");

        if self.options.is_enabled(ParsingFeature::AssetRefs) {
            for internal_path in opf.files_referenced_manifest() {
                self.register(internal_path);
            }
        }

        if self.options.is_enabled(ParsingFeature::Nav) {
            match opf.internal_path_nav_document() {
                Some(nav_path) => {
                    rendition.nav_document = self.parse_optional(nav_path, NavDocument::parse);
                }
                None => debug!(path = %opf_path, "没有导航文档"),
            }
        }

        if self.options.is_enabled(ParsingFeature::Ncx) {
            match opf.internal_path_ncx_toc() {
                Some(ncx_path) => rendition.ncx_toc = self.parse_optional(ncx_path, NcxToc::parse),
                None => debug!(path = %opf_path, "没有NCX目录"),
            }
        }

        if self.options.is_enabled(ParsingFeature::MediaOverlay) {
            for item in opf.manifest.mo_document_items() {
                if let Some(mo_document) = self.parse_optional(&item.internal_path, MoDocument::parse) {
                    rendition.mo_documents.push(mo_document);
                }
            }
        }

        rendition.package_document = Some(PackageDocument::Opf(opf));
        Ok(())
    }

    /// 按加密信息为被混淆的资源加上混淆标注，密钥为唯一标识符
    fn apply_encryption(&mut self) {
        let Some(encryption) = self.encryption.as_ref() else {
            return;
        };
        let targets: Vec<(ObfuscationAlgorithm, String)> =
            [ObfuscationAlgorithm::Adobe, ObfuscationAlgorithm::Idpf]
                .into_iter()
                .flat_map(|algorithm| {
                    encryption
                        .obfuscated_assets(algorithm)
                        .into_iter()
                        .map(move |path| (algorithm, path.to_string()))
                })
                .collect();
        if targets.is_empty() {
            return;
        }

        let Some(key) = self.unique_identifier().map(str::to_string) else {
            warn!("存在混淆资源但没有唯一标识符，无法设置混淆密钥");
            return;
        };

        for (algorithm, internal_path) in targets {
            match self.assets.remove(&internal_path) {
                Some(asset) => {
                    debug!(path = %internal_path, %algorithm, "资源已标注为混淆");
                    self.assets
                        .insert(internal_path, asset.with_obfuscation(algorithm, key.clone()));
                }
                None => debug!(path = %internal_path, "被混淆的资源未注册，已忽略"),
            }
        }
    }

    /// 为内部路径创建资源并加入资源表，返回该资源
    fn register(&mut self, internal_path: &str) -> &Asset {
        let asset = match (&self.manifestation, &self.path) {
            (Manifestation::Compressed, Some(path)) => Asset::in_archive(path, internal_path),
            (Manifestation::Uncompressed, Some(path)) => Asset::in_directory(path, internal_path),
            _ => Asset::from_bytes(internal_path, Vec::new()),
        };
        self.assets
            .entry(internal_path.to_string())
            .or_insert(asset)
    }

    /// 读取并解析一个可选文档
    ///
    /// 文档不存在时返回`None`；存在但无法解析时记录警告并同样返回`None`。
    /// 已由清单注册的资源即使文档不存在也保留。
    fn parse_optional<T>(
        &mut self,
        internal_path: &str,
        parse: impl FnOnce(&[u8], &str) -> Result<T>,
    ) -> Option<T> {
        let registered = self.assets.contains_key(internal_path);
        let Some(bytes) = self.register(internal_path).contents() else {
            debug!(path = %internal_path, "可选文档不存在");
            if !registered {
                self.assets.remove(internal_path);
            }
            return None;
        };
        match parse(&bytes, internal_path) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(path = %internal_path, error = %e, "可选文档无效，已忽略");
                None
            }
        }
    }

    pub fn manifestation(&self) -> Manifestation {
        self.manifestation
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn options(&self) -> &ParsingOptions {
        &self.options
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    pub fn metadata(&self) -> Option<&PublicationMetadata> {
        self.metadata.as_ref()
    }

    pub fn encryption(&self) -> Option<&Encryption> {
        self.encryption.as_ref()
    }

    pub fn default_rendition(&self) -> Option<&Rendition> {
        self.container.as_ref()?.default_rendition()
    }

    fn default_package(&self) -> Option<&PackageDocument> {
        self.default_rendition()?.package_document.as_ref()
    }

    /// 按内部路径查找资源
    pub fn asset(&self, internal_path: &str) -> Option<&Asset> {
        self.assets.get(internal_path)
    }

    /// 所有资源，按内部路径排序
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// 默认渲染版本包文档的`version`属性
    pub fn version(&self) -> Option<&str> {
        self.default_package()?.version()
    }

    /// 唯一标识符
    ///
    /// metadata.xml中有值时使用它，否则使用默认渲染版本包文档中的值。
    pub fn unique_identifier(&self) -> Option<&str> {
        if let Some(identifier) = self
            .metadata
            .as_ref()
            .and_then(|m| m.unique_identifier.as_deref())
        {
            return Some(identifier);
        }
        self.default_package()?.unique_identifier()
    }

    /// 最后修改时间，优先使用metadata.xml中的值
    pub fn dcterms_modified(&self) -> Option<&str> {
        if let Some(modified) = self
            .metadata
            .as_ref()
            .and_then(|m| m.dcterms_modified.as_deref())
        {
            return Some(modified);
        }
        self.default_package()?.dcterms_modified()
    }

    /// 发行标识符：唯一标识符加上`@修改时间`，并去掉所有空格
    pub fn release_identifier(&self) -> Option<String> {
        let release_identifier = match self.metadata.as_ref().and_then(|m| m.release_identifier()) {
            Some(release_identifier) => release_identifier,
            None => {
                let unique_identifier = self.unique_identifier()?;
                match self.dcterms_modified() {
                    Some(modified) => format!("{}@{}", unique_identifier, modified),
                    None => unique_identifier.to_string(),
                }
            }
        };
        Some(release_identifier.replace(' ', ""))
    }

    /// 默认渲染版本中封面图片的内部路径
    pub fn internal_path_cover_image(&self) -> Option<&str> {
        self.default_package()?.internal_path_cover_image()
    }

    /// mimetype文件的内容
    pub fn mimetype(&self) -> Option<String> {
        let bytes = self.asset(namespace::MIMETYPE_PATH)?.contents()?;
        Some(String::from_utf8_lossy(&bytes).trim().to_string())
    }

    /// 发布物大小（字节）
    ///
    /// # 返回值
    /// * `Option<u64>` - 归档为文件大小，目录为所有文件大小之和，内存发布物为`None`
    pub fn size(&self) -> Option<u64> {
        let path = self.path.as_deref()?;
        match self.manifestation {
            Manifestation::Compressed => fs::metadata(path).ok().map(|m| m.len()),
            Manifestation::Uncompressed => Some(directory_size(path)),
            Manifestation::Memory => None,
        }
    }
}

fn directory_size(path: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| match entry.metadata() {
            Ok(metadata) if metadata.is_dir() => directory_size(&entry.path()),
            Ok(metadata) => metadata.len(),
            Err(_) => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::obfuscation;
    use crate::epub::options::ParsingOption;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    const OPF_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>测试书籍</dc:title>
        <dc:identifier id="BookId">urn:uuid:1234 5678</dc:identifier>
        <meta property="dcterms:modified">2016-01-01T00:00:01Z</meta>
    </metadata>
    <manifest>
        <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
        <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
        <item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>
        <item id="font" href="fonts/a.otf" media-type="application/vnd.ms-opentype"/>
        <item id="c1" href="text/c1.xhtml" media-type="application/xhtml+xml" media-overlay="c1mo"/>
        <item id="c1mo" href="smil/c1.smil" media-type="application/smil+xml"/>
    </manifest>
    <spine toc="ncx">
        <itemref idref="c1"/>
    </spine>
</package>"#;

    const NAV_XHTML: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body><nav epub:type="toc"><h1>目录</h1><ol><li><a href="text/c1.xhtml">第一章</a></li></ol></nav></body></html>"#;

    const NCX_XML: &str = r#"<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
<navMap><navPoint id="np1" playOrder="1"><navLabel><text>第一章</text></navLabel><content src="text/c1.xhtml"/></navPoint></navMap></ncx>"#;

    const SMIL_XML: &str = r#"<smil xmlns="http://www.w3.org/ns/SMIL" version="3.0">
<body><par id="p1"><text src="../text/c1.xhtml#w1"/><audio src="../audio/c1.mp3" clipBegin="0s" clipEnd="1.5s"/></par></body></smil>"#;

    const ENCRYPTION_XML: &str = r#"<encryption xmlns="urn:oasis:names:tc:opendocument:xmlns:container" xmlns:enc="http://www.w3.org/2001/04/xmlenc#">
<enc:EncryptedData>
  <enc:EncryptionMethod Algorithm="http://www.idpf.org/2008/embedding"/>
  <enc:CipherData><enc:CipherReference URI="OEBPS/fonts/a.otf"/></enc:CipherData>
</enc:EncryptedData>
</encryption>"#;

    fn font_bytes() -> Vec<u8> {
        (0..2000u32).map(|i| (i % 251) as u8).collect()
    }

    fn book_files() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("mimetype", b"application/epub+zip".to_vec()),
            ("META-INF/container.xml", CONTAINER_XML.as_bytes().to_vec()),
            ("META-INF/encryption.xml", ENCRYPTION_XML.as_bytes().to_vec()),
            ("OEBPS/content.opf", OPF_XML.as_bytes().to_vec()),
            ("OEBPS/nav.xhtml", NAV_XHTML.as_bytes().to_vec()),
            ("OEBPS/toc.ncx", NCX_XML.as_bytes().to_vec()),
            ("OEBPS/smil/c1.smil", SMIL_XML.as_bytes().to_vec()),
            ("OEBPS/images/cover.jpg", vec![0xFF, 0xD8, 0xFF]),
            (
                "OEBPS/fonts/a.otf",
                obfuscation::obfuscate(&font_bytes(), "urn:uuid:1234 5678", ObfuscationAlgorithm::Idpf),
            ),
            ("OEBPS/text/c1.xhtml", b"<html/>".to_vec()),
        ]
    }

    /// 创建一个测试用的EPUB文件
    fn create_test_epub(path: &Path, files: &[(&str, Vec<u8>)]) -> Result<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        for (name, content) in files {
            zip.start_file(*name, FileOptions::<()>::default())?;
            zip.write_all(content)?;
        }
        zip.finish()?;
        Ok(())
    }

    /// 创建一个测试用的解压目录
    fn create_test_directory(root: &Path, files: &[(&str, Vec<u8>)]) -> Result<()> {
        for (name, content) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }

    #[test]
    fn test_open_compressed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &book_files()).unwrap();

        let publication = Publication::open(&path, ParsingOptions::default()).unwrap();
        assert_eq!(publication.manifestation(), Manifestation::Compressed);
        assert_eq!(publication.mimetype().as_deref(), Some("application/epub+zip"));
        assert_eq!(publication.version(), Some("3.0"));
        assert_eq!(publication.unique_identifier(), Some("urn:uuid:1234 5678"));
        assert_eq!(publication.dcterms_modified(), Some("2016-01-01T00:00:01Z"));
        assert_eq!(
            publication.release_identifier().as_deref(),
            Some("urn:uuid:12345678@2016-01-01T00:00:01Z")
        );
        assert_eq!(publication.internal_path_cover_image(), Some("OEBPS/images/cover.jpg"));
        assert_eq!(publication.size(), Some(fs::metadata(&path).unwrap().len()));

        let rendition = publication.default_rendition().unwrap();
        assert!(rendition.nav_document.is_some());
        assert!(rendition.ncx_toc.is_some());
        assert_eq!(rendition.mo_documents.len(), 1);
        assert_eq!(
            rendition.mo_documents[0].referenced_audio_files(),
            vec!["OEBPS/audio/c1.mp3".to_string()]
        );

        let cover = publication.asset("OEBPS/images/cover.jpg").unwrap();
        assert_eq!(cover.contents(), Some(vec![0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_encryption_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &book_files()).unwrap();

        let publication = Publication::open(&path, ParsingOptions::default()).unwrap();
        let encryption = publication.encryption().unwrap();
        assert_eq!(encryption.idpf_obfuscated_assets(), vec!["OEBPS/fonts/a.otf"]);

        let font = publication.asset("OEBPS/fonts/a.otf").unwrap();
        let obfuscation = font.obfuscation().unwrap();
        assert_eq!(obfuscation.algorithm, ObfuscationAlgorithm::Idpf);
        assert_eq!(obfuscation.key, "urn:uuid:1234 5678");
        assert_eq!(font.contents(), Some(font_bytes()));
        assert_ne!(font.raw_contents(), Some(font_bytes()));
    }

    #[test]
    fn test_open_uncompressed() {
        let dir = TempDir::new().unwrap();
        create_test_directory(dir.path(), &book_files()).unwrap();

        let publication = Publication::open(dir.path(), ParsingOptions::default()).unwrap();
        assert_eq!(publication.manifestation(), Manifestation::Uncompressed);
        assert_eq!(publication.internal_path_cover_image(), Some("OEBPS/images/cover.jpg"));
        assert!(publication.size().unwrap() > 0);
        assert_eq!(
            publication.asset("OEBPS/fonts/a.otf").unwrap().contents(),
            Some(font_bytes())
        );
    }

    #[test]
    fn test_options_disable_sub_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &book_files()).unwrap();

        let options: ParsingOptions = [
            ParsingOption::NoNav,
            ParsingOption::NoNcx,
            ParsingOption::NoMediaOverlay,
            ParsingOption::NoEncryption,
            ParsingOption::NoAssetRefs,
        ]
        .into_iter()
        .collect();
        let publication = Publication::open(&path, options).unwrap();
        let rendition = publication.default_rendition().unwrap();
        assert!(rendition.package_document.is_some());
        assert!(rendition.nav_document.is_none());
        assert!(rendition.ncx_toc.is_none());
        assert!(rendition.mo_documents.is_empty());
        assert!(publication.encryption().is_none());
        assert!(publication.asset("OEBPS/images/cover.jpg").is_none());
        assert!(publication.asset("OEBPS/content.opf").is_some());
    }

    #[test]
    fn test_default_rendition_identifier_wins() {
        let container = r#"<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="r1.opf" media-type="application/oebps-package+xml"/>
        <rootfile full-path="r2.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;
        let opf = |id: &str| {
            format!(
                r#"<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid">
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:identifier id="uid">{}</dc:identifier></metadata>
<manifest/><spine/></package>"#,
                id
            )
        };
        let files = vec![
            ("mimetype", b"application/epub+zip".to_vec()),
            ("META-INF/container.xml", container.as_bytes().to_vec()),
            ("r1.opf", opf("id-1").into_bytes()),
            ("r2.opf", opf("id-2").into_bytes()),
        ];
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multi.epub");
        create_test_epub(&path, &files).unwrap();

        let publication = Publication::open(&path, ParsingOptions::default()).unwrap();
        assert!(publication.metadata().is_none());
        assert_eq!(publication.container().unwrap().renditions.len(), 2);
        assert_eq!(
            publication.container().unwrap().renditions[1].unique_identifier(),
            Some("id-2")
        );
        assert_eq!(publication.unique_identifier(), Some("id-1"));
        assert_eq!(publication.release_identifier().as_deref(), Some("id-1"));

        let single = Publication::open(
            &path,
            ParsingOptions::new(vec![ParsingOption::NoMultipleRenditions]),
        )
        .unwrap();
        let renditions = &single.container().unwrap().renditions;
        assert!(renditions[0].package_document.is_some());
        assert!(renditions[1].package_document.is_none());
    }

    #[test]
    fn test_metadata_xml_identifier_wins() {
        let metadata = r#"<metadata xmlns="http://www.idpf.org/2013/metadata" xmlns:dc="http://purl.org/dc/elements/1.1/" unique-identifier="pid">
    <dc:identifier id="pid">urn:uuid:multi</dc:identifier>
    <meta property="dcterms:modified">2020-02-02T00:00:00Z</meta>
</metadata>"#;
        let mut files = book_files();
        files.push(("META-INF/metadata.xml", metadata.as_bytes().to_vec()));
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &files).unwrap();

        let publication = Publication::open(&path, ParsingOptions::default()).unwrap();
        assert_eq!(publication.unique_identifier(), Some("urn:uuid:multi"));
        assert_eq!(
            publication.release_identifier().as_deref(),
            Some("urn:uuid:multi@2020-02-02T00:00:00Z")
        );
    }

    #[test]
    fn test_malformed_optional_document_is_absent() {
        let mut files = book_files();
        files.retain(|(name, _)| *name != "OEBPS/toc.ncx");
        files.push(("OEBPS/toc.ncx", b"<not-ncx/>".to_vec()));
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &files).unwrap();

        let publication = Publication::open(&path, ParsingOptions::default()).unwrap();
        assert!(publication.default_rendition().unwrap().ncx_toc.is_none());
    }

    #[test]
    fn test_missing_manifest_documents_keep_assets() {
        let mut files = book_files();
        files.retain(|(name, _)| *name != "OEBPS/nav.xhtml" && *name != "OEBPS/smil/c1.smil");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        create_test_epub(&path, &files).unwrap();

        let disabled: ParsingOptions = [ParsingOption::NoNav, ParsingOption::NoMediaOverlay]
            .into_iter()
            .collect();
        for options in [ParsingOptions::default(), disabled] {
            let publication = Publication::open(&path, options).unwrap();
            let rendition = publication.default_rendition().unwrap();
            assert!(rendition.nav_document.is_none());
            assert!(rendition.mo_documents.is_empty());
            assert!(publication.asset("OEBPS/nav.xhtml").is_some());
            assert!(publication.asset("OEBPS/smil/c1.smil").is_some());
            assert_eq!(publication.asset("OEBPS/nav.xhtml").unwrap().contents(), None);
        }

        let without_refs = Publication::open(
            &path,
            ParsingOptions::new(vec![ParsingOption::NoAssetRefs]),
        )
        .unwrap();
        assert!(without_refs.asset("OEBPS/nav.xhtml").is_none());
        assert!(without_refs.asset("OEBPS/smil/c1.smil").is_none());
        assert!(without_refs.asset("OEBPS/toc.ncx").is_some());
    }

    #[test]
    fn test_missing_required_documents() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Publication::open(dir.path().join("nope.epub"), ParsingOptions::default()),
            Err(EpubError::NotFound(_))
        ));

        let no_container = dir.path().join("no_container.epub");
        create_test_epub(&no_container, &[("mimetype", b"application/epub+zip".to_vec())]).unwrap();
        assert!(matches!(
            Publication::open(&no_container, ParsingOptions::default()),
            Err(EpubError::MissingDocument(_))
        ));

        let no_opf = dir.path().join("no_opf.epub");
        create_test_epub(
            &no_opf,
            &[("META-INF/container.xml", CONTAINER_XML.as_bytes().to_vec())],
        )
        .unwrap();
        assert!(matches!(
            Publication::open(&no_opf, ParsingOptions::default()),
            Err(EpubError::MissingDocument(_))
        ));
    }

    #[test]
    fn test_in_memory_publication() {
        let mut publication = Publication::new_in_memory();
        assert_eq!(publication.manifestation(), Manifestation::Memory);
        assert_eq!(publication.size(), None);

        publication.add_asset(Asset::from_bytes("mimetype", b"application/epub+zip".to_vec()));
        publication.set_container(
            Container::parse(CONTAINER_XML.as_bytes(), namespace::CONTAINER_PATH).unwrap(),
        );
        assert_eq!(publication.mimetype().as_deref(), Some("application/epub+zip"));
        assert_eq!(
            publication.default_rendition().map(|r| r.full_path.as_str()),
            Some("OEBPS/content.opf")
        );
        assert!(publication.unique_identifier().is_none());
    }
}

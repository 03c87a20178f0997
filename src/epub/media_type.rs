//! 媒体类型常量与分类

pub const CSS: &str = "text/css";
pub const GIF: &str = "image/gif";
pub const JPEG: &str = "image/jpeg";
pub const PNG: &str = "image/png";
pub const SVG: &str = "image/svg+xml";
pub const JS: &str = "text/javascript";
pub const MP3: &str = "audio/mpeg";
pub const MP4_AUDIO: &str = "audio/mp4";
pub const MP4_VIDEO: &str = "video/mp4";
pub const NCX: &str = "application/x-dtbncx+xml";
pub const OPF: &str = "application/oebps-package+xml";
pub const PLS: &str = "application/pls+xml";
pub const SMIL: &str = "application/smil+xml";
pub const XHTML: &str = "application/xhtml+xml";
pub const EPUB: &str = "application/epub+zip";

pub const EOT: &str = "application/vnd.ms-fontobject";
pub const OTF: &str = "application/vnd.ms-opentype";
pub const OTF_ALT: &str = "application/x-font-opentype";
pub const OTF_ALT_2: &str = "application/font-otf";
pub const OTF_ALT_3: &str = "application/x-font-otf";
pub const SFNT: &str = "application/font-sfnt";
pub const TTF: &str = "application/x-font-ttf";
pub const TTF_ALT: &str = "application/x-font-truetype";
pub const WOFF: &str = "application/font-woff";
pub const WOFF_ALT: &str = "application/x-font-woff";

/// 字体媒体类型（SVG字体也计入）
pub const FONTS: &[&str] = &[
    EOT, OTF, OTF_ALT, OTF_ALT_2, OTF_ALT_3, SFNT, SVG, TTF, TTF_ALT, WOFF, WOFF_ALT,
];

/// EPUB内容文档媒体类型
pub const CONTENT_DOCUMENTS: &[&str] = &[SVG, XHTML];

pub fn is_audio(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}

pub fn is_image(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

pub fn is_video(media_type: &str) -> bool {
    media_type.starts_with("video/")
}

pub fn is_font(media_type: &str) -> bool {
    FONTS.contains(&media_type)
}

pub fn is_content_document(media_type: &str) -> bool {
    CONTENT_DOCUMENTS.contains(&media_type)
}

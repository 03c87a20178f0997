//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块提供EPUB文件中OPF包文件的解析功能，包括元数据、清单、脊柱、指南以及元数据细化引用的解析。

mod guide;
mod manifest;
mod metadata;
mod package;
mod spine;

pub use guide::{Guide, GuideReference};
pub use manifest::{Manifest, ManifestItem};
pub use metadata::{
    DcMetadatum,
    LegacyMeta,
    MetadataLink,
    Metadatum,
    OpfMetadata,
    PropertyMeta,
    Refinement,
    RefiningEntry,
};
pub use package::{OpfPackage, PackageDocument};
pub use spine::{Itemref, Spine};

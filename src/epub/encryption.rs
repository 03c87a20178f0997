//! 加密信息（`META-INF/encryption.xml`）
//!
//! 只用于识别哪些资源做了字体混淆，不做真正的解密。

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::obfuscation::ObfuscationAlgorithm;
use crate::epub::xml::XmlNode;

/// `<enc:EncryptedKey>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedKey {
    pub id: Option<String>,
    pub encryption_method_algorithm: Option<String>,
    pub key_name: Option<String>,
    pub cipher_value: Option<String>,
}

/// `<enc:EncryptedData>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedData {
    pub id: Option<String>,
    pub encryption_method_algorithm: Option<String>,
    pub retrieval_method_type: Option<String>,
    pub retrieval_method_uri: Option<String>,
    /// 被加密资源的内部路径
    pub cipher_reference_uri: Option<String>,
}

impl EncryptedData {
    /// 混淆算法；不是已知混淆算法（例如真正的加密）时为`None`
    pub fn obfuscation_algorithm(&self) -> Option<ObfuscationAlgorithm> {
        self.encryption_method_algorithm
            .as_deref()
            .and_then(ObfuscationAlgorithm::from_uri)
    }
}

/// encryption.xml解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encryption {
    pub internal_path: String,
    pub encrypted_keys: Vec<EncryptedKey>,
    pub encrypted_data: Vec<EncryptedData>,
}

impl Encryption {
    /// 解析encryption.xml
    ///
    /// # 参数
    /// * `bytes` - 文件内容
    /// * `internal_path` - 文件的内部路径
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<Encryption> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::CONTAINER, "encryption") {
            return Err(EpubError::EncryptionParseError(format!(
                "{}: 根元素不是<encryption>",
                internal_path
            )));
        }

        let encrypted_keys = root
            .children(namespace::ENC, "EncryptedKey")
            .map(|key| EncryptedKey {
                id: key.attr_string("Id"),
                encryption_method_algorithm: method_algorithm(key),
                key_name: key
                    .select(namespace::DS, &["KeyInfo", "KeyName"])
                    .first()
                    .and_then(|name| name.trimmed_text()),
                cipher_value: cipher_data(key, "CipherValue").and_then(|value| value.trimmed_text()),
            })
            .collect();

        let encrypted_data = root
            .children(namespace::ENC, "EncryptedData")
            .map(|data| {
                let retrieval = data
                    .select(namespace::DS, &["KeyInfo", "RetrievalMethod"])
                    .into_iter()
                    .next();
                EncryptedData {
                    id: data.attr_string("Id"),
                    encryption_method_algorithm: method_algorithm(data),
                    retrieval_method_type: retrieval.and_then(|r| r.attr_string("Type")),
                    retrieval_method_uri: retrieval.and_then(|r| r.attr_string("URI")),
                    cipher_reference_uri: cipher_data(data, "CipherReference")
                        .and_then(|reference| reference.attr_string("URI")),
                }
            })
            .collect();

        Ok(Encryption {
            internal_path: internal_path.to_string(),
            encrypted_keys,
            encrypted_data,
        })
    }

    /// 用指定算法混淆的资源内部路径
    pub fn obfuscated_assets(&self, algorithm: ObfuscationAlgorithm) -> Vec<&str> {
        self.encrypted_data
            .iter()
            .filter(|data| data.obfuscation_algorithm() == Some(algorithm))
            .filter_map(|data| data.cipher_reference_uri.as_deref())
            .collect()
    }

    pub fn adobe_obfuscated_assets(&self) -> Vec<&str> {
        self.obfuscated_assets(ObfuscationAlgorithm::Adobe)
    }

    pub fn idpf_obfuscated_assets(&self) -> Vec<&str> {
        self.obfuscated_assets(ObfuscationAlgorithm::Idpf)
    }
}

fn method_algorithm(node: &XmlNode) -> Option<String> {
    node.child(namespace::ENC, "EncryptionMethod")
        .and_then(|method| method.attr_string("Algorithm"))
}

fn cipher_data<'a>(node: &'a XmlNode, name: &str) -> Option<&'a XmlNode> {
    node.select(namespace::ENC, &["CipherData", name]).into_iter().next()
}

use zhconv::{zhconv, Variant};

use super::ScriptConverter;

/// Simplified to traditional Chinese using zhconv's merged OpenCC and MediaWiki rulesets.
///
/// Phrase rules apply before single characters, so context-dependent
/// characters such as 发 (發/髮) follow the surrounding word.
#[derive(Debug, Clone, Copy, Default)]
pub struct HantConverter;

impl ScriptConverter for HantConverter {
    fn convert(&self, text: &str) -> String {
        zhconv(text, Variant::ZhHant)
    }
}

//! 翻訳言語と翻訳サービスの定義

use crate::error::TranslatorError;
use std::fmt;
use std::str::FromStr;

/// 選択可能な言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Chinese,
    English,
    Japanese,
    Korean,
    French,
    German,
    Russian,
}

impl Language {
    /// GUIの選択肢に並べる順序
    pub const ALL: [Language; 7] = [
        Language::Chinese,
        Language::English,
        Language::Japanese,
        Language::Korean,
        Language::French,
        Language::German,
        Language::Russian,
    ];

    /// pdf2zh に渡す言語コード
    pub fn code(self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::French => "fr",
            Language::German => "de",
            Language::Russian => "ru",
        }
    }

    /// 表示名
    pub fn label(self) -> &'static str {
        match self {
            Language::Chinese => "中国語",
            Language::English => "英語",
            Language::Japanese => "日本語",
            Language::Korean => "韓国語",
            Language::French => "フランス語",
            Language::German => "ドイツ語",
            Language::Russian => "ロシア語",
        }
    }
}

impl FromStr for Language {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(wanted) || lang.label() == wanted)
            .ok_or_else(|| TranslatorError::Config(format!("未対応の言語です: {}", s)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// pdf2zh が提供する翻訳サービス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Google,
    Bing,
    DeepL,
    DeepLX,
    Ollama,
    OpenAI,
    AzureOpenAI,
    Azure,
    Gemini,
    Zhipu,
    Silicon,
    Tencent,
    DeepSeek,
}

impl Service {
    pub const ALL: [Service; 13] = [
        Service::Google,
        Service::Bing,
        Service::DeepL,
        Service::DeepLX,
        Service::Ollama,
        Service::OpenAI,
        Service::AzureOpenAI,
        Service::Azure,
        Service::Gemini,
        Service::Zhipu,
        Service::Silicon,
        Service::Tencent,
        Service::DeepSeek,
    ];

    /// pdf2zh の `-s` に渡すサービス名
    pub fn id(self) -> &'static str {
        match self {
            Service::Google => "google",
            Service::Bing => "bing",
            Service::DeepL => "deepl",
            Service::DeepLX => "deeplx",
            Service::Ollama => "ollama",
            Service::OpenAI => "openai",
            Service::AzureOpenAI => "azure-openai",
            Service::Azure => "azure",
            Service::Gemini => "gemini",
            Service::Zhipu => "zhipu",
            Service::Silicon => "silicon",
            Service::Tencent => "tencent",
            Service::DeepSeek => "deepseek",
        }
    }
}

impl FromStr for Service {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Service::ALL
            .into_iter()
            .find(|service| service.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TranslatorError::Config(format!("未対応の翻訳サービスです: {}", s)))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

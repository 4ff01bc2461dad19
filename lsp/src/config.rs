use serde::Deserialize;
use serde_json::Value;

/// 客户端配置里本服务所在的节
pub const SECTION: &str = "fourglLanguageServer";

/// 服务端设置。每个键都可以缺省，缺省取默认值。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 每个文档最多发布多少条诊断
    pub max_number_of_problems: usize,
    pub enable_diagnostics: bool,
    pub enable_completion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: 1000,
            enable_diagnostics: true,
            enable_completion: true,
        }
    }
}

impl Settings {
    /// 既接受 `{"fourglLanguageServer": {...}}`，也接受直接的设置对象
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(mut map) if map.contains_key(SECTION) => {
                let section = map.remove(SECTION).unwrap_or(Value::Null);
                Self::from_section(section)
            }
            other => Self::from_section(other),
        }
    }

    fn from_section(value: Value) -> Result<Self, serde_json::Error> {
        // 客户端没有这一节时会发 null
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_missing() {
        assert_eq!(Settings::from_json(json!({})).unwrap(), Settings::default());
        assert_eq!(Settings::from_json(Value::Null).unwrap(), Settings::default());
        assert_eq!(Settings::default().max_number_of_problems, 1000);
    }

    #[test]
    fn partial_section() {
        let settings = Settings::from_json(json!({
            "fourglLanguageServer": { "maxNumberOfProblems": 5, "enableCompletion": false }
        }))
        .unwrap();
        assert_eq!(settings.max_number_of_problems, 5);
        assert!(!settings.enable_completion);
        assert!(settings.enable_diagnostics);
    }

    #[test]
    fn bare_settings_object() {
        let settings = Settings::from_json(json!({ "enableDiagnostics": false })).unwrap();
        assert!(!settings.enable_diagnostics);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(Settings::from_json(json!({ "maxNumberOfProblems": "many" })).is_err());
    }
}

//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use serde_json::{
    Map,
    Value,
};

use crate::config::{
    Configuration,
    ConfigurationLoader,
    DefinitionBuilderRegistry,
    DefinitionData,
    data_from_map,
};
use crate::dictionary::{
    Dictionary,
    MemoryDictionary,
};

/// JSON オブジェクトを生のマップに変換する（オブジェクト以外は空）
pub(crate) fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// JSON オブジェクトから `DefinitionData` を作成する
pub(crate) fn data(value: Value) -> DefinitionData {
    data_from_map(map(value))
}

/// 組み込みの定義ビルダーで設定ドキュメントを読み込む
#[allow(clippy::unwrap_used)]
pub(crate) fn configuration(document: Value) -> Configuration {
    let builders = DefinitionBuilderRegistry::with_defaults();
    let configuration = Configuration::new();
    ConfigurationLoader::new(&builders).load_value(&document, &configuration).unwrap();
    configuration
}

/// テスト用の `MemoryDictionary` を作成する
///
/// # Arguments
/// * `translations` - `{"<key>": {"source": ..., "target": ...}}` 形式のエントリ
#[allow(clippy::unwrap_used)]
pub(crate) fn memory_dictionary(translations: Value) -> MemoryDictionary {
    MemoryDictionary::from_json("en", "de", &translations).unwrap()
}

/// 辞書の内容を `{"<key>": {"source": ..., "target": ...}}` 形式で取り出す
#[allow(clippy::unwrap_used)]
pub(crate) fn contents(dictionary: &dyn Dictionary) -> Value {
    let mut entries = Map::new();
    for key in dictionary.keys() {
        let value = dictionary.get(&key).unwrap();
        let mut entry = Map::new();
        entry.insert("source".to_string(), value.source().map_or(Value::Null, Value::from));
        entry.insert("target".to_string(), value.target().map_or(Value::Null, Value::from));
        entries.insert(key, Value::Object(entry));
    }
    Value::Object(entries)
}

//! i18n-sync
//!
//! 設定ファイルで定義された翻訳辞書間の同期ジョブを構築・実行するエンジン

pub mod config;
pub mod dictionary;
pub mod error;
pub mod job;
pub mod logging;
pub mod registry;

#[cfg(test)]
mod test_utils;

// よく使う型を再エクスポート
pub use error::Error;
pub use job::{
    JobFactory,
    JobFactoryBuilder,
    TranslationJob,
};

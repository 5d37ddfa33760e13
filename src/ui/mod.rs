//! UI module wiring the Slint popover and preview windows to the controller.
//!
//! Threading model:
//! - `slint::spawn_local`: UI非同期処理（フォルダ選択ダイアログなど、メインスレッドで実行する必要がある処理）
//! - `rayon::spawn`: CPU集約的処理（サムネイル生成、プレビュー画像デコード）
//! - `upgrade_in_event_loop`: ワーカースレッドからUIスレッドへの結果返却時に使用

pub mod handlers;
pub mod preview_window;
mod state_helpers;

pub use handlers::{SharedController, setup_handlers};
pub use preview_window::SlintPreview;

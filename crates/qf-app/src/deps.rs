//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for [`App`](crate::App) construction. Not a builder:
//! no defaults, no hidden logic, just parameter grouping.
//! 仅用于参数打包，无默认值。

use std::sync::Arc;

use qf_core::ports::*;

/// All ports the application needs. Every field is required.
/// 应用所需的全部端口，均为必填。
pub struct AppDeps {
    // Remote data service / 远程数据服务
    pub quotes: Arc<dyn QuoteRepositoryPort>,
    pub liked_quotes: Arc<dyn LikedQuoteRepositoryPort>,
    pub profiles: Arc<dyn UserProfileRepositoryPort>,
    pub preferences: Arc<dyn UserPreferencesRepositoryPort>,

    // Widget hand-off / 小组件
    pub widget_slot: Arc<dyn WidgetSlotPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
}

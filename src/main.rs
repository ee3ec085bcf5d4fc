// ==========================================
// 산후조리원 디렉터리 - 主入口
// ==========================================
// 用法: postpartum-centers [db_path]
// 输出: 地区层级树（含各节点 조리원 数量）JSON
// ==========================================

use postpartum_centers::app::{get_default_db_path, AppState};
use postpartum_centers::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", postpartum_centers::APP_NAME);
    tracing::info!("系统版本: {}", postpartum_centers::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path)?;
    let tree = state.region_api.region_tree()?;

    let total_centers: i64 = tree.iter().map(|node| node.center_count).sum();
    tracing::info!(first_layers = tree.len(), total_centers, "地区层级树加载完成");

    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

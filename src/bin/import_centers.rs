// Back-office utility: import a postpartum-center directory from CSV.
//
// Usage:
//   import_centers <csv_path> [db_path]
//
// CSV header: region_first_layer,region_second_layer,region_third_layer,center[,policies]
// policies cell: "name=true;name2=false"

use postpartum_centers::app::{get_default_db_path, AppState};
use postpartum_centers::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let csv_path = args
        .next()
        .ok_or("usage: import_centers <csv_path> [db_path]")?;
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    let state = AppState::new(db_path)?;
    let summary = state.importer().import_from_csv(&csv_path)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

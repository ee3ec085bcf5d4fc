// ==========================================
// 조리원 目录导入集成测试
// ==========================================

mod test_helpers;

use postpartum_centers::domain::RegionLayer;
use postpartum_centers::importer::ImportError;
use postpartum_centers::logging;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_import_builds_hierarchy() {
    logging::init_test();

    let (_db_file, state) = test_helpers::create_test_state().unwrap();
    let csv = write_csv(
        "region_first_layer,region_second_layer,region_third_layer,center,policies\n\
         서울,강남구,역삼동,행복조리원,주차=true;반려동물=false\n\
         서울,강남구,역삼동,사랑조리원,\n\
         \n\
         서울,서초구,반포동,하늘조리원,주차=1\n\
         부산,해운대구,우동,바다조리원,\n",
    );

    let summary = state.importer().import_from_csv(csv.path()).unwrap();

    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.counts.region_first_layers_created, 2);
    assert_eq!(summary.counts.region_second_layers_created, 3);
    assert_eq!(summary.counts.region_third_layers_created, 3);
    assert_eq!(summary.counts.centers_created, 4);
    assert_eq!(summary.counts.policies_created, 3);

    let firsts = state.region_api.list_first_layers().unwrap();
    assert_eq!(
        firsts.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["서울", "부산"]
    );

    let seoul_centers = state
        .region_api
        .list_centers(RegionLayer::First, firsts[0].id)
        .unwrap();
    assert_eq!(
        seoul_centers.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["행복조리원", "사랑조리원", "하늘조리원"]
    );

    let available = state
        .policy_api
        .list_available_policies(seoul_centers[0].id)
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].name, "주차");
}

#[test]
fn test_import_reuses_existing_regions() {
    let (_db_file, state) = test_helpers::create_test_state().unwrap();
    let h = test_helpers::build_sample_hierarchy(&state).unwrap();

    let csv = write_csv(
        "region_first_layer,region_second_layer,region_third_layer,center\n\
         RFL_0,RSL_1,RTL_2,center_4\n",
    );
    let summary = state.importer().import_from_csv(csv.path()).unwrap();

    assert_eq!(summary.counts.region_first_layers_created, 0);
    assert_eq!(summary.counts.region_third_layers_created, 0);

    let under_rtl_2 = state
        .region_api
        .list_centers(RegionLayer::Third, h.rtl[2])
        .unwrap();
    assert_eq!(under_rtl_2.len(), 1);
    assert_eq!(under_rtl_2[0].name, "center_4");
}

#[test]
fn test_import_missing_field_rolls_back() {
    let (_db_file, state) = test_helpers::create_test_state().unwrap();
    let csv = write_csv(
        "region_first_layer,region_second_layer,region_third_layer,center\n\
         서울,강남구,역삼동,행복조리원\n\
         서울,강남구,,사랑조리원\n",
    );

    let result = state.importer().import_from_csv(csv.path());

    match result {
        Err(ImportError::MissingField { row, field }) => {
            assert_eq!(row, 2);
            assert_eq!(field, "region_third_layer");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(state.region_api.list_first_layers().unwrap().is_empty());
}

#[test]
fn test_import_rejects_bad_paths() {
    let (_db_file, state) = test_helpers::create_test_state().unwrap();

    let txt = Builder::new().suffix(".txt").tempfile().unwrap();
    assert!(matches!(
        state.importer().import_from_csv(txt.path()),
        Err(ImportError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        state.importer().import_from_csv("/nonexistent/centers.csv"),
        Err(ImportError::FileNotFound(_))
    ));
}

#[test]
fn test_import_error_row_counts_empty_lines() {
    let (_db_file, state) = test_helpers::create_test_state().unwrap();
    let csv = write_csv(
        "region_first_layer,region_second_layer,region_third_layer,center\n\
         서울,강남구,역삼동,A\n\
         \n\
         서울,강남구,,B\n",
    );

    match state.importer().import_from_csv(csv.path()) {
        Err(ImportError::MissingField { row, field }) => {
            assert_eq!(row, 3);
            assert_eq!(field, "region_third_layer");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(state.region_api.list_first_layers().unwrap().is_empty());
}

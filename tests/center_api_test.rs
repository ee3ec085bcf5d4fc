// ==========================================
// CenterApi 集成测试
// ==========================================

mod test_helpers;

use postpartum_centers::api::{ApiError, CenterSearchRequest};
use postpartum_centers::domain::{RegionLayer, CENTER_NAME_MAX_LEN};

#[test]
fn test_get_center_detail() {
    let (_temp_file, state) = test_helpers::create_test_state().unwrap();
    let h = test_helpers::build_sample_hierarchy(&state).unwrap();

    state.policy_api.add_policy(h.centers[2], "주차", true).unwrap();
    state.policy_api.add_policy(h.centers[2], "반려동물", false).unwrap();

    let detail = state.center_api.get_center(h.centers[2]).unwrap();

    assert_eq!(detail.center.name, "center_2");
    assert_eq!(detail.center.region_third_layer_id, h.rtl[1]);
    assert_eq!(detail.region_path.to_string(), "RFL_0 > RSL_0 > RTL_1");
    assert_eq!(detail.policies.len(), 2);
    assert!(detail.policies[0].is_available);
    assert!(!detail.policies[1].is_available);
}

#[test]
fn test_create_center_validation() {
    let (_temp_file, state) = test_helpers::create_test_state().unwrap();
    let h = test_helpers::build_sample_hierarchy(&state).unwrap();

    let too_long = "조".repeat(CENTER_NAME_MAX_LEN + 1);
    assert!(matches!(
        state.center_api.create_center(h.rtl[2], &too_long),
        Err(ApiError::InvalidInput(_))
    ));

    // 恰好上限（按字符计）
    let at_limit = "조".repeat(CENTER_NAME_MAX_LEN);
    assert!(state.center_api.create_center(h.rtl[2], &at_limit).is_ok());

    assert!(matches!(
        state.center_api.create_center(9_999, "행복조리원"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.center_api.get_center(9_999),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_rename_and_move_center() {
    let (_temp_file, state) = test_helpers::create_test_state().unwrap();
    let h = test_helpers::build_sample_hierarchy(&state).unwrap();

    state.center_api.rename_center(h.centers[0], "행복조리원").unwrap();
    state.center_api.move_center(h.centers[0], h.rtl[2]).unwrap();

    let detail = state.center_api.get_center(h.centers[0]).unwrap();
    assert_eq!(detail.center.name, "행복조리원");
    assert_eq!(detail.region_path.to_string(), "RFL_0 > RSL_1 > RTL_2");

    let under_rsl_1 = state
        .region_api
        .list_centers(RegionLayer::Second, h.rsl[1])
        .unwrap();
    assert_eq!(under_rsl_1.len(), 1);

    assert!(matches!(
        state.center_api.move_center(h.centers[0], 9_999),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.center_api.rename_center(9_999, "없음"),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_search_centers() {
    let (_temp_file, state) = test_helpers::create_test_state().unwrap();
    let h = test_helpers::build_sample_hierarchy(&state).unwrap();

    state.policy_api.add_policy(h.centers[1], "주차", true).unwrap();
    state.policy_api.add_policy(h.centers[2], "주차", false).unwrap();
    state.policy_api.add_policy(h.centers[3], "주차", true).unwrap();

    // 地区 + 可用政策
    let request = CenterSearchRequest {
        region_layer: Some(RegionLayer::Third),
        region_id: Some(h.rtl[1]),
        available_policy: Some("주차".to_string()),
        ..Default::default()
    };
    let found = state.center_api.search_centers(&request).unwrap();
    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![h.centers[3]]);

    // 名称子串 + limit
    let request = CenterSearchRequest {
        name_contains: Some("center_".to_string()),
        limit: Some(2),
        ..Default::default()
    };
    let found = state.center_api.search_centers(&request).unwrap();
    assert_eq!(
        found.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![h.centers[0], h.centers[1]]
    );

    // LIKE 通配符按字面匹配
    let request = CenterSearchRequest {
        name_contains: Some("%".to_string()),
        ..Default::default()
    };
    assert!(state.center_api.search_centers(&request).unwrap().is_empty());

    // 地区条件不完整
    let request = CenterSearchRequest {
        region_id: Some(h.rfl[0]),
        ..Default::default()
    };
    assert!(matches!(
        state.center_api.search_centers(&request),
        Err(ApiError::InvalidInput(_))
    ));
}

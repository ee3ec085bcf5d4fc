// ==========================================
// 산후조리원 디렉터리 - 字段映射器
// ==========================================
// 职责: 原始行 → CenterImportRow（必填列检查 + 名称校验 + 政策解析）
// ==========================================

use crate::domain::types::{
    validate_name, CENTER_NAME_MAX_LEN, POLICY_NAME_MAX_LEN, REGION_NAME_MAX_LEN,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use crate::repository::center_import_repo::CenterImportRow;

pub const COL_REGION_FIRST_LAYER: &str = "region_first_layer";
pub const COL_REGION_SECOND_LAYER: &str = "region_second_layer";
pub const COL_REGION_THIRD_LAYER: &str = "region_third_layer";
pub const COL_CENTER: &str = "center";
pub const COL_POLICIES: &str = "policies";

pub struct FieldMapper;

impl FieldMapper {
    pub fn map_to_import_row(&self, record: &RawRecord) -> ImportResult<CenterImportRow> {
        let row = record.row_no;

        Ok(CenterImportRow {
            row_no: row,
            region_first_layer: self.required_name(record, COL_REGION_FIRST_LAYER, REGION_NAME_MAX_LEN)?,
            region_second_layer: self.required_name(record, COL_REGION_SECOND_LAYER, REGION_NAME_MAX_LEN)?,
            region_third_layer: self.required_name(record, COL_REGION_THIRD_LAYER, REGION_NAME_MAX_LEN)?,
            center: self.required_name(record, COL_CENTER, CENTER_NAME_MAX_LEN)?,
            policies: match record.get(COL_POLICIES) {
                Some(raw) => parse_policies(raw, row)?,
                None => Vec::new(),
            },
        })
    }

    fn required_name(&self, record: &RawRecord, column: &str, max_chars: usize) -> ImportResult<String> {
        let value = record.get(column).ok_or_else(|| ImportError::MissingField {
            row: record.row_no,
            field: column.to_string(),
        })?;

        validate_name(column, value, max_chars).map_err(|e| ImportError::InvalidValue {
            row: record.row_no,
            field: column.to_string(),
            message: e.to_string(),
        })
    }
}

/// 解析政策列: `name=true;name2=false`
///
/// 值接受 true/false/1/0（不区分大小写），空段忽略
fn parse_policies(raw: &str, row: usize) -> ImportResult<Vec<(String, bool)>> {
    let mut policies = Vec::new();

    for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let invalid = |message: String| ImportError::InvalidValue {
            row,
            field: COL_POLICIES.to_string(),
            message,
        };

        let (name, flag) = segment
            .split_once('=')
            .ok_or_else(|| invalid(format!("缺少 '=': {}", segment)))?;

        let name = validate_name(COL_POLICIES, name, POLICY_NAME_MAX_LEN)
            .map_err(|e| invalid(e.to_string()))?;

        let is_available = match flag.trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => return Err(invalid(format!("无法识别的布尔值: {}", other))),
        };

        policies.push((name, is_available));
    }

    Ok(policies)
}
